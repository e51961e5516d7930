//! Legacy resource discovery for deprecated capability aliases.
//!
//! Older installations advertised providers under `services/<alias>` using
//! the capability's historic id. The source is consulted only for
//! capabilities that still carry an alias, reads a single provider name
//! from the resource's first line, and always warns when the legacy path
//! satisfies a lookup.

use std::env;
use std::fs;
use std::path::PathBuf;

use crate::capability::CapabilityInfo;
use crate::error::ResolveError;
use crate::observer::LookupObserver;
use crate::sources::services::first_listed_provider;
use crate::sources::{Located, LookupSource, SERVICES_DIR};

const LABEL: &str = "legacy resource";

/// Scans the search path for alias-named provider resources.
pub struct LegacyResourceSource {
    search_path: Vec<PathBuf>,
}

impl LegacyResourceSource {
    pub fn new(search_path: Vec<PathBuf>) -> Self {
        LegacyResourceSource { search_path }
    }

    /// Same search path as the service registry (`SOAP_PROVIDER_PATH`).
    pub fn from_platform() -> Self {
        let search_path = env::var_os(super::services::SEARCH_PATH_ENV)
            .map(|raw| env::split_paths(&raw).collect())
            .unwrap_or_default();
        LegacyResourceSource::new(search_path)
    }
}

impl LookupSource for LegacyResourceSource {
    fn label(&self) -> &'static str {
        LABEL
    }

    fn locate(
        &self,
        capability: CapabilityInfo,
        observer: &dyn LookupObserver,
    ) -> Result<Option<Located>, ResolveError> {
        let Some(alias) = capability.deprecated_alias else {
            return Ok(None);
        };

        for dir in &self.search_path {
            let resource = dir.join(SERVICES_DIR).join(alias);
            if !resource.is_file() {
                observer.on_attempt(LABEL, alias, false);
                continue;
            }
            let text = match fs::read_to_string(&resource) {
                Ok(text) => text,
                Err(err) => {
                    observer.on_config_error(&resource, &err.to_string());
                    continue;
                }
            };
            let Some(provider) = first_listed_provider(&text) else {
                observer.on_attempt(LABEL, alias, false);
                continue;
            };
            observer.on_attempt(LABEL, alias, true);
            observer.on_deprecated_key(LABEL, alias, capability.canonical);
            return Ok(Some(Located::Name(provider)));
        }
        Ok(None)
    }
}
