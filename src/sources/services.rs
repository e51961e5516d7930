//! Standard service-registry discovery over a directory search path.
//!
//! Each search-path entry may hold `services/<canonical-id>` provider
//! listings: one provider name per line, `#` comments allowed. The first
//! usable entry wins, and this source constructs the provider itself
//! against its catalog rather than handing a name to the instantiator.
//! A listed provider that cannot be built is a hard resolution error; an
//! unreadable listing is reported and skipped.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::capability::CapabilityInfo;
use crate::catalog::ProviderCatalog;
use crate::error::ResolveError;
use crate::observer::LookupObserver;
use crate::sources::{Located, LookupSource, SERVICES_DIR};

const LABEL: &str = "service registry";

/// Environment variable holding the search path, in `std::env::split_paths`
/// syntax.
pub const SEARCH_PATH_ENV: &str = "SOAP_PROVIDER_PATH";

/// Consults provider-listing files registered on the search path.
pub struct ServiceRegistrySource {
    search_path: Vec<PathBuf>,
    catalog: Arc<ProviderCatalog>,
}

impl ServiceRegistrySource {
    pub fn new(search_path: Vec<PathBuf>, catalog: Arc<ProviderCatalog>) -> Self {
        ServiceRegistrySource {
            search_path,
            catalog,
        }
    }

    /// Search path from `SOAP_PROVIDER_PATH`, constructing against the
    /// process-wide catalog.
    pub fn from_platform(catalog: Arc<ProviderCatalog>) -> Self {
        let search_path = env::var_os(SEARCH_PATH_ENV)
            .map(|raw| env::split_paths(&raw).collect())
            .unwrap_or_default();
        ServiceRegistrySource::new(search_path, catalog)
    }

    fn construct(
        &self,
        capability: CapabilityInfo,
        provider: &str,
    ) -> Result<Located, ResolveError> {
        match self.catalog.construct(provider) {
            None => Err(ResolveError::UnknownProvider {
                capability: capability.canonical.to_string(),
                provider: provider.to_string(),
            }),
            Some(Err(source)) => Err(ResolveError::Construction {
                capability: capability.canonical.to_string(),
                provider: provider.to_string(),
                context: String::new(),
                source,
            }),
            Some(Ok(handle)) => Ok(Located::Instance {
                provider: provider.to_string(),
                handle,
            }),
        }
    }
}

/// First usable provider name in a listing: names are one per line, blank
/// lines and `#` comments skipped.
pub(crate) fn first_listed_provider(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}

impl LookupSource for ServiceRegistrySource {
    fn label(&self) -> &'static str {
        LABEL
    }

    fn locate(
        &self,
        capability: CapabilityInfo,
        observer: &dyn LookupObserver,
    ) -> Result<Option<Located>, ResolveError> {
        for dir in &self.search_path {
            let listing = dir.join(SERVICES_DIR).join(capability.canonical);
            if !listing.is_file() {
                observer.on_attempt(LABEL, capability.canonical, false);
                continue;
            }
            let text = match fs::read_to_string(&listing) {
                Ok(text) => text,
                Err(err) => {
                    observer.on_config_error(&listing, &err.to_string());
                    continue;
                }
            };
            let Some(provider) = first_listed_provider(&text) else {
                observer.on_attempt(LABEL, capability.canonical, false);
                continue;
            };
            observer.on_attempt(LABEL, capability.canonical, true);
            return self.construct(capability, &provider).map(Some);
        }
        Ok(None)
    }
}
