//! Platform configuration file under the installation directory.
//!
//! The file is a flat `key=value` properties file at
//! `<home>/conf/soap.properties`, with `<home>/lib/soap.properties` kept as
//! a fallback for older layouts. `<home>` is discovered from
//! `SOAP_PROVIDER_HOME`, then from the build-time hint. The file is read
//! once per lookup; an unreadable file is reported and treated as "value
//! absent" rather than failing the chain.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::capability::CapabilityInfo;
use crate::error::ResolveError;
use crate::observer::LookupObserver;
use crate::sources::{Located, LookupSource};

const LABEL: &str = "config file";
const CONFIG_FILE: &str = "soap.properties";

/// Environment variable naming the installation directory.
pub const HOME_ENV: &str = "SOAP_PROVIDER_HOME";

/// Reads capability keys from the installation's properties file.
pub struct ConfigFileSource {
    home: Option<PathBuf>,
}

impl ConfigFileSource {
    /// Source anchored at an explicit installation directory.
    pub fn new(home: PathBuf) -> Self {
        ConfigFileSource { home: Some(home) }
    }

    /// Source using the platform discovery order: `SOAP_PROVIDER_HOME` if it
    /// names an existing directory, else the build-time hint. Without
    /// either, the source is inert.
    pub fn from_platform() -> Self {
        ConfigFileSource {
            home: platform_home(),
        }
    }

    /// The properties file to read for this lookup: the `conf/` layout when
    /// present, else the legacy `lib/` layout.
    fn config_path(&self) -> Option<PathBuf> {
        let home = self.home.as_ref()?;
        let current = home.join("conf").join(CONFIG_FILE);
        if current.is_file() {
            return Some(current);
        }
        let legacy = home.join("lib").join(CONFIG_FILE);
        legacy.is_file().then_some(legacy)
    }
}

fn platform_home() -> Option<PathBuf> {
    if let Ok(raw) = env::var(HOME_ENV) {
        if let Some(home) = home_from_hint(&raw) {
            return Some(home);
        }
    }
    option_env!("SOAP_PROVIDER_HOME_HINT").and_then(home_from_hint)
}

fn home_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.trim().is_empty() {
        return None;
    }
    let path = PathBuf::from(hint);
    path.is_dir().then_some(path)
}

/// Parse properties text into a key/value map.
///
/// Accepts `key=value` and `key: value` lines; blank lines and `#`/`!`
/// comments are skipped, as are lines without a separator. Parsing never
/// fails; malformed lines simply contribute no mapping.
fn parse_properties(text: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let split = line
            .split_once('=')
            .or_else(|| line.split_once(':'));
        if let Some((key, value)) = split {
            let key = key.trim();
            let value = value.trim();
            if !key.is_empty() && !value.is_empty() {
                entries.insert(key.to_string(), value.to_string());
            }
        }
    }
    entries
}

fn read_properties(path: &Path, observer: &dyn LookupObserver) -> BTreeMap<String, String> {
    match fs::read_to_string(path) {
        Ok(text) => parse_properties(&text),
        Err(err) => {
            observer.on_config_error(path, &err.to_string());
            BTreeMap::new()
        }
    }
}

impl LookupSource for ConfigFileSource {
    fn label(&self) -> &'static str {
        LABEL
    }

    fn locate(
        &self,
        capability: CapabilityInfo,
        observer: &dyn LookupObserver,
    ) -> Result<Option<Located>, ResolveError> {
        let Some(path) = self.config_path() else {
            observer.on_attempt(LABEL, capability.canonical, false);
            return Ok(None);
        };

        let entries = read_properties(&path, observer);
        for (key, deprecated) in capability.lookup_keys() {
            let value = entries.get(key).filter(|value| !value.is_empty());
            observer.on_attempt(LABEL, key, value.is_some());
            if let Some(provider) = value {
                if deprecated {
                    observer.on_deprecated_key(LABEL, key, capability.canonical);
                }
                return Ok(Some(Located::Name(provider.clone())));
            }
        }
        Ok(None)
    }
}
