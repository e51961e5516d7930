//! Process-wide override keys, the highest-precedence source.

use std::collections::BTreeMap;
use std::env;

use crate::capability::CapabilityInfo;
use crate::error::ResolveError;
use crate::observer::LookupObserver;
use crate::sources::{Located, LookupSource};

const LABEL: &str = "process override";

enum Entries {
    /// Read the live process environment on every lookup. Concurrent
    /// mutation of the environment races with in-flight lookups;
    /// last-write-wins is accepted.
    Environment,
    /// Fixed snapshot, used for hermetic tests and embedding hosts that
    /// manage their own configuration map.
    Fixed(BTreeMap<String, String>),
}

/// Checks a process-wide key named after the capability's canonical id,
/// falling back to the deprecated alias key (with a warning) only when the
/// canonical key is absent.
pub struct OverrideSource {
    entries: Entries,
}

impl OverrideSource {
    /// Override source backed by the process environment.
    pub fn from_env() -> Self {
        OverrideSource {
            entries: Entries::Environment,
        }
    }

    /// Override source backed by a fixed key/value map.
    pub fn fixed(entries: BTreeMap<String, String>) -> Self {
        OverrideSource {
            entries: Entries::Fixed(entries),
        }
    }

    fn value(&self, key: &str) -> Option<String> {
        let raw = match &self.entries {
            Entries::Environment => env::var(key).ok(),
            Entries::Fixed(map) => map.get(key).cloned(),
        };
        raw.filter(|value| !value.trim().is_empty())
    }
}

impl LookupSource for OverrideSource {
    fn label(&self) -> &'static str {
        LABEL
    }

    fn locate(
        &self,
        capability: CapabilityInfo,
        observer: &dyn LookupObserver,
    ) -> Result<Option<Located>, ResolveError> {
        for (key, deprecated) in capability.lookup_keys() {
            let value = self.value(key);
            observer.on_attempt(LABEL, key, value.is_some());
            if let Some(provider) = value {
                if deprecated {
                    observer.on_deprecated_key(LABEL, key, capability.canonical);
                }
                return Ok(Some(Located::Name(provider)));
            }
        }
        Ok(None)
    }
}
