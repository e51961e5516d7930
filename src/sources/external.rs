//! Optional host-framework provider registry.
//!
//! Embedding hosts (application containers, plugin frameworks) may carry
//! their own provider registry. Instead of probing for the host from inside
//! the resolution path, the integration is a capability probe: the host
//! installs an [`ExternalRegistry`] adapter once at startup, chain assembly
//! detects it once, and everything else sees either the adapter or nothing.

use std::sync::{Arc, OnceLock};

use crate::capability::CapabilityInfo;
use crate::catalog::ProviderHandle;
use crate::error::ResolveError;
use crate::observer::LookupObserver;
use crate::sources::{Located, LookupSource};

const LABEL: &str = "external registry";

/// Host-framework provider registry adapter.
///
/// A successful lookup returns the provider's name (for diagnostics) and a
/// constructed handle. Lookup failures inside the host are the adapter's
/// problem; returning `None` lets the chain fall through to its fallback
/// policy.
pub trait ExternalRegistry: Send + Sync {
    fn lookup(&self, capability: CapabilityInfo) -> Option<(String, ProviderHandle)>;
}

static INSTALLED: OnceLock<Arc<dyn ExternalRegistry>> = OnceLock::new();

/// Install the process-wide external registry adapter.
///
/// Returns false when an adapter was already installed; the first
/// installation wins for the life of the process.
pub fn install_external_registry(registry: Arc<dyn ExternalRegistry>) -> bool {
    INSTALLED.set(registry).is_ok()
}

/// Chain source delegating to the detected external registry, if any.
pub struct ExternalRegistrySource {
    registry: Option<Arc<dyn ExternalRegistry>>,
}

impl ExternalRegistrySource {
    /// Probe for an installed adapter; absent hosts yield an inert source.
    pub fn detect() -> Self {
        ExternalRegistrySource {
            registry: INSTALLED.get().cloned(),
        }
    }

    /// Source bound to an explicit adapter, bypassing detection.
    pub fn with_registry(registry: Arc<dyn ExternalRegistry>) -> Self {
        ExternalRegistrySource {
            registry: Some(registry),
        }
    }
}

impl LookupSource for ExternalRegistrySource {
    fn label(&self) -> &'static str {
        LABEL
    }

    fn locate(
        &self,
        capability: CapabilityInfo,
        observer: &dyn LookupObserver,
    ) -> Result<Option<Located>, ResolveError> {
        let Some(registry) = &self.registry else {
            return Ok(None);
        };
        match registry.lookup(capability) {
            Some((provider, handle)) => {
                observer.on_attempt(LABEL, capability.canonical, true);
                Ok(Some(Located::Instance { provider, handle }))
            }
            None => {
                observer.on_attempt(LABEL, capability.canonical, false);
                Ok(None)
            }
        }
    }
}
