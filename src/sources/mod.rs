//! Ordered lookup sources consulted by the factory finder.
//!
//! Precedence is data, not code: the finder owns a `Vec<Box<dyn
//! LookupSource>>` and walks it in order, so the platform chain (process
//! override, config file, service registry, legacy resource, external
//! registry) is just one canned value of that list. A source either names a
//! provider for the instantiator or hands back an instance it constructed
//! itself; the first non-empty answer wins and later sources are never
//! consulted.

mod config_file;
mod external;
mod legacy;
mod overrides;
mod services;

pub use config_file::{ConfigFileSource, HOME_ENV};
pub use external::{ExternalRegistry, ExternalRegistrySource, install_external_registry};
pub use legacy::LegacyResourceSource;
pub use overrides::OverrideSource;
pub use services::{SEARCH_PATH_ENV, ServiceRegistrySource};

use crate::capability::CapabilityInfo;
use crate::catalog::ProviderHandle;
use crate::error::ResolveError;
use crate::observer::LookupObserver;

/// Subdirectory holding provider-listing resources within each search-path
/// entry, for both the service registry and the legacy resource source.
pub const SERVICES_DIR: &str = "services";

/// Outcome of a single source.
#[derive(Debug)]
pub enum Located {
    /// A provider name to be constructed and checked by the instantiator.
    Name(String),
    /// An instance the source constructed itself; `provider` is kept for
    /// diagnostics and the capability check.
    Instance {
        provider: String,
        handle: ProviderHandle,
    },
}

/// One strategy in the lookup chain.
///
/// Strategy-local failures (unreadable files, absent directories) are
/// downgraded to "absent": `locate` returns `Ok(None)` after reporting to
/// the observer. A hard `ResolveError` is reserved for sources that found a
/// definitive candidate and failed on it, which must not fall through.
pub trait LookupSource: Send + Sync {
    /// Short human-readable label used in diagnostics.
    fn label(&self) -> &'static str;

    fn locate(
        &self,
        capability: CapabilityInfo,
        observer: &dyn LookupObserver,
    ) -> Result<Option<Located>, ResolveError>;
}
