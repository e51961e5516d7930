//! Named provider constructors: the catalog the lookup chain constructs from.
//!
//! There is no reflective class loading to lean on, so "resolve this name to
//! an implementation" goes through a catalog of registered constructors
//! instead. Implementation crates register their factories here at startup
//! under stable provider names; configuration then selects by name. The
//! process-wide catalog from [`ProviderCatalog::global`] plays the role of
//! the platform default; callers that want isolation build their own.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::error::BoxError;

/// Type-erased provider instance as produced by a registered constructor.
///
/// The erased value is always a `Box<T>` for the capability's provider trait
/// `T`; the instantiator recovers it by downcast and treats a failed
/// downcast as a capability mismatch.
pub type ProviderHandle = Box<dyn Any + Send + Sync>;

type Constructor = Arc<dyn Fn() -> Result<ProviderHandle, BoxError> + Send + Sync>;

/// Registry of provider constructors keyed by provider name.
#[derive(Default)]
pub struct ProviderCatalog {
    constructors: RwLock<BTreeMap<String, Constructor>>,
}

impl ProviderCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide catalog used when no explicit catalog is supplied.
    pub fn global() -> Arc<ProviderCatalog> {
        static GLOBAL: OnceLock<Arc<ProviderCatalog>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(ProviderCatalog::new())))
    }

    /// Register an infallible constructor for provider `name`.
    ///
    /// `T` is the capability's provider trait object, e.g.
    /// `dyn MessageFactory`. Re-registering a name replaces the previous
    /// constructor; last write wins, matching the process-wide override
    /// semantics of the rest of the chain.
    pub fn register<T, F>(&self, name: &str, ctor: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Box<T> + Send + Sync + 'static,
    {
        self.register_fallible(name, move || Ok(ctor()));
    }

    /// Register a constructor that may fail.
    ///
    /// Models implementations that exist by name but cannot be built (the
    /// abstract-class / missing-constructor cases of the original lookup
    /// contract); the failure surfaces as a hard resolution error when the
    /// name wins a lookup.
    pub fn register_fallible<T, F>(&self, name: &str, ctor: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Result<Box<T>, BoxError> + Send + Sync + 'static,
    {
        let erased: Constructor =
            Arc::new(move || ctor().map(|provider| Box::new(provider) as ProviderHandle));
        self.constructors
            .write()
            .unwrap_or_else(|err| err.into_inner())
            .insert(name.to_string(), erased);
    }

    /// Run the constructor registered under `name`.
    ///
    /// `None` means the name is unknown to this catalog; `Some(Err(..))`
    /// means the name is known but its constructor failed.
    pub fn construct(&self, name: &str) -> Option<Result<ProviderHandle, BoxError>> {
        let ctor = {
            let constructors = self
                .constructors
                .read()
                .unwrap_or_else(|err| err.into_inner());
            constructors.get(name).cloned()
        };
        ctor.map(|ctor| ctor())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors
            .read()
            .unwrap_or_else(|err| err.into_inner())
            .contains_key(name)
    }

    /// Registered provider names in sorted order.
    pub fn provider_names(&self) -> Vec<String> {
        self.constructors
            .read()
            .unwrap_or_else(|err| err.into_inner())
            .keys()
            .cloned()
            .collect()
    }
}
