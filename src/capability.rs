//! Capability identity for the provider lookup chain.
//!
//! A capability names an abstract factory role (message factory, connection
//! factory, meta factory) that some external provider fulfills. Identity is
//! the canonical id string; the optional deprecated alias exists only so old
//! configuration keeps resolving, and the optional default provider name is
//! the compiled-in terminal fallback.

use std::fmt;
use std::marker::PhantomData;

/// Untyped view of a capability: the strings the lookup sources key on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CapabilityInfo {
    /// Globally unique canonical id, e.g. `soap.MessageFactory`.
    pub canonical: &'static str,
    /// Historic id consulted only when the canonical key is absent. Never
    /// used for new configuration; every hit emits a deprecation warning.
    pub deprecated_alias: Option<&'static str>,
}

impl CapabilityInfo {
    /// Keys to consult within a single source, canonical first.
    pub fn lookup_keys(&self) -> impl Iterator<Item = (&'static str, bool)> {
        std::iter::once((self.canonical, false))
            .chain(self.deprecated_alias.map(|alias| (alias, true)))
    }
}

impl fmt::Display for CapabilityInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical)
    }
}

/// Compile-time capability descriptor tied to the provider trait object `T`.
///
/// Constants of this type are the only values that exist; the phantom keeps
/// `FactoryFinder::find` and the instantiator honest about which trait a
/// resolved provider must implement.
pub struct CapabilityType<T: ?Sized + 'static> {
    info: CapabilityInfo,
    default_provider: Option<&'static str>,
    _provider: PhantomData<fn() -> Box<T>>,
}

impl<T: ?Sized + 'static> CapabilityType<T> {
    pub const fn new(
        canonical: &'static str,
        deprecated_alias: Option<&'static str>,
        default_provider: Option<&'static str>,
    ) -> Self {
        CapabilityType {
            info: CapabilityInfo {
                canonical,
                deprecated_alias,
            },
            default_provider,
            _provider: PhantomData,
        }
    }

    pub fn info(&self) -> CapabilityInfo {
        self.info
    }

    pub fn canonical(&self) -> &'static str {
        self.info.canonical
    }

    pub fn deprecated_alias(&self) -> Option<&'static str> {
        self.info.deprecated_alias
    }

    /// Compiled-in fallback provider name; `None` means no built-in default
    /// exists and fallback requests must fail.
    pub fn default_provider(&self) -> Option<&'static str> {
        self.default_provider
    }
}

impl<T: ?Sized + 'static> Clone for CapabilityType<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized + 'static> Copy for CapabilityType<T> {}

impl<T: ?Sized + 'static> fmt::Debug for CapabilityType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityType")
            .field("canonical", &self.info.canonical)
            .field("deprecated_alias", &self.info.deprecated_alias)
            .field("default_provider", &self.default_provider)
            .finish()
    }
}
