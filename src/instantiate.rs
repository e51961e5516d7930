//! Turns a resolved provider name into a typed instance.
//!
//! The instantiator is the terminal step for every name-producing source
//! and for the fallback policy: look the name up in the catalog, run its
//! constructor, and downcast the handle to the capability's provider trait.
//! Failures here are always hard; a candidate that won the lookup never
//! falls through to a later source.

use crate::capability::CapabilityType;
use crate::catalog::{ProviderCatalog, ProviderHandle};
use crate::error::ResolveError;

/// Construct `provider` from `catalog` as an implementation of `capability`.
///
/// `fallback_of` names the capability's default provider when the candidate
/// being built is that terminal fallback; it is carried only into
/// diagnostics.
pub fn instantiate<T>(
    catalog: &ProviderCatalog,
    capability: &CapabilityType<T>,
    provider: &str,
    fallback_of: Option<&str>,
) -> Result<Box<T>, ResolveError>
where
    T: ?Sized + Send + Sync + 'static,
{
    let context = match fallback_of {
        Some(default) if default == provider => {
            " while instantiating the fallback provider".to_string()
        }
        _ => String::new(),
    };

    match catalog.construct(provider) {
        None => Err(ResolveError::UnknownProvider {
            capability: capability.canonical().to_string(),
            provider: provider.to_string(),
        }),
        Some(Err(source)) => Err(ResolveError::Construction {
            capability: capability.canonical().to_string(),
            provider: provider.to_string(),
            context,
            source,
        }),
        Some(Ok(handle)) => downcast_provider(capability, provider, handle),
    }
}

/// Recover the typed provider from a handle, or report a capability
/// mismatch naming the offender.
pub(crate) fn downcast_provider<T>(
    capability: &CapabilityType<T>,
    provider: &str,
    handle: ProviderHandle,
) -> Result<Box<T>, ResolveError>
where
    T: ?Sized + Send + Sync + 'static,
{
    handle
        .downcast::<Box<T>>()
        .map(|boxed| *boxed)
        .map_err(|_| ResolveError::CapabilityMismatch {
            capability: capability.canonical().to_string(),
            provider: provider.to_string(),
        })
}
