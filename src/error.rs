//! Error types shared across the plugability layer.
//!
//! Resolution failures are deliberately split from the soft "not found"
//! outcome: `FactoryFinder::find` reports the latter as `Ok(None)` and only
//! ever returns `ResolveError` for hard failures (missing fallback, broken
//! candidate). Malformed configuration never surfaces here at all; sources
//! report it to the observer and continue.

use std::io;
use thiserror::Error;

/// Boxed cause carried by construction failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Hard resolution failure raised by the lookup chain or the instantiator.
///
/// Every variant names the capability involved; variants about a concrete
/// candidate also name the offending provider so callers can tell which
/// configuration entry pointed at it.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Fallback was requested but the capability has no default provider.
    #[error("provider for capability '{capability}' cannot be found")]
    NoProvider { capability: String },

    /// A source produced a provider name nothing has registered.
    #[error("provider '{provider}' for capability '{capability}' is not registered in the catalog")]
    UnknownProvider {
        capability: String,
        provider: String,
    },

    /// The registered constructor for the winning candidate failed.
    #[error("provider '{provider}' for capability '{capability}' failed to construct{context}")]
    Construction {
        capability: String,
        provider: String,
        /// Extra diagnostic text, e.g. when the failing candidate was the
        /// compiled-in fallback.
        context: String,
        #[source]
        source: BoxError,
    },

    /// The constructed provider does not implement the capability's trait.
    #[error("provider '{provider}' does not implement capability '{capability}'")]
    CapabilityMismatch {
        capability: String,
        provider: String,
    },
}

/// Error surface of the SOAP capability contracts and facade entry points.
#[derive(Debug, Error)]
pub enum SoapError {
    /// A factory entry point could not resolve an implementation.
    #[error("unable to create {context}: {source}")]
    FactoryLookup {
        context: &'static str,
        #[source]
        source: ResolveError,
    },

    /// A protocol string outside the provider's supported set.
    #[error("unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    /// Caller handed a contract method an unusable argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Provider-reported SOAP processing failure.
    #[error("{0}")]
    Provider(String),

    #[error("i/o failure in SOAP processing")]
    Io(#[from] io::Error),
}

impl SoapError {
    /// Wrap a resolution failure for a specific factory entry point.
    pub(crate) fn lookup(context: &'static str, source: ResolveError) -> Self {
        SoapError::FactoryLookup { context, source }
    }
}
