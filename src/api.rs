//! SOAP capability contracts and the factory entry points.
//!
//! The traits here are the plugability seams: implementations live in
//! provider crates and are discovered at runtime through the lookup chain.
//! Nothing in this module builds or parses SOAP messages itself; the entry
//! points only resolve providers and delegate.

use std::io::{Read, Write};

use crate::capability::CapabilityType;
use crate::error::{ResolveError, SoapError};
use crate::finder::FactoryFinder;
use crate::mime::MimeHeaders;

/// SOAP 1.1 protocol selector.
pub const SOAP_1_1_PROTOCOL: &str = "SOAP 1.1 Protocol";
/// SOAP 1.2 protocol selector.
pub const SOAP_1_2_PROTOCOL: &str = "SOAP 1.2 Protocol";
/// Selector for factories that infer the protocol from message headers.
pub const DYNAMIC_SOAP_PROTOCOL: &str = "Dynamic Protocol";
/// Protocol used when callers do not name one.
pub const DEFAULT_SOAP_PROTOCOL: &str = SOAP_1_1_PROTOCOL;

/// A SOAP message as seen by transports and callers.
///
/// The envelope/body tree lives entirely in the provider; this surface is
/// what the plugability layer needs to move messages around.
pub trait SoapMessage: Send {
    fn mime_headers(&self) -> &MimeHeaders;

    fn mime_headers_mut(&mut self) -> &mut MimeHeaders;

    /// Flush pending changes so the message is ready to serialize.
    fn save_changes(&mut self) -> Result<(), SoapError>;

    /// Serialize the message to `out` in its wire form.
    fn write_to(&mut self, out: &mut dyn Write) -> Result<(), SoapError>;
}

/// Creates SOAP messages for one protocol (or dynamically).
pub trait MessageFactory: Send + Sync {
    /// A new empty message with the factory's default envelope.
    fn create_message(&self) -> Result<Box<dyn SoapMessage>, SoapError>;

    /// Internalize a serialized message, using `headers` for the
    /// transport metadata that accompanied it.
    fn create_message_from(
        &self,
        headers: &MimeHeaders,
        input: &mut dyn Read,
    ) -> Result<Box<dyn SoapMessage>, SoapError>;
}

impl std::fmt::Debug for dyn MessageFactory + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn MessageFactory")
    }
}

/// A point-to-point connection for sending SOAP messages.
pub trait SoapConnection: Send {
    /// Send `message` to `endpoint` and block for the reply.
    fn call(
        &mut self,
        message: &mut dyn SoapMessage,
        endpoint: &str,
    ) -> Result<Box<dyn SoapMessage>, SoapError>;

    /// HTTP-GET style retrieval from `endpoint`.
    fn get(&mut self, endpoint: &str) -> Result<Box<dyn SoapMessage>, SoapError>;

    fn close(&mut self) -> Result<(), SoapError>;
}

/// Creates SOAP connections.
pub trait SoapConnectionFactory: Send + Sync {
    fn create_connection(&self) -> Result<Box<dyn SoapConnection>, SoapError>;
}

impl std::fmt::Debug for dyn SoapConnectionFactory + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn SoapConnectionFactory")
    }
}

/// Single access point pulling the per-protocol factories of one SOAP
/// implementation together; swapping the meta factory swaps the whole
/// implementation.
pub trait MetaFactory: Send + Sync {
    /// The message factory for `protocol` (one of the protocol selector
    /// constants).
    fn new_message_factory(&self, protocol: &str)
    -> Result<Box<dyn MessageFactory>, SoapError>;
}

/// Message factory capability: canonical id, historic alias, built-in
/// default provider.
pub const MESSAGE_FACTORY: CapabilityType<dyn MessageFactory> = CapabilityType::new(
    "soap.MessageFactory",
    Some("saaj.MessageFactory"),
    Some(DEFAULT_MESSAGE_FACTORY),
);

/// Connection factory capability.
pub const CONNECTION_FACTORY: CapabilityType<dyn SoapConnectionFactory> = CapabilityType::new(
    "soap.ConnectionFactory",
    None,
    Some(DEFAULT_CONNECTION_FACTORY),
);

/// Meta factory capability; resolved through the same chain as the others
/// and consulted by the protocol-specific entry points.
pub const META_FACTORY: CapabilityType<dyn MetaFactory> =
    CapabilityType::new("soap.MetaFactory", None, Some(DEFAULT_META_FACTORY));

const DEFAULT_MESSAGE_FACTORY: &str = "soap-ri.message-factory-1.1";
const DEFAULT_CONNECTION_FACTORY: &str = "soap-ri.http-connection-factory";
const DEFAULT_META_FACTORY: &str = "soap-ri.meta-factory";

/// A message factory from the platform lookup chain.
///
/// Runs the chain without fallback first; when no source answers, defers
/// to the meta-factory indirection for the default protocol.
pub fn new_message_factory() -> Result<Box<dyn MessageFactory>, SoapError> {
    new_message_factory_with(&FactoryFinder::platform())
}

/// As [`new_message_factory`], resolving through an injected finder.
pub fn new_message_factory_with(
    finder: &FactoryFinder,
) -> Result<Box<dyn MessageFactory>, SoapError> {
    match finder.find(&MESSAGE_FACTORY, Some(DEFAULT_MESSAGE_FACTORY), false) {
        Ok(Some(factory)) => Ok(factory),
        Ok(None) => new_message_factory_for_protocol_with(finder, DEFAULT_SOAP_PROTOCOL),
        Err(source) => Err(SoapError::lookup("message factory", source)),
    }
}

/// A message factory for a specific protocol, via the meta factory.
pub fn new_message_factory_for_protocol(
    protocol: &str,
) -> Result<Box<dyn MessageFactory>, SoapError> {
    new_message_factory_for_protocol_with(&FactoryFinder::platform(), protocol)
}

/// As [`new_message_factory_for_protocol`], through an injected finder.
pub fn new_message_factory_for_protocol_with(
    finder: &FactoryFinder,
    protocol: &str,
) -> Result<Box<dyn MessageFactory>, SoapError> {
    let meta = meta_factory_instance_with(finder)?;
    meta.new_message_factory(protocol)
}

/// A connection factory from the platform lookup chain.
pub fn new_connection_factory() -> Result<Box<dyn SoapConnectionFactory>, SoapError> {
    new_connection_factory_with(&FactoryFinder::platform())
}

/// As [`new_connection_factory`], through an injected finder.
pub fn new_connection_factory_with(
    finder: &FactoryFinder,
) -> Result<Box<dyn SoapConnectionFactory>, SoapError> {
    finder
        .find(&CONNECTION_FACTORY, Some(DEFAULT_CONNECTION_FACTORY), true)
        .map_err(|source| SoapError::lookup("connection factory", source))?
        .ok_or_else(|| {
            SoapError::lookup(
                "connection factory",
                ResolveError::NoProvider {
                    capability: CONNECTION_FACTORY.canonical().to_string(),
                },
            )
        })
}

/// The meta factory for the current configuration; a fresh lookup per call.
pub fn meta_factory_instance_with(
    finder: &FactoryFinder,
) -> Result<Box<dyn MetaFactory>, SoapError> {
    finder
        .find(&META_FACTORY, Some(DEFAULT_META_FACTORY), true)
        .map_err(|source| SoapError::lookup("meta factory", source))?
        .ok_or_else(|| {
            SoapError::lookup(
                "meta factory",
                ResolveError::NoProvider {
                    capability: META_FACTORY.canonical().to_string(),
                },
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_ids_are_distinct() {
        let ids = [
            MESSAGE_FACTORY.canonical(),
            CONNECTION_FACTORY.canonical(),
            META_FACTORY.canonical(),
        ];
        for (i, id) in ids.iter().enumerate() {
            for other in &ids[i + 1..] {
                assert_ne!(id, other);
            }
        }
    }

    #[test]
    fn only_message_factory_keeps_a_deprecated_alias() {
        assert_eq!(
            MESSAGE_FACTORY.deprecated_alias(),
            Some("saaj.MessageFactory")
        );
        assert!(CONNECTION_FACTORY.deprecated_alias().is_none());
        assert!(META_FACTORY.deprecated_alias().is_none());
    }

    #[test]
    fn default_protocol_is_soap_1_1() {
        assert_eq!(DEFAULT_SOAP_PROTOCOL, SOAP_1_1_PROTOCOL);
    }
}
