//! Provider discovery and factory contracts for SOAP messaging.
//!
//! The crate ships no SOAP engine. It defines the capability traits a SOAP
//! implementation must satisfy (message factory, connection factory, meta
//! factory) and the lookup chain that resolves those capabilities to
//! concrete providers at runtime: process overrides first, then the
//! installation's properties file, then service-registry listings, then
//! legacy alias resources, then a host-framework registry, with a
//! compiled-in fallback as the terminal policy. Providers register
//! constructors in a [`ProviderCatalog`]; configuration selects them by
//! name.

pub mod api;
pub mod capability;
pub mod catalog;
pub mod error;
pub mod finder;
pub mod instantiate;
pub mod mime;
pub mod observer;
pub mod sources;

pub use api::{
    CONNECTION_FACTORY, DEFAULT_SOAP_PROTOCOL, DYNAMIC_SOAP_PROTOCOL, MESSAGE_FACTORY,
    META_FACTORY, MessageFactory, MetaFactory, SOAP_1_1_PROTOCOL, SOAP_1_2_PROTOCOL,
    SoapConnection, SoapConnectionFactory, SoapMessage, meta_factory_instance_with,
    new_connection_factory, new_connection_factory_with, new_message_factory,
    new_message_factory_for_protocol, new_message_factory_for_protocol_with,
    new_message_factory_with,
};
pub use capability::{CapabilityInfo, CapabilityType};
pub use catalog::{ProviderCatalog, ProviderHandle};
pub use error::{BoxError, ResolveError, SoapError};
pub use finder::FactoryFinder;
pub use instantiate::instantiate;
pub use mime::{MimeHeader, MimeHeaders};
pub use observer::{LookupEvent, LookupObserver, RecordingObserver, TracingObserver};
pub use sources::{
    ConfigFileSource, ExternalRegistry, ExternalRegistrySource, HOME_ENV, LegacyResourceSource,
    Located, LookupSource, OverrideSource, SEARCH_PATH_ENV, ServiceRegistrySource,
    install_external_registry,
};
