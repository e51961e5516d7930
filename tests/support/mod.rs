use anyhow::{Context, Result, anyhow};
use soap_provider::{
    ConfigFileSource, FactoryFinder, LegacyResourceSource, LookupObserver, LookupSource,
    MessageFactory, MetaFactory, MimeHeaders, OverrideSource, ProviderCatalog, RecordingObserver,
    SOAP_1_1_PROTOCOL, SOAP_1_2_PROTOCOL, ServiceRegistrySource, SoapConnection,
    SoapConnectionFactory, SoapError, SoapMessage,
};
use std::fs;
use std::io::{Read, Write};
use std::sync::Arc;
use tempfile::TempDir;

/// Header the stub providers stamp on every message so tests can tell which
/// registered implementation actually won a lookup.
pub const PROVIDER_HEADER: &str = "X-Provider";

pub struct StubMessage {
    headers: MimeHeaders,
}

impl StubMessage {
    fn for_provider(provider: &str) -> Self {
        let mut headers = MimeHeaders::new();
        headers
            .add_header(PROVIDER_HEADER, provider)
            .expect("stub header");
        StubMessage { headers }
    }
}

impl SoapMessage for StubMessage {
    fn mime_headers(&self) -> &MimeHeaders {
        &self.headers
    }

    fn mime_headers_mut(&mut self) -> &mut MimeHeaders {
        &mut self.headers
    }

    fn save_changes(&mut self) -> Result<(), SoapError> {
        Ok(())
    }

    fn write_to(&mut self, out: &mut dyn Write) -> Result<(), SoapError> {
        let provider = self
            .headers
            .header(PROVIDER_HEADER)
            .first()
            .map(|v| v.to_string())
            .unwrap_or_default();
        out.write_all(provider.as_bytes())?;
        Ok(())
    }
}

pub struct StubMessageFactory {
    name: String,
}

impl StubMessageFactory {
    pub fn new(name: &str) -> Self {
        StubMessageFactory {
            name: name.to_string(),
        }
    }
}

impl MessageFactory for StubMessageFactory {
    fn create_message(&self) -> Result<Box<dyn SoapMessage>, SoapError> {
        Ok(Box::new(StubMessage::for_provider(&self.name)))
    }

    fn create_message_from(
        &self,
        headers: &MimeHeaders,
        input: &mut dyn Read,
    ) -> Result<Box<dyn SoapMessage>, SoapError> {
        let mut body = String::new();
        input.read_to_string(&mut body)?;
        let mut message = StubMessage::for_provider(&self.name);
        for header in headers.all_headers() {
            message
                .mime_headers_mut()
                .add_header(header.name(), header.value())?;
        }
        Ok(Box::new(message))
    }
}

pub struct StubMetaFactory {
    name: String,
}

impl StubMetaFactory {
    pub fn new(name: &str) -> Self {
        StubMetaFactory {
            name: name.to_string(),
        }
    }
}

impl MetaFactory for StubMetaFactory {
    fn new_message_factory(&self, protocol: &str) -> Result<Box<dyn MessageFactory>, SoapError> {
        match protocol {
            SOAP_1_1_PROTOCOL | SOAP_1_2_PROTOCOL => Ok(Box::new(StubMessageFactory::new(
                &format!("{}/{}", self.name, protocol),
            ))),
            other => Err(SoapError::UnsupportedProtocol(other.to_string())),
        }
    }
}

pub struct StubConnection;

impl SoapConnection for StubConnection {
    fn call(
        &mut self,
        message: &mut dyn SoapMessage,
        endpoint: &str,
    ) -> Result<Box<dyn SoapMessage>, SoapError> {
        message.save_changes()?;
        let mut reply = StubMessage::for_provider("stub-connection");
        reply.mime_headers_mut().add_header("X-Endpoint", endpoint)?;
        Ok(Box::new(reply))
    }

    fn get(&mut self, endpoint: &str) -> Result<Box<dyn SoapMessage>, SoapError> {
        let mut reply = StubMessage::for_provider("stub-connection");
        reply.mime_headers_mut().add_header("X-Endpoint", endpoint)?;
        Ok(Box::new(reply))
    }

    fn close(&mut self) -> Result<(), SoapError> {
        Ok(())
    }
}

pub struct StubConnectionFactory;

impl SoapConnectionFactory for StubConnectionFactory {
    fn create_connection(&self) -> Result<Box<dyn SoapConnection>, SoapError> {
        Ok(Box::new(StubConnection))
    }
}

pub fn register_message_factory(catalog: &ProviderCatalog, name: &'static str) {
    catalog.register::<dyn MessageFactory, _>(name, move || Box::new(StubMessageFactory::new(name)));
}

pub fn register_broken_message_factory(catalog: &ProviderCatalog, name: &'static str) {
    catalog.register_fallible::<dyn MessageFactory, _>(name, || {
        Err("no accessible constructor".into())
    });
}

pub fn register_meta_factory(catalog: &ProviderCatalog, name: &'static str) {
    catalog.register::<dyn MetaFactory, _>(name, move || Box::new(StubMetaFactory::new(name)));
}

pub fn register_connection_factory(catalog: &ProviderCatalog, name: &'static str) {
    catalog.register::<dyn SoapConnectionFactory, _>(name, || Box::new(StubConnectionFactory));
}

/// Which provider a resolved message factory actually is, read back from
/// the marker header its messages carry.
pub fn provider_of(factory: &dyn MessageFactory) -> Result<String> {
    let message = factory.create_message().context("create probe message")?;
    message
        .mime_headers()
        .header(PROVIDER_HEADER)
        .first()
        .map(|v| v.to_string())
        .ok_or_else(|| anyhow!("stub message missing provider header"))
}

/// One isolated installation: its own catalog, install home, and service
/// search path, wired into a finder with a recording observer.
pub struct Installation {
    pub catalog: Arc<ProviderCatalog>,
    home: TempDir,
    services_root: TempDir,
}

impl Installation {
    pub fn new() -> Result<Self> {
        Ok(Installation {
            catalog: Arc::new(ProviderCatalog::new()),
            home: TempDir::new().context("allocate install home")?,
            services_root: TempDir::new().context("allocate services root")?,
        })
    }

    /// Write `<home>/conf/soap.properties`.
    pub fn write_config(&self, contents: &str) -> Result<()> {
        self.write_config_in("conf", contents)
    }

    /// Write the properties file under an arbitrary layout dir (`conf` or
    /// the legacy `lib`).
    pub fn write_config_in(&self, layout: &str, contents: &str) -> Result<()> {
        let dir = self.home.path().join(layout);
        fs::create_dir_all(&dir).context("create config dir")?;
        fs::write(dir.join("soap.properties"), contents).context("write config")?;
        Ok(())
    }

    /// Write a provider listing under `services/<capability-id>`.
    pub fn write_listing(&self, capability_id: &str, contents: &str) -> Result<()> {
        let dir = self.services_root.path().join("services");
        fs::create_dir_all(&dir).context("create services dir")?;
        fs::write(dir.join(capability_id), contents).context("write listing")?;
        Ok(())
    }

    /// Finder over the full platform-shaped chain, with fixed override
    /// entries instead of live environment so tests stay hermetic.
    pub fn finder(&self, overrides: &[(&str, &str)]) -> (FactoryFinder, Arc<RecordingObserver>) {
        let sources: Vec<Box<dyn LookupSource>> = vec![
            Box::new(OverrideSource::fixed(
                overrides
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )),
            Box::new(ConfigFileSource::new(self.home.path().to_path_buf())),
            Box::new(ServiceRegistrySource::new(
                vec![self.services_root.path().to_path_buf()],
                Arc::clone(&self.catalog),
            )),
            Box::new(LegacyResourceSource::new(vec![
                self.services_root.path().to_path_buf(),
            ])),
        ];
        let observer = Arc::new(RecordingObserver::new());
        let finder = FactoryFinder::with_sources(sources, Arc::clone(&self.catalog))
            .with_observer(Arc::clone(&observer) as Arc<dyn LookupObserver>);
        (finder, observer)
    }
}
