//! The lookup chain executor.
//!
//! `FactoryFinder` owns an ordered list of sources, a provider catalog, and
//! a diagnostics observer, and resolves capabilities by walking the sources
//! in order. Each `find` call is a stateless, synchronous, one-shot
//! resolution: nothing is cached between calls and concurrent callers need
//! no coordination.

use std::sync::Arc;

use crate::capability::CapabilityType;
use crate::catalog::ProviderCatalog;
use crate::error::ResolveError;
use crate::instantiate::{downcast_provider, instantiate};
use crate::observer::{LookupObserver, TracingObserver};
use crate::sources::{
    ConfigFileSource, ExternalRegistrySource, LegacyResourceSource, Located, LookupSource,
    OverrideSource, ServiceRegistrySource,
};

const FALLBACK_LABEL: &str = "fallback";

/// Resolves capability types to provider instances through an ordered
/// source chain.
pub struct FactoryFinder {
    sources: Vec<Box<dyn LookupSource>>,
    catalog: Arc<ProviderCatalog>,
    observer: Arc<dyn LookupObserver>,
}

impl FactoryFinder {
    /// The platform chain: process overrides, then the installation config
    /// file, then service-registry discovery, then legacy alias resources,
    /// then the detected external registry. Backed by the process-wide
    /// catalog and the tracing observer.
    pub fn platform() -> Self {
        let catalog = ProviderCatalog::global();
        let sources: Vec<Box<dyn LookupSource>> = vec![
            Box::new(OverrideSource::from_env()),
            Box::new(ConfigFileSource::from_platform()),
            Box::new(ServiceRegistrySource::from_platform(Arc::clone(&catalog))),
            Box::new(LegacyResourceSource::from_platform()),
            Box::new(ExternalRegistrySource::detect()),
        ];
        FactoryFinder {
            sources,
            catalog,
            observer: Arc::new(TracingObserver),
        }
    }

    /// A finder with an explicit source order and catalog; the precedence
    /// the chain applies is exactly the order of `sources`.
    pub fn with_sources(sources: Vec<Box<dyn LookupSource>>, catalog: Arc<ProviderCatalog>) -> Self {
        FactoryFinder {
            sources,
            catalog,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the diagnostics observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn LookupObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn source_labels(&self) -> Vec<&'static str> {
        self.sources.iter().map(|source| source.label()).collect()
    }

    /// Resolve `capability` to a provider instance.
    ///
    /// Sources run in order and the first non-empty answer wins. A winning
    /// candidate that cannot be constructed fails the whole lookup; it
    /// never falls through to a later source. When every source comes up
    /// empty: `try_fallback == false` yields `Ok(None)`; otherwise
    /// `default_provider` is instantiated as the terminal fallback, and its
    /// absence is a hard error naming the capability.
    pub fn find<T>(
        &self,
        capability: &CapabilityType<T>,
        default_provider: Option<&str>,
        try_fallback: bool,
    ) -> Result<Option<Box<T>>, ResolveError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let info = capability.info();
        for source in &self.sources {
            match source.locate(info, self.observer.as_ref())? {
                Some(Located::Name(provider)) => {
                    self.observer.on_resolved(source.label(), &provider);
                    return instantiate(&self.catalog, capability, &provider, default_provider)
                        .map(Some);
                }
                Some(Located::Instance { provider, handle }) => {
                    self.observer.on_resolved(source.label(), &provider);
                    return downcast_provider(capability, &provider, handle).map(Some);
                }
                None => {}
            }
        }

        if !try_fallback {
            return Ok(None);
        }

        let Some(default) = default_provider else {
            return Err(ResolveError::NoProvider {
                capability: info.canonical.to_string(),
            });
        };
        self.observer.on_resolved(FALLBACK_LABEL, default);
        instantiate(&self.catalog, capability, default, Some(default)).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilityInfo;
    use crate::observer::{LookupEvent, RecordingObserver};

    trait Motor: Send + Sync {
        fn name(&self) -> &'static str;
    }

    impl std::fmt::Debug for dyn Motor + '_ {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("dyn Motor")
        }
    }

    struct NamedMotor(&'static str);

    impl Motor for NamedMotor {
        fn name(&self) -> &'static str {
            self.0
        }
    }

    const MOTOR: CapabilityType<dyn Motor> =
        CapabilityType::new("soap.Motor", None, Some("acme.default-motor"));

    fn catalog_with(names: &[&'static str]) -> Arc<ProviderCatalog> {
        let catalog = Arc::new(ProviderCatalog::new());
        for name in names {
            let label = *name;
            catalog.register::<dyn Motor, _>(name, move || Box::new(NamedMotor(label)));
        }
        catalog
    }

    fn override_source(entries: &[(&str, &str)]) -> Box<dyn LookupSource> {
        Box::new(OverrideSource::fixed(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    /// Source that panics when consulted; proves short-circuiting.
    struct PoisonSource;

    impl LookupSource for PoisonSource {
        fn label(&self) -> &'static str {
            "poison"
        }

        fn locate(
            &self,
            _capability: CapabilityInfo,
            _observer: &dyn LookupObserver,
        ) -> Result<Option<Located>, ResolveError> {
            panic!("later source consulted after a winning candidate");
        }
    }

    #[test]
    fn first_source_with_a_name_wins_and_short_circuits() {
        let catalog = catalog_with(&["acme.first-motor"]);
        let finder = FactoryFinder::with_sources(
            vec![
                override_source(&[("soap.Motor", "acme.first-motor")]),
                Box::new(PoisonSource),
            ],
            catalog,
        );

        let motor = finder
            .find(&MOTOR, Some("acme.default-motor"), true)
            .expect("resolves")
            .expect("present");
        assert_eq!(motor.name(), "acme.first-motor");
    }

    #[test]
    fn empty_chain_without_fallback_is_soft_none() {
        let finder = FactoryFinder::with_sources(Vec::new(), catalog_with(&[]));
        let resolved = finder
            .find(&MOTOR, Some("acme.default-motor"), false)
            .expect("soft");
        assert!(resolved.is_none());
    }

    #[test]
    fn fallback_constructs_default_provider() {
        let catalog = catalog_with(&["acme.default-motor"]);
        let observer = Arc::new(RecordingObserver::new());
        let finder = FactoryFinder::with_sources(Vec::new(), catalog)
            .with_observer(Arc::clone(&observer) as Arc<dyn LookupObserver>);

        let motor = finder
            .find(&MOTOR, Some("acme.default-motor"), true)
            .expect("resolves")
            .expect("fallback present");
        assert_eq!(motor.name(), "acme.default-motor");
        assert!(observer.events().iter().any(|e| matches!(
            e,
            LookupEvent::Resolved { source, .. } if source == "fallback"
        )));
    }

    #[test]
    fn fallback_without_default_is_no_provider_error() {
        let finder = FactoryFinder::with_sources(Vec::new(), catalog_with(&[]));
        let err = finder.find(&MOTOR, None, true).expect_err("hard");
        assert!(matches!(err, ResolveError::NoProvider { capability }
            if capability == "soap.Motor"));
    }

    #[test]
    fn winning_candidate_that_fails_does_not_fall_through() {
        let catalog = Arc::new(ProviderCatalog::new());
        catalog.register_fallible::<dyn Motor, _>("acme.broken-motor", || {
            Err("armature jam".into())
        });
        catalog.register::<dyn Motor, _>("acme.default-motor", || {
            Box::new(NamedMotor("acme.default-motor"))
        });

        let finder = FactoryFinder::with_sources(
            vec![override_source(&[("soap.Motor", "acme.broken-motor")])],
            catalog,
        );
        let err = finder
            .find(&MOTOR, Some("acme.default-motor"), true)
            .expect_err("hard failure, no fall-through");
        assert!(matches!(err, ResolveError::Construction { provider, .. }
            if provider == "acme.broken-motor"));
    }

    #[test]
    fn unknown_candidate_is_hard_error() {
        let finder = FactoryFinder::with_sources(
            vec![override_source(&[("soap.Motor", "acme.ghost-motor")])],
            catalog_with(&[]),
        );
        let err = finder
            .find(&MOTOR, Some("acme.default-motor"), true)
            .expect_err("unknown provider");
        assert!(matches!(err, ResolveError::UnknownProvider { provider, .. }
            if provider == "acme.ghost-motor"));
    }

    #[test]
    fn source_labels_expose_chain_order() {
        let finder = FactoryFinder::with_sources(
            vec![
                override_source(&[]),
                Box::new(LegacyResourceSource::new(Vec::new())),
            ],
            catalog_with(&[]),
        );
        assert_eq!(
            finder.source_labels(),
            vec!["process override", "legacy resource"]
        );
    }
}
