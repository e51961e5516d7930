//! Reports how the platform lookup chain resolves each built-in capability.
//!
//! Runs a fallback-free lookup per capability with a recording observer and
//! prints one JSON report to stdout: the chain order, every source attempt,
//! and the winning provider (or the error) per capability. Useful for
//! diagnosing why an installation picks up the wrong implementation.

use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;

use soap_provider::{
    CONNECTION_FACTORY, CapabilityType, FactoryFinder, LookupEvent, LookupObserver,
    MESSAGE_FACTORY, META_FACTORY, RecordingObserver,
};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let report = ProbeReport {
        chain: FactoryFinder::platform().source_labels(),
        capabilities: vec![
            probe(&MESSAGE_FACTORY),
            probe(&CONNECTION_FACTORY),
            probe(&META_FACTORY),
        ],
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[derive(Serialize)]
struct ProbeReport {
    chain: Vec<&'static str>,
    capabilities: Vec<CapabilityReport>,
}

#[derive(Serialize)]
struct CapabilityReport {
    capability: &'static str,
    default_provider: Option<&'static str>,
    resolved: Option<String>,
    error: Option<String>,
    events: Vec<LookupEvent>,
}

/// Probe one capability without fallback so unconfigured installations
/// report "unresolved" instead of failing on an unregistered default.
fn probe<T>(capability: &CapabilityType<T>) -> CapabilityReport
where
    T: ?Sized + Send + Sync + 'static,
{
    let observer = Arc::new(RecordingObserver::new());
    let finder =
        FactoryFinder::platform().with_observer(Arc::clone(&observer) as Arc<dyn LookupObserver>);

    let outcome = finder.find(capability, capability.default_provider(), false);
    let (resolved, error) = match outcome {
        Ok(Some(_)) => (observer.resolved_provider(), None),
        Ok(None) => (None, None),
        Err(err) => (None, Some(err.to_string())),
    };

    CapabilityReport {
        capability: capability.canonical(),
        default_provider: capability.default_provider(),
        resolved,
        error,
        events: observer.events(),
    }
}
