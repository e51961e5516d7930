//! Lookup diagnostics as an injected observer.
//!
//! The resolution core stays free of global logging state: every source and
//! the chain executor report attempts, hits, deprecation warnings, and
//! swallowed configuration errors through a [`LookupObserver`] handed in at
//! construction. The default observer forwards to `tracing`; the recording
//! observer captures events for tests and the `provider-probe` binary.

use serde::Serialize;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, error, warn};

/// Receives diagnostic events from the lookup chain.
///
/// All methods default to no-ops so observers only implement what they care
/// about.
pub trait LookupObserver: Send + Sync {
    /// A source checked `key` and either found a value or did not.
    fn on_attempt(&self, source: &str, key: &str, found: bool) {
        let _ = (source, key, found);
    }

    /// A source settled the lookup with the named provider.
    fn on_resolved(&self, source: &str, provider: &str) {
        let _ = (source, provider);
    }

    /// A deprecated key or resource satisfied the lookup.
    fn on_deprecated_key(&self, source: &str, deprecated: &str, canonical: &str) {
        let _ = (source, deprecated, canonical);
    }

    /// A configuration location existed but could not be read; the source
    /// treats the value as absent and the chain continues.
    fn on_config_error(&self, path: &Path, message: &str) {
        let _ = (path, message);
    }
}

/// Default observer: forwards events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl LookupObserver for TracingObserver {
    fn on_attempt(&self, source: &str, key: &str, found: bool) {
        debug!(source, key, found, "provider lookup attempt");
    }

    fn on_resolved(&self, source: &str, provider: &str) {
        debug!(source, provider, "provider lookup resolved");
    }

    fn on_deprecated_key(&self, source: &str, deprecated: &str, canonical: &str) {
        warn!(
            source,
            deprecated, canonical, "using deprecated key; switch to the canonical capability id"
        );
    }

    fn on_config_error(&self, path: &Path, message: &str) {
        error!(
            path = %path.display(),
            message,
            "unreadable provider configuration; treating value as absent"
        );
    }
}

/// One captured diagnostic event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LookupEvent {
    Attempt {
        source: String,
        key: String,
        found: bool,
    },
    Resolved {
        source: String,
        provider: String,
    },
    DeprecatedKey {
        source: String,
        deprecated: String,
        canonical: String,
    },
    ConfigError {
        path: String,
        message: String,
    },
}

/// Observer that records every event, in order, for later inspection.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<LookupEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events captured so far.
    pub fn events(&self) -> Vec<LookupEvent> {
        self.events
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .clone()
    }

    /// Provider name from the most recent `Resolved` event, if any.
    pub fn resolved_provider(&self) -> Option<String> {
        self.events()
            .into_iter()
            .rev()
            .find_map(|event| match event {
                LookupEvent::Resolved { provider, .. } => Some(provider),
                _ => None,
            })
    }

    fn push(&self, event: LookupEvent) {
        self.events
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .push(event);
    }
}

impl LookupObserver for RecordingObserver {
    fn on_attempt(&self, source: &str, key: &str, found: bool) {
        self.push(LookupEvent::Attempt {
            source: source.to_string(),
            key: key.to_string(),
            found,
        });
    }

    fn on_resolved(&self, source: &str, provider: &str) {
        self.push(LookupEvent::Resolved {
            source: source.to_string(),
            provider: provider.to_string(),
        });
    }

    fn on_deprecated_key(&self, source: &str, deprecated: &str, canonical: &str) {
        self.push(LookupEvent::DeprecatedKey {
            source: source.to_string(),
            deprecated: deprecated.to_string(),
            canonical: canonical.to_string(),
        });
    }

    fn on_config_error(&self, path: &Path, message: &str) {
        self.push(LookupEvent::ConfigError {
            path: path.display().to_string(),
            message: message.to_string(),
        });
    }
}
