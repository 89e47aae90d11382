//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::matching::{
    ExtractionService, HttpExtractionService, HttpMatchingService, MatchOrchestrator,
    MatchingService,
};
use crate::page::LocateOptions;
use crate::session::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: SessionStore,
    orchestrator: MatchOrchestrator,
}

impl AppState {
    /// Create application state with HTTP clients for the configured
    /// service endpoints.
    pub fn new(config: Config) -> Self {
        let extraction: Arc<dyn ExtractionService> =
            Arc::new(HttpExtractionService::new(&config.services.extraction_url));
        let matching: Arc<dyn MatchingService> =
            Arc::new(HttpMatchingService::new(&config.services.matching_url));
        Self::with_services(config, extraction, matching)
    }

    /// Create application state with explicit service implementations.
    /// Used by tests to substitute mocks for the network clients.
    pub fn with_services(
        config: Config,
        extraction: Arc<dyn ExtractionService>,
        matching: Arc<dyn MatchingService>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store: SessionStore::new(),
                orchestrator: MatchOrchestrator::new(extraction, matching),
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn store(&self) -> &SessionStore {
        &self.inner.store
    }

    pub fn orchestrator(&self) -> &MatchOrchestrator {
        &self.inner.orchestrator
    }

    /// Locator options derived from configuration.
    pub fn locate_options(&self) -> LocateOptions {
        LocateOptions {
            strip_index_markers: self.inner.config.highlight.strip_index_markers,
            ..Default::default()
        }
    }
}
