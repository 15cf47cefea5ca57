//! Shared collaborator bundle.

use crate::collaborators::{DataStore, InMemoryDataStore};
use crate::config::AppConfig;
use crate::observability::{Logger, TracingLogger};
use crate::respond::Responder;
use std::sync::Arc;

/// The collaborators every pipeline of an application shares.
///
/// Built once at startup and shared read-only by all requests.
#[derive(Clone)]
pub struct Collaborators {
    /// Persistent record store.
    pub store: Arc<dyn DataStore>,
    /// Logging collaborator.
    pub logger: Arc<dyn Logger>,
    /// Response writer.
    pub responder: Responder,
}

impl Collaborators {
    /// Bundles the given collaborators.
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>, logger: Arc<dyn Logger>, responder: Responder) -> Self {
        Self {
            store,
            logger,
            responder,
        }
    }

    /// Builds a tracing logger, an in-memory store, and a responder from
    /// configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger::new(config.logger.clone()));
        let store = Arc::new(InMemoryDataStore::new(logger.clone()));
        let responder = Responder::new(&config.server, logger.clone());
        Self::new(store, logger, responder)
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("responder", &self.responder)
            .finish_non_exhaustive()
    }
}
