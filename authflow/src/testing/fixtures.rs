//! Request and collaborator fixtures.

use http::Method;
use serde_json::Value;
use std::sync::Arc;

use super::mocks::CollectingLogger;
use crate::collaborators::InMemoryDataStore;
use crate::config::ServerConfig;
use crate::context::{Collaborators, RequestContext};
use crate::http::Request;
use crate::respond::Responder;

/// Builds requests for tests.
#[derive(Debug, Clone)]
pub struct TestRequest {
    request: Request,
}

impl TestRequest {
    /// Starts a `POST` request.
    #[must_use]
    pub fn post(path: &str) -> Self {
        Self {
            request: Request::new(Method::POST, path),
        }
    }

    /// Starts a `GET` request.
    #[must_use]
    pub fn get(path: &str) -> Self {
        Self {
            request: Request::new(Method::GET, path),
        }
    }

    /// Adds a body field.
    #[must_use]
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.request = self.request.with_field(key, value);
        self
    }

    /// Sets the `Accept` header.
    #[must_use]
    pub fn accept(mut self, accept: &str) -> Self {
        self.request = self.request.with_accept(accept);
        self
    }

    /// Sets the `Authorization` header.
    #[must_use]
    pub fn authorization(mut self, credential: &str) -> Self {
        self.request = self.request.with_authorization(credential);
        self
    }

    /// Sets an arbitrary header.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.request = self.request.with_header(name, value);
        self
    }

    /// Finishes the request.
    #[must_use]
    pub fn build(self) -> Request {
        self.request
    }
}

/// A collaborator bundle whose logger and store stay inspectable.
#[derive(Debug, Clone)]
pub struct TestFixture {
    /// The collecting logger shared by every collaborator.
    pub logger: Arc<CollectingLogger>,
    /// The in-memory store.
    pub store: Arc<InMemoryDataStore>,
    /// The bundle handed to contexts.
    pub collaborators: Arc<Collaborators>,
}

impl TestFixture {
    /// Creates a fixture with default response settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_server_config(&ServerConfig::default())
    }

    /// Creates a fixture with the given response settings.
    #[must_use]
    pub fn with_server_config(config: &ServerConfig) -> Self {
        let logger = Arc::new(CollectingLogger::new());
        let store = Arc::new(InMemoryDataStore::new(logger.clone()));
        let collaborators = Arc::new(Collaborators::new(
            store.clone(),
            logger.clone(),
            Responder::new(config, logger.clone()),
        ));
        Self {
            logger,
            store,
            collaborators,
        }
    }

    /// Creates a request context backed by this fixture.
    #[must_use]
    pub fn context(&self, request: Request) -> RequestContext {
        RequestContext::new(request, self.collaborators.clone())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns a fresh collaborator bundle.
#[must_use]
pub fn test_collaborators() -> Arc<Collaborators> {
    TestFixture::new().collaborators
}

/// Returns a context for `request` with fresh collaborators.
#[must_use]
pub fn test_context(request: Request) -> RequestContext {
    TestFixture::new().context(request)
}
