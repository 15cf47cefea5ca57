//! The request context.

use super::{CancellationToken, Collaborators};
use crate::collaborators::DataStore;
use crate::errors::ErrorRecord;
use crate::http::{Request, Response};
use crate::observability::Logger;
use crate::respond::{Column, Responder};
use crate::token::Session;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Everything one request's pipeline execution can see and change.
///
/// Owned by a single execution; never shared between requests. The
/// response slot accepts one write; later writes are dropped.
#[derive(Debug)]
pub struct RequestContext {
    id: Uuid,
    started_at: DateTime<Utc>,
    request: Request,
    /// Session fields, filled in by login or authorization.
    pub session: Session,
    collaborators: Arc<Collaborators>,
    cancellation: Arc<CancellationToken>,
    response: Option<Response>,
    responded: bool,
}

impl RequestContext {
    /// Creates a context for `request`.
    #[must_use]
    pub fn new(request: Request, collaborators: Arc<Collaborators>) -> Self {
        Self {
            id: Uuid::now_v7(),
            started_at: Utc::now(),
            request,
            session: Session::new(),
            collaborators,
            cancellation: Arc::new(CancellationToken::new()),
            response: None,
            responded: false,
        }
    }

    /// Uses a cancellation token owned by the transport.
    #[must_use]
    pub fn with_cancellation(mut self, token: Arc<CancellationToken>) -> Self {
        self.cancellation = token;
        self
    }

    /// Returns the request ID.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns when the context was created.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the inbound request.
    #[must_use]
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Returns the shared collaborators.
    #[must_use]
    pub fn collaborators(&self) -> &Arc<Collaborators> {
        &self.collaborators
    }

    /// Returns the data store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DataStore> {
        &self.collaborators.store
    }

    /// Returns the logger.
    #[must_use]
    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.collaborators.logger
    }

    /// Returns the responder.
    #[must_use]
    pub fn responder(&self) -> &Responder {
        &self.collaborators.responder
    }

    /// Returns the cancellation token.
    #[must_use]
    pub fn cancellation(&self) -> &Arc<CancellationToken> {
        &self.cancellation
    }

    /// Returns whether the client has gone away.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Stores the response. Returns false, and drops `response`, if one
    /// was already written.
    pub fn write(&mut self, response: Response) -> bool {
        if self.responded {
            warn!(
                request_id = %self.id,
                status = response.status.as_u16(),
                "Response already written; dropping second write"
            );
            return false;
        }
        self.responded = true;
        self.response = Some(response);
        true
    }

    /// Negotiates and writes `data`.
    pub fn respond(&mut self, data: &Value) -> bool {
        self.respond_with(data, None)
    }

    /// Negotiates and writes `data` with explicit columns.
    pub fn respond_with(&mut self, data: &Value, columns: Option<&[Column]>) -> bool {
        let response = self.responder().respond_with(&self.request, data, columns);
        self.write(response)
    }

    /// Writes an empty `200`.
    pub fn ok(&mut self) -> bool {
        let response = self.responder().ok();
        self.write(response)
    }

    /// Writes the classified response for `err`.
    pub fn fail(&mut self, err: &ErrorRecord) -> bool {
        let response = self.responder().error(err);
        self.write(response)
    }

    /// Returns whether a response has been written.
    #[must_use]
    pub fn has_responded(&self) -> bool {
        self.responded
    }

    /// Returns the written response.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// Takes the written response. The slot stays closed to further writes.
    pub fn take_response(&mut self) -> Option<Response> {
        self.response.take()
    }
}
