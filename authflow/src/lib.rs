//! # Authflow
//!
//! Overridable authentication pipelines for request-serving applications.
//!
//! Authflow provides:
//!
//! - **Staged handlers**: login, registration, password change, and
//!   authorization as fixed, named stage lists whose individual stages can
//!   be replaced before serving
//! - **Signed session tokens**: HMAC-SHA256 tokens with absolute expiry
//! - **Content negotiation**: JSON, CSV, tabular text, and plain text
//!   picked from the client's `Accept` list
//! - **Error classification**: one status code per error kind, with
//!   internal details logged and never sent
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use authflow::prelude::*;
//!
//! let config = AppConfig::load("config.json")?;
//! let collaborators = Arc::new(Collaborators::from_config(&config));
//! let factory = HandlerFactory::from_config(&config.auth, Arc::new(Md5Hasher))?;
//!
//! let login = factory.create(LOGIN_USER)?;
//! login.override_stage("authenticate", Arc::new(FnStage::new("authenticate", |ctx, credentials| {
//!     Box::pin(async move {
//!         let user_name = credentials["user_name"].as_str().unwrap_or_default();
//!         ctx.store().fetch("accounts", user_name).await
//!     })
//! })))?;
//!
//! let response = HandlerChain::new().with(login).serve(request, collaborators).await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod classify;
pub mod collaborators;
pub mod config;
pub mod context;
pub mod errors;
pub mod handlers;
pub mod http;
pub mod observability;
pub mod pipeline;
pub mod respond;
pub mod testing;
pub mod token;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::classify::{classify, Classification, ErrorClassifier};
    pub use crate::collaborators::{
        DataStore, Hasher, InMemoryDataStore, Md5Hasher, Sha256Hasher,
    };
    pub use crate::config::{AppConfig, AuthConfig, LoggerConfig, ServerConfig};
    pub use crate::context::{CancellationToken, Collaborators, RequestContext, Session};
    pub use crate::errors::{ConfigError, ConfigurationError, ErrorKind, ErrorRecord};
    pub use crate::handlers::{
        Flow, Handler, HandlerChain, HandlerFactory, AUTHENTICATE_USER, CHANGE_USER_PASSWORD,
        LOGIN_USER, REGISTER_USER,
    };
    pub use crate::http::{Request, Response};
    pub use crate::observability::{init_tracing, Logger, NoOpLogger, TracingLogger};
    pub use crate::pipeline::{
        stage_fn, ExecutionReport, ExecutionState, FnStage, NotImplementedStage,
        PipelineDefinition, Stage, StageKey, StageResult, StageValue,
    };
    pub use crate::respond::{Column, Formatter, MediaType, Responder};
    pub use crate::token::{Claims, Clock, ManualClock, SystemClock, TokenService};
    pub use std::sync::Arc;
}
