//! The authorization pipeline: bearer token in, session on the context.

use crate::context::RequestContext;
use crate::errors::{ConfigurationError, ErrorRecord};
use crate::pipeline::{PipelineDefinition, Stage, StageResult, StageValue};
use crate::token::TokenService;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

crate::stage_keys! {
    /// Stages of the authorization pipeline, in order.
    pub enum AuthorizationStage {
        /// Reads the token from the `Authorization` header.
        Extract => "extract",
        /// Verifies the token.
        Parse => "parse",
        /// Stores the claims as the session.
        Inject => "inject",
    }
}

/// The authorization handler. Continues the chain when the token is valid.
pub type AuthorizationHandler = PipelineDefinition<AuthorizationStage>;

const BEARER_PREFIX: &str = "Bearer ";

/// Strips an optional `Bearer ` prefix from an `Authorization` value.
#[must_use]
pub fn bearer_token(header: &str) -> &str {
    header.strip_prefix(BEARER_PREFIX).unwrap_or(header).trim()
}

/// Reads the token from the `Authorization` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractToken;

#[async_trait]
impl Stage for ExtractToken {
    async fn run(&self, ctx: &mut RequestContext, _input: StageValue) -> StageResult {
        let token = ctx
            .request()
            .authorization()
            .map(bearer_token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ErrorRecord::authentication("missing token"))?;
        Ok(Value::String(token.to_string()))
    }
}

/// Verifies the token and yields its claims.
#[derive(Debug, Clone)]
pub struct VerifyToken {
    tokens: Arc<TokenService>,
}

impl VerifyToken {
    /// Creates the stage.
    #[must_use]
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl Stage for VerifyToken {
    async fn run(&self, _ctx: &mut RequestContext, input: StageValue) -> StageResult {
        let token = input.as_str().unwrap_or_default();
        Ok(Value::Object(self.tokens.verify(token)?.into_map()))
    }
}

/// Replaces the context session with the verified claims.
#[derive(Debug, Clone, Copy, Default)]
pub struct InjectSession;

#[async_trait]
impl Stage for InjectSession {
    async fn run(&self, ctx: &mut RequestContext, input: StageValue) -> StageResult {
        let Value::Object(session) = input else {
            return Err(ErrorRecord::authentication("claims are not an object"));
        };
        ctx.session = session;
        Ok(Value::Null)
    }
}

/// Builds the authorization pipeline with its default stages.
///
/// # Errors
///
/// Returns an error only if the stage list is malformed.
pub fn authenticate_user(
    tokens: Arc<TokenService>,
) -> Result<AuthorizationHandler, ConfigurationError> {
    PipelineDefinition::builder("authenticate_user")
        .stage(AuthorizationStage::Extract, ExtractToken)
        .stage(AuthorizationStage::Parse, VerifyToken::new(tokens))
        .stage(AuthorizationStage::Inject, InjectSession)
        .build()
}
