//! The login pipeline: credentials in, signed token out.

use super::credentials::{EncodePassword, ExtractCredentials};
use super::respond::RespondToken;
use crate::context::{RequestContext, Session};
use crate::errors::{ConfigurationError, ErrorRecord};
use crate::pipeline::{NotImplementedStage, PipelineDefinition, Stage, StageResult, StageValue};
use crate::token::TokenService;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

crate::stage_keys! {
    /// Stages of the login pipeline, in order.
    pub enum LoginStage {
        /// Reads `user_name` and `password` from the body.
        Extract => "extract",
        /// Hashes the password when a salt is configured.
        Encode => "encode",
        /// Looks the account up. Must be supplied by the integrator.
        Authenticate => "authenticate",
        /// Turns the account into the session.
        Establish => "establish",
        /// Signs the session into a token.
        Tokenize => "tokenize",
        /// Writes `{"token": ...}`.
        Respond => "respond",
    }
}

/// The login handler.
pub type LoginHandler = PipelineDefinition<LoginStage>;

/// Session fields copied from the authenticated account.
pub const SESSION_FIELDS: [&str; 2] = ["account_id", "user_name"];

/// Builds the session from the account returned by `authenticate` and
/// stores it on the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstablishSession;

#[async_trait]
impl Stage for EstablishSession {
    async fn run(&self, ctx: &mut RequestContext, input: StageValue) -> StageResult {
        let Value::Object(account) = input else {
            return Err(ErrorRecord::authentication("authenticate produced no account"));
        };
        let session: Session = SESSION_FIELDS
            .iter()
            .filter_map(|field| account.get(*field).map(|v| ((*field).to_string(), v.clone())))
            .collect();
        ctx.session.clone_from(&session);
        Ok(Value::Object(session))
    }
}

/// Issues a token for the session.
#[derive(Debug, Clone)]
pub struct IssueToken {
    tokens: Arc<TokenService>,
}

impl IssueToken {
    /// Creates the stage.
    #[must_use]
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl Stage for IssueToken {
    async fn run(&self, _ctx: &mut RequestContext, input: StageValue) -> StageResult {
        let Value::Object(session) = input else {
            return Err(ErrorRecord::system("Session must be an object"));
        };
        Ok(Value::String(self.tokens.issue(&session)?))
    }
}

/// Builds the login pipeline with its default stages.
///
/// # Errors
///
/// Returns an error only if the stage list is malformed.
pub fn login_user(
    tokens: Arc<TokenService>,
    encode: EncodePassword,
) -> Result<LoginHandler, ConfigurationError> {
    PipelineDefinition::builder("login_user")
        .stage(LoginStage::Extract, ExtractCredentials::user_and_password())
        .stage(LoginStage::Encode, encode)
        .stage(LoginStage::Authenticate, NotImplementedStage::new("authenticate"))
        .stage(LoginStage::Establish, EstablishSession)
        .stage(LoginStage::Tokenize, IssueToken::new(tokens))
        .stage(LoginStage::Respond, RespondToken)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::Md5Hasher;
    use crate::pipeline::{stage_fn, StageKey};
    use crate::testing::{assert_empty, TestFixture, TestRequest};
    use http::StatusCode;
    use serde_json::json;

    fn handler() -> (LoginHandler, Arc<TokenService>) {
        let tokens = Arc::new(TokenService::new("secret", 60).unwrap());
        let encode = EncodePassword::new(Arc::new(Md5Hasher), None);
        (login_user(tokens.clone(), encode).unwrap(), tokens)
    }

    #[test]
    fn test_stage_order() {
        let (login, _) = handler();
        assert_eq!(login.keys(), LoginStage::ALL.to_vec());
        assert_eq!(
            LoginStage::ALL.iter().map(StageKey::as_str).collect::<Vec<_>>(),
            vec!["extract", "encode", "authenticate", "establish", "tokenize", "respond"]
        );
    }

    #[tokio::test]
    async fn test_default_authenticate_is_not_implemented() {
        let (login, _) = handler();
        let fixture = TestFixture::new();
        let mut ctx = fixture.context(TestRequest::post("/login").build());

        let report = login.execute(&mut ctx, Value::Null).await;

        assert!(report.is_failed());
        assert_eq!(report.stages_run(), 3);
        assert_empty(ctx.response().unwrap(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let (login, tokens) = handler();
        login
            .override_stage(
                "authenticate",
                Arc::new(stage_fn("authenticate", |_, credentials| {
                    assert_eq!(credentials["user_name"], "a");
                    Ok(json!({"account_id": 1, "user_name": "a", "password": "hidden"}))
                })),
            )
            .unwrap();
        let fixture = TestFixture::new();
        let mut ctx = fixture.context(
            TestRequest::post("/login")
                .field("user_name", "a")
                .field("password", "pw")
                .build(),
        );

        let report = login.execute(&mut ctx, Value::Null).await;
        assert!(report.is_completed());
        assert_eq!(ctx.session.get("account_id"), Some(&json!(1)));
        assert!(!ctx.session.contains_key("password"));

        let body = ctx.response().unwrap().body_json().unwrap();
        let claims = tokens.verify(body["token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.get("user_name"), Some(&json!("a")));
        assert!(claims.get("password").is_none());
    }

    #[tokio::test]
    async fn test_non_object_account_is_rejected() {
        let (login, _) = handler();
        login
            .override_stage(
                "authenticate",
                Arc::new(stage_fn("authenticate", |_, _| Ok(Value::Null))),
            )
            .unwrap();
        let fixture = TestFixture::new();
        let mut ctx = fixture.context(TestRequest::post("/login").build());

        login.execute(&mut ctx, Value::Null).await;
        assert_empty(ctx.response().unwrap(), StatusCode::UNAUTHORIZED);
    }
}
