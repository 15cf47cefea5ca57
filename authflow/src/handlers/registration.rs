//! The registration pipeline.

use super::credentials::{EncodePassword, ExtractCredentials, ValidateCredentials, Validators};
use super::respond::RespondStage;
use crate::errors::ConfigurationError;
use crate::pipeline::{NotImplementedStage, PipelineDefinition};
use std::sync::Arc;

crate::stage_keys! {
    /// Stages of the registration pipeline, in order.
    pub enum RegistrationStage {
        /// Reads `user_name` and `password` from the body.
        Extract => "extract",
        /// Applies the configured patterns.
        Validate => "validate",
        /// Hashes the password when a salt is configured.
        Encode => "encode",
        /// Creates the account. Must be supplied by the integrator.
        Register => "register",
        /// Writes the account returned by `register`.
        Respond => "respond",
    }
}

/// The registration handler.
pub type RegistrationHandler = PipelineDefinition<RegistrationStage>;

/// Builds the registration pipeline with its default stages.
///
/// # Errors
///
/// Returns an error only if the stage list is malformed.
pub fn register_user(
    validators: Arc<Validators>,
    encode: EncodePassword,
) -> Result<RegistrationHandler, ConfigurationError> {
    PipelineDefinition::builder("register_user")
        .stage(RegistrationStage::Extract, ExtractCredentials::user_and_password())
        .stage(RegistrationStage::Validate, ValidateCredentials::new(validators))
        .stage(RegistrationStage::Encode, encode)
        .stage(RegistrationStage::Register, NotImplementedStage::new("register"))
        .stage(RegistrationStage::Respond, RespondStage)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{DataStore, Hasher, Md5Hasher};
    use crate::config::AuthConfig;
    use crate::pipeline::{FnStage, Stage, StageValue};
    use crate::testing::{assert_json, assert_message, TestFixture, TestRequest};
    use http::StatusCode;
    use serde_json::json;

    fn handler() -> RegistrationHandler {
        let config = AuthConfig::new("k")
            .with_password_salt("salt")
            .with_user_name_pattern("@")
            .with_password_pattern("^.{4,}$");
        register_user(
            Arc::new(Validators::from_config(&config).unwrap()),
            EncodePassword::new(Arc::new(Md5Hasher), config.password_salt),
        )
        .unwrap()
    }

    fn register_into_store() -> Arc<dyn Stage> {
        Arc::new(FnStage::new("register", |ctx, credentials| {
            Box::pin(async move {
                let user_name = credentials["user_name"].as_str().unwrap_or_default().to_string();
                ctx.store().insert("users", &user_name, credentials.clone()).await?;
                Ok(json!({"user_name": user_name}))
            })
        }))
    }

    #[tokio::test]
    async fn test_invalid_user_name() {
        let registration = handler();
        let fixture = TestFixture::new();
        let mut ctx = fixture.context(
            TestRequest::post("/register")
                .field("user_name", "no-at-sign")
                .field("password", "password")
                .build(),
        );

        let report = registration.execute(&mut ctx, StageValue::Null).await;
        assert_eq!(report.stages_run(), 2);
        assert_message(ctx.response().unwrap(), StatusCode::BAD_REQUEST, "Invalid email address");
    }

    #[tokio::test]
    async fn test_invalid_password() {
        let registration = handler();
        let fixture = TestFixture::new();
        let mut ctx = fixture.context(
            TestRequest::post("/register")
                .field("user_name", "a@b")
                .field("password", "pw")
                .build(),
        );

        registration.execute(&mut ctx, StageValue::Null).await;
        assert_message(ctx.response().unwrap(), StatusCode::BAD_REQUEST, "Invalid password");
    }

    #[tokio::test]
    async fn test_register_stores_hashed_password() {
        let registration = handler();
        registration.replace(RegistrationStage::Register, register_into_store()).unwrap();
        let fixture = TestFixture::new();
        let mut ctx = fixture.context(
            TestRequest::post("/register")
                .field("user_name", "a@b")
                .field("password", "password")
                .build(),
        );

        let report = registration.execute(&mut ctx, StageValue::Null).await;
        assert!(report.is_completed());
        assert_eq!(assert_json(ctx.response().unwrap()), json!({"user_name": "a@b"}));

        let stored = fixture.store.fetch("users", "a@b").await.unwrap();
        assert_eq!(stored["password"], Md5Hasher.hash("password", "salt"));
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let registration = handler();
        registration.replace(RegistrationStage::Register, register_into_store()).unwrap();
        let fixture = TestFixture::new();

        for expected in [StatusCode::OK, StatusCode::BAD_REQUEST] {
            let mut ctx = fixture.context(
                TestRequest::post("/register")
                    .field("user_name", "a@b")
                    .field("password", "password")
                    .build(),
            );
            registration.execute(&mut ctx, StageValue::Null).await;
            assert_eq!(ctx.response().unwrap().status, expected);
        }
    }
}
