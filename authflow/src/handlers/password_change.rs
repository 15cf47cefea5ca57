//! The password change pipeline.

use super::credentials::{EncodePassword, ExtractCredentials, ValidateCredentials, Validators};
use super::respond::RespondOk;
use crate::errors::ConfigurationError;
use crate::pipeline::{NotImplementedStage, PipelineDefinition};
use std::sync::Arc;

crate::stage_keys! {
    /// Stages of the password change pipeline, in order.
    pub enum PasswordChangeStage {
        /// Reads `password` from the body.
        Extract => "extract",
        /// Applies the password pattern.
        Validate => "validate",
        /// Hashes the password when a salt is configured.
        Encode => "encode",
        /// Stores the new password. Must be supplied by the integrator.
        Change => "change",
        /// Writes an empty `200`.
        Respond => "respond",
    }
}

/// The password change handler.
pub type PasswordChangeHandler = PipelineDefinition<PasswordChangeStage>;

/// Builds the password change pipeline with its default stages.
///
/// # Errors
///
/// Returns an error only if the stage list is malformed.
pub fn change_user_password(
    validators: Arc<Validators>,
    encode: EncodePassword,
) -> Result<PasswordChangeHandler, ConfigurationError> {
    PipelineDefinition::builder("change_user_password")
        .stage(PasswordChangeStage::Extract, ExtractCredentials::password_only())
        .stage(PasswordChangeStage::Validate, ValidateCredentials::new(validators))
        .stage(PasswordChangeStage::Encode, encode)
        .stage(PasswordChangeStage::Change, NotImplementedStage::new("change"))
        .stage(PasswordChangeStage::Respond, RespondOk)
        .build()
}
