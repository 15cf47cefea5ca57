//! Credential extraction, validation, and password encoding stages.

use crate::collaborators::Hasher;
use crate::config::AuthConfig;
use crate::context::RequestContext;
use crate::errors::{ConfigurationError, ErrorRecord};
use crate::pipeline::{Stage, StageResult, StageValue};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// User name and password as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// The user name. Absent for password changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// The password, possibly already encoded.
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    /// Reads credentials from a stage value.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` record if the value is not a credentials object.
    pub fn from_value(value: &StageValue) -> Result<Self, ErrorRecord> {
        serde_json::from_value(value.clone())
            .map_err(|_| ErrorRecord::validation("Could not parse credentials"))
    }

    /// Converts into a stage value.
    ///
    /// # Errors
    ///
    /// Returns a `System` record if serialization fails.
    pub fn into_value(self) -> StageResult {
        Ok(serde_json::to_value(self)?)
    }
}

/// Compiled user name and password patterns.
#[derive(Debug, Clone, Default)]
pub struct Validators {
    user_name: Option<Regex>,
    password: Option<Regex>,
}

fn compile(field: &str, pattern: Option<&str>) -> Result<Option<Regex>, ConfigurationError> {
    pattern
        .map(|p| {
            Regex::new(p).map_err(|e| ConfigurationError::InvalidPattern {
                field: field.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

impl Validators {
    /// Compiles the configured patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern does not compile.
    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigurationError> {
        Ok(Self {
            user_name: compile("regex_user_name", config.regex_user_name.as_deref())?,
            password: compile("regex_password", config.regex_password.as_deref())?,
        })
    }

    /// Checks credentials against the patterns. A pattern matches anywhere
    /// in the value unless anchored.
    ///
    /// # Errors
    ///
    /// Returns "Invalid email address" or "Invalid password" as a
    /// `Validation` record.
    pub fn validate(&self, credentials: &Credentials) -> Result<(), ErrorRecord> {
        if let (Some(pattern), Some(user_name)) = (&self.user_name, &credentials.user_name) {
            if !pattern.is_match(user_name) {
                return Err(ErrorRecord::validation("Invalid email address"));
            }
        }
        if let Some(pattern) = &self.password {
            if !pattern.is_match(&credentials.password) {
                return Err(ErrorRecord::validation("Invalid password"));
            }
        }
        Ok(())
    }
}

/// Reads trimmed `user_name` and `password` body fields.
#[derive(Debug, Clone, Copy)]
pub struct ExtractCredentials {
    with_user_name: bool,
}

impl ExtractCredentials {
    /// Extracts both fields.
    #[must_use]
    pub fn user_and_password() -> Self {
        Self { with_user_name: true }
    }

    /// Extracts only the password.
    #[must_use]
    pub fn password_only() -> Self {
        Self { with_user_name: false }
    }
}

#[async_trait]
impl Stage for ExtractCredentials {
    async fn run(&self, ctx: &mut RequestContext, _input: StageValue) -> StageResult {
        let request = ctx.request();
        Credentials {
            user_name: self.with_user_name.then(|| request.text_field("user_name")),
            password: request.text_field("password"),
        }
        .into_value()
    }
}

/// Rejects credentials that fail the configured patterns.
#[derive(Debug, Clone)]
pub struct ValidateCredentials {
    validators: Arc<Validators>,
}

impl ValidateCredentials {
    /// Creates the stage.
    #[must_use]
    pub fn new(validators: Arc<Validators>) -> Self {
        Self { validators }
    }
}

#[async_trait]
impl Stage for ValidateCredentials {
    async fn run(&self, _ctx: &mut RequestContext, input: StageValue) -> StageResult {
        self.validators.validate(&Credentials::from_value(&input)?)?;
        Ok(input)
    }
}

/// Hashes the password with the configured salt. Without a salt the
/// credentials pass through unchanged.
#[derive(Clone)]
pub struct EncodePassword {
    hasher: Arc<dyn Hasher>,
    salt: Option<String>,
}

impl EncodePassword {
    /// Creates the stage. An empty salt counts as no salt.
    #[must_use]
    pub fn new(hasher: Arc<dyn Hasher>, salt: Option<String>) -> Self {
        Self {
            hasher,
            salt: salt.filter(|salt| !salt.is_empty()),
        }
    }
}

impl std::fmt::Debug for EncodePassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodePassword")
            .field("salted", &self.salt.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for EncodePassword {
    async fn run(&self, _ctx: &mut RequestContext, input: StageValue) -> StageResult {
        let Some(salt) = self.salt.as_deref() else {
            return Ok(input);
        };
        let mut credentials = Credentials::from_value(&input)?;
        credentials.password = self.hasher.hash(&credentials.password, salt);
        credentials.into_value()
    }
}
