//! Configuration types.
//!
//! Every service and pipeline receives its configuration explicitly at build
//! time; nothing here is global.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One hour token expiration by default.
pub const DEFAULT_JWT_EXPIRATION: u64 = 60 * 60;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Response settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logger: LoggerConfig,
}

impl AppConfig {
    /// Parses configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON for this shape.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads configuration from a `.json` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Loads configuration from either JSON text or a path to a `.json` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Unrecognized`] if the source is neither.
    pub fn load(source: &str) -> Result<Self, ConfigError> {
        if let Ok(config) = Self::from_json_str(source) {
            return Ok(config);
        }

        let path = Path::new(source.trim());
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_file(path),
            _ => Err(ConfigError::Unrecognized(source.to_string())),
        }
    }
}

/// Authentication settings shared by the standard handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign and verify session tokens.
    #[serde(default)]
    pub jwt_secret: String,
    /// Token lifetime in seconds. Zero means tokens never expire.
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration: u64,
    /// Salt appended to passwords before hashing. No hashing when absent.
    #[serde(default)]
    pub password_salt: Option<String>,
    /// Pattern a user name must match during registration.
    #[serde(default)]
    pub regex_user_name: Option<String>,
    /// Pattern a password must match during registration and password change.
    #[serde(default)]
    pub regex_password: Option<String>,
}

fn default_jwt_expiration() -> u64 {
    DEFAULT_JWT_EXPIRATION
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_expiration: default_jwt_expiration(),
            password_salt: None,
            regex_user_name: None,
            regex_password: None,
        }
    }
}

impl AuthConfig {
    /// Creates an auth configuration with the given signing secret.
    #[must_use]
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            ..Self::default()
        }
    }

    /// Sets the token lifetime in seconds.
    #[must_use]
    pub fn with_expiration(mut self, seconds: u64) -> Self {
        self.jwt_expiration = seconds;
        self
    }

    /// Sets the password salt.
    #[must_use]
    pub fn with_password_salt(mut self, salt: impl Into<String>) -> Self {
        self.password_salt = Some(salt.into());
        self
    }

    /// Sets the user name pattern.
    #[must_use]
    pub fn with_user_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.regex_user_name = Some(pattern.into());
        self
    }

    /// Sets the password pattern.
    #[must_use]
    pub fn with_password_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.regex_password = Some(pattern.into());
        self
    }
}

/// Response rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Pretty-print JSON bodies.
    #[serde(default)]
    pub prettify_json: bool,
}

impl ServerConfig {
    /// Enables pretty-printed JSON.
    #[must_use]
    pub fn with_prettify_json(mut self, prettify: bool) -> Self {
        self.prettify_json = prettify;
        self
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Emit `system` lifecycle messages.
    #[serde(default)]
    pub system: bool,
    /// Emit `trace` diagnostic messages.
    #[serde(default)]
    pub trace: bool,
    /// Format log lines as JSON.
    #[serde(default)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.auth.jwt_expiration, DEFAULT_JWT_EXPIRATION);
        assert!(config.auth.password_salt.is_none());
        assert!(!config.server.prettify_json);
        assert!(!config.logger.system);
    }

    #[test]
    fn test_load_json_string() {
        let config = AppConfig::load(
            r#"{
                "auth": {"jwt_secret": "s3cret", "jwt_expiration": 0},
                "server": {"prettify_json": true}
            }"#,
        )
        .unwrap();

        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.jwt_expiration, 0);
        assert!(config.server.prettify_json);
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"auth": {{"jwt_secret": "from-file", "password_salt": "pepper"}}}}"#
        )
        .unwrap();

        let config = AppConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.auth.jwt_secret, "from-file");
        assert_eq!(config.auth.password_salt.as_deref(), Some("pepper"));
        assert_eq!(config.auth.jwt_expiration, DEFAULT_JWT_EXPIRATION);
    }

    #[test]
    fn test_load_unrecognized() {
        let result = AppConfig::load("config.yaml");
        assert!(matches!(result, Err(ConfigError::Unrecognized(_))));
    }

    #[test]
    fn test_auth_config_builder() {
        let config = AuthConfig::new("k")
            .with_expiration(5)
            .with_password_salt("salt")
            .with_password_pattern("^.{8,}$");

        assert_eq!(config.jwt_secret, "k");
        assert_eq!(config.jwt_expiration, 5);
        assert_eq!(config.regex_password.as_deref(), Some("^.{8,}$"));
    }
}
