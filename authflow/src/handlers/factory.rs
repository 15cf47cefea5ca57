//! Handler construction by name.

use super::authorization::{authenticate_user, AuthorizationHandler};
use super::credentials::{EncodePassword, Validators};
use super::handler::Handler;
use super::login::{login_user, LoginHandler};
use super::password_change::{change_user_password, PasswordChangeHandler};
use super::registration::{register_user, RegistrationHandler};
use crate::collaborators::Hasher;
use crate::config::AuthConfig;
use crate::errors::ConfigurationError;
use crate::token::TokenService;
use std::sync::Arc;
use tracing::debug;

/// Name of the login handler.
pub const LOGIN_USER: &str = "login_user";
/// Name of the authorization handler.
pub const AUTHENTICATE_USER: &str = "authenticate_user";
/// Name of the registration handler.
pub const REGISTER_USER: &str = "register_user";
/// Name of the password change handler.
pub const CHANGE_USER_PASSWORD: &str = "change_user_password";

/// Every name [`HandlerFactory::create`] accepts.
pub const HANDLER_NAMES: [&str; 4] = [
    LOGIN_USER,
    AUTHENTICATE_USER,
    REGISTER_USER,
    CHANGE_USER_PASSWORD,
];

/// Builds the standard handlers from one auth configuration.
///
/// The token service and the compiled validation patterns are built once
/// and shared by every handler the factory creates.
#[derive(Clone)]
pub struct HandlerFactory {
    tokens: Option<Arc<TokenService>>,
    validators: Arc<Validators>,
    hasher: Arc<dyn Hasher>,
    password_salt: Option<String>,
}

impl HandlerFactory {
    /// Prepares the shared pieces.
    ///
    /// An empty signing secret is accepted here; creating a handler that
    /// needs tokens then fails with [`ConfigurationError::MissingSecret`].
    ///
    /// # Errors
    ///
    /// Returns an error if a validation pattern does not compile.
    pub fn from_config(
        config: &AuthConfig,
        hasher: Arc<dyn Hasher>,
    ) -> Result<Self, ConfigurationError> {
        let tokens = match TokenService::from_config(config) {
            Ok(tokens) => Some(Arc::new(tokens)),
            Err(ConfigurationError::MissingSecret) => None,
            Err(err) => return Err(err),
        };
        Ok(Self {
            tokens,
            validators: Arc::new(Validators::from_config(config)?),
            hasher,
            password_salt: config.password_salt.clone().filter(|salt| !salt.is_empty()),
        })
    }

    /// Uses a prepared token service, e.g. one with a simulated clock.
    #[must_use]
    pub fn with_token_service(mut self, tokens: Arc<TokenService>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Returns the shared token service.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingSecret`] if no secret was configured.
    pub fn token_service(&self) -> Result<Arc<TokenService>, ConfigurationError> {
        self.tokens.clone().ok_or(ConfigurationError::MissingSecret)
    }

    fn encoder(&self) -> EncodePassword {
        EncodePassword::new(self.hasher.clone(), self.password_salt.clone())
    }

    /// Builds a login handler.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingSecret`] if no secret was configured.
    pub fn login(&self) -> Result<LoginHandler, ConfigurationError> {
        login_user(self.token_service()?, self.encoder())
    }

    /// Builds an authorization handler.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingSecret`] if no secret was configured.
    pub fn authorization(&self) -> Result<AuthorizationHandler, ConfigurationError> {
        authenticate_user(self.token_service()?)
    }

    /// Builds a registration handler.
    ///
    /// # Errors
    ///
    /// Returns an error only if the stage list is malformed.
    pub fn registration(&self) -> Result<RegistrationHandler, ConfigurationError> {
        register_user(self.validators.clone(), self.encoder())
    }

    /// Builds a password change handler.
    ///
    /// # Errors
    ///
    /// Returns an error only if the stage list is malformed.
    pub fn password_change(&self) -> Result<PasswordChangeHandler, ConfigurationError> {
        change_user_password(self.validators.clone(), self.encoder())
    }

    /// Builds a handler by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownHandler`] for names outside
    /// [`HANDLER_NAMES`].
    pub fn create(&self, name: &str) -> Result<Arc<dyn Handler>, ConfigurationError> {
        debug!(handler = name, "Creating handler");
        let handler: Arc<dyn Handler> = match name {
            LOGIN_USER => Arc::new(self.login()?),
            AUTHENTICATE_USER => Arc::new(self.authorization()?),
            REGISTER_USER => Arc::new(self.registration()?),
            CHANGE_USER_PASSWORD => Arc::new(self.password_change()?),
            _ => return Err(ConfigurationError::UnknownHandler(name.to_string())),
        };
        Ok(handler)
    }
}

impl std::fmt::Debug for HandlerFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerFactory")
            .field("tokens", &self.tokens)
            .field("validators", &self.validators)
            .field("salted", &self.password_salt.is_some())
            .finish_non_exhaustive()
    }
}
