//! The standard authentication handlers.
//!
//! Each handler is a [`PipelineDefinition`](crate::pipeline::PipelineDefinition)
//! with a fixed stage list. Stages that need application data
//! (`authenticate`, `register`, `change`) default to `NotImplemented` and
//! are replaced by name before serving.

mod authorization;
mod credentials;
mod factory;
mod handler;
mod login;
mod password_change;
mod registration;
mod respond;

pub use authorization::{
    authenticate_user, bearer_token, AuthorizationHandler, AuthorizationStage, ExtractToken,
    InjectSession, VerifyToken,
};
pub use credentials::{
    Credentials, EncodePassword, ExtractCredentials, ValidateCredentials, Validators,
};
pub use factory::{
    HandlerFactory, AUTHENTICATE_USER, CHANGE_USER_PASSWORD, HANDLER_NAMES, LOGIN_USER,
    REGISTER_USER,
};
pub use handler::{Flow, Handler, HandlerChain};
pub use login::{login_user, EstablishSession, IssueToken, LoginHandler, LoginStage, SESSION_FIELDS};
pub use password_change::{change_user_password, PasswordChangeHandler, PasswordChangeStage};
pub use registration::{register_user, RegistrationHandler, RegistrationStage};
pub use respond::{RespondOk, RespondStage, RespondToken};
