//! CLI error type.
//!
//! Everything a command can fail with, rendered through `miette` in
//! `main`. Gating errors name the remedy; nothing here panics or
//! retries.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("not logged in")]
    #[diagnostic(help("run `shuttly login`, or `shuttly register` for a new account"))]
    NotLoggedIn,

    #[error("this command needs the admin role")]
    #[diagnostic(help("log in to the admin console with `shuttly login --admin`"))]
    Forbidden,

    #[error("already logged in as {name}")]
    #[diagnostic(help("run `shuttly logout` first to switch accounts"))]
    AlreadyLoggedIn { name: String },

    #[error("your session has expired")]
    #[diagnostic(help("log in again with `shuttly login`"))]
    SessionExpired,

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("{resource} '{identifier}' not found -- try `shuttly {list_command}`")]
    NotFound {
        resource: String,
        identifier: String,
        list_command: String,
    },

    #[error(transparent)]
    Core(#[from] shuttly_core::CoreError),

    #[error(transparent)]
    Api(#[from] shuttly_api::Error),

    #[error(transparent)]
    Config(#[from] shuttly_config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Normalize auth failures from any layer into the session-expired
    /// gate error so the forced-logout path reads the same everywhere.
    pub fn from_core(err: shuttly_core::CoreError) -> Self {
        if err.is_auth_error() {
            Self::SessionExpired
        } else {
            Self::Core(err)
        }
    }

    pub fn from_api(err: shuttly_api::Error) -> Self {
        if err.is_auth_error() {
            Self::SessionExpired
        } else {
            Self::Api(err)
        }
    }
}
