//! Error handling for the farm calculator client
//!
//! Every failure carries a stable code so the CLI and any embedding UI can
//! decide how loudly to surface it. Persistence failures are recovered by the
//! history service and never abort a calculation.

use serde::Serialize;
use shared::wizard::WizardError;
use shared::ValidationError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Input errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Wizard error: {0}")]
    Wizard(WizardError),

    // Remote persistence errors
    #[error("Not signed in")]
    MissingCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Remote history unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Remote history returned {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    #[error("Unexpected remote response: {0}")]
    RemoteProtocol(String),

    // Local persistence errors
    #[error("Local storage error: {0}")]
    LocalStorage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal error: {0:#}")]
    InternalError(#[from] anyhow::Error),
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::Validation(v) => AppError::Validation(v),
            other => AppError::Wizard(other),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Wizard(_) => "INVALID_STATE_TRANSITION",
            AppError::MissingCredentials => "MISSING_CREDENTIALS",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::RemoteUnavailable(_) => "REMOTE_UNAVAILABLE",
            AppError::RemoteStatus { .. } => "REMOTE_STATUS",
            AppError::RemoteProtocol(_) => "REMOTE_PROTOCOL",
            AppError::LocalStorage(_) => "LOCAL_STORAGE_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Failure of the remote leg; recovered by falling back to local storage
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            AppError::MissingCredentials
                | AppError::Unauthorized(_)
                | AppError::RemoteUnavailable(_)
                | AppError::RemoteStatus { .. }
                | AppError::RemoteProtocol(_)
        )
    }

    /// Worth retrying once: transport failures and server-side errors
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::RemoteUnavailable(_) => true,
            AppError::RemoteStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        let field = match self {
            AppError::Validation(v) => Some(v.field.to_string()),
            _ => None,
        };
        ErrorDetail {
            code: self.code().to_string(),
            message: self.to_string(),
            field,
        }
    }
}

/// Serializable error shape for CLI and bindings output
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Result type alias for client operations
pub type AppResult<T> = Result<T, AppError>;
