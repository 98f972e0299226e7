use serde::Deserialize;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Server error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        message: Option<String>,
    },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    #[error("A booking needs at least one passenger")]
    MinimumPassengers,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("A booking submission is already in progress")]
    SubmissionInProgress,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error payload returned by the booking API. Older deployments use `error`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|message| !message.trim().is_empty())
    }
}

// Convert reqwest::Error (connection, timeout, body) to AppError
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

// Form validation failures carry the first field message, or a generic one
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Please fill in all fields".to_string());
        AppError::Validation(message)
    }
}

/// Result type used across the crate
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Text shown next to the control that triggered the failure.
    ///
    /// Server-provided messages and local validation messages are shown
    /// verbatim; everything else falls back to the caller's generic text.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            AppError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            AppError::Validation(message) => message.clone(),
            AppError::MinimumPassengers | AppError::SubmissionInProgress => self.to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }
}
