//! Error types for the handball4all sync crate

use thiserror::Error;


pub type Result<T> = std::result::Result<T, H4aError>;

#[derive(Error, Debug)]
pub enum H4aError {
    #[error("Invalid tracking URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Malformed federation response: {message}")]
    MalformedResponse { message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetching {url} failed: {message}")]
    Fetch { url: String, message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid competition type: {value}")]
    InvalidCompetitionType { value: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl H4aError {
    pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        H4aError::InvalidUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        H4aError::MalformedResponse {
            message: message.into(),
        }
    }

    pub(crate) fn persistence(message: impl Into<String>) -> Self {
        H4aError::Persistence {
            message: message.into(),
        }
    }

    /// True for failures of the fetch transport (connection, timeout, non-2xx).
    ///
    /// The updater records these per track and keeps going; every other
    /// error aborts the run.
    pub fn is_transport(&self) -> bool {
        matches!(self, H4aError::Http(_) | H4aError::Fetch { .. })
    }
}
