//! Error types for txdesk-core

use thiserror::Error;

/// Failures of remote calls and board operations
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    #[error("Remote call '{endpoint}' failed: {message}")]
    Transport { endpoint: String, message: String },

    #[error("Unexpected payload from '{endpoint}': {message}")]
    Decode { endpoint: String, message: String },

    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl CoreError {
    /// Whether repeating the same action may succeed.
    ///
    /// Only transport failures qualify; a payload that failed to decode
    /// will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Transport { .. })
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Request parameters that fail to serialize
impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::InvalidRequest { message: error.to_string() }
    }
}
