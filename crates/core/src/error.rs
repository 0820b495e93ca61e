use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Malformed event at index {index}: {reason}")]
    MalformedEvent { index: usize, reason: String },

    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("Cannot create session for user '{user_id}' from an empty run")]
    EmptyRun { user_id: String },

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl SessionError {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        SessionError::MalformedEvent {
            index,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
