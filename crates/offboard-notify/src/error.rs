use thiserror::Error;

/// Result type local to offboard-notify.
pub type Result<T> = std::result::Result<T, SendError>;

/// Anything that stops a notification from reaching the relay.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("invalid address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("attachment {path}: {source}")]
    Attachment {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("message build: {0}")]
    Build(String),

    #[error("smtp: {0}")]
    Transport(String),
}

impl From<SendError> for offboard_core::error::Error {
    fn from(e: SendError) -> Self {
        offboard_core::error::Error::Send(e.to_string())
    }
}
