use thiserror::Error;

/// Result type local to offboard-gateway.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("gateway connection failed: {0}")]
    Connection(String),

    #[error("asset query failed: {0}")]
    Query(String),

    #[error("unexpected result shape: {0}")]
    Shape(String),
}

impl From<Error> for offboard_core::error::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Connection(msg) => offboard_core::error::Error::Connection(msg),
            Error::Query(msg) => offboard_core::error::Error::Query(msg),
            Error::Shape(msg) => offboard_core::error::Error::Schema(msg),
        }
    }
}

impl From<offboard_core::error::Error> for Error {
    fn from(e: offboard_core::error::Error) -> Self {
        Error::Shape(e.to_string())
    }
}
