use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

/// Run-level error taxonomy.
///
/// `Schema` and `Connection` are fatal before the batch starts. `Io`, `Query`
/// and `Send` are recovered per employee by the orchestrator and only reach
/// callers through the run summary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    // Higher layers map their filesystem / csv / xlsx errors into this variant.
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Send error: {0}")]
    Send(String),
}

/// Coarse classification of an [`Error`], used when reporting outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Schema,
    Connection,
    Query,
    Io,
    Send,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::Schema(_) => ErrorKind::Schema,
            Error::Connection(_) => ErrorKind::Connection,
            Error::Query(_) => ErrorKind::Query,
            Error::Io(_) => ErrorKind::Io,
            Error::Send(_) => ErrorKind::Send,
        }
    }

    /// True for errors that must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Config | ErrorKind::Schema | ErrorKind::Connection
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Io(e.to_string())
    }
}
