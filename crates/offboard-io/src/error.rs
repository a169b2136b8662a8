use thiserror::Error;

/// Result type local to offboard-io.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("xlsx write: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("xlsx read: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("schema: {0}")]
    Schema(String),
}

impl From<Error> for offboard_core::error::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Schema(msg) => offboard_core::error::Error::Schema(msg),
            other => offboard_core::error::Error::Io(other.to_string()),
        }
    }
}
