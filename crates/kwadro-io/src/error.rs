use thiserror::Error;

/// Failures raised by a grid store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sheet `{0}` does not exist")]
    SheetNotFound(String),

    #[error("row index must be 1-based (>= 1)")]
    InvalidRow,

    #[error("{0} is not supported by this store")]
    Unsupported(&'static str),

    /// Backend-specific failure reported as a message.
    #[error("backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "xlsx")]
    #[error(transparent)]
    Xlsx(#[from] umya_spreadsheet::XlsxError),
}
