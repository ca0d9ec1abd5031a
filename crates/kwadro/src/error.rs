use kwadro_common::AddressError;
use kwadro_io::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KwadroError {
    #[error("invalid column address: {0}")]
    InvalidAddress(#[from] AddressError),

    #[error("table `{table}` has no column `{column}`")]
    UnknownColumn { table: String, column: String },

    #[error("table `{table}` declares column `{column}` more than once")]
    DuplicateColumn { table: String, column: String },

    #[error("attribute `{attribute}` of `{table}` has not been set")]
    AttributeNotSet { table: String, attribute: String },

    #[error("record of `{table}` is already bound to row {row}")]
    AlreadyBound { table: String, row: u32 },

    #[error("record of `{table}` is not bound to a row")]
    NotBound { table: String },

    #[error("record of `{table}` is bound to a different board")]
    ForeignRecord { table: String },

    #[error("sheet `{0}` does not exist")]
    MissingSheet(String),

    #[error("row index must be 1-based (>= 1)")]
    InvalidRow,

    #[error("board was not opened from a file")]
    NoPath,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = KwadroError> = std::result::Result<T, E>;
