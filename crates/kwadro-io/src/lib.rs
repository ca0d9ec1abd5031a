//! Grid store contract consumed by the kwadro record layer, plus the stores
//! that ship with it.

pub mod backends;
pub mod error;
pub mod traits;

#[cfg(feature = "json")]
pub use backends::JsonStore;
pub use backends::MemoryStore;
#[cfg(feature = "xlsx")]
pub use backends::XlsxStore;
pub use error::StoreError;
pub use traits::{Document, GridStore};

// Re-export for convenience
pub use kwadro_common::{CellValue, ColumnAddress};
