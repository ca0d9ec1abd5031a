//! Spreadsheet rows as records.
//!
//! A [`RecordType`] declares which column holds which attribute. A [`Board`]
//! owns a grid store, hands out one shared [`Record`] per `(sheet, row)`, appends
//! new records after the last non-empty row, and searches rows by attribute
//! value. Bound records read and write their cells directly.
//!
//! ```
//! use kwadro::{Board, CellValue, Filter, MemoryStore, Record, RecordType};
//!
//! let clients = RecordType::builder("Clients")
//!     .column("name", 1)
//!     .column("phone", 2)
//!     .column("address", "C")
//!     .column("country", 4)
//!     .build()?;
//!
//! let board = Board::new(MemoryStore::new());
//! board.create_sheet(&clients, None, false)?;
//!
//! let entry = clients.record_with([
//!     ("name", CellValue::from("Joshua King")),
//!     ("phone", CellValue::from(123)),
//!     ("country", CellValue::from("Australia")),
//! ]);
//! assert_eq!(board.add(&entry)?, 1);
//!
//! let filter = Filter::new().equals("name", "Joshua King");
//! let found = board.find(&clients, &filter)?.expect("added above");
//! assert!(Record::ptr_eq(&found, &entry));
//! assert_eq!(found.get("phone")?, CellValue::Int(123));
//! # Ok::<(), kwadro::KwadroError>(())
//! ```

mod board;
mod config;
mod error;
mod filter;
mod record;
mod schema;

pub use board::{Board, FindAll, RowKey, Source};
pub use config::BoardConfig;
pub use error::{KwadroError, Result};
pub use filter::Filter;
pub use record::Record;
pub use schema::{RecordType, Schema, SchemaBuilder};

// Re-export for convenience
pub use kwadro_common::{AddressError, CellValue, ColumnAddress, ColumnSpec};
#[cfg(feature = "json")]
pub use kwadro_io::JsonStore;
#[cfg(feature = "xlsx")]
pub use kwadro_io::XlsxStore;
pub use kwadro_io::{Document, GridStore, MemoryStore, StoreError};
