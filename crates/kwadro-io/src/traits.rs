use crate::StoreError;
use kwadro_common::{CellValue, ColumnAddress};
use std::path::Path;

/// Raw sheet and cell I/O over a grid document.
///
/// Rows and columns are 1-based. Implementations are synchronous and assume a
/// single caller; nothing here locks.
pub trait GridStore {
    /// Sheet names in document order.
    fn sheet_names(&self) -> Vec<String>;

    fn sheet_exists(&self, sheet: &str) -> bool {
        self.sheet_names().iter().any(|name| name == sheet)
    }

    /// Create `name` at `index` (appended when `None` or past the end).
    /// Creating a sheet that already exists is a no-op.
    fn create_sheet(&mut self, name: &str, index: Option<usize>) -> Result<(), StoreError>;

    fn delete_sheet(&mut self, name: &str) -> Result<(), StoreError>;

    /// Highest row index holding a cell. Never below 1, even for an empty sheet.
    fn max_row(&self, sheet: &str) -> Result<u32, StoreError>;

    /// Read one cell; absent cells read as [`CellValue::Empty`].
    fn read_cell(
        &self,
        sheet: &str,
        column: ColumnAddress,
        row: u32,
    ) -> Result<CellValue, StoreError>;

    fn write_cell(
        &mut self,
        sheet: &str,
        column: ColumnAddress,
        row: u32,
        value: CellValue,
    ) -> Result<(), StoreError>;

    /// Delete a physical row; rows below it move up by one.
    fn delete_row(&mut self, sheet: &str, row: u32) -> Result<(), StoreError>;
}

/// Document lifecycle on top of [`GridStore`].
pub trait Document: GridStore + Sized {
    /// A fresh document with no sheets.
    fn create() -> Self;

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, StoreError>;

    fn save_path<P: AsRef<Path>>(&mut self, path: P) -> Result<(), StoreError>;
}
