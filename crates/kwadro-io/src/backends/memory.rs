use crate::StoreError;
use crate::traits::{Document, GridStore};
use kwadro_common::{CellValue, ColumnAddress};
use std::collections::BTreeMap;
use std::path::Path;

/// A named sheet: sparse cells keyed by `(row, col)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySheet {
    pub name: String,
    pub cells: BTreeMap<(u32, u32), CellValue>,
}

impl MemorySheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }
}

/// In-process grid document. Sheets keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    sheets: Vec<MemorySheet>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sheets(sheets: Vec<MemorySheet>) -> Self {
        Self { sheets }
    }

    pub fn sheets(&self) -> &[MemorySheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    fn sheet_mut(&mut self, name: &str) -> Result<&mut MemorySheet, StoreError> {
        self.sheets
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| StoreError::SheetNotFound(name.to_string()))
    }

    fn require(&self, name: &str) -> Result<&MemorySheet, StoreError> {
        self.sheet(name)
            .ok_or_else(|| StoreError::SheetNotFound(name.to_string()))
    }
}

impl GridStore for MemoryStore {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn sheet_exists(&self, sheet: &str) -> bool {
        self.sheet(sheet).is_some()
    }

    fn create_sheet(&mut self, name: &str, index: Option<usize>) -> Result<(), StoreError> {
        if self.sheet_exists(name) {
            return Ok(());
        }
        let at = index
            .unwrap_or(self.sheets.len())
            .min(self.sheets.len());
        self.sheets.insert(at, MemorySheet::new(name));
        Ok(())
    }

    fn delete_sheet(&mut self, name: &str) -> Result<(), StoreError> {
        self.sheets.retain(|s| s.name != name);
        Ok(())
    }

    fn max_row(&self, sheet: &str) -> Result<u32, StoreError> {
        let sheet = self.require(sheet)?;
        let last = sheet.cells.keys().map(|&(row, _)| row).max().unwrap_or(0);
        Ok(last.max(1))
    }

    fn read_cell(
        &self,
        sheet: &str,
        column: ColumnAddress,
        row: u32,
    ) -> Result<CellValue, StoreError> {
        if row == 0 {
            return Err(StoreError::InvalidRow);
        }
        let sheet = self.require(sheet)?;
        Ok(sheet
            .cells
            .get(&(row, column.index()))
            .cloned()
            .unwrap_or(CellValue::Empty))
    }

    fn write_cell(
        &mut self,
        sheet: &str,
        column: ColumnAddress,
        row: u32,
        value: CellValue,
    ) -> Result<(), StoreError> {
        if row == 0 {
            return Err(StoreError::InvalidRow);
        }
        let sheet = self.sheet_mut(sheet)?;
        let key = (row, column.index());
        if matches!(value, CellValue::Empty) {
            sheet.cells.remove(&key);
        } else {
            sheet.cells.insert(key, value);
        }
        Ok(())
    }

    fn delete_row(&mut self, sheet: &str, row: u32) -> Result<(), StoreError> {
        if row == 0 {
            return Err(StoreError::InvalidRow);
        }
        let sheet = self.sheet_mut(sheet)?;
        let cells = std::mem::take(&mut sheet.cells);
        sheet.cells = cells
            .into_iter()
            .filter(|&((r, _), _)| r != row)
            .map(|((r, c), v)| if r > row { ((r - 1, c), v) } else { ((r, c), v) })
            .collect();
        Ok(())
    }
}

impl Document for MemoryStore {
    fn create() -> Self {
        Self::new()
    }

    fn open_path<P: AsRef<Path>>(_path: P) -> Result<Self, StoreError> {
        Err(StoreError::Unsupported("opening a file"))
    }

    fn save_path<P: AsRef<Path>>(&mut self, _path: P) -> Result<(), StoreError> {
        Err(StoreError::Unsupported("saving to a file"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(letters: &str) -> ColumnAddress {
        ColumnAddress::parse(letters).unwrap()
    }

    #[test]
    fn empty_sheet_reports_row_one() {
        let mut store = MemoryStore::new();
        store.create_sheet("Clients", None).unwrap();
        assert_eq!(store.max_row("Clients").unwrap(), 1);
        assert!(matches!(
            store.max_row("Missing"),
            Err(StoreError::SheetNotFound(name)) if name == "Missing"
        ));
    }

    #[test]
    fn create_sheet_honours_index() {
        let mut store = MemoryStore::new();
        store.create_sheet("B", None).unwrap();
        store.create_sheet("A", Some(0)).unwrap();
        store.create_sheet("C", Some(99)).unwrap();
        store.create_sheet("A", None).unwrap();
        assert_eq!(store.sheet_names(), vec!["A", "B", "C"]);
    }

    #[test]
    fn write_read_and_clear() {
        let mut store = MemoryStore::new();
        store.create_sheet("S", None).unwrap();
        store.write_cell("S", col("C"), 4, "x".into()).unwrap();
        assert_eq!(store.read_cell("S", col("C"), 4).unwrap(), CellValue::from("x"));
        assert_eq!(store.max_row("S").unwrap(), 4);
        store.write_cell("S", col("C"), 4, CellValue::Empty).unwrap();
        assert_eq!(store.read_cell("S", col("C"), 4).unwrap(), CellValue::Empty);
        assert_eq!(store.max_row("S").unwrap(), 1);
    }

    #[test]
    fn delete_row_shifts_cells_up() {
        let mut store = MemoryStore::new();
        store.create_sheet("S", None).unwrap();
        for row in 1..=3 {
            store.write_cell("S", col("A"), row, (row as i64).into()).unwrap();
        }
        store.delete_row("S", 2).unwrap();
        assert_eq!(store.read_cell("S", col("A"), 1).unwrap(), CellValue::Int(1));
        assert_eq!(store.read_cell("S", col("A"), 2).unwrap(), CellValue::Int(3));
        assert_eq!(store.max_row("S").unwrap(), 2);
    }

    #[test]
    fn row_zero_rejected() {
        let mut store = MemoryStore::new();
        store.create_sheet("S", None).unwrap();
        assert!(matches!(
            store.read_cell("S", col("A"), 0),
            Err(StoreError::InvalidRow)
        ));
    }
}
