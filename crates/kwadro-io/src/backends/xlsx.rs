#![cfg(feature = "xlsx")]

use crate::StoreError;
use crate::traits::{Document, GridStore};
use kwadro_common::{CellValue, ColumnAddress};
use std::path::Path;
use umya_spreadsheet::{
    CellRawValue, CellValue as UmyaValue, Spreadsheet, Worksheet, reader, writer,
};

/// `.xlsx` document backed by umya-spreadsheet.
///
/// Sheet creation always appends; the `index` hint is ignored. Dates are
/// written as ISO text and read back as [`CellValue::Text`].
pub struct XlsxStore {
    book: Spreadsheet,
}

impl Default for XlsxStore {
    fn default() -> Self {
        Self::new()
    }
}

impl XlsxStore {
    pub fn new() -> Self {
        Self {
            book: umya_spreadsheet::new_file_empty_worksheet(),
        }
    }

    pub fn spreadsheet(&self) -> &Spreadsheet {
        &self.book
    }

    fn sheet(&self, name: &str) -> Result<&Worksheet, StoreError> {
        self.book
            .get_sheet_by_name(name)
            .ok_or_else(|| StoreError::SheetNotFound(name.to_string()))
    }

    fn sheet_mut(&mut self, name: &str) -> Result<&mut Worksheet, StoreError> {
        self.book
            .get_sheet_by_name_mut(name)
            .ok_or_else(|| StoreError::SheetNotFound(name.to_string()))
    }

    fn convert_value(cv: &UmyaValue) -> CellValue {
        let raw = cv.get_raw_value();
        if raw.is_error() {
            return CellValue::Text(cv.get_value().to_string());
        }
        match raw {
            CellRawValue::Numeric(n) => CellValue::Number(*n),
            CellRawValue::Bool(b) => CellValue::Boolean(*b),
            CellRawValue::String(s) => CellValue::Text(s.to_string()),
            CellRawValue::RichText(rt) => CellValue::Text(rt.get_text().to_string()),
            CellRawValue::Lazy(s) => {
                let txt = s.as_ref();
                if let Ok(n) = txt.parse::<f64>() {
                    CellValue::Number(n)
                } else if txt.eq_ignore_ascii_case("TRUE") {
                    CellValue::Boolean(true)
                } else if txt.eq_ignore_ascii_case("FALSE") {
                    CellValue::Boolean(false)
                } else {
                    CellValue::Text(txt.to_string())
                }
            }
            CellRawValue::Error(_) | CellRawValue::Empty => CellValue::Empty,
        }
    }
}

impl GridStore for XlsxStore {
    fn sheet_names(&self) -> Vec<String> {
        let count = self.book.get_sheet_count();
        (0..count)
            .filter_map(|i| self.book.get_sheet(&i))
            .map(|ws| ws.get_name().to_string())
            .collect()
    }

    fn sheet_exists(&self, sheet: &str) -> bool {
        self.book.get_sheet_by_name(sheet).is_some()
    }

    fn create_sheet(&mut self, name: &str, _index: Option<usize>) -> Result<(), StoreError> {
        if self.sheet_exists(name) {
            return Ok(());
        }
        self.book
            .new_sheet(name)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    fn delete_sheet(&mut self, name: &str) -> Result<(), StoreError> {
        if !self.sheet_exists(name) {
            return Ok(());
        }
        self.book
            .remove_sheet_by_name(name)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn max_row(&self, sheet: &str) -> Result<u32, StoreError> {
        let ws = self.sheet(sheet)?;
        let last = ws
            .get_cell_collection()
            .iter()
            .map(|cell| *cell.get_coordinate().get_row_num())
            .max()
            .unwrap_or(0);
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
        let ws = self.sheet(sheet)?;
        // umya uses (col, row)
        Ok(ws
            .get_cell((column.index(), row))
            .map(|cell| Self::convert_value(cell.get_cell_value()))
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
        let ws = self.sheet_mut(sheet)?;
        let cell = ws.get_cell_mut((column.index(), row));
        match value {
            CellValue::Empty => {
                cell.set_blank();
            }
            CellValue::Boolean(b) => {
                cell.set_value_bool(b);
            }
            CellValue::Int(i) => {
                cell.set_value_number(i as f64);
            }
            CellValue::Number(n) => {
                cell.set_value_number(n);
            }
            // Text is stored verbatim, never re-typed.
            CellValue::Text(s) => {
                cell.set_value_string(s);
            }
            CellValue::Date(d) => {
                cell.set_value_string(d.to_string());
            }
            CellValue::DateTime(dt) => {
                cell.set_value_string(dt.to_string());
            }
        }
        Ok(())
    }

    fn delete_row(&mut self, sheet: &str, row: u32) -> Result<(), StoreError> {
        if row == 0 {
            return Err(StoreError::InvalidRow);
        }
        self.sheet_mut(sheet)?.remove_row(&row, &1);
        Ok(())
    }
}

impl Document for XlsxStore {
    fn create() -> Self {
        Self::new()
    }

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let book = reader::xlsx::read(path.as_ref())?;
        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.as_ref().display(), "opened xlsx document");
        Ok(Self { book })
    }

    fn save_path<P: AsRef<Path>>(&mut self, path: P) -> Result<(), StoreError> {
        writer::xlsx::write(&self.book, path.as_ref())?;
        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.as_ref().display(), "saved xlsx document");
        Ok(())
    }
}
