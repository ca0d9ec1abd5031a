use super::memory::{MemorySheet, MemoryStore};
use crate::StoreError;
use crate::traits::{Document, GridStore};
use kwadro_common::{CellValue, ColumnAddress};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
struct JsonDocument {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    sheets: Vec<JsonSheet>,
}

fn default_version() -> u32 {
    1
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct JsonSheet {
    name: String,
    #[serde(default)]
    cells: Vec<JsonCell>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct JsonCell {
    row: u32,
    col: u32,
    value: JsonValue,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", content = "value")]
enum JsonValue {
    Boolean(bool),
    Int(i64),
    Number(f64),
    Text(String),
    Date(chrono::NaiveDate),
    DateTime(chrono::NaiveDateTime),
}

/// Grid document persisted as a JSON file.
///
/// Cells live in a [`MemoryStore`] while the document is open; the file is only
/// touched by [`Document::open_path`] and [`Document::save_path`].
#[derive(Debug, Clone, Default)]
pub struct JsonStore {
    inner: MemoryStore,
}

impl JsonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let doc: JsonDocument = serde_json::from_slice(bytes)?;
        Ok(Self::from_document(doc))
    }

    pub fn to_json_string(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn into_memory(self) -> MemoryStore {
        self.inner
    }

    fn from_document(doc: JsonDocument) -> Self {
        let sheets = doc
            .sheets
            .into_iter()
            .map(|js| MemorySheet {
                name: js.name,
                cells: js
                    .cells
                    .into_iter()
                    .map(|c| ((c.row, c.col), json_to_cell(c.value)))
                    .collect(),
            })
            .collect();
        Self {
            inner: MemoryStore::from_sheets(sheets),
        }
    }

    fn to_document(&self) -> JsonDocument {
        let sheets = self
            .inner
            .sheets()
            .iter()
            .map(|sheet| JsonSheet {
                name: sheet.name.clone(),
                cells: sheet
                    .cells
                    .iter()
                    .filter_map(|(&(row, col), v)| {
                        cell_to_json(v).map(|value| JsonCell { row, col, value })
                    })
                    .collect(),
            })
            .collect();
        JsonDocument {
            version: default_version(),
            sheets,
        }
    }
}

impl From<MemoryStore> for JsonStore {
    fn from(inner: MemoryStore) -> Self {
        Self { inner }
    }
}

impl GridStore for JsonStore {
    fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    fn sheet_exists(&self, sheet: &str) -> bool {
        self.inner.sheet_exists(sheet)
    }

    fn create_sheet(&mut self, name: &str, index: Option<usize>) -> Result<(), StoreError> {
        self.inner.create_sheet(name, index)
    }

    fn delete_sheet(&mut self, name: &str) -> Result<(), StoreError> {
        self.inner.delete_sheet(name)
    }

    fn max_row(&self, sheet: &str) -> Result<u32, StoreError> {
        self.inner.max_row(sheet)
    }

    fn read_cell(
        &self,
        sheet: &str,
        column: ColumnAddress,
        row: u32,
    ) -> Result<CellValue, StoreError> {
        self.inner.read_cell(sheet, column, row)
    }

    fn write_cell(
        &mut self,
        sheet: &str,
        column: ColumnAddress,
        row: u32,
        value: CellValue,
    ) -> Result<(), StoreError> {
        self.inner.write_cell(sheet, column, row, value)
    }

    fn delete_row(&mut self, sheet: &str, row: u32) -> Result<(), StoreError> {
        self.inner.delete_row(sheet, row)
    }
}

impl Document for JsonStore {
    fn create() -> Self {
        Self::new()
    }

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let file = File::open(path.as_ref())?;
        let doc: JsonDocument = serde_json::from_reader(BufReader::new(file))?;
        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.as_ref().display(), sheets = doc.sheets.len(), "opened json document");
        Ok(Self::from_document(doc))
    }

    fn save_path<P: AsRef<Path>>(&mut self, path: P) -> Result<(), StoreError> {
        let s = serde_json::to_string_pretty(&self.to_document())?;
        let mut file = File::create(path.as_ref())?;
        file.write_all(s.as_bytes())?;
        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.as_ref().display(), "saved json document");
        Ok(())
    }
}

fn cell_to_json(v: &CellValue) -> Option<JsonValue> {
    Some(match v {
        CellValue::Empty => return None,
        CellValue::Boolean(b) => JsonValue::Boolean(*b),
        CellValue::Int(i) => JsonValue::Int(*i),
        CellValue::Number(n) => JsonValue::Number(*n),
        CellValue::Text(s) => JsonValue::Text(s.clone()),
        CellValue::Date(d) => JsonValue::Date(*d),
        CellValue::DateTime(dt) => JsonValue::DateTime(*dt),
    })
}

fn json_to_cell(v: JsonValue) -> CellValue {
    match v {
        JsonValue::Boolean(b) => CellValue::Boolean(b),
        JsonValue::Int(i) => CellValue::Int(i),
        JsonValue::Number(n) => CellValue::Number(n),
        JsonValue::Text(s) => CellValue::Text(s),
        JsonValue::Date(d) => CellValue::Date(d),
        JsonValue::DateTime(dt) => CellValue::DateTime(dt),
    }
}
