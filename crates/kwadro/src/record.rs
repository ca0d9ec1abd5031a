//! Records: rows viewed as objects.
//!
//! A record starts unbound and keeps attribute values in a local store. Once a
//! [`Board`](crate::Board) binds it to a `(sheet, row)`, schema attributes read
//! and write the backing cells directly; every read goes to the grid store and
//! refreshes the local copy.

use crate::error::{KwadroError, Result};
use crate::schema::RecordType;
use kwadro_common::CellValue;
use kwadro_io::GridStore;
use rustc_hash::FxHashMap;
use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;

pub(crate) type SharedStore = Rc<RefCell<dyn GridStore>>;

/// Identifies the board that minted a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct BoardId(pub(crate) u64);

pub(crate) struct Binding {
    pub(crate) sheet: String,
    pub(crate) row: u32,
    pub(crate) board: BoardId,
    pub(crate) store: SharedStore,
}

struct RecordState {
    record_type: RecordType,
    binding: OnceCell<Binding>,
    values: RefCell<FxHashMap<String, CellValue>>,
}

/// Shared handle to a record. Clones refer to the same record.
#[derive(Clone)]
pub struct Record {
    state: Rc<RecordState>,
}

impl Record {
    pub fn new(record_type: &RecordType) -> Self {
        Self {
            state: Rc::new(RecordState {
                record_type: record_type.clone(),
                binding: OnceCell::new(),
                values: RefCell::new(FxHashMap::default()),
            }),
        }
    }

    pub fn record_type(&self) -> &RecordType {
        &self.state.record_type
    }

    pub fn is_bound(&self) -> bool {
        self.state.binding.get().is_some()
    }

    /// Bound row, if any.
    pub fn row(&self) -> Option<u32> {
        self.binding().map(|b| b.row)
    }

    /// Bound sheet name, if any.
    pub fn sheet(&self) -> Option<&str> {
        self.binding().map(|b| b.sheet.as_str())
    }

    /// `true` when both handles refer to the same record.
    pub fn ptr_eq(a: &Record, b: &Record) -> bool {
        Rc::ptr_eq(&a.state, &b.state)
    }

    /// Read an attribute.
    ///
    /// Schema attributes of a bound record come from the grid store; anything
    /// else comes from the local store.
    pub fn get(&self, name: &str) -> Result<CellValue> {
        if let (Some(binding), Some(column)) =
            (self.binding(), self.record_type().schema().column(name))
        {
            let value = binding
                .store
                .borrow()
                .read_cell(&binding.sheet, column, binding.row)?;
            self.state
                .values
                .borrow_mut()
                .insert(name.to_string(), value.clone());
            return Ok(value);
        }
        self.cached(name)
            .ok_or_else(|| KwadroError::AttributeNotSet {
                table: self.record_type().title().to_string(),
                attribute: name.to_string(),
            })
    }

    /// Write an attribute. The local store is always updated; schema
    /// attributes of a bound record are also written to their cell.
    pub fn set(&self, name: &str, value: impl Into<CellValue>) -> Result<()> {
        let value = value.into();
        self.state
            .values
            .borrow_mut()
            .insert(name.to_string(), value.clone());
        if let (Some(binding), Some(column)) =
            (self.binding(), self.record_type().schema().column(name))
        {
            binding
                .store
                .borrow_mut()
                .write_cell(&binding.sheet, column, binding.row, value)?;
        }
        Ok(())
    }

    /// Last value held locally, without touching the grid store.
    pub fn cached(&self, name: &str) -> Option<CellValue> {
        self.state.values.borrow().get(name).cloned()
    }

    pub(crate) fn preset(&self, name: String, value: CellValue) {
        self.state.values.borrow_mut().insert(name, value);
    }

    pub(crate) fn binding(&self) -> Option<&Binding> {
        self.state.binding.get()
    }

    pub(crate) fn bind(&self, binding: Binding) -> Result<()> {
        let row = binding.row;
        self.state
            .binding
            .set(binding)
            .map_err(|_| KwadroError::AlreadyBound {
                table: self.record_type().title().to_string(),
                row: self.row().unwrap_or(row),
            })
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("table", &self.record_type().title())
            .field("sheet", &self.sheet())
            .field("row", &self.row())
            .field("values", &self.state.values.borrow())
            .finish()
    }
}
