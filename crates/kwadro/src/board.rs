//! The board: owner of a grid store and of the identity map that guarantees a
//! single live [`Record`] per `(sheet, row)`.

use crate::config::BoardConfig;
use crate::error::{KwadroError, Result};
use crate::filter::Filter;
use crate::record::{Binding, BoardId, Record, SharedStore};
use crate::schema::RecordType;
use kwadro_io::{Document, GridStore};
use rustc_hash::FxHashMap;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BOARD_ID: AtomicU64 = AtomicU64::new(1);

/// Identity-map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey {
    pub sheet: String,
    pub row: u32,
}

impl RowKey {
    pub fn new(sheet: impl Into<String>, row: u32) -> Self {
        Self {
            sheet: sheet.into(),
            row,
        }
    }
}

/// What a search scans: every row of a type, or the rows of records already
/// in hand.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Type(&'a RecordType),
    Records(&'a [Record]),
}

impl<'a> From<&'a RecordType> for Source<'a> {
    fn from(value: &'a RecordType) -> Self {
        Source::Type(value)
    }
}

impl<'a> From<&'a [Record]> for Source<'a> {
    fn from(value: &'a [Record]) -> Self {
        Source::Records(value)
    }
}

impl<'a> From<&'a Vec<Record>> for Source<'a> {
    fn from(value: &'a Vec<Record>) -> Self {
        Source::Records(value.as_slice())
    }
}

/// Maps records onto the rows of a grid store.
///
/// All operations take `&self`; the board is single-threaded and relies on
/// interior mutability so that records handed out earlier stay usable while
/// the board keeps working.
pub struct Board<S: GridStore + 'static> {
    id: BoardId,
    store: Rc<RefCell<S>>,
    entries: RefCell<FxHashMap<RowKey, Record>>,
    config: BoardConfig,
    path: Option<PathBuf>,
}

impl<S: GridStore + 'static> Board<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, BoardConfig::default())
    }

    pub fn with_config(store: S, config: BoardConfig) -> Self {
        Self {
            id: BoardId(NEXT_BOARD_ID.fetch_add(1, Ordering::Relaxed)),
            store: Rc::new(RefCell::new(store)),
            entries: RefCell::new(FxHashMap::default()),
            config,
            path: None,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// File the board was opened from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn store(&self) -> Ref<'_, S> {
        self.store.borrow()
    }

    /// Direct mutable access to the store, bypassing records and the identity map.
    pub fn with_store_mut<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.store.borrow_mut())
    }

    /// Number of live identity-map entries.
    pub fn cached_rows(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn has_sheet(&self, record_type: &RecordType) -> bool {
        self.store.borrow().sheet_exists(record_type.title())
    }

    /// Create the sheet for `record_type` if it is missing.
    ///
    /// With `force_new`, an existing sheet is dropped first together with every
    /// record the board handed out for it.
    pub fn create_sheet(
        &self,
        record_type: &RecordType,
        index: Option<usize>,
        force_new: bool,
    ) -> Result<()> {
        let title = record_type.title();
        if force_new && self.has_sheet(record_type) {
            self.store.borrow_mut().delete_sheet(title)?;
            self.evict_sheet(title);
        }
        if !self.has_sheet(record_type) {
            self.store.borrow_mut().create_sheet(title, index)?;
            #[cfg(feature = "tracing")]
            tracing::debug!(sheet = title, ?index, "created sheet");
        }
        Ok(())
    }

    /// Delete the sheet for `record_type` and forget its records.
    pub fn delete_sheet(&self, record_type: &RecordType) -> Result<()> {
        let title = record_type.title();
        self.store.borrow_mut().delete_sheet(title)?;
        self.evict_sheet(title);
        Ok(())
    }

    /// The record bound to `row` of `record_type`'s sheet, minted on first use.
    ///
    /// Repeated calls return the same record until it is removed. No cell is
    /// read here.
    pub fn get(&self, record_type: &RecordType, row: u32) -> Result<Record> {
        if row == 0 {
            return Err(KwadroError::InvalidRow);
        }
        self.require_sheet(record_type)?;
        let key = RowKey::new(record_type.title(), row);
        if let Some(record) = self.entries.borrow().get(&key) {
            return Ok(record.clone());
        }
        let record = Record::new(record_type);
        record.bind(self.binding(record_type, row))?;
        self.entries.borrow_mut().insert(key, record.clone());
        Ok(record)
    }

    /// Append an unbound record after the last non-empty row and write its
    /// schema attributes, in column order. Returns the row it landed on.
    ///
    /// Attributes that were never set are left untouched. A record previously
    /// handed out for the target row is replaced in the identity map.
    pub fn add(&self, record: &Record) -> Result<u32> {
        let record_type = record.record_type().clone();
        if let Some(row) = record.row() {
            return Err(KwadroError::AlreadyBound {
                table: record_type.title().to_string(),
                row,
            });
        }
        self.require_sheet(&record_type)?;
        let title = record_type.title();
        let row = self.last_row(&record_type)? + 1;
        record.bind(self.binding(&record_type, row))?;
        for (name, column) in record_type.schema().iter() {
            if let Some(value) = record.cached(name) {
                self.store
                    .borrow_mut()
                    .write_cell(title, column, row, value)?;
            }
        }
        self.entries
            .borrow_mut()
            .insert(RowKey::new(title, row), record.clone());
        #[cfg(feature = "tracing")]
        tracing::debug!(sheet = title, row, "added record");
        Ok(row)
    }

    /// [`create_sheet`](Self::create_sheet) for the record's type, then [`add`](Self::add).
    pub fn create_and_add(
        &self,
        record: &Record,
        index: Option<usize>,
        force_new: bool,
    ) -> Result<u32> {
        self.create_sheet(record.record_type(), index, force_new)?;
        self.add(record)
    }

    /// Delete the record's physical row and forget the record.
    ///
    /// The record keeps its binding; further use of it addresses whatever row
    /// now sits at that index.
    pub fn remove(&self, record: &Record) -> Result<()> {
        let table = record.record_type().title();
        let binding = record.binding().ok_or_else(|| KwadroError::NotBound {
            table: table.to_string(),
        })?;
        if binding.board != self.id {
            return Err(KwadroError::ForeignRecord {
                table: table.to_string(),
            });
        }
        self.store
            .borrow_mut()
            .delete_row(&binding.sheet, binding.row)?;
        self.entries
            .borrow_mut()
            .remove(&RowKey::new(binding.sheet.as_str(), binding.row));
        #[cfg(feature = "tracing")]
        tracing::debug!(sheet = binding.sheet.as_str(), row = binding.row, "removed record");
        Ok(())
    }

    /// Index of the last non-empty row, `0` for an empty sheet.
    ///
    /// Stores never report fewer than one row, so a single reported row is
    /// checked: it only counts when some schema attribute is non-empty. Larger
    /// counts are trusted as reported.
    pub fn last_row(&self, record_type: &RecordType) -> Result<u32> {
        self.require_sheet(record_type)?;
        let max_row = self.store.borrow().max_row(record_type.title())?;
        if max_row != 1 {
            return Ok(max_row);
        }
        // Cells are read directly; no row-1 record is minted here.
        let store = self.store.borrow();
        for (_, column) in record_type.schema().iter() {
            if !store.read_cell(record_type.title(), column, 1)?.is_empty() {
                return Ok(1);
            }
        }
        Ok(0)
    }

    /// First record matching `filter`, by row order for a type and by list
    /// order for records.
    pub fn find<'a>(
        &'a self,
        source: impl Into<Source<'a>>,
        filter: &'a Filter,
    ) -> Result<Option<Record>> {
        self.find_all(source, filter)?.next().transpose()
    }

    /// Lazily yield every record matching `filter`.
    ///
    /// A list of records searched with an empty filter is returned as is,
    /// without touching the store.
    pub fn find_all<'a>(
        &'a self,
        source: impl Into<Source<'a>>,
        filter: &'a Filter,
    ) -> Result<FindAll<'a, S>> {
        let source = source.into();
        if let Source::Records(records) = source {
            if filter.is_empty() {
                return Ok(FindAll::verbatim(records.to_vec()));
            }
        }
        let Some((record_type, rows)) = self.candidates(source)? else {
            return Ok(FindAll::verbatim(Vec::new()));
        };
        if self.config.strict_filters {
            for name in filter.names() {
                record_type.column(name)?;
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            sheet = record_type.title(),
            conditions = filter.len(),
            "scanning rows"
        );
        Ok(FindAll::scan(self.find_rows(record_type, rows, filter)))
    }

    fn find_rows<'a>(
        &'a self,
        record_type: RecordType,
        rows: Candidates,
        filter: &'a Filter,
    ) -> FindRows<'a, S> {
        FindRows {
            board: self,
            record_type,
            rows,
            filter,
        }
    }

    fn candidates(&self, source: Source<'_>) -> Result<Option<(RecordType, Candidates)>> {
        match source {
            Source::Type(record_type) => {
                let last = self.last_row(record_type)?;
                Ok(Some((record_type.clone(), Candidates::Range(1..=last))))
            }
            Source::Records(records) => {
                let Some(first) = records.first() else {
                    return Ok(None);
                };
                let rows = records
                    .iter()
                    .map(|record| {
                        record.row().ok_or_else(|| KwadroError::NotBound {
                            table: record.record_type().title().to_string(),
                        })
                    })
                    .collect::<Result<Vec<u32>>>()?;
                Ok(Some((
                    first.record_type().clone(),
                    Candidates::Listed(rows.into_iter()),
                )))
            }
        }
    }

    fn row_matches(&self, record_type: &RecordType, row: u32, filter: &Filter) -> Result<bool> {
        if filter.is_empty() {
            return Ok(true);
        }
        let record = self.get(record_type, row)?;
        for (name, expected) in filter.iter() {
            if !record_type.schema().contains(name) {
                return Ok(false);
            }
            if !record.get(name)?.matches(expected) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn require_sheet(&self, record_type: &RecordType) -> Result<()> {
        if self.has_sheet(record_type) {
            Ok(())
        } else {
            Err(KwadroError::MissingSheet(record_type.title().to_string()))
        }
    }

    fn binding(&self, record_type: &RecordType, row: u32) -> Binding {
        let store: SharedStore = self.store.clone();
        Binding {
            sheet: record_type.title().to_string(),
            row,
            board: self.id,
            store,
        }
    }

    fn evict_sheet(&self, sheet: &str) {
        self.entries.borrow_mut().retain(|key, _| key.sheet != sheet);
    }
}

impl<S: Document + 'static> Board<S> {
    /// Open `path`, or start an empty document when the file does not exist
    /// or `config.force_new` is set. The path is remembered for
    /// [`save_in_place`](Self::save_in_place).
    pub fn open(path: impl AsRef<Path>, config: BoardConfig) -> Result<Self> {
        let path = path.as_ref();
        let store = if config.force_new || !path.exists() {
            S::create()
        } else {
            S::open_path(path)?
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), force_new = config.force_new, "opened board");
        let mut board = Self::with_config(store, config);
        board.path = Some(path.to_path_buf());
        Ok(board)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.store.borrow_mut().save_path(path)?;
        Ok(())
    }

    /// Save back to the file the board was opened from.
    pub fn save_in_place(&self) -> Result<()> {
        let path = self.path.as_deref().ok_or(KwadroError::NoPath)?;
        self.save(path)
    }
}

impl<S: GridStore + 'static> fmt::Debug for Board<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("id", &self.id)
            .field("cached_rows", &self.cached_rows())
            .field("config", &self.config)
            .field("path", &self.path)
            .finish()
    }
}

enum Candidates {
    Range(RangeInclusive<u32>),
    Listed(std::vec::IntoIter<u32>),
}

impl Iterator for Candidates {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        match self {
            Candidates::Range(rows) => rows.next(),
            Candidates::Listed(rows) => rows.next(),
        }
    }
}

/// Rows whose record satisfies every condition of a filter.
struct FindRows<'a, S: GridStore + 'static> {
    board: &'a Board<S>,
    record_type: RecordType,
    rows: Candidates,
    filter: &'a Filter,
}

impl<S: GridStore + 'static> Iterator for FindRows<'_, S> {
    type Item = Result<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        for row in self.rows.by_ref() {
            match self.board.row_matches(&self.record_type, row, self.filter) {
                Ok(true) => return Some(Ok(row)),
                Ok(false) => {}
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }
}

/// Lazy result of [`Board::find_all`].
pub struct FindAll<'a, S: GridStore + 'static> {
    inner: FindAllInner<'a, S>,
}

enum FindAllInner<'a, S: GridStore + 'static> {
    Verbatim(std::vec::IntoIter<Record>),
    Scan(FindRows<'a, S>),
}

impl<'a, S: GridStore + 'static> FindAll<'a, S> {
    fn verbatim(records: Vec<Record>) -> Self {
        Self {
            inner: FindAllInner::Verbatim(records.into_iter()),
        }
    }

    fn scan(rows: FindRows<'a, S>) -> Self {
        Self {
            inner: FindAllInner::Scan(rows),
        }
    }
}

impl<S: GridStore + 'static> Iterator for FindAll<'_, S> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            FindAllInner::Verbatim(records) => records.next().map(Ok),
            FindAllInner::Scan(rows) => {
                let row = rows.next()?;
                Some(row.and_then(|row| rows.board.get(&rows.record_type, row)))
            }
        }
    }
}
