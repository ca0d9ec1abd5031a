//! Record type declarations.
//!
//! A [`RecordType`] names the sheet that stores its rows and carries a
//! [`Schema`]: the attribute → column mapping, sorted by column index. Both are
//! built once through [`SchemaBuilder`] and shared by every record of the type.

use crate::error::{KwadroError, Result};
use crate::record::Record;
use kwadro_common::{CellValue, ColumnAddress, ColumnSpec};
use std::sync::Arc;

/// Ordered attribute name → column mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<(String, ColumnAddress)>,
}

impl Schema {
    /// Attribute names in column order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, column)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnAddress)> {
        self.columns.iter().map(|(name, col)| (name.as_str(), *col))
    }

    pub fn column(&self, name: &str) -> Option<ColumnAddress> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, col)| *col)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq)]
struct RecordTypeInner {
    title: String,
    schema: Schema,
}

/// A declared record type. Clones share the same declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordType {
    inner: Arc<RecordTypeInner>,
}

impl RecordType {
    /// Start declaring a type stored in the sheet named `title`.
    pub fn builder(title: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            title: title.into(),
            columns: Vec::new(),
        }
    }

    /// Sheet name holding this type's rows.
    pub fn title(&self) -> &str {
        &self.inner.title
    }

    pub fn schema(&self) -> &Schema {
        &self.inner.schema
    }

    /// Column backing `name`, or [`KwadroError::UnknownColumn`].
    pub fn column(&self, name: &str) -> Result<ColumnAddress> {
        self.schema()
            .column(name)
            .ok_or_else(|| KwadroError::UnknownColumn {
                table: self.title().to_string(),
                column: name.to_string(),
            })
    }

    /// A fresh, unbound record.
    pub fn record(&self) -> Record {
        Record::new(self)
    }

    /// A fresh, unbound record holding `values` in its local store.
    pub fn record_with<I, K, V>(&self, values: I) -> Record
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        let record = Record::new(self);
        for (name, value) in values {
            record.preset(name.into(), value.into());
        }
        record
    }
}

/// Collects column declarations for a [`RecordType`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    title: String,
    columns: Vec<(String, ColumnSpec)>,
}

impl SchemaBuilder {
    /// Bind attribute `name` to a column given as an index (`3`) or letters (`"C"`).
    pub fn column(mut self, name: impl Into<String>, column: impl Into<ColumnSpec>) -> Self {
        self.columns.push((name.into(), column.into()));
        self
    }

    /// Validate every declaration and freeze the schema.
    pub fn build(self) -> Result<RecordType> {
        let mut columns: Vec<(String, ColumnAddress)> = Vec::with_capacity(self.columns.len());
        for (name, spec) in self.columns {
            if columns.iter().any(|(n, _)| *n == name) {
                return Err(KwadroError::DuplicateColumn {
                    table: self.title,
                    column: name,
                });
            }
            columns.push((name, spec.resolve()?));
        }
        // Stable: attributes sharing a column keep declaration order.
        columns.sort_by_key(|(_, col)| *col);
        Ok(RecordType {
            inner: Arc::new(RecordTypeInner {
                title: self.title,
                schema: Schema { columns },
            }),
        })
    }
}
