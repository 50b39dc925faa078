use std::sync::Arc;

use rusqlite::CachedStatement;

use crate::error::SqliteDbError;
use crate::value::SqlValue;

/// A single result row: column names (shared across all rows of one result)
/// plus the values in driver-return order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlRow {
    columns: Arc<Vec<String>>,
    values: Vec<SqlValue>,
}

impl SqlRow {
    pub(crate) fn new(columns: Arc<Vec<String>>, values: Vec<SqlValue>) -> Self {
        Self { columns, values }
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Value of the named column, `None` if the column does not exist.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        let idx = self.columns.iter().position(|name| name == column)?;
        self.values.get(idx)
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Handle to a statement after [`execute`](crate::SqliteSession::execute).
///
/// For DML (no result columns) the statement has already run to completion
/// and [`rows_affected`](Self::rows_affected) is populated. For statements
/// with result columns a cursor is pending: the first [`rows`](Self::rows)
/// call takes it; rows are pulled lazily from the driver as the iterator
/// advances. The cursor is forward-only and single-pass — a second `rows()`
/// call yields an empty iterator, re-iterating requires re-executing.
pub struct ExecutedStatement<'conn> {
    stmt: CachedStatement<'conn>,
    columns: Arc<Vec<String>>,
    rows_affected: usize,
    cursor_open: bool,
}

impl<'conn> ExecutedStatement<'conn> {
    pub(crate) fn new(
        stmt: CachedStatement<'conn>,
        columns: Arc<Vec<String>>,
        rows_affected: usize,
        cursor_open: bool,
    ) -> Self {
        Self {
            stmt,
            columns,
            rows_affected,
            cursor_open,
        }
    }

    /// Lazy iterator over the result rows.
    pub fn rows(&mut self) -> RowIter<'_> {
        if !self.cursor_open {
            return RowIter {
                rows: None,
                columns: Arc::clone(&self.columns),
            };
        }
        self.cursor_open = false;
        RowIter {
            rows: Some(self.stmt.raw_query()),
            columns: Arc::clone(&self.columns),
        }
    }

    /// Rows changed by a DML statement; 0 for statements returning rows.
    #[must_use]
    pub fn rows_affected(&self) -> usize {
        self.rows_affected
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }
}

impl std::fmt::Debug for ExecutedStatement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutedStatement")
            .field("columns", &self.columns)
            .field("rows_affected", &self.rows_affected)
            .field("cursor_open", &self.cursor_open)
            .finish_non_exhaustive()
    }
}

/// Forward-only row iterator. Exhausts once; errors while stepping surface as
/// `Err` items and end the iteration.
pub struct RowIter<'stmt> {
    rows: Option<rusqlite::Rows<'stmt>>,
    columns: Arc<Vec<String>>,
}

impl Iterator for RowIter<'_> {
    type Item = Result<SqlRow, SqliteDbError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rows = self.rows.as_mut()?;
        match rows.next() {
            Ok(Some(row)) => {
                let mut values = Vec::with_capacity(self.columns.len());
                for idx in 0..self.columns.len() {
                    match row.get::<_, rusqlite::types::Value>(idx) {
                        Ok(value) => values.push(SqlValue::from(value)),
                        Err(e) => {
                            self.rows = None;
                            return Some(Err(SqliteDbError::execution(&e)));
                        }
                    }
                }
                Some(Ok(SqlRow::new(Arc::clone(&self.columns), values)))
            }
            Ok(None) => {
                self.rows = None;
                None
            }
            Err(e) => {
                self.rows = None;
                Some(Err(SqliteDbError::execution(&e)))
            }
        }
    }
}
