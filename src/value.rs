use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;
use std::fmt::Write as _;

use crate::error::SqliteDbError;

/// Values that can be bound as query parameters or read back from a row.
///
/// One enum for both directions so helper code never branches on driver
/// types:
/// ```rust
/// use sqlite_session::SqlValue;
///
/// let params = vec![
///     SqlValue::Int(1),
///     SqlValue::Text("alice".into()),
///     SqlValue::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value (stored as 0/1)
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value (stored as serialized text)
    Json(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
    /// A list of scalars. Usable for display interpolation of IN (...)
    /// predicates, never bindable as a single placeholder.
    List(Vec<SqlValue>),
}

impl SqlValue {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        if let SqlValue::Int(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let SqlValue::Float(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let SqlValue::Text(v) = self { Some(v) } else { None }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(v) => Some(*v),
            SqlValue::Int(0) => Some(false),
            SqlValue::Int(1) => Some(true),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let SqlValue::Blob(v) = self { Some(v) } else { None }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            SqlValue::Timestamp(v) => Some(*v),
            SqlValue::Text(s) => {
                // Accept the two formats SQLite text timestamps commonly use.
                NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                    .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
                    .ok()
            }
            _ => None,
        }
    }
}

impl From<rusqlite::types::Value> for SqlValue {
    fn from(value: rusqlite::types::Value) -> Self {
        match value {
            rusqlite::types::Value::Null => SqlValue::Null,
            rusqlite::types::Value::Integer(i) => SqlValue::Int(i),
            rusqlite::types::Value::Real(f) => SqlValue::Float(f),
            rusqlite::types::Value::Text(s) => SqlValue::Text(s),
            rusqlite::types::Value::Blob(b) => SqlValue::Blob(b),
        }
    }
}

/// Convert a single `SqlValue` into a driver value for binding.
///
/// # Errors
///
/// Returns `SqliteDbError::Execution` for `SqlValue::List`, which has no
/// single-placeholder representation (expand it with
/// [`build_in_clause`](crate::build_in_clause) instead).
pub(crate) fn to_driver_value(value: &SqlValue) -> Result<rusqlite::types::Value, SqliteDbError> {
    match value {
        SqlValue::Int(i) => Ok(rusqlite::types::Value::Integer(*i)),
        SqlValue::Float(f) => Ok(rusqlite::types::Value::Real(*f)),
        SqlValue::Text(s) => Ok(rusqlite::types::Value::Text(s.clone())),
        SqlValue::Bool(b) => Ok(rusqlite::types::Value::Integer(i64::from(*b))),
        SqlValue::Timestamp(dt) => {
            let mut buf = String::with_capacity(32);
            // Always succeeds when writing into a String.
            let _ = write!(buf, "{}", dt.format("%F %T%.f"));
            Ok(rusqlite::types::Value::Text(buf))
        }
        SqlValue::Null => Ok(rusqlite::types::Value::Null),
        SqlValue::Json(jval) => Ok(rusqlite::types::Value::Text(jval.to_string())),
        SqlValue::Blob(bytes) => Ok(rusqlite::types::Value::Blob(bytes.clone())),
        SqlValue::List(_) => Err(SqliteDbError::execution_msg(
            "list values cannot be bound to a single placeholder; expand with build_in_clause",
        )),
    }
}
