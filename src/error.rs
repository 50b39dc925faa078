use thiserror::Error;

/// Domain error for every driver-level failure.
///
/// Callers get one error type regardless of which underlying operation
/// failed; the variant says where it failed, `message`/`code` carry what the
/// driver reported. `code` is the extended SQLite result code, or 0 when the
/// failure did not originate in the SQLite library itself (e.g. a type
/// conversion inside rusqlite).
#[derive(Debug, Error)]
pub enum SqliteDbError {
    #[error("connection error: {message} (code {code})")]
    Connection { message: String, code: i32 },

    #[error("statement error: {message} (code {code})")]
    Statement { message: String, code: i32 },

    #[error("execution error: {message} (code {code})")]
    Execution { message: String, code: i32 },

    #[error("transaction error: {message} (code {code})")]
    Transaction { message: String, code: i32 },
}

impl SqliteDbError {
    pub(crate) fn connection(err: &rusqlite::Error) -> Self {
        SqliteDbError::Connection {
            message: err.to_string(),
            code: driver_code(err),
        }
    }

    pub(crate) fn statement(err: &rusqlite::Error) -> Self {
        SqliteDbError::Statement {
            message: err.to_string(),
            code: driver_code(err),
        }
    }

    pub(crate) fn execution(err: &rusqlite::Error) -> Self {
        SqliteDbError::Execution {
            message: err.to_string(),
            code: driver_code(err),
        }
    }

    pub(crate) fn execution_msg(message: impl Into<String>) -> Self {
        SqliteDbError::Execution {
            message: message.into(),
            code: 0,
        }
    }

    pub(crate) fn transaction(err: &rusqlite::Error) -> Self {
        SqliteDbError::Transaction {
            message: err.to_string(),
            code: driver_code(err),
        }
    }

    /// The extended SQLite result code attached to this error, 0 if none.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            SqliteDbError::Connection { code, .. }
            | SqliteDbError::Statement { code, .. }
            | SqliteDbError::Execution { code, .. }
            | SqliteDbError::Transaction { code, .. } => *code,
        }
    }
}

fn driver_code(err: &rusqlite::Error) -> i32 {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => e.extended_code,
        _ => 0,
    }
}
