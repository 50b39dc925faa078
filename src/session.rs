//! The session: one lazily-opened SQLite connection, a per-connection
//! prepared statement cache, parameter binding, transaction control, and
//! debug logging.

use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SqliteConfig;
use crate::error::SqliteDbError;
use crate::logging::DebugLog;
use crate::params::{ParamSet, named_values_for};
use crate::rows::ExecutedStatement;
use crate::value::{SqlValue, to_driver_value};

/// A single-connection session over a SQLite database.
///
/// The connection is opened on the first call that needs one (statement
/// execution, transaction control, `last_insert_id`) and torn down by
/// [`disconnect`](Self::disconnect) or on drop. The session assumes
/// single-threaded ownership; it provides no internal synchronization.
///
/// ```no_run
/// use sqlite_session::{ParamSet, SqlValue, SqliteConfig, SqliteSession};
///
/// # fn main() -> Result<(), sqlite_session::SqliteDbError> {
/// let mut db = SqliteSession::new(SqliteConfig::new("./app.sqlite"));
/// db.execute(
///     "INSERT INTO users (name) VALUES (:name)",
///     &ParamSet::named(vec![("name", SqlValue::Text("alice".into()))]),
/// )?;
/// let id = db.last_insert_id(None)?;
/// # let _ = id;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SqliteSession {
    config: SqliteConfig,
    conn: Option<rusqlite::Connection>,
    prepared: HashSet<String>,
    debug: DebugLog,
}

enum BoundParams {
    Positional(Vec<SqlValue>),
    Named(Vec<(String, SqlValue)>),
}

impl SqliteSession {
    #[must_use]
    pub fn new(config: SqliteConfig) -> Self {
        Self {
            config,
            conn: None,
            prepared: HashSet::new(),
            debug: DebugLog::new(),
        }
    }

    /// Open the connection if it is not already open.
    ///
    /// Builds the driver connection from the stored configuration and applies
    /// the configured options. No-op when already connected.
    ///
    /// # Errors
    ///
    /// Returns `SqliteDbError::Connection` with the driver's message and code
    /// if the database cannot be opened (bad path, permissions, ...).
    pub fn connect(&mut self) -> Result<(), SqliteDbError> {
        if self.is_connected() {
            return Ok(());
        }

        let dsn = self.config.dsn();
        self.debug.connection_event("CONNECT", &dsn);

        let conn = rusqlite::Connection::open(&self.config.database)
            .map_err(|e| SqliteDbError::connection(&e))?;
        conn.busy_timeout(Duration::from_secs(self.config.options.busy_timeout_secs))
            .map_err(|e| SqliteDbError::connection(&e))?;
        conn.set_prepared_statement_cache_capacity(self.config.options.statement_cache_capacity);

        self.conn = Some(conn);
        Ok(())
    }

    /// Release the connection. Safe to call when not connected.
    ///
    /// Dropping the connection finalizes every cached statement handle, so
    /// the statement cache dies with the connection; the tracked SQL-text set
    /// is cleared to match.
    pub fn disconnect(&mut self) {
        let dsn = self.config.dsn();
        self.debug.connection_event("DISCONNECT", &dsn);
        self.conn = None;
        self.prepared.clear();
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Borrow the raw driver connection, if one is open.
    #[must_use]
    pub fn connection_handle(&self) -> Option<&rusqlite::Connection> {
        self.conn.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    #[must_use]
    pub fn dsn(&self) -> String {
        self.config.dsn()
    }

    #[must_use]
    pub fn debug_mode(&self) -> bool {
        self.debug.enabled()
    }

    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.debug.set_enabled(enabled);
    }

    /// Redirect debug output (default: stdout).
    pub fn set_debug_writer(&mut self, writer: Box<dyn Write + Send>) {
        self.debug.set_sink(writer);
    }

    /// Number of statements executed so far (including transaction-control
    /// labels), regardless of debug mode.
    #[must_use]
    pub fn query_counter(&self) -> u64 {
        self.debug.counter()
    }

    /// Distinct SQL texts prepared on the current connection.
    #[must_use]
    pub fn statement_cache_len(&self) -> usize {
        self.prepared.len()
    }

    /// Prepare (from cache when possible), bind, and run a statement.
    ///
    /// Statements without result columns (INSERT/UPDATE/DELETE/DDL) run to
    /// completion here; statements with result columns leave a lazy cursor on
    /// the returned handle, consumed through
    /// [`ExecutedStatement::rows`].
    ///
    /// Named parameters have their keys prefixed with `:` and names that do
    /// not appear as a `:word` token in `sql` are dropped before binding.
    ///
    /// # Errors
    ///
    /// `SqliteDbError::Connection` if the lazy connect fails,
    /// `SqliteDbError::Statement` if preparation fails (nothing is cached in
    /// that case), `SqliteDbError::Execution` on bind or execution failure.
    pub fn execute(
        &mut self,
        sql: &str,
        params: &ParamSet,
    ) -> Result<ExecutedStatement<'_>, SqliteDbError> {
        self.connect()?;

        let bound = match params {
            ParamSet::Positional(values) => BoundParams::Positional(values.clone()),
            ParamSet::Named(pairs) => BoundParams::Named(named_values_for(sql, pairs)),
        };

        let Some(conn) = self.conn.as_ref() else {
            return Err(connection_lost());
        };
        let mut stmt = conn
            .prepare_cached(sql)
            .map_err(|e| SqliteDbError::statement(&e))?;
        if !self.prepared.contains(sql) {
            self.prepared.insert(sql.to_owned());
        }

        // Counter and debug line only after the statement prepared; a failed
        // preparation leaves both untouched.
        self.debug.record_statement(sql, params);

        // The handle may be a reuse from a prior execution; leftover bindings
        // are cleared and the cursor was reset when it went back to the cache.
        stmt.clear_bindings();

        match &bound {
            BoundParams::Positional(values) => {
                let expected = stmt.parameter_count();
                if values.len() != expected {
                    return Err(SqliteDbError::execution_msg(format!(
                        "statement expects {expected} positional parameters, {} provided",
                        values.len()
                    )));
                }
                for (i, value) in values.iter().enumerate() {
                    let driver_value = to_driver_value(value)?;
                    stmt.raw_bind_parameter(i + 1, driver_value)
                        .map_err(|e| SqliteDbError::execution(&e))?;
                }
            }
            BoundParams::Named(pairs) => {
                for (name, value) in pairs {
                    let driver_value = to_driver_value(value)?;
                    let idx = stmt
                        .parameter_index(name)
                        .map_err(|e| SqliteDbError::execution(&e))?
                        .ok_or_else(|| {
                            SqliteDbError::execution_msg(format!(
                                "unknown named parameter {name}"
                            ))
                        })?;
                    stmt.raw_bind_parameter(idx, driver_value)
                        .map_err(|e| SqliteDbError::execution(&e))?;
                }
            }
        }

        let columns: Arc<Vec<String>> = Arc::new(
            stmt.column_names()
                .iter()
                .map(std::string::ToString::to_string)
                .collect(),
        );

        if stmt.column_count() == 0 {
            let affected = stmt
                .raw_execute()
                .map_err(|e| SqliteDbError::execution(&e))?;
            Ok(ExecutedStatement::new(stmt, columns, affected, false))
        } else {
            Ok(ExecutedStatement::new(stmt, columns, 0, true))
        }
    }

    /// Begin a transaction. Beginning while one is open surfaces the
    /// driver's error; there is no nesting or savepoint support.
    ///
    /// # Errors
    ///
    /// `SqliteDbError::Transaction` on driver failure.
    pub fn begin_transaction(&mut self) -> Result<(), SqliteDbError> {
        self.transaction_control("BEGIN TRANSACTION", "BEGIN")
    }

    /// Commit the open transaction. Committing with none open is an error.
    ///
    /// # Errors
    ///
    /// `SqliteDbError::Transaction` on driver failure.
    pub fn commit_transaction(&mut self) -> Result<(), SqliteDbError> {
        self.transaction_control("COMMIT TRANSACTION", "COMMIT")
    }

    /// Roll back the open transaction.
    ///
    /// # Errors
    ///
    /// `SqliteDbError::Transaction` on driver failure.
    pub fn rollback_transaction(&mut self) -> Result<(), SqliteDbError> {
        self.transaction_control("ROLLBACK TRANSACTION", "ROLLBACK")
    }

    fn transaction_control(&mut self, label: &str, sql: &str) -> Result<(), SqliteDbError> {
        self.connect()?;
        self.debug.record_statement(label, &ParamSet::empty());
        let Some(conn) = self.conn.as_ref() else {
            return Err(connection_lost());
        };
        conn.execute_batch(sql)
            .map_err(|e| SqliteDbError::transaction(&e))
    }

    /// Rowid of the most recent successful INSERT on this connection.
    ///
    /// Connects first if needed. The sequence name is accepted for interface
    /// parity with DSN-style drivers and ignored by SQLite.
    ///
    /// # Errors
    ///
    /// `SqliteDbError::Connection` if the lazy connect fails.
    pub fn last_insert_id(&mut self, _sequence_name: Option<&str>) -> Result<i64, SqliteDbError> {
        self.connect()?;
        let Some(conn) = self.conn.as_ref() else {
            return Err(connection_lost());
        };
        Ok(conn.last_insert_rowid())
    }
}

impl Default for SqliteSession {
    fn default() -> Self {
        Self::new(SqliteConfig::default())
    }
}

impl Drop for SqliteSession {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn connection_lost() -> SqliteDbError {
    SqliteDbError::Connection {
        message: "connection not established".to_string(),
        code: 0,
    }
}
