//! Debug output for connection events and executed statements.
//!
//! Every executed statement bumps a monotonic query counter whether or not
//! debug mode is on; lines are only written when it is. The sink defaults to
//! stdout and can be swapped for any `Write` target (tests capture output
//! through a shared buffer). Each line is mirrored to `tracing::debug!` so
//! hosts with a subscriber installed see the same stream.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::interpolate::{collapse_whitespace, interpolate_query};
use crate::params::ParamSet;

pub(crate) struct DebugLog {
    enabled: bool,
    counter: u64,
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl DebugLog {
    pub(crate) fn new() -> Self {
        Self {
            enabled: false,
            counter: 0,
            sink: Arc::new(Mutex::new(Box::new(io::stdout()))),
        }
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn counter(&self) -> u64 {
        self.counter
    }

    pub(crate) fn set_sink(&mut self, writer: Box<dyn Write + Send>) {
        self.sink = Arc::new(Mutex::new(writer));
    }

    /// Log a connection event, e.g. `CONNECT "sqlite:./db.sqlite"`.
    pub(crate) fn connection_event(&mut self, event: &str, dsn: &str) {
        self.emit(&format!("***** {event} \"{dsn}\""));
    }

    /// Record one executed statement: the counter always advances, the line
    /// is only written in debug mode.
    pub(crate) fn record_statement(&mut self, sql: &str, params: &ParamSet) {
        self.counter += 1;

        if !self.enabled {
            return;
        }

        let query = collapse_whitespace(&interpolate_query(sql, params));
        let line = format!("***** [{}] {}", self.counter, query);
        self.write_line(&line);
        tracing::debug!(target: "sqlite_session", "{line}");
    }

    fn emit(&mut self, line: &str) {
        if !self.enabled {
            return;
        }
        self.write_line(line);
        tracing::debug!(target: "sqlite_session", "{line}");
    }

    // Sink failures (including a poisoned lock) never fail the database
    // operation that triggered the line.
    fn write_line(&self, line: &str) {
        if let Ok(mut guard) = self.sink.lock() {
            let _ = writeln!(guard, "{line}");
        }
    }
}

impl std::fmt::Debug for DebugLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebugLog")
            .field("enabled", &self.enabled)
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}
