use serde::{Deserialize, Serialize};

/// Driver options applied when the connection is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteOptions {
    /// Busy timeout in seconds.
    pub busy_timeout_secs: u64,
    /// Capacity of the driver-side prepared statement cache. Statements are
    /// cached per distinct SQL text for the lifetime of the connection.
    pub statement_cache_capacity: usize,
}

impl Default for SqliteOptions {
    fn default() -> Self {
        Self {
            busy_timeout_secs: 60,
            statement_cache_capacity: 128,
        }
    }
}

/// Configuration for a [`SqliteSession`](crate::SqliteSession).
///
/// Construction never touches the driver; a bad database path only surfaces
/// at the first `connect()`. Username and password are stored for interface
/// parity with DSN-style configuration but are ignored by SQLite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteConfig {
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub options: SqliteOptions,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            database: "./db.sqlite".to_string(),
            username: None,
            password: None,
            options: SqliteOptions::default(),
        }
    }
}

impl SqliteConfig {
    #[must_use]
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn builder(database: impl Into<String>) -> SqliteConfigBuilder {
        SqliteConfigBuilder {
            config: SqliteConfig::new(database),
        }
    }

    /// The connection string for this configuration, `sqlite:<database>`.
    /// No escaping or encoding of the path is performed.
    #[must_use]
    pub fn dsn(&self) -> String {
        format!("sqlite:{}", self.database)
    }
}

/// Fluent builder for [`SqliteConfig`].
#[derive(Debug, Clone)]
pub struct SqliteConfigBuilder {
    config: SqliteConfig,
}

impl SqliteConfigBuilder {
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn busy_timeout_secs(mut self, secs: u64) -> Self {
        self.config.options.busy_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn statement_cache_capacity(mut self, capacity: usize) -> Self {
        self.config.options.statement_cache_capacity = capacity;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteConfig {
        self.config
    }
}
