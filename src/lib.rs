//! Lightweight synchronous wrapper around `rusqlite`.
//!
//! One lazily-opened connection per [`SqliteSession`], one cached prepared
//! statement per distinct SQL text, positional or named parameter binding,
//! transaction control, and optional debug logging of interpolated SQL.
//!
//! This crate orchestrates the driver; it is not a query builder, pool, or
//! migration tool.

pub mod config;
pub mod error;
pub mod interpolate;
mod logging;
pub mod params;
pub mod rows;
pub mod session;
pub mod value;

pub use config::{SqliteConfig, SqliteConfigBuilder, SqliteOptions};
pub use error::SqliteDbError;
pub use interpolate::{collapse_whitespace, interpolate_query};
pub use params::{ParamKey, ParamSet, build_in_clause};
pub use rows::{ExecutedStatement, RowIter, SqlRow};
pub use session::SqliteSession;
pub use value::SqlValue;
