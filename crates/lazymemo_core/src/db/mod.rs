//! SQLite storage bootstrap.
//!
//! # Responsibility
//! - Open and configure per-operation SQLite connections.
//! - Create and verify the `memos` table at process start.
//!
//! # Invariants
//! - Connections are scoped to one operation and released on every exit path.
//! - Application data is not touched before `initialize_schema` succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_connection, ConnectionScope, OpenMode};
pub use schema::{initialize_schema, verify_schema};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The store could not be reached or opened.
    Connection {
        target: String,
        source: rusqlite::Error,
    },
    /// The configured host is not served by the embedded store.
    UnsupportedHost(String),
    /// Statement rejected or failed during execution.
    Sqlite(rusqlite::Error),
    /// Table or column required by the memo layer is absent.
    SchemaMismatch {
        table: &'static str,
        column: Option<&'static str>,
    },
    /// Data directory could not be prepared.
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl DbError {
    /// Whether this error means the store was never reached.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::UnsupportedHost(_) | Self::Io { .. }
        )
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection { target, source } => {
                write!(f, "cannot open database `{target}`: {source}")
            }
            Self::UnsupportedHost(host) => write!(
                f,
                "host `{host}` is not reachable by the embedded store; use localhost"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaMismatch {
                table,
                column: Some(column),
            } => write!(f, "table `{table}` is missing column `{column}`"),
            Self::SchemaMismatch {
                table,
                column: None,
            } => write!(f, "required table `{table}` does not exist"),
            Self::Io { path, source } => {
                write!(f, "cannot prepare data directory `{path}`: {source}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::UnsupportedHost(_) | Self::SchemaMismatch { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
