//! Connection acquisition for SQLite.
//!
//! # Responsibility
//! - Resolve the configured store into a database file and open it.
//! - Apply the per-connection busy timeout.
//! - Tie connection release to a scope guard.
//!
//! # Invariants
//! - `OpenMode::ExistingOnly` never creates a database file.
//! - Every `ConnectionScope` logs `db_close` exactly once, on drop.

use super::{DbError, DbResult};
use crate::config::DbConfig;
use log::{debug, error};
use rusqlite::{Connection, OpenFlags};
use std::ops::{Deref, DerefMut};
use std::time::Instant;

const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "::1"];

/// Whether opening may create the database file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Schema bootstrap: create the file when absent.
    CreateIfMissing,
    /// Regular operations: a missing file is a connection error.
    ExistingOnly,
}

/// Connection owned by exactly one operation.
///
/// Dropping the scope closes the connection, whichever way the operation
/// exits.
pub struct ConnectionScope {
    conn: Connection,
    operation: &'static str,
    opened_at: Instant,
}

impl Deref for ConnectionScope {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl DerefMut for ConnectionScope {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}

impl Drop for ConnectionScope {
    fn drop(&mut self) {
        debug!(
            "event=db_close module=db status=ok operation={} held_ms={}",
            self.operation,
            self.opened_at.elapsed().as_millis()
        );
    }
}

/// Opens a connection for `operation` against the configured store.
///
/// # Errors
/// - `DbError::UnsupportedHost` when `config.host` is not local.
/// - `DbError::Connection` when the file cannot be opened (or, in
///   `ExistingOnly` mode, does not exist).
/// - `DbError::Sqlite` when connection setup fails.
pub fn open_connection(
    config: &DbConfig,
    mode: OpenMode,
    operation: &'static str,
) -> DbResult<ConnectionScope> {
    let started_at = Instant::now();

    if !is_local_host(&config.host) {
        error!(
            "event=db_open module=db status=error operation={} error_code=unsupported_host",
            operation
        );
        return Err(DbError::UnsupportedHost(config.host.clone()));
    }

    let path = config.database_path();
    let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    if mode == OpenMode::CreateIfMissing {
        flags |= OpenFlags::SQLITE_OPEN_CREATE;
    }

    let conn = match Connection::open_with_flags(&path, flags) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error operation={} duration_ms={} error_code=db_open_failed error={}",
                operation,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(DbError::Connection {
                target: path.display().to_string(),
                source: err,
            });
        }
    };

    if let Err(err) = conn.busy_timeout(config.busy_timeout) {
        error!(
            "event=db_open module=db status=error operation={} duration_ms={} error_code=db_configure_failed error={}",
            operation,
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err.into());
    }

    debug!(
        "event=db_open module=db status=ok operation={} duration_ms={}",
        operation,
        started_at.elapsed().as_millis()
    );

    Ok(ConnectionScope {
        conn,
        operation,
        opened_at: Instant::now(),
    })
}

fn is_local_host(host: &str) -> bool {
    LOCAL_HOSTS
        .iter()
        .any(|local| host.eq_ignore_ascii_case(local))
}

#[cfg(test)]
mod tests {
    use super::is_local_host;

    #[test]
    fn local_host_names_are_accepted() {
        assert!(is_local_host("localhost"));
        assert!(is_local_host("LOCALHOST"));
        assert!(is_local_host("127.0.0.1"));
        assert!(is_local_host("::1"));
    }

    #[test]
    fn remote_host_names_are_rejected() {
        assert!(!is_local_host("db"));
        assert!(!is_local_host("10.0.0.7"));
        assert!(!is_local_host(""));
    }
}
