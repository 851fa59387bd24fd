//! `memos` table bootstrap.
//!
//! # Responsibility
//! - Create the `memos` table when absent.
//! - Verify the table shape before the process serves any request.
//!
//! # Invariants
//! - Bootstrap is idempotent; existing rows are never touched.
//! - A failure here is fatal for startup.

use super::open::{open_connection, OpenMode};
use super::{DbError, DbResult};
use crate::config::DbConfig;
use log::{error, info};
use rusqlite::Connection;
use std::time::Instant;

pub const MEMOS_TABLE: &str = "memos";

const MEMOS_COLUMNS: [&str; 4] = ["id", "title", "content", "create_date"];

const CREATE_MEMOS_SQL: &str = "CREATE TABLE IF NOT EXISTS memos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL CHECK (length(title) <= 255),
    content TEXT NOT NULL CHECK (length(content) <= 512),
    create_date DATE
);";

/// Ensures the `memos` table exists and has the expected columns.
///
/// Creates the data directory and database file when missing.
///
/// # Errors
/// - `DbError::Io` when the data directory cannot be created.
/// - Connection errors from `open_connection`.
/// - `DbError::Sqlite` when the creation statement is rejected.
/// - `DbError::SchemaMismatch` when an existing table has another shape.
pub fn initialize_schema(config: &DbConfig) -> DbResult<()> {
    let started_at = Instant::now();
    info!("event=schema_init module=db status=start");

    match bootstrap(config) {
        Ok(()) => {
            info!(
                "event=schema_init module=db status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=schema_init module=db status=error duration_ms={} error_code=schema_init_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Checks that `memos` exists with all four columns.
pub fn verify_schema(conn: &Connection) -> DbResult<()> {
    if !table_exists(conn, MEMOS_TABLE)? {
        return Err(DbError::SchemaMismatch {
            table: MEMOS_TABLE,
            column: None,
        });
    }

    for column in MEMOS_COLUMNS {
        if !table_has_column(conn, MEMOS_TABLE, column)? {
            return Err(DbError::SchemaMismatch {
                table: MEMOS_TABLE,
                column: Some(column),
            });
        }
    }

    Ok(())
}

fn bootstrap(config: &DbConfig) -> DbResult<()> {
    std::fs::create_dir_all(&config.data_dir).map_err(|err| DbError::Io {
        path: config.data_dir.display().to_string(),
        source: err,
    })?;

    let mut conn = open_connection(config, OpenMode::CreateIfMissing, "initialize_schema")?;
    let tx = conn.transaction()?;
    tx.execute_batch(CREATE_MEMOS_SQL)?;
    tx.commit()?;

    verify_schema(&conn)
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> DbResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
