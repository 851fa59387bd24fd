//! Memo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD statements over the `memos` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every literal value is bound as a parameter.
//! - Mutations run in a transaction: commit on success, rollback otherwise.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Inputs are not re-validated here; callers validate first.

use crate::db::DbError;
use crate::model::memo::{Memo, MemoId, NewMemo};
use crate::repo::query::{build_select, MemoFilter};
use chrono::NaiveDate;
use log::warn;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CREATE_DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for memo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(MemoId),
    InvalidData(String),
}

/// Coarse classification used by callers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoErrorKind {
    Connection,
    Query,
    NotFound,
    InvalidData,
}

impl RepoErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Query => "query",
            Self::NotFound => "not_found",
            Self::InvalidData => "invalid_data",
        }
    }
}

impl RepoError {
    pub fn kind(&self) -> RepoErrorKind {
        match self {
            Self::Db(err) if err.is_connection() => RepoErrorKind::Connection,
            Self::Db(_) => RepoErrorKind::Query,
            Self::NotFound(_) => RepoErrorKind::NotFound,
            Self::InvalidData(_) => RepoErrorKind::InvalidData,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "memo not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted memo data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for memo CRUD operations.
pub trait MemoRepository {
    /// Inserts one memo and returns the id assigned by the store.
    fn insert_memo(&mut self, memo: &NewMemo) -> RepoResult<MemoId>;
    /// Returns every memo in id order.
    fn list_memos(&self) -> RepoResult<Vec<Memo>>;
    /// Returns memos matching all set filters, in id order.
    fn find_memos(&self, filter: &MemoFilter) -> RepoResult<Vec<Memo>>;
    /// Replaces title and content together; returns rows affected.
    fn update_memo(&mut self, id: MemoId, title: &str, content: &str) -> RepoResult<usize>;
    /// Deletes one memo; `NotFound` when no row matched.
    fn delete_memo(&mut self, id: MemoId) -> RepoResult<()>;
}

/// SQLite-backed memo repository over one borrowed connection.
pub struct SqliteMemoRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteMemoRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl MemoRepository for SqliteMemoRepository<'_> {
    fn insert_memo(&mut self, memo: &NewMemo) -> RepoResult<MemoId> {
        run_in_transaction(self.conn, "insert_memo", |tx| {
            tx.execute(
                "INSERT INTO memos (title, content, create_date) VALUES (?1, ?2, ?3);",
                params![memo.title.as_str(), memo.content.as_str(), memo.create_date],
            )?;
            Ok(MemoId::new(tx.last_insert_rowid()))
        })
    }

    fn list_memos(&self) -> RepoResult<Vec<Memo>> {
        self.find_memos(&MemoFilter::default())
    }

    fn find_memos(&self, filter: &MemoFilter) -> RepoResult<Vec<Memo>> {
        let query = build_select(&filter.predicates());
        let mut stmt = self.conn.prepare(&query.sql)?;
        let mut rows = stmt.query(params_from_iter(query.params))?;
        let mut memos = Vec::new();

        while let Some(row) = rows.next()? {
            memos.push(parse_memo_row(row)?);
        }

        Ok(memos)
    }

    fn update_memo(&mut self, id: MemoId, title: &str, content: &str) -> RepoResult<usize> {
        run_in_transaction(self.conn, "update_memo", |tx| {
            let changed = tx.execute(
                "UPDATE memos
                 SET
                    title = ?1,
                    content = ?2
                 WHERE id = ?3;",
                params![title, content, id.get()],
            )?;
            Ok(changed)
        })
    }

    fn delete_memo(&mut self, id: MemoId) -> RepoResult<()> {
        run_in_transaction(self.conn, "delete_memo", |tx| {
            let changed = tx.execute("DELETE FROM memos WHERE id = ?1;", [id.get()])?;
            if changed == 0 {
                return Err(RepoError::NotFound(id));
            }
            Ok(())
        })
    }
}

/// Runs `body` in a transaction, committing on `Ok` and rolling back on `Err`.
///
/// A dropped, unfinished transaction also rolls back, so panics inside
/// `body` leave no partial writes.
fn run_in_transaction<T>(
    conn: &mut Connection,
    operation: &'static str,
    body: impl FnOnce(&Transaction<'_>) -> RepoResult<T>,
) -> RepoResult<T> {
    let tx = conn.transaction()?;
    match body(&tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!(
                    "event=tx_rollback module=repo status=error operation={} error={}",
                    operation, rollback_err
                );
            }
            Err(err)
        }
    }
}

fn parse_memo_row(row: &Row<'_>) -> RepoResult<Memo> {
    let id = MemoId::new(row.get("id")?);
    let create_date = match row.get::<_, Option<String>>("create_date")? {
        Some(value) => Some(parse_create_date(&value).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid date `{value}` in memos.create_date for id {id}"
            ))
        })?),
        None => None,
    };

    Ok(Memo {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        create_date,
    })
}

fn parse_create_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, CREATE_DATE_FORMAT).ok()
}
