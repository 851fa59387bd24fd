//! Connection-per-call persistence surface.
//!
//! # Responsibility
//! - Expose the operations the route layer calls: schema bootstrap, insert,
//!   list, find, update and delete.
//! - Own the connection lifecycle of each call end to end.
//!
//! # Invariants
//! - Each call opens its own connection and releases it before returning,
//!   on success, failure or unwind.
//! - No state is kept between calls besides the borrowed `DbConfig`.
//! - `update_memo` reports success even when no row matched; only
//!   `delete_memo` inspects the affected-row count.

use crate::config::DbConfig;
use crate::db::{self, open_connection, DbResult, OpenMode};
use crate::model::memo::{Memo, MemoId, NewMemo};
use crate::repo::memo_repo::{MemoRepository, RepoError, RepoResult, SqliteMemoRepository};
use crate::repo::query::MemoFilter;
use log::{debug, error, info, warn};
use std::time::Instant;

/// Memo persistence entry point bound to one store configuration.
#[derive(Debug, Clone, Copy)]
pub struct MemoStore<'cfg> {
    config: &'cfg DbConfig,
}

impl<'cfg> MemoStore<'cfg> {
    pub fn new(config: &'cfg DbConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'cfg DbConfig {
        self.config
    }

    /// Creates the `memos` table if needed and verifies its shape.
    ///
    /// Callers treat an error as fatal for startup.
    pub fn initialize_schema(&self) -> DbResult<()> {
        db::initialize_schema(self.config)
    }

    /// Inserts `memo` and returns the id assigned by the store.
    ///
    /// `memo` must already be validated.
    pub fn insert_memo(&self, memo: &NewMemo) -> RepoResult<MemoId> {
        let id = self.with_repository("insert_memo", |repo| repo.insert_memo(memo))?;
        info!(
            "event=memo_insert module=store status=ok memo_id={} has_create_date={}",
            id,
            memo.create_date.is_some()
        );
        Ok(id)
    }

    /// Returns every memo in id order.
    pub fn list_memos(&self) -> RepoResult<Vec<Memo>> {
        self.with_repository("list_memos", |repo| repo.list_memos())
    }

    /// Fail-soft listing for page renders: errors are logged and read as an
    /// empty list.
    pub fn list_memos_or_empty(&self) -> Vec<Memo> {
        match self.list_memos() {
            Ok(memos) => memos,
            Err(err) => {
                warn!(
                    "event=memo_list module=store status=warn reason=degraded_to_empty error_kind={}",
                    err.kind().as_str()
                );
                Vec::new()
            }
        }
    }

    /// Returns memos matching every filter that is set.
    ///
    /// `Ok(vec![])` means no match; `Err` means the lookup itself failed.
    pub fn find_memos(&self, filter: &MemoFilter) -> RepoResult<Vec<Memo>> {
        self.with_repository("find_memos", |repo| repo.find_memos(filter))
    }

    /// Replaces title and content of memo `id` in one transaction.
    ///
    /// Returns `Ok(true)` once the statement commits, including when no row
    /// has that id.
    pub fn update_memo(&self, id: MemoId, title: &str, content: &str) -> RepoResult<bool> {
        let changed =
            self.with_repository("update_memo", |repo| repo.update_memo(id, title, content))?;
        if changed == 0 {
            warn!(
                "event=memo_update module=store status=warn memo_id={} reason=no_row_matched",
                id
            );
        } else {
            info!(
                "event=memo_update module=store status=ok memo_id={} rows={}",
                id, changed
            );
        }
        Ok(true)
    }

    /// Deletes memo `id`.
    ///
    /// Returns `Ok(false)` when no such memo exists.
    pub fn delete_memo(&self, id: MemoId) -> RepoResult<bool> {
        match self.with_repository("delete_memo", |repo| repo.delete_memo(id)) {
            Ok(()) => {
                info!("event=memo_delete module=store status=ok memo_id={}", id);
                Ok(true)
            }
            Err(RepoError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn with_repository<T>(
        &self,
        operation: &'static str,
        body: impl FnOnce(&mut SqliteMemoRepository<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let started_at = Instant::now();
        let mut scope = open_connection(self.config, OpenMode::ExistingOnly, operation)?;
        let mut repo = SqliteMemoRepository::new(&mut scope);
        let result = body(&mut repo);

        match &result {
            Ok(_) => debug!(
                "event=store_call module=store status=ok operation={} duration_ms={}",
                operation,
                started_at.elapsed().as_millis()
            ),
            Err(RepoError::NotFound(id)) => info!(
                "event=store_call module=store status=ok operation={} duration_ms={} result=not_found memo_id={}",
                operation,
                started_at.elapsed().as_millis(),
                id
            ),
            Err(err) => error!(
                "event=store_call module=store status=error operation={} duration_ms={} error_code={} error={}",
                operation,
                started_at.elapsed().as_millis(),
                err.kind().as_str(),
                err
            ),
        }

        result
    }
}
