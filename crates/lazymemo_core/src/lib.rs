//! Core persistence logic for LazyMemo.
//! This crate is the single source of truth for memo storage invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{AppConfig, ConfigError, DbConfig};
pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogSink};
pub use model::memo::{Memo, MemoId, MemoValidationError, NewMemo};
pub use repo::memo_repo::{
    MemoRepository, RepoError, RepoErrorKind, RepoResult, SqliteMemoRepository,
};
pub use repo::query::{build_select, MemoField, MemoFilter, Operator, Predicate, SelectQuery};
pub use service::memo_service::{MemoService, MemoServiceError, ServiceResult, StatusClass};
pub use store::MemoStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
