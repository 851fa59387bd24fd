//! Memo use-case service.
//!
//! # Responsibility
//! - Validate caller input before anything reaches the store.
//! - Turn store outcomes into use-case results a route layer can render.
//!
//! # Invariants
//! - Titles are trimmed; content is stored exactly as given.
//! - Input is validated before insert/update.
//! - Each use-case makes exactly one store call.
//! - An empty id lookup is `NotFound`, never an empty success.
//! - Listing stays fail-soft.

use crate::model::memo::{validate_fields, Memo, MemoId, MemoValidationError, NewMemo};
use crate::repo::memo_repo::{RepoError, RepoErrorKind};
use crate::repo::query::MemoFilter;
use crate::store::MemoStore;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for memo use-cases.
#[derive(Debug)]
pub enum MemoServiceError {
    /// Caller input rejected before persistence.
    Validation(MemoValidationError),
    /// Target memo does not exist.
    NotFound(MemoId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

/// Response class a caller should render for an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    BadRequest,
    NotFound,
    Internal,
}

impl StatusClass {
    pub fn http_status(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Internal => 500,
        }
    }
}

impl MemoServiceError {
    pub fn status_class(&self) -> StatusClass {
        match self {
            Self::Validation(_) => StatusClass::BadRequest,
            Self::NotFound(_) => StatusClass::NotFound,
            Self::Repo(err) if err.kind() == RepoErrorKind::NotFound => StatusClass::NotFound,
            Self::Repo(_) => StatusClass::Internal,
        }
    }
}

impl Display for MemoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "memo not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MemoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MemoValidationError> for MemoServiceError {
    fn from(value: MemoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for MemoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, MemoServiceError>;

/// Memo service facade over a `MemoStore`.
pub struct MemoService<'cfg> {
    store: MemoStore<'cfg>,
}

impl<'cfg> MemoService<'cfg> {
    pub fn new(store: MemoStore<'cfg>) -> Self {
        Self { store }
    }

    /// Creates one memo and returns it with its assigned id.
    pub fn create_memo(
        &self,
        title: &str,
        content: &str,
        create_date: Option<NaiveDate>,
    ) -> ServiceResult<Memo> {
        let new_memo = NewMemo {
            title: title.trim().to_string(),
            content: content.to_string(),
            create_date,
        };
        new_memo.validate()?;

        let id = self.store.insert_memo(&new_memo)?;
        Ok(Memo::from_new(id, new_memo))
    }

    /// Gets one memo by id.
    pub fn get_memo(&self, id: MemoId) -> ServiceResult<Memo> {
        self.store
            .find_memos(&MemoFilter::by_id(id))?
            .into_iter()
            .next()
            .ok_or(MemoServiceError::NotFound(id))
    }

    /// Lists every memo; store failures read as an empty list.
    pub fn list_memos(&self) -> Vec<Memo> {
        self.store.list_memos_or_empty()
    }

    /// Exact-match lookup by optional id and title.
    pub fn find_memos(&self, filter: &MemoFilter) -> ServiceResult<Vec<Memo>> {
        Ok(self.store.find_memos(filter)?)
    }

    /// Replaces title and content of memo `id`.
    ///
    /// Mirrors the store contract: `Ok(true)` does not prove that `id`
    /// existed. The store logs `reason=no_row_matched` in that case.
    pub fn update_memo(&self, id: MemoId, title: &str, content: &str) -> ServiceResult<bool> {
        let title = title.trim();
        validate_fields(title, content)?;
        Ok(self.store.update_memo(id, title, content)?)
    }

    /// Deletes memo `id`, or reports `NotFound`.
    pub fn delete_memo(&self, id: MemoId) -> ServiceResult<()> {
        if self.store.delete_memo(id)? {
            Ok(())
        } else {
            Err(MemoServiceError::NotFound(id))
        }
    }
}
