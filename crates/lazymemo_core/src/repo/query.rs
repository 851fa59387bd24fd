//! Parameterized SELECT construction for memo lookups.
//!
//! # Responsibility
//! - Turn optional exact-match filters into typed predicates.
//! - Fold predicates into a WHERE clause with bound parameters.
//!
//! # Invariants
//! - Column names and operators come from closed enums; values are only
//!   ever bound as parameters, never spliced into SQL text.
//! - Results are always ordered by `id ASC`.

use crate::model::memo::MemoId;
use rusqlite::types::Value;

pub(crate) const MEMO_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    create_date
FROM memos";

const MEMO_ORDER_SQL: &str = " ORDER BY id ASC";

/// Filterable memo column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoField {
    Id,
    Title,
}

impl MemoField {
    fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
        }
    }
}

/// Comparison applied by a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
}

impl Operator {
    fn sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
        }
    }
}

/// One `field operator ?` term of a WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: MemoField,
    pub operator: Operator,
    pub value: Value,
}

impl Predicate {
    pub fn eq(field: MemoField, value: impl Into<Value>) -> Self {
        Self {
            field,
            operator: Operator::Eq,
            value: value.into(),
        }
    }
}

/// Optional exact-match filters for `find_memos`.
///
/// With no filter set, every row matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoFilter {
    pub id: Option<MemoId>,
    pub title: Option<String>,
}

impl MemoFilter {
    pub fn by_id(id: MemoId) -> Self {
        Self {
            id: Some(id),
            title: None,
        }
    }

    pub fn by_title(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: Some(title.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.title.is_none()
    }

    /// Predicates for the filters that are set, in column order.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::with_capacity(2);
        if let Some(id) = self.id {
            predicates.push(Predicate::eq(MemoField::Id, id.get()));
        }
        if let Some(title) = self.title.as_ref() {
            predicates.push(Predicate::eq(MemoField::Title, title.clone()));
        }
        predicates
    }
}

/// SQL text plus the parameters bound to its placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Builds the memo SELECT for a conjunction of predicates.
pub fn build_select(predicates: &[Predicate]) -> SelectQuery {
    let mut sql = String::from(MEMO_SELECT_SQL);
    let mut params = Vec::with_capacity(predicates.len());

    for (index, predicate) in predicates.iter().enumerate() {
        sql.push_str(if index == 0 { " WHERE " } else { " AND " });
        sql.push_str(&format!(
            "{} {} ?{}",
            predicate.field.column(),
            predicate.operator.sql(),
            index + 1
        ));
        params.push(predicate.value.clone());
    }

    sql.push_str(MEMO_ORDER_SQL);
    SelectQuery { sql, params }
}

#[cfg(test)]
mod tests {
    use super::{build_select, MemoField, MemoFilter, Predicate, MEMO_SELECT_SQL};
    use crate::model::memo::MemoId;
    use rusqlite::types::Value;

    #[test]
    fn no_predicates_selects_every_row() {
        let query = build_select(&[]);
        assert_eq!(query.sql, format!("{MEMO_SELECT_SQL} ORDER BY id ASC"));
        assert!(query.params.is_empty());
    }

    #[test]
    fn predicates_are_joined_with_numbered_placeholders() {
        let filter = MemoFilter {
            id: Some(MemoId::new(7)),
            title: Some("Groceries".to_string()),
        };
        let query = build_select(&filter.predicates());

        assert!(query
            .sql
            .ends_with(" WHERE id = ?1 AND title = ?2 ORDER BY id ASC"));
        assert_eq!(
            query.params,
            vec![Value::Integer(7), Value::Text("Groceries".to_string())]
        );
    }

    #[test]
    fn title_only_filter_binds_title_first() {
        let query = build_select(&MemoFilter::by_title("notes").predicates());
        assert!(query.sql.contains(" WHERE title = ?1"));
        assert!(!query.sql.contains("id = ?"));
        assert_eq!(query.params, vec![Value::Text("notes".to_string())]);
    }

    #[test]
    fn hostile_values_never_reach_sql_text() {
        let hostile = "\"); DROP TABLE memos; --";
        let query = build_select(&[Predicate::eq(MemoField::Title, hostile.to_string())]);
        assert!(!query.sql.contains("DROP"));
        assert_eq!(query.params, vec![Value::Text(hostile.to_string())]);
    }

    #[test]
    fn empty_filter_reports_empty() {
        assert!(MemoFilter::default().is_empty());
        assert!(MemoFilter::default().predicates().is_empty());
        assert!(!MemoFilter::by_id(MemoId::new(1)).is_empty());
    }
}
