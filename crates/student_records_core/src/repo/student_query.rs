//! Filtered-search statement assembly.
//!
//! # Responsibility
//! - Translate a `StudentFilter` into SQL text plus bound values.
//!
//! # Invariants
//! - Predicates are appended in the fixed order name, course, phone.
//! - Every value is bound as a parameter; SQL text never contains input.
//! - An empty filter is rejected; no `WHERE` without predicates is emitted.

use crate::model::student::StudentFilter;
use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) const STUDENT_SELECT_SQL: &str = "SELECT id, name, course, mobile FROM students";

/// Failure to assemble a search statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// No predicate was supplied.
    EmptyFilter,
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyFilter => write!(
                f,
                "search requires at least one of name, course or phone"
            ),
        }
    }
}

impl Error for QueryError {}

/// A parameterized statement ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Builds the filtered-search statement for `filter`.
///
/// # Errors
/// - `QueryError::EmptyFilter` when no field is supplied.
pub fn build_search_statement(filter: &StudentFilter) -> Result<SearchStatement, QueryError> {
    let mut predicates: Vec<&'static str> = Vec::with_capacity(3);
    let mut params: Vec<Value> = Vec::with_capacity(3);

    if let Some(name) = &filter.name {
        predicates.push("name = ?");
        params.push(Value::Text(name.clone()));
    }
    if let Some(course) = &filter.course {
        predicates.push("course = ?");
        params.push(Value::Text(course.clone()));
    }
    if let Some(phone) = filter.phone {
        predicates.push("mobile = ?");
        params.push(Value::Integer(phone));
    }

    if predicates.is_empty() {
        return Err(QueryError::EmptyFilter);
    }

    let sql = format!("{STUDENT_SELECT_SQL} WHERE {}", predicates.join(" AND "));
    Ok(SearchStatement { sql, params })
}

#[cfg(test)]
mod tests {
    use super::{build_search_statement, QueryError};
    use crate::model::student::StudentFilter;
    use rusqlite::types::Value;

    #[test]
    fn single_predicate_has_no_trailing_conjunction() {
        let statement =
            build_search_statement(&StudentFilter::default().with_name("Alice")).unwrap();
        assert_eq!(
            statement.sql,
            "SELECT id, name, course, mobile FROM students WHERE name = ?"
        );
        assert_eq!(statement.params, vec![Value::Text("Alice".to_string())]);
    }

    #[test]
    fn predicates_follow_name_course_phone_order() {
        let filter = StudentFilter::default()
            .with_phone(5_551_234)
            .with_course("Math")
            .with_name("Ann");
        let statement = build_search_statement(&filter).unwrap();
        assert_eq!(
            statement.sql,
            "SELECT id, name, course, mobile FROM students WHERE name = ? AND course = ? AND mobile = ?"
        );
        assert_eq!(
            statement.params,
            vec![
                Value::Text("Ann".to_string()),
                Value::Text("Math".to_string()),
                Value::Integer(5_551_234),
            ]
        );
    }

    #[test]
    fn skipped_fields_leave_no_gaps() {
        let filter = StudentFilter::default().with_course("Physics").with_phone(0);
        let statement = build_search_statement(&filter).unwrap();
        assert!(statement.sql.ends_with("WHERE course = ? AND mobile = ?"));
        assert_eq!(statement.params.len(), 2);
    }

    #[test]
    fn input_never_reaches_sql_text() {
        let hostile = "x' OR '1'='1";
        let statement =
            build_search_statement(&StudentFilter::default().with_name(hostile)).unwrap();
        assert!(!statement.sql.contains(hostile));
        assert_eq!(statement.params, vec![Value::Text(hostile.to_string())]);
    }

    #[test]
    fn empty_filter_is_rejected() {
        assert_eq!(
            build_search_statement(&StudentFilter::default()),
            Err(QueryError::EmptyFilter)
        );
    }
}
