//! Predicate terms of the WHERE clause.

use crate::core::db::schema::is_sql_identifier;
use crate::core::{Result, RowmapError};
use crate::value::Value;

/// Operators a condition may use. Anything else is rejected at
/// construction; operators are interpolated into SQL text and must not
/// carry arbitrary input.
const OPERATORS: &[&str] = &[
    "=", "!=", "<>", "<", ">", "<=", ">=", "LIKE", "NOT LIKE", "IS", "IS NOT",
];

/// How a condition combines with the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    /// Combine with AND.
    And,
    /// Combine with OR.
    Or,
}

impl Conjunction {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

/// One predicate term: column, operator, bound value, conjunction.
///
/// Immutable once built. Order within a select's condition list
/// determines SQL emission order; the first condition's conjunction is
/// ignored because it opens the WHERE clause.
#[derive(Debug, Clone)]
pub struct Condition {
    column: String,
    operator: String,
    value: Value,
    conjunction: Conjunction,
}

impl Condition {
    /// Builds a condition, validating column and operator.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::QueryBuild` if the column is not a valid
    /// identifier or the operator is not on the allow list.
    pub fn new(
        column: &str,
        operator: &str,
        value: impl Into<Value>,
        conjunction: Conjunction,
    ) -> Result<Self> {
        if !is_sql_identifier(column) {
            return Err(RowmapError::QueryBuild(format!(
                "'{}' is not a valid column name",
                column
            )));
        }

        let operator = operator.trim().to_uppercase();
        if !OPERATORS.contains(&operator.as_str()) {
            return Err(RowmapError::QueryBuild(format!(
                "unsupported operator '{}'",
                operator
            )));
        }

        Ok(Condition {
            column: column.to_string(),
            operator,
            value: value.into(),
            conjunction,
        })
    }

    /// The bound value for this term.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The conjunction joining this term to the previous one.
    pub fn conjunction(&self) -> Conjunction {
        self.conjunction
    }

    /// The SQL fragment for this term, with a `?` placeholder.
    pub(crate) fn term(&self) -> String {
        format!("{} {} ?", self.column, self.operator)
    }
}
