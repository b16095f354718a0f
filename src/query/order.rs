//! The ORDER BY clause of a select.

use crate::core::db::schema::is_sql_identifier;
use crate::core::{Result, RowmapError};

/// Sort direction, normalized at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Parses a direction from its case-insensitive spellings.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::QueryBuild` for anything other than
    /// `asc`/`ascending`/`desc`/`descending`.
    pub fn parse(input: &str) -> Result<Self> {
        match input.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(RowmapError::QueryBuild(format!(
                "sort direction must be 'asc' or 'desc', '{}' given",
                input
            ))),
        }
    }

    pub(crate) fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// One sort term: column and direction, validated at construction.
#[derive(Debug, Clone)]
pub struct OrderClause {
    column: String,
    direction: SortDirection,
}

impl OrderClause {
    /// Builds an order clause, validating column and direction.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::QueryBuild` if the column is not a valid
    /// identifier or the direction does not parse.
    pub fn new(column: &str, direction: &str) -> Result<Self> {
        if !is_sql_identifier(column) {
            return Err(RowmapError::QueryBuild(format!(
                "'{}' is not a valid column name",
                column
            )));
        }
        Ok(OrderClause {
            column: column.to_string(),
            direction: SortDirection::parse(direction)?,
        })
    }

    /// The clause text to append to the rest of the query.
    pub(crate) fn clause(&self) -> String {
        format!("ORDER BY {} {}", self.column, self.direction.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_spellings() {
        assert_eq!(SortDirection::parse("asc").unwrap(), SortDirection::Asc);
        assert_eq!(
            SortDirection::parse("Ascending").unwrap(),
            SortDirection::Asc
        );
        assert_eq!(SortDirection::parse("DESC").unwrap(), SortDirection::Desc);
        assert_eq!(
            SortDirection::parse("descending").unwrap(),
            SortDirection::Desc
        );
    }

    #[test]
    fn test_invalid_direction() {
        let result = SortDirection::parse("sideways");
        assert!(result.is_err());
        match result.unwrap_err() {
            RowmapError::QueryBuild(msg) => assert!(msg.contains("sideways")),
            other => panic!("Expected QueryBuild error, got {:?}", other),
        }
    }

    #[test]
    fn test_clause_text() {
        let clause = OrderClause::new("name", "ascending").unwrap();
        assert_eq!(clause.clause(), "ORDER BY name ASC");

        // 'asc' and 'ascending' compile identically.
        let short = OrderClause::new("name", "asc").unwrap();
        assert_eq!(short.clause(), clause.clause());
    }

    #[test]
    fn test_rejects_bad_column() {
        assert!(OrderClause::new("name; --", "asc").is_err());
    }
}
