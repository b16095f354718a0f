//! Property-based tests for the query compiler
//!
//! These tests verify the correctness of SQL compilation through
//! property-based testing, ensuring that:
//! - Compiled text and bound parameters always stay in lockstep
//! - Conjunction keywords join conditions without stray WHERE keywords
//! - Builder argument validation holds for all inputs

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rowmap::{Db, Repository, SortDirection};

    fn users_db() -> Db {
        let db = Db::open_in_memory().unwrap();
        db.with_connection(|conn| {
            conn.execute_batch(
                "CREATE TABLE users (
                    id INTEGER PRIMARY KEY,
                    username TEXT,
                    age INTEGER
                )",
            )?;
            Ok(())
        })
        .unwrap();
        db
    }

    fn arb_column_name() -> impl Strategy<Value = String> {
        "[a-zA-Z][a-zA-Z0-9_]{0,20}".prop_map(|s: String| s)
    }

    fn arb_operator() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("=".to_string()),
            Just("!=".to_string()),
            Just("<".to_string()),
            Just(">".to_string()),
            Just("<=".to_string()),
            Just(">=".to_string()),
            Just("LIKE".to_string()),
            Just("like".to_string()),
        ]
    }

    fn arb_conjunction() -> impl Strategy<Value = bool> {
        any::<bool>()
    }

    proptest! {
        #[test]
        fn compiled_placeholders_match_params(
            terms in prop::collection::vec(
                (arb_column_name(), arb_operator(), any::<i64>(), arb_conjunction()),
                0..8,
            )
        ) {
            let db = users_db();
            let repo = Repository::open(&db, "users").unwrap();

            let mut select = repo.all();
            for (column, operator, value, is_and) in &terms {
                select = if *is_and {
                    select.and_where(column, operator, *value).unwrap()
                } else {
                    select.or_where(column, operator, *value).unwrap()
                };
            }

            let (sql, params) = select.compile();
            let placeholders = sql.matches('?').count();
            prop_assert_eq!(placeholders, params.len());
            prop_assert_eq!(params.len(), terms.len());
            prop_assert!(sql.starts_with("SELECT * FROM users"));
            prop_assert_eq!(sql.contains(" WHERE "), !terms.is_empty());
            // Only the first condition opens the WHERE clause; later ones
            // carry a bare conjunction keyword.
            prop_assert_eq!(sql.matches("WHERE").count(), usize::from(!terms.is_empty()));
        }

        #[test]
        fn bound_values_follow_condition_order(
            values in prop::collection::vec(any::<i64>(), 1..6)
        ) {
            let db = users_db();
            let repo = Repository::open(&db, "users").unwrap();

            let mut select = repo.all();
            for value in &values {
                select = select.and_where("age", "=", *value).unwrap();
            }

            let (_, params) = select.compile();
            let bound: Vec<i64> = params.iter().filter_map(|v| v.as_integer()).collect();
            prop_assert_eq!(bound, values);
        }

        #[test]
        fn limit_validation(n in any::<i64>()) {
            let db = users_db();
            let repo = Repository::open(&db, "users").unwrap();

            let result = repo.all().limit(n);
            prop_assert_eq!(result.is_ok(), n >= 1);

            let result = repo.all().offset(n);
            prop_assert_eq!(result.is_ok(), n >= 1);
        }

        #[test]
        fn direction_parsing(input in "[a-zA-Z]{0,12}") {
            let parsed = SortDirection::parse(&input);
            let lowered = input.to_lowercase();
            let expected = matches!(
                lowered.as_str(),
                "asc" | "ascending" | "desc" | "descending"
            );
            prop_assert_eq!(parsed.is_ok(), expected);
        }

        #[test]
        fn pagination_clause_shape(
            limit in prop::option::of(1i64..1000),
            offset in prop::option::of(1i64..1000),
        ) {
            let db = users_db();
            let repo = Repository::open(&db, "users").unwrap();

            let mut select = repo.all();
            if let Some(l) = limit {
                select = select.limit(l).unwrap();
            }
            if let Some(o) = offset {
                select = select.offset(o).unwrap();
            }
            let (sql, _) = select.compile();

            match (limit, offset) {
                (Some(l), Some(o)) => {
                    let expected = format!("LIMIT {} OFFSET {}", l, o);
                    prop_assert!(sql.ends_with(&expected));
                }
                (Some(l), None) => {
                    let expected = format!("LIMIT {}", l);
                    prop_assert!(sql.ends_with(&expected));
                    prop_assert!(!sql.contains("OFFSET"));
                }
                (None, Some(o)) => {
                    let expected = format!("OFFSET {}", o);
                    prop_assert!(sql.ends_with(&expected));
                    prop_assert!(sql.contains("LIMIT"));
                }
                (None, None) => {
                    prop_assert!(!sql.contains("LIMIT"));
                    prop_assert!(!sql.contains("OFFSET"));
                }
            }
        }
    }
}
