//! Common test helpers shared across integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use ferrite_orm::{Connection, entity};
use ferrite_sql::SqliteStore;

// Common test entities used across multiple test files. Table names derive
// from the type names: `user` and `quiz`.

entity! {
    id = id,
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct User {
        pub id: i64,
        pub name: String,
        pub email: String,
    }
}

entity! {
    id = id,
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Quiz {
        pub id: i64,
        pub name: String,
        pub grade: i64,
    }
}

/// An in-memory store with the test schema applied.
///
/// The `quiz` table carries the `userid` foreign-key column pointing at
/// `user`; it is not a declared entity field, relationship operations
/// write it directly.
pub fn test_store() -> Arc<SqliteStore> {
    let store = SqliteStore::in_memory().expect("in-memory store");
    store
        .exec(
            "CREATE TABLE user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL DEFAULT ''
            )",
            &[],
        )
        .expect("create user table");
    store
        .exec(
            "CREATE TABLE quiz (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL DEFAULT '',
                grade INTEGER NOT NULL DEFAULT 0,
                userid INTEGER
            )",
            &[],
        )
        .expect("create quiz table");
    Arc::new(store)
}

/// Normalize SQL by collapsing whitespace.
fn normalize_sql(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalize SQL for comparison by removing identifier quotes and
/// normalizing whitespace. Preserves quotes inside string literals.
fn canonicalize_sql(sql: &str) -> String {
    let mut cleaned = String::with_capacity(sql.len());
    let mut in_single_quote = false;

    for ch in sql.chars() {
        match ch {
            '\'' => {
                in_single_quote = !in_single_quote;
                cleaned.push(ch);
            }
            '"' if !in_single_quote => {
                // Strip identifier quoting to avoid brittle comparisons.
            }
            _ => cleaned.push(ch),
        }
    }

    normalize_sql(&cleaned)
}

/// Assert that SQL contains all expected fragments in order.
///
/// Normalizes the SQL to avoid brittle exact-string matching with
/// ``SeaQuery`` output: strips identifier quotes, collapses whitespace,
/// and checks that fragments appear sequentially.
#[allow(clippy::missing_panics_doc)]
pub fn assert_sql_contains(actual: &str, fragments: &[&str]) {
    let actual_canonical = canonicalize_sql(actual);
    let mut search_start = 0usize;

    for fragment in fragments {
        let fragment_canonical = canonicalize_sql(fragment);
        if fragment_canonical.is_empty() {
            continue;
        }

        if let Some(pos) = actual_canonical[search_start..].find(&fragment_canonical) {
            search_start += pos + fragment_canonical.len();
        } else {
            panic!(
                "expected SQL fragment `{fragment_canonical}` not found in `{actual_canonical}`"
            );
        }
    }
}
