//! Table-name resolution.
//!
//! Table names are a pure function of the entity's fully-qualified type
//! name; two distinct entity types must not collapse to the same table
//! name (caller responsibility, not enforced here).

/// Derive a table name from a fully-qualified type name: the last
/// `::`-separated segment, ASCII-lowercased. A name with no separator is
/// lowercased whole.
#[must_use]
pub fn table_name(type_name: &str) -> String {
    type_name.rsplit("::").next().unwrap_or(type_name).to_ascii_lowercase()
}

/// The conventional foreign-key column pointing at `table`: `<table>id`.
#[must_use]
pub fn foreign_key(table: &str) -> String {
    format!("{table}id")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_module_path() {
        assert_eq!(table_name("crate::model::User"), "user");
        assert_eq!(table_name("ferrite::Quiz"), "quiz");
    }

    #[test]
    fn lowercases_bare_names() {
        assert_eq!(table_name("User"), "user");
        assert_eq!(table_name("HTTPLog"), "httplog");
    }

    #[test]
    fn stable_for_already_lower_names() {
        assert_eq!(table_name("user"), "user");
    }

    #[test]
    fn foreign_key_column() {
        assert_eq!(foreign_key("user"), "userid");
        assert_eq!(foreign_key("quiz"), "quizid");
    }
}
