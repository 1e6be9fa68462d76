use sea_query::{JoinType, SimpleExpr};

use crate::filter::Filter;

/// A single-hop SQL join with a [`Filter`] ON condition.
#[derive(Clone, Debug)]
pub struct Join {
    table: String,
    on: Filter,
    kind: JoinKind,
}

/// Join types supported by the ORM. Relationship reads only ever span one
/// related table.
#[derive(Clone, Copy, Debug)]
pub enum JoinKind {
    /// INNER JOIN.
    Inner,
    /// LEFT JOIN.
    Left,
}

impl Join {
    /// Creates an INNER JOIN.
    #[must_use]
    pub fn inner(table: impl Into<String>, on: Filter) -> Self {
        Self { table: table.into(), on, kind: JoinKind::Inner }
    }

    /// Creates a LEFT JOIN.
    #[must_use]
    pub fn left(table: impl Into<String>, on: Filter) -> Self {
        Self { table: table.into(), on, kind: JoinKind::Left }
    }

    /// Resolve the ON condition against the primary table being selected
    /// from.
    pub(crate) fn into_join_spec(self, default_table: &str) -> JoinSpec {
        JoinSpec {
            table: self.table,
            on: self.on.into_expr(default_table),
            kind: self.kind.into_join_type(),
        }
    }
}

impl JoinKind {
    const fn into_join_type(self) -> JoinType {
        match self {
            Self::Inner => JoinType::InnerJoin,
            Self::Left => JoinType::LeftJoin,
        }
    }
}

/// Internal representation handed to ``SeaQuery``.
#[derive(Clone)]
pub(crate) struct JoinSpec {
    pub table: String,
    pub on: SimpleExpr,
    pub kind: JoinType,
}
