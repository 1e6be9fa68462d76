use sea_query::{Expr, ExprTrait, Func, SimpleExpr, Value};

use crate::select::table_column;

/// A WHERE-clause predicate, kept independent of ``SeaQuery`` types at the
/// API surface.
///
/// Column and table names are trusted identifiers taken verbatim into SQL
/// text; values are always bound parameters, never interpolated. For
/// variants with an optional table, `None` qualifies the column with the
/// entity's own table.
#[derive(Clone, Debug)]
pub enum Filter {
    /// [table.]column = value
    Eq(Option<String>, String, Value),
    /// Case-insensitive substring match:
    /// LOWER([table.]column) LIKE '%term%'
    Contains(Option<String>, String, String),
    /// Column-to-column equality: table1.col1 = table2.col2 (join
    /// conditions)
    ColEq(String, String, String, String),
}

impl Filter {
    /// Creates an equality filter (column = value).
    #[must_use]
    pub fn eq(col: impl Into<String>, val: impl Into<Value>) -> Self {
        Self::Eq(None, col.into(), val.into())
    }

    /// Creates a table-qualified equality filter (table.column = value).
    #[must_use]
    pub fn table_eq(
        table: impl Into<String>, col: impl Into<String>, val: impl Into<Value>,
    ) -> Self {
        Self::Eq(Some(table.into()), col.into(), val.into())
    }

    /// Creates a case-insensitive substring filter on a column.
    #[must_use]
    pub fn contains(col: impl Into<String>, term: impl Into<String>) -> Self {
        Self::Contains(None, col.into(), term.into())
    }

    /// Creates a column-to-column equality filter (table1.col1 =
    /// table2.col2). Both tables are named explicitly since the columns
    /// come from different tables.
    #[must_use]
    pub fn col_eq(
        table1: impl Into<String>, col1: impl Into<String>, table2: impl Into<String>,
        col2: impl Into<String>,
    ) -> Self {
        Self::ColEq(table1.into(), col1.into(), table2.into(), col2.into())
    }

    /// Convert the filter into a ``SeaQuery`` expression, qualifying
    /// unqualified columns with `default_table`.
    #[must_use]
    pub(crate) fn into_expr(self, default_table: &str) -> SimpleExpr {
        match self {
            Self::Eq(tbl, col, val) => {
                Expr::col(table_column(tbl.as_deref().unwrap_or(default_table), &col)).eq(val)
            }
            Self::Contains(tbl, col, term) => {
                let column = table_column(tbl.as_deref().unwrap_or(default_table), &col);
                let pattern = format!("%{}%", term.to_lowercase());
                Expr::expr(Func::lower(Expr::col(column))).like(pattern)
            }
            Self::ColEq(tbl1, col1, tbl2, col2) => {
                let left = table_column(&tbl1, &col1);
                let right = table_column(&tbl2, &col2);
                Expr::col(left).eq(Expr::col(right))
            }
        }
    }
}
