use sea_query::backend::{
    EscapeBuilder, OperLeftAssocDecider, PrecedenceDecider, QuotedBuilder, TableRefBuilder,
};
use sea_query::prepare::SqlWriter;
use sea_query::{BinOper, Oper, Quote, SimpleExpr, SubQueryStatement, Value};

use crate::DataType;

/// A built, executable statement: SQL text plus its bound parameters.
///
/// Parameter/placeholder agreement holds by construction — every value the
/// builder renders a placeholder for is pushed onto `params`, in order.
pub struct Statement {
    /// SQL text with placeholders.
    pub sql: String,
    /// Bound parameter values, in placeholder order.
    pub params: Vec<DataType>,
}

/// ``SeaQuery`` backend controlling quoting and placeholder style.
pub struct SqlBuilder {
    /// Identifier quote character.
    pub quote: Quote,
    /// Placeholder token: `"?"` or `"$"`.
    pub placeholder: &'static str,
    /// `false` for bare `?`, `true` for numbered `$1, $2, ...`.
    pub numbered: bool,
}

impl Default for SqlBuilder {
    // unnumbered `?` suits SQLite and MySQL drivers; use "$"/true for
    // Postgres
    fn default() -> Self {
        Self { quote: Quote::new(b'"'), placeholder: "?", numbered: false }
    }
}

impl QuotedBuilder for SqlBuilder {
    fn quote(&self) -> Quote {
        self.quote
    }
}

impl EscapeBuilder for SqlBuilder {}

impl TableRefBuilder for SqlBuilder {}

impl OperLeftAssocDecider for SqlBuilder {
    fn well_known_left_associative(&self, op: &BinOper) -> bool {
        matches!(
            op,
            BinOper::And | BinOper::Or | BinOper::Add | BinOper::Sub | BinOper::Mul | BinOper::Mod
        )
    }
}

impl PrecedenceDecider for SqlBuilder {
    fn inner_expr_well_known_greater_precedence(
        &self, _inner: &SimpleExpr, _outer_oper: &Oper,
    ) -> bool {
        // conservative: always parenthesize
        false
    }
}

impl sea_query::backend::QueryBuilder for SqlBuilder {
    fn prepare_query_statement(&self, query: &SubQueryStatement, sql: &mut dyn SqlWriter) {
        match query {
            SubQueryStatement::SelectStatement(s) => self.prepare_select_statement(s, sql),
            SubQueryStatement::InsertStatement(s) => self.prepare_insert_statement(s, sql),
            SubQueryStatement::UpdateStatement(s) => self.prepare_update_statement(s, sql),
            SubQueryStatement::DeleteStatement(s) => self.prepare_delete_statement(s, sql),
            SubQueryStatement::WithStatement(s) => self.prepare_with_query(s, sql),
        }
    }

    fn prepare_value(&self, value: &Value, sql: &mut dyn SqlWriter) {
        sql.push_param(value.clone(), self);
    }

    fn placeholder(&self) -> (&str, bool) {
        (self.placeholder, self.numbered)
    }
}
