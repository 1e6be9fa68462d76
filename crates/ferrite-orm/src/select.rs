use std::marker::PhantomData;

use sea_query::{Alias, Asterisk, ColumnRef, Expr, Func, IntoIden, Order, SimpleExpr};

use crate::entity::Entity;
use crate::filter::Filter;
use crate::hydrate::params_from_values;
use crate::join::{Join, JoinSpec};
use crate::statement::{SqlBuilder, Statement};
use crate::Result;

/// Sort direction for an ORDER BY column.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Direction {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl Direction {
    /// Parse a direction token: a case-insensitive match on `"DESC"` sorts
    /// descending, anything else defaults to ascending.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        if token.eq_ignore_ascii_case("DESC") { Self::Desc } else { Self::Asc }
    }

    const fn into_order(self) -> Order {
        match self {
            Self::Asc => Order::Asc,
            Self::Desc => Order::Desc,
        }
    }
}

/// Builder for SELECT statements over one entity's table.
pub struct SelectBuilder<E: Entity> {
    table: String,
    filters: Vec<SimpleExpr>,
    order: Vec<(ColumnRef, Order)>,
    limit: Option<u64>,
    offset: Option<u64>,
    joins: Vec<JoinSpec>,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Entity> Default for SelectBuilder<E> {
    fn default() -> Self {
        Self {
            table: E::table(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
            joins: Vec::new(),
            _marker: PhantomData,
        }
    }
}

impl<E: Entity> SelectBuilder<E> {
    /// Creates a new SELECT builder for `E`'s table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a WHERE clause predicate. Multiple predicates are ANDed.
    #[must_use]
    pub fn r#where(mut self, filter: Filter) -> Self {
        let expr = filter.into_expr(&self.table);
        self.filters.push(expr);
        self
    }

    /// Adds an ORDER BY column, applied in call order.
    #[must_use]
    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        let column = table_column(&self.table, column);
        self.order.push((column, direction.into_order()));
        self
    }

    /// Sets the maximum number of rows to return.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the number of rows to skip.
    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Adds a JOIN clause.
    #[must_use]
    pub fn join(mut self, join: Join) -> Self {
        let spec = join.into_join_spec(&self.table);
        self.joins.push(spec);
        self
    }

    /// Build the SELECT statement. Projection is `E`'s persisted columns,
    /// qualified with its table; absent filters/sorts/joins omit their
    /// clauses entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound value cannot be converted to a store
    /// parameter.
    pub fn build(self) -> Result<Statement> {
        let mut statement = sea_query::Query::select();

        for column in E::columns() {
            statement.column(table_column(&self.table, column));
        }
        statement.from(Alias::new(&self.table));

        for JoinSpec { table, on, kind } in self.joins {
            statement.join(kind, Alias::new(table), on);
        }

        for filter in self.filters {
            statement.and_where(filter);
        }

        for (column, order) in self.order {
            statement.order_by(column, order);
        }

        if let Some(limit) = self.limit {
            statement.limit(limit);
        }

        if let Some(offset) = self.offset {
            statement.offset(offset);
        }

        let (sql, values) = statement.build(SqlBuilder::default());
        let params = params_from_values(values)?;

        tracing::debug!(
            table = %self.table,
            sql = %sql,
            param_count = params.len(),
            "SelectBuilder generated SQL"
        );

        Ok(Statement { sql, params })
    }

    /// Build a `COUNT(*)` statement over the same filters and joins,
    /// without ordering or pagination. The count is aliased `count`.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound value cannot be converted to a store
    /// parameter.
    pub fn build_count(self) -> Result<Statement> {
        let mut statement = sea_query::Query::select();

        statement.expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"));
        statement.from(Alias::new(&self.table));

        for JoinSpec { table, on, kind } in self.joins {
            statement.join(kind, Alias::new(table), on);
        }

        for filter in self.filters {
            statement.and_where(filter);
        }

        let (sql, values) = statement.build(SqlBuilder::default());
        let params = params_from_values(values)?;

        tracing::debug!(
            table = %self.table,
            sql = %sql,
            param_count = params.len(),
            "SelectBuilder generated COUNT SQL"
        );

        Ok(Statement { sql, params })
    }
}

pub(crate) fn table_column(table: &str, column: &str) -> ColumnRef {
    ColumnRef::TableColumn(Alias::new(table).into_iden(), Alias::new(column).into_iden())
}
