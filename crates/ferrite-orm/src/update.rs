use std::marker::PhantomData;

use sea_query::{Alias, SimpleExpr, Value};

use crate::Result;
use crate::entity::Entity;
use crate::filter::Filter;
use crate::hydrate::params_from_values;
use crate::statement::{SqlBuilder, Statement};

/// Builder for UPDATE statements.
pub struct UpdateBuilder<E: Entity> {
    table: String,
    set_clauses: Vec<(String, Value)>,
    filters: Vec<SimpleExpr>,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Entity> Default for UpdateBuilder<E> {
    fn default() -> Self {
        Self {
            table: E::table(),
            set_clauses: Vec::new(),
            filters: Vec::new(),
            _marker: PhantomData,
        }
    }
}

impl<E: Entity> UpdateBuilder<E> {
    /// Creates a new UPDATE builder for `E`'s table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column to a new value.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_clauses.push((column.into(), value.into()));
        self
    }

    /// Adds a WHERE clause predicate. Multiple predicates are ANDed.
    #[must_use]
    pub fn r#where(mut self, filter: Filter) -> Self {
        let expr = filter.into_expr(&self.table);
        self.filters.push(expr);
        self
    }

    /// Build the UPDATE statement.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound value cannot be converted to a store
    /// parameter.
    pub fn build(self) -> Result<Statement> {
        let mut statement = sea_query::Query::update();
        statement.table(Alias::new(&self.table));

        for (column, value) in self.set_clauses {
            statement.value(Alias::new(column), value);
        }

        for expr in self.filters {
            statement.and_where(expr);
        }

        let (sql, values) = statement.build(SqlBuilder::default());
        let params = params_from_values(values)?;

        tracing::debug!(
            table = %self.table,
            sql = %sql,
            param_count = params.len(),
            "UpdateBuilder generated SQL"
        );

        Ok(Statement { sql, params })
    }
}
