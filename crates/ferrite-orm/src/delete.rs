use std::marker::PhantomData;

use sea_query::{Alias, SimpleExpr};

use crate::Result;
use crate::entity::Entity;
use crate::filter::Filter;
use crate::hydrate::params_from_values;
use crate::statement::{SqlBuilder, Statement};

/// Builder for DELETE statements.
pub struct DeleteBuilder<E: Entity> {
    table: String,
    filters: Vec<SimpleExpr>,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Entity> Default for DeleteBuilder<E> {
    fn default() -> Self {
        Self { table: E::table(), filters: Vec::new(), _marker: PhantomData }
    }
}

impl<E: Entity> DeleteBuilder<E> {
    /// Creates a new DELETE builder for `E`'s table.
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

    /// Build the DELETE statement.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound value cannot be converted to a store
    /// parameter.
    pub fn build(self) -> Result<Statement> {
        let mut statement = sea_query::Query::delete();
        statement.from_table(Alias::new(&self.table));

        for filter in self.filters {
            statement.and_where(filter);
        }

        let (sql, values) = statement.build(SqlBuilder::default());
        let params = params_from_values(values)?;

        tracing::debug!(
            table = %self.table,
            sql = %sql,
            param_count = params.len(),
            "DeleteBuilder generated SQL"
        );

        Ok(Statement { sql, params })
    }
}
