use std::marker::PhantomData;

use sea_query::{Alias, OnConflict, SimpleExpr, Value};

use crate::Result;
use crate::entity::Entity;
use crate::hydrate::params_from_values;
use crate::statement::{SqlBuilder, Statement};

/// Builder for INSERT statements, with optional upsert-on-conflict
/// semantics.
pub struct InsertBuilder<E: Entity> {
    table: String,
    values: Vec<(String, Value)>,
    conflict: Option<ConflictStrategy>,
    _marker: PhantomData<fn() -> E>,
}

enum ConflictStrategy {
    DoNothing { target: Vec<String> },
    DoUpdate { target: Vec<String>, columns: Vec<String> },
}

impl<E: Entity> Default for InsertBuilder<E> {
    fn default() -> Self {
        Self {
            table: E::table(),
            values: Vec::new(),
            conflict: None,
            _marker: PhantomData,
        }
    }
}

impl<E: Entity> InsertBuilder<E> {
    /// Creates a new INSERT builder for `E`'s table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column value for the insert.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.push((column.into(), value.into()));
        self
    }

    /// Declare the conflict target columns. Follow with
    /// [`do_update`](Self::do_update) or leave as-is for DO NOTHING.
    #[must_use]
    pub fn on_conflict(mut self, columns: &[&str]) -> Self {
        self.conflict = Some(ConflictStrategy::DoNothing {
            target: columns.iter().map(ToString::to_string).collect(),
        });
        self
    }

    /// On conflict, update the given columns with the excluded (new)
    /// values.
    #[must_use]
    pub fn do_update(mut self, columns: Vec<String>) -> Self {
        if let Some(conflict) = self.conflict.take() {
            let target = match conflict {
                ConflictStrategy::DoNothing { target }
                | ConflictStrategy::DoUpdate { target, .. } => target,
            };
            self.conflict = Some(ConflictStrategy::DoUpdate { target, columns });
        }
        self
    }

    /// On conflict, ignore the insert.
    #[must_use]
    pub fn do_nothing(mut self) -> Self {
        if let Some(conflict) = self.conflict.take() {
            let target = match conflict {
                ConflictStrategy::DoNothing { target }
                | ConflictStrategy::DoUpdate { target, .. } => target,
            };
            self.conflict = Some(ConflictStrategy::DoNothing { target });
        }
        self
    }

    /// Build the INSERT statement.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound value cannot be converted to a store
    /// parameter.
    pub fn build(self) -> Result<Statement> {
        let mut statement = sea_query::Query::insert();
        statement.into_table(Alias::new(&self.table));

        let columns: Vec<_> = self.values.iter().map(|(column, _)| Alias::new(column)).collect();
        let row: Vec<SimpleExpr> =
            self.values.into_iter().map(|(_, value)| SimpleExpr::Value(value)).collect();

        statement.columns(columns);
        statement.values_panic(row);

        if let Some(conflict) = self.conflict {
            let on_conflict = match conflict {
                ConflictStrategy::DoNothing { target } => {
                    OnConflict::columns(target.into_iter().map(Alias::new)).do_nothing().to_owned()
                }
                ConflictStrategy::DoUpdate { target, columns } => {
                    OnConflict::columns(target.into_iter().map(Alias::new))
                        .update_columns(columns.into_iter().map(Alias::new))
                        .to_owned()
                }
            };
            statement.on_conflict(on_conflict);
        }

        let (sql, values) = statement.build(SqlBuilder::default());
        let params = params_from_values(values)?;

        tracing::debug!(
            table = %self.table,
            sql = %sql,
            param_count = params.len(),
            "InsertBuilder generated SQL"
        );

        Ok(Statement { sql, params })
    }
}
