use std::marker::PhantomData;
use std::sync::Arc;

use sea_query::Value;

use crate::delete::DeleteBuilder;
use crate::entity::Entity;
use crate::filter::Filter;
use crate::hydrate::{self, FetchValue};
use crate::insert::InsertBuilder;
use crate::join::Join;
use crate::select::{Direction, SelectBuilder};
use crate::update::UpdateBuilder;
use crate::{Connection, Error, Result, table};

/// Structured query criteria: ordered equality filters, ordered sorts, an
/// optional single-column substring search, and an optional related-type
/// foreign-key constraint.
///
/// Column names are trusted identifiers (see [`Filter`]); values are
/// always bound parameters. Empty criteria constrain nothing — the
/// corresponding SQL clauses are omitted entirely.
#[derive(Clone, Debug, Default)]
pub struct Criteria {
    pub(crate) filters: Vec<(String, Value)>,
    pub(crate) sorts: Vec<(String, Direction)>,
    pub(crate) search: Option<(String, String)>,
    pub(crate) foreign_key: Option<(String, i64)>,
}

impl Criteria {
    /// Creates empty criteria: no constraint in any clause.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality filter; multiple filters are ANDed.
    #[must_use]
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    /// Adds a sort column; sorts apply in the order they were added.
    #[must_use]
    pub fn sort(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.sorts.push((column.into(), direction));
        self
    }

    /// Constrains results to rows whose `column` contains `term`,
    /// case-insensitively. ANDed with the equality filters.
    #[must_use]
    pub fn search(mut self, column: impl Into<String>, term: impl Into<String>) -> Self {
        self.search = Some((column.into(), term.into()));
        self
    }

    /// Constrains results to rows whose `<R's table>id` column equals
    /// `id`.
    #[must_use]
    pub fn related_to<R: Entity>(mut self, id: i64) -> Self {
        self.foreign_key = Some((table::foreign_key(&R::table()), id));
        self
    }
}

/// Query and mutation operations for one entity type.
///
/// A repository owns its store connection handle; entity instances are
/// transient, caller-owned values. Absence on point lookups is `Ok(None)`,
/// never an error.
pub struct Repository<E: Entity> {
    conn: Arc<dyn Connection>,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Entity> core::fmt::Debug for Repository<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Repository").finish_non_exhaustive()
    }
}

impl<E: Entity> Repository<E> {
    /// Creates a repository issuing statements through `conn`.
    #[must_use]
    pub fn new(conn: Arc<dyn Connection>) -> Self {
        Self { conn, _marker: PhantomData }
    }

    /// Single-row lookup by identity value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store rejects the statement, or
    /// [`Error::Mapping`] if the matched row cannot be hydrated.
    pub fn find(&self, id: i64) -> Result<Option<E>> {
        let stmt =
            SelectBuilder::<E>::new().r#where(Filter::eq(E::id_column(), id)).limit(1).build()?;
        let rows = self.conn.query(&stmt.sql, &stmt.params)?;
        rows.first().map(hydrate::hydrate).transpose()
    }

    /// First row matching the criteria's equality filters, in no defined
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store rejects the statement, or
    /// [`Error::Mapping`] if the matched row cannot be hydrated.
    pub fn find_one_by(&self, criteria: &Criteria) -> Result<Option<E>> {
        let stmt = self.select_from(criteria).limit(1).build()?;
        let rows = self.conn.query(&stmt.sql, &stmt.params)?;
        rows.first().map(hydrate::hydrate).transpose()
    }

    /// Rows matching the criteria, ordered by its sorts, then paginated.
    /// Pagination is always applied; zero matches yield an empty vec.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store rejects the statement, or
    /// [`Error::Mapping`] if a matched row cannot be hydrated.
    pub fn find_by(&self, criteria: &Criteria, offset: u64, limit: u64) -> Result<Vec<E>> {
        let stmt = self.select_from(criteria).offset(offset).limit(limit).build()?;
        let rows = self.conn.query(&stmt.sql, &stmt.params)?;
        hydrate::hydrate_many(&rows)
    }

    /// Insert the entity, or update the existing row's columns in place if
    /// the store reports an identity conflict.
    ///
    /// Columns whose extracted value is unset (SQL NULL or an empty
    /// string) are omitted from the statement — a partial entity never
    /// overwrites stored columns with emptiness. Numeric zero and `false`
    /// are persisted. When the store generates a new identity, it is
    /// assigned back onto the entity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Mapping`] if no persisted value survives the unset
    /// filter, or [`Error::Store`] for constraint violations and
    /// connectivity failures.
    pub fn upsert(&self, entity: &mut E) -> Result<()> {
        let (id_column, id_value) = hydrate::identity(entity);
        let id_set = !hydrate::id_is_unset(&id_value);

        let mut builder = InsertBuilder::<E>::new();
        let mut update_columns = Vec::new();
        let mut bound = 0usize;

        for (column, value) in hydrate::extract(entity) {
            if column == id_column {
                if id_set {
                    builder = builder.set(column, value);
                    bound += 1;
                }
                continue;
            }
            if hydrate::is_unset(&value) {
                tracing::debug!(table = %E::table(), column, "omitting unset column from upsert");
                continue;
            }
            update_columns.push(column.to_string());
            builder = builder.set(column, value);
            bound += 1;
        }

        if bound == 0 {
            return Err(Error::Mapping("no persisted values to upsert".to_string()));
        }

        if id_set {
            builder = builder.on_conflict(&[id_column]);
            if !update_columns.is_empty() {
                builder = builder.do_update(update_columns);
            }
        }

        let stmt = builder.build()?;
        self.conn.exec(&stmt.sql, &stmt.params)?;

        if !id_set {
            let id = self.conn.last_insert_id()?;
            hydrate::assign_identity(entity, id);
        }

        Ok(())
    }

    /// Delete the row matching the entity's identity. Returns whether a
    /// row was removed; deleting an entity with no persisted row is a
    /// `false` result, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store rejects the statement.
    pub fn delete(&self, entity: &E) -> Result<bool> {
        let (id_column, id_value) = hydrate::identity(entity);
        let stmt = DeleteBuilder::<E>::new().r#where(Filter::eq(id_column, id_value)).build()?;
        let removed = self.conn.exec(&stmt.sql, &stmt.params)?;
        Ok(removed > 0)
    }

    /// Point the owner's `<R's table>id` column at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store rejects the statement.
    pub fn set_foreign_key<R: Entity>(&self, key: i64, owner: &E) -> Result<()> {
        let (id_column, id_value) = hydrate::identity(owner);
        let stmt = UpdateBuilder::<E>::new()
            .set(table::foreign_key(&R::table()), key)
            .r#where(Filter::eq(id_column, id_value))
            .build()?;
        self.conn.exec(&stmt.sql, &stmt.params)?;
        Ok(())
    }

    /// The single related entity the owner's foreign-key column points at:
    /// `R` joined to the owner's table on `r.id = owner.<r's table>id`,
    /// filtered to the owner's identity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store rejects the statement, or
    /// [`Error::Mapping`] if the matched row cannot be hydrated.
    pub fn related_one<R: Entity>(&self, owner: &E) -> Result<Option<R>> {
        let owner_table = E::table();
        let related_table = R::table();
        let on = Filter::col_eq(
            related_table.clone(),
            R::id_column(),
            owner_table.clone(),
            table::foreign_key(&related_table),
        );
        let stmt = SelectBuilder::<R>::new()
            .join(Join::inner(owner_table.clone(), on))
            .r#where(Filter::table_eq(owner_table, E::id_column(), owner.id_value()))
            .limit(1)
            .build()?;
        let rows = self.conn.query(&stmt.sql, &stmt.params)?;
        rows.first().map(hydrate::hydrate).transpose()
    }

    /// The related entities whose own `<owner's table>id` column equals
    /// the owner's identity; possibly empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store rejects the statement, or
    /// [`Error::Mapping`] if a matched row cannot be hydrated.
    pub fn related_many<R: Entity>(&self, owner: &E) -> Result<Vec<R>> {
        let stmt = SelectBuilder::<R>::new()
            .r#where(Filter::eq(table::foreign_key(&E::table()), owner.id_value()))
            .build()?;
        let rows = self.conn.query(&stmt.sql, &stmt.params)?;
        hydrate::hydrate_many(&rows)
    }

    /// Count rows matching the criteria's filters, foreign-key constraint,
    /// and substring search. Sorts and pagination do not apply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store rejects the statement, or
    /// [`Error::Mapping`] if the store returns no countable result.
    pub fn count(&self, criteria: &Criteria) -> Result<u64> {
        let stmt = self.select_from(criteria).build_count()?;
        let rows = self.conn.query(&stmt.sql, &stmt.params)?;
        let row = rows
            .first()
            .ok_or_else(|| Error::Mapping("count query returned no rows".to_string()))?;
        u64::fetch(row, "count")
    }

    fn select_from(&self, criteria: &Criteria) -> SelectBuilder<E> {
        let mut builder = SelectBuilder::new();
        for (column, value) in &criteria.filters {
            builder = builder.r#where(Filter::eq(column.clone(), value.clone()));
        }
        if let Some((column, id)) = &criteria.foreign_key {
            builder = builder.r#where(Filter::eq(column.clone(), *id));
        }
        if let Some((column, term)) = &criteria.search {
            builder = builder.r#where(Filter::contains(column.clone(), term.clone()));
        }
        for (column, direction) in &criteria.sorts {
            builder = builder.order_by(column, *direction);
        }
        builder
    }
}
