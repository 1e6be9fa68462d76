//! Minimal metadata-driven ORM.
//!
//! Maps plain entity structs to relational table rows, builds
//! parameterized SQL from structured criteria, and resolves single-hop
//! foreign-key relationships. The data store is consumed through the
//! [`Connection`] trait from `ferrite-sql`.
//!
//! # Quick Start
//!
//! ## Define an Entity
//!
//! ```ignore
//! entity! {
//!     id = id,
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct User {
//!         pub id: i64,
//!         pub name: String,
//!         pub email: String,
//!     }
//! }
//! ```
//!
//! The table name is derived from the type name (`User` → `user`); column
//! names are field names; `id = id` marks the identity field, populated
//! from the store's generated key after an insert.
//!
//! ## Repository Operations
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use ferrite_orm::{Criteria, Direction, Registry, Repository};
//! use ferrite_sql::SqliteStore;
//!
//! let store = Arc::new(SqliteStore::in_memory()?);
//! let users = Repository::<User>::new(store.clone());
//!
//! // Insert: the generated id lands back on the entity
//! let mut user = User { name: "ciwawa".into(), email: "a@b.c".into(), ..User::default() };
//! users.upsert(&mut user)?;
//!
//! // Point lookup: absence is Ok(None), never an error
//! let found = users.find(user.id)?;
//!
//! // Filtered, sorted, paginated, searched
//! let page = users.find_by(
//!     &Criteria::new()
//!         .filter("name", "ciwawa")
//!         .sort("email", Direction::Desc)
//!         .search("email", "b.c"),
//!     0,
//!     20,
//! )?;
//!
//! let total = users.count(&Criteria::new().filter("name", "ciwawa"))?;
//! users.delete(&user)?;
//! ```
//!
//! ## Relationships
//!
//! Single-hop foreign keys through `<table>id` columns:
//!
//! ```ignore
//! // quiz.userid = user.id
//! quizzes.set_foreign_key::<User>(user.id, &quiz)?;
//!
//! let owner: Option<User> = quizzes.related_one::<User>(&quiz)?;
//! let taken: Vec<Quiz> = users.related_many::<Quiz>(&user)?;
//! ```
//!
//! ## Registry
//!
//! ```ignore
//! let registry = Registry::new();
//! registry.add(Repository::<User>::new(store.clone()));
//! registry.add(Repository::<Quiz>::new(store));
//!
//! registry.save(&mut user)?;            // via the User repository
//! let repo = registry.repository::<Quiz>()?;
//! ```

#![forbid(unsafe_code)]

mod delete;
mod entity;
mod error;
mod filter;
mod hydrate;
mod insert;
mod join;
mod registry;
mod repository;
mod select;
mod statement;
mod table;
mod update;

pub use delete::DeleteBuilder;
pub use entity::Entity;
pub use error::{Error, Result};
pub use filter::Filter;
// Re-export store boundary types used in entity fetches and statement
// parameters.
pub use ferrite_sql::{Connection, DataType, Field, Row};
pub use hydrate::{FetchValue, assign_identity, extract, hydrate, hydrate_many, identity};
pub use insert::InsertBuilder;
pub use join::{Join, JoinKind};
pub use registry::Registry;
pub use repository::{Criteria, Repository};
// Bound-value type for filters, criteria, and extraction; re-exported so
// callers never import ``SeaQuery`` directly.
pub use sea_query::Value;
pub use select::{Direction, SelectBuilder};
pub use statement::{SqlBuilder, Statement};
pub use table::{foreign_key, table_name};
pub use update::UpdateBuilder;
