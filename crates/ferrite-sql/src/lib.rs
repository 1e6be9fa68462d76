#![doc = include_str!("../README.md")]

#![forbid(unsafe_code)]

mod sqlite;
mod types;

use anyhow::Result;
pub use sqlite::{ConnectOptions, SqliteStore};
pub use types::{DataType, Field, Row};

/// The single capability the ORM core requires of a data store.
///
/// Implementations prepare the given statement, bind `params` positionally,
/// execute, and surface results as column-name-keyed rows. Calls are
/// synchronous; cancellation and timeouts are properties of the underlying
/// driver, not of this trait.
pub trait Connection: Send + Sync {
    /// Execute a statement and fetch its result rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the statement.
    fn query(&self, sql: &str, params: &[DataType]) -> Result<Vec<Row>>;

    /// Execute a statement and report the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the statement.
    fn exec(&self, sql: &str, params: &[DataType]) -> Result<u64>;

    /// The identity value generated by the most recent insert on this
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot report a generated key.
    fn last_insert_id(&self) -> Result<i64>;
}
