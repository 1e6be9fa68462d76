//! Default `SQLite` implementation of the [`Connection`] trait.
//!
//! A lightweight store for development and tests. `rusqlite` connections
//! are not `Sync`, so the handle lives behind a mutex; each statement is
//! its own implicit transaction at the store level.

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Connection as RusqliteConnection, params_from_iter};

use crate::{Connection, DataType, Field, Row};

/// Options used to open the SQL database.
#[derive(Clone, Debug)]
pub struct ConnectOptions {
    /// Database path or URI.
    pub database: String,
}

impl ConnectOptions {
    /// Resolve connection options from the environment.
    ///
    /// Reads `SQL_DATABASE`, defaulting to a shared in-memory database.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            database: env::var("SQL_DATABASE")
                .unwrap_or_else(|_| "file::memory:?cache=shared".to_string()),
        }
    }
}

/// A `SQLite`-backed store connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<parking_lot::Mutex<RusqliteConnection>>,
}

impl SqliteStore {
    /// Open the database named by `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database path cannot be opened.
    pub fn connect_with(options: &ConnectOptions) -> Result<Self> {
        tracing::debug!("opening SQLite database: {}", options.database);
        let conn = RusqliteConnection::open(&options.database)
            .context("failed to open SQLite database")?;
        Ok(Self { conn: Arc::new(parking_lot::Mutex::new(conn)) })
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn =
            RusqliteConnection::open_in_memory().context("failed to open in-memory database")?;
        Ok(Self { conn: Arc::new(parking_lot::Mutex::new(conn)) })
    }
}

impl Connection for SqliteStore {
    fn query(&self, sql: &str, params: &[DataType]) -> Result<Vec<Row>> {
        tracing::debug!("executing query: {sql}");
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql).context("failed to prepare statement")?;

        let bound: Vec<_> = params.iter().map(to_sqlite_value).collect();
        let column_names: Vec<String> =
            stmt.column_names().iter().map(ToString::to_string).collect();

        let mut rows =
            stmt.query(params_from_iter(bound.iter())).context("failed to execute query")?;

        let mut result_rows = Vec::new();
        while let Some(row) = rows.next().context("failed to fetch row")? {
            let mut fields = Vec::new();
            for (i, name) in column_names.iter().enumerate() {
                let value = row.get_ref(i).context("failed to get column value")?;
                fields.push(Field { name: name.clone(), value: from_sqlite_value(value)? });
            }
            result_rows.push(Row { fields });
        }

        Ok(result_rows)
    }

    fn exec(&self, sql: &str, params: &[DataType]) -> Result<u64> {
        tracing::debug!("executing statement: {sql}");
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql).context("failed to prepare statement")?;

        let bound: Vec<_> = params.iter().map(to_sqlite_value).collect();
        let affected =
            stmt.execute(params_from_iter(bound.iter())).context("failed to execute statement")?;

        Ok(affected as u64)
    }

    fn last_insert_id(&self) -> Result<i64> {
        Ok(self.conn.lock().last_insert_rowid())
    }
}

fn to_sqlite_value(value: &DataType) -> rusqlite::types::Value {
    match value {
        DataType::Boolean(Some(b)) => rusqlite::types::Value::Integer(i64::from(*b)),
        DataType::Int32(Some(i)) => rusqlite::types::Value::Integer(i64::from(*i)),
        DataType::Int64(Some(i)) => rusqlite::types::Value::Integer(*i),
        DataType::Uint32(Some(u)) => rusqlite::types::Value::Integer(i64::from(*u)),
        #[allow(clippy::cast_possible_wrap)]
        DataType::Uint64(Some(u)) => rusqlite::types::Value::Integer(*u as i64),
        DataType::Float(Some(f)) => rusqlite::types::Value::Real(f64::from(*f)),
        DataType::Double(Some(f)) => rusqlite::types::Value::Real(*f),
        DataType::Str(Some(s)) => rusqlite::types::Value::Text(s.clone()),
        DataType::Binary(Some(b)) => rusqlite::types::Value::Blob(b.clone()),
        DataType::Date(Some(s)) | DataType::Time(Some(s)) | DataType::Timestamp(Some(s)) => {
            rusqlite::types::Value::Text(s.clone())
        }
        // all None variants map to NULL
        _ => rusqlite::types::Value::Null,
    }
}

fn from_sqlite_value(value: ValueRef) -> Result<DataType> {
    match value {
        ValueRef::Null => Ok(DataType::Str(None)),
        ValueRef::Integer(i) => Ok(DataType::Int64(Some(i))),
        ValueRef::Real(f) => Ok(DataType::Double(Some(f))),
        ValueRef::Text(t) => {
            let s = std::str::from_utf8(t).context("invalid UTF-8 in text value")?;
            Ok(DataType::Str(Some(s.to_string())))
        }
        ValueRef::Blob(b) => Ok(DataType::Binary(Some(b.to_vec()))),
    }
}
