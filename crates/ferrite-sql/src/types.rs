//! Wire types exchanged with the store.
//!
//! A result set is a sequence of [`Row`]s, each a list of named [`Field`]s.
//! Values are typed, nullable scalars; `None` in a variant payload is SQL
//! NULL carrying the column's nominal type.

/// A typed, nullable scalar value bound to or fetched from the store.
#[derive(Clone, Debug, PartialEq)]
pub enum DataType {
    /// Boolean column value.
    Boolean(Option<bool>),
    /// 32-bit signed integer column value.
    Int32(Option<i32>),
    /// 64-bit signed integer column value.
    Int64(Option<i64>),
    /// 32-bit unsigned integer column value.
    Uint32(Option<u32>),
    /// 64-bit unsigned integer column value.
    Uint64(Option<u64>),
    /// 32-bit float column value.
    Float(Option<f32>),
    /// 64-bit float column value.
    Double(Option<f64>),
    /// Text column value.
    Str(Option<String>),
    /// Binary column value.
    Binary(Option<Vec<u8>>),
    /// Date column value, formatted `%Y-%m-%d`.
    Date(Option<String>),
    /// Time column value, formatted `%H:%M:%S%.f`.
    Time(Option<String>),
    /// Timestamp column value, RFC 3339 or `%Y-%m-%d %H:%M:%S%.f`.
    Timestamp(Option<String>),
}

/// A single named column value within a row.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    /// Column name as reported by the driver.
    pub name: String,
    /// Column value.
    pub value: DataType,
}

/// One result row, keyed by column name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    /// Columns in driver-reported order.
    pub fields: Vec<Field>,
}

impl Row {
    /// Look up a column value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DataType> {
        self.fields.iter().find(|field| field.name == name).map(|field| &field.value)
    }
}
