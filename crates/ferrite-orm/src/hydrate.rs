//! Row-to-entity and entity-to-values conversion.
//!
//! Hydration sets every persisted field of an entity from a
//! column-name-keyed [`Row`]; extraction reads them back into a
//! column-keyed value list in metadata declaration order. Both directions
//! dispatch purely on the entity's declared metadata, so adding an entity
//! type requires no change here.
//!
//! Inbound conversions are lenient toward drivers that collapse the
//! numeric taxonomy: `SQLite` reports every integer as `Int64`, booleans as
//! 0/1 integers, and temporal values as text. The declared Rust field type
//! governs, with checked narrowing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sea_query::{Value, Values};

use crate::{DataType, Entity, Error, Result, Row};

/// Convert a result row into a typed entity.
///
/// The caller is responsible for mapping "zero rows" to an absent result
/// before calling this; a row that is present but incomplete is a mapping
/// error, never "not found".
///
/// # Errors
///
/// Returns [`Error::Mapping`] if a declared column is missing from the row
/// or its value cannot be converted to the declared field type.
pub fn hydrate<E: Entity>(row: &Row) -> Result<E> {
    E::from_row(row)
}

/// Convert each result row into a typed entity. Zero rows produce an empty
/// vec, not an error.
///
/// # Errors
///
/// Returns [`Error::Mapping`] on the first row that fails to hydrate.
pub fn hydrate_many<E: Entity>(rows: &[Row]) -> Result<Vec<E>> {
    rows.iter().map(E::from_row).collect()
}

/// Extract an entity's persisted values, column-keyed, in declaration
/// order. The same extraction feeds both SQL column lists and bound
/// parameters.
#[must_use]
pub fn extract<E: Entity>(entity: &E) -> Vec<(&'static str, Value)> {
    entity.to_values()
}

/// The identity column name and the entity's current identity value.
#[must_use]
pub fn identity<E: Entity>(entity: &E) -> (&'static str, Value) {
    (E::id_column(), entity.id_value())
}

/// Set the identity field from a store-generated key, after an insert.
pub fn assign_identity<E: Entity>(entity: &mut E, id: i64) {
    entity.assign_id(id);
}

/// Trait for types that can be fetched from a result row by column name.
///
/// Implemented for the standard scalar types; implement it for newtypes to
/// use them as entity fields.
pub trait FetchValue: Sized {
    /// Fetch a value from a row by column name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Mapping`] if the column is missing or the value
    /// cannot be converted to the target type.
    fn fetch(row: &Row, col: &str) -> Result<Self>;
}

// Extraction policy helpers

/// A value treated as "unset" for persistence: SQL NULL or an empty
/// string. Such columns are omitted from insert/update statements so a
/// partial entity never overwrites stored data with emptiness. Numeric
/// zero and `false` are legitimate values and are persisted.
pub(crate) fn is_unset(value: &Value) -> bool {
    match value {
        Value::String(Some(s)) => s.is_empty(),
        _ => is_null_value(value),
    }
}

/// Unset check for the identity column: an unpersisted entity carries a
/// zero key, which must not be inserted.
pub(crate) fn id_is_unset(value: &Value) -> bool {
    is_unset(value)
        || matches!(
            value,
            Value::TinyInt(Some(0))
                | Value::SmallInt(Some(0))
                | Value::Int(Some(0))
                | Value::BigInt(Some(0))
                | Value::TinyUnsigned(Some(0))
                | Value::SmallUnsigned(Some(0))
                | Value::Unsigned(Some(0))
                | Value::BigUnsigned(Some(0))
        )
}

const fn is_null_value(value: &Value) -> bool {
    matches!(
        value,
        Value::Bool(None)
            | Value::TinyInt(None)
            | Value::SmallInt(None)
            | Value::Int(None)
            | Value::BigInt(None)
            | Value::TinyUnsigned(None)
            | Value::SmallUnsigned(None)
            | Value::Unsigned(None)
            | Value::BigUnsigned(None)
            | Value::Float(None)
            | Value::Double(None)
            | Value::String(None)
            | Value::Char(None)
            | Value::Bytes(None)
            | Value::ChronoDate(None)
            | Value::ChronoTime(None)
            | Value::ChronoDateTime(None)
            | Value::ChronoDateTimeUtc(None)
    )
}

// Outbound conversion: bound values for built statements

pub(crate) fn params_from_values(values: Values) -> Result<Vec<DataType>> {
    values.into_iter().map(value_to_param).collect()
}

fn value_to_param(value: Value) -> Result<DataType> {
    let param = match value {
        Value::Bool(v) => DataType::Boolean(v),
        Value::TinyInt(v) => DataType::Int32(v.map(i32::from)),
        Value::SmallInt(v) => DataType::Int32(v.map(i32::from)),
        Value::Int(v) => DataType::Int32(v),
        Value::BigInt(v) => DataType::Int64(v),
        Value::TinyUnsigned(v) => DataType::Uint32(v.map(u32::from)),
        Value::SmallUnsigned(v) => DataType::Uint32(v.map(u32::from)),
        Value::Unsigned(v) => DataType::Uint32(v),
        Value::BigUnsigned(v) => DataType::Uint64(v),
        Value::Float(v) => DataType::Float(v),
        Value::Double(v) => DataType::Double(v),
        Value::String(v) => DataType::Str(v.map(|value| *value)),
        Value::Char(v) => DataType::Str(v.map(|ch| ch.to_string())),
        Value::Bytes(v) => DataType::Binary(v.map(|bytes| *bytes)),
        Value::ChronoDate(v) => DataType::Date(v.map(|value| {
            let date = *value;
            date.to_string() // "%Y-%m-%d"
        })),
        Value::ChronoTime(v) => DataType::Time(v.map(|value| {
            let time = *value;
            time.to_string() // "%H:%M:%S%.f"
        })),
        Value::ChronoDateTime(v) => DataType::Timestamp(v.map(|value| {
            let dt = *value;
            dt.to_string() // "%Y-%m-%d %H:%M:%S%.f"
        })),
        Value::ChronoDateTimeUtc(v) => DataType::Timestamp(v.map(|value| {
            let dt: DateTime<Utc> = *value;
            dt.to_rfc3339()
        })),
        _ => {
            return Err(Error::Mapping(
                "unsupported value requires explicit conversion before building the statement"
                    .to_string(),
            ));
        }
    };
    Ok(param)
}

// Inbound conversion

impl FetchValue for bool {
    fn fetch(row: &Row, col: &str) -> Result<Self> {
        as_bool(row_field(row, col)?)
    }
}

impl FetchValue for i32 {
    fn fetch(row: &Row, col: &str) -> Result<Self> {
        as_i32(row_field(row, col)?)
    }
}

impl FetchValue for i64 {
    fn fetch(row: &Row, col: &str) -> Result<Self> {
        as_i64(row_field(row, col)?)
    }
}

impl FetchValue for u32 {
    fn fetch(row: &Row, col: &str) -> Result<Self> {
        as_u32(row_field(row, col)?)
    }
}

impl FetchValue for u64 {
    fn fetch(row: &Row, col: &str) -> Result<Self> {
        as_u64(row_field(row, col)?)
    }
}

impl FetchValue for f32 {
    fn fetch(row: &Row, col: &str) -> Result<Self> {
        as_f32(row_field(row, col)?)
    }
}

impl FetchValue for f64 {
    fn fetch(row: &Row, col: &str) -> Result<Self> {
        as_f64(row_field(row, col)?)
    }
}

impl FetchValue for String {
    fn fetch(row: &Row, col: &str) -> Result<Self> {
        as_string(row_field(row, col)?)
    }
}

impl FetchValue for Vec<u8> {
    fn fetch(row: &Row, col: &str) -> Result<Self> {
        as_binary(row_field(row, col)?)
    }
}

impl FetchValue for DateTime<Utc> {
    fn fetch(row: &Row, col: &str) -> Result<Self> {
        as_timestamp(row_field(row, col)?)
    }
}

impl FetchValue for NaiveDate {
    fn fetch(row: &Row, col: &str) -> Result<Self> {
        as_date(row_field(row, col)?)
    }
}

impl FetchValue for serde_json::Value {
    fn fetch(row: &Row, col: &str) -> Result<Self> {
        as_json(row_field(row, col)?)
    }
}

impl<T: FetchValue> FetchValue for Option<T> {
    // A declared column must be present in the row even when nullable;
    // only a present NULL maps to None.
    fn fetch(row: &Row, col: &str) -> Result<Self> {
        let field = row_field(row, col)?;
        if is_null(field) { Ok(None) } else { Ok(Some(T::fetch(row, col)?)) }
    }
}

fn row_field<'a>(row: &'a Row, name: &str) -> Result<&'a DataType> {
    row.get(name).ok_or_else(|| Error::Mapping(format!("missing column '{name}'")))
}

const fn is_null(value: &DataType) -> bool {
    matches!(
        value,
        DataType::Boolean(None)
            | DataType::Int32(None)
            | DataType::Int64(None)
            | DataType::Uint32(None)
            | DataType::Uint64(None)
            | DataType::Float(None)
            | DataType::Double(None)
            | DataType::Str(None)
            | DataType::Binary(None)
            | DataType::Date(None)
            | DataType::Time(None)
            | DataType::Timestamp(None)
    )
}

fn expected(kind: &str, got: &DataType) -> Error {
    Error::Mapping(format!("expected {kind} data type, got {got:?}"))
}

fn out_of_range(kind: &str) -> Error {
    Error::Mapping(format!("value out of range for {kind}"))
}

fn as_bool(value: &DataType) -> Result<bool> {
    match value {
        DataType::Boolean(Some(v)) => Ok(*v),
        DataType::Int32(Some(v)) => Ok(*v != 0),
        DataType::Int64(Some(v)) => Ok(*v != 0),
        _ => Err(expected("boolean", value)),
    }
}

fn as_i32(value: &DataType) -> Result<i32> {
    match value {
        DataType::Int32(Some(v)) => Ok(*v),
        DataType::Int64(Some(v)) => i32::try_from(*v).map_err(|_| out_of_range("int32")),
        DataType::Uint32(Some(v)) => i32::try_from(*v).map_err(|_| out_of_range("int32")),
        _ => Err(expected("int32", value)),
    }
}

fn as_i64(value: &DataType) -> Result<i64> {
    match value {
        DataType::Int64(Some(v)) => Ok(*v),
        DataType::Int32(Some(v)) => Ok(i64::from(*v)),
        DataType::Uint32(Some(v)) => Ok(i64::from(*v)),
        DataType::Uint64(Some(v)) => i64::try_from(*v).map_err(|_| out_of_range("int64")),
        _ => Err(expected("int64", value)),
    }
}

fn as_u32(value: &DataType) -> Result<u32> {
    match value {
        DataType::Uint32(Some(v)) => Ok(*v),
        DataType::Uint64(Some(v)) => u32::try_from(*v).map_err(|_| out_of_range("uint32")),
        DataType::Int32(Some(v)) => u32::try_from(*v).map_err(|_| out_of_range("uint32")),
        DataType::Int64(Some(v)) => u32::try_from(*v).map_err(|_| out_of_range("uint32")),
        _ => Err(expected("uint32", value)),
    }
}

fn as_u64(value: &DataType) -> Result<u64> {
    match value {
        DataType::Uint64(Some(v)) => Ok(*v),
        DataType::Uint32(Some(v)) => Ok(u64::from(*v)),
        DataType::Int32(Some(v)) => u64::try_from(*v).map_err(|_| out_of_range("uint64")),
        DataType::Int64(Some(v)) => u64::try_from(*v).map_err(|_| out_of_range("uint64")),
        _ => Err(expected("uint64", value)),
    }
}

fn as_f32(value: &DataType) -> Result<f32> {
    match value {
        DataType::Float(Some(v)) => Ok(*v),
        #[allow(clippy::cast_possible_truncation)]
        DataType::Double(Some(v)) => Ok(*v as f32),
        _ => Err(expected("float", value)),
    }
}

fn as_f64(value: &DataType) -> Result<f64> {
    match value {
        DataType::Double(Some(v)) => Ok(*v),
        DataType::Float(Some(v)) => Ok(f64::from(*v)),
        _ => Err(expected("double", value)),
    }
}

fn as_string(value: &DataType) -> Result<String> {
    match value {
        DataType::Str(Some(raw)) => Ok(raw.clone()),
        _ => Err(expected("string", value)),
    }
}

fn as_binary(value: &DataType) -> Result<Vec<u8>> {
    match value {
        DataType::Binary(Some(bytes)) => Ok(bytes.clone()),
        _ => Err(expected("binary", value)),
    }
}

fn as_timestamp(value: &DataType) -> Result<DateTime<Utc>> {
    match value {
        DataType::Timestamp(Some(raw)) | DataType::Str(Some(raw)) => {
            if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
                return Ok(parsed.with_timezone(&Utc));
            }

            if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
                return Ok(DateTime::<Utc>::from_naive_utc_and_offset(parsed, Utc));
            }

            Err(Error::Mapping(format!(
                "unsupported timestamp: {raw}; expected RFC3339 or \"%Y-%m-%d %H:%M:%S%.f\" format"
            )))
        }
        _ => Err(expected("timestamp", value)),
    }
}

fn as_date(value: &DataType) -> Result<NaiveDate> {
    match value {
        DataType::Date(Some(raw)) | DataType::Str(Some(raw)) => {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_e| {
                Error::Mapping(format!("unsupported date: {raw}; expected \"%Y-%m-%d\" format"))
            })
        }
        _ => Err(expected("date", value)),
    }
}

fn as_json(value: &DataType) -> Result<serde_json::Value> {
    match value {
        DataType::Str(Some(raw)) => {
            serde_json::from_str(raw).map_err(|e| Error::Mapping(format!("invalid json: {e}")))
        }
        DataType::Binary(Some(bytes)) => {
            serde_json::from_slice(bytes).map_err(|e| Error::Mapping(format!("invalid json: {e}")))
        }
        _ => Err(expected("json compatible", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_conversions_accept_driver_collapsed_integers() {
        // SQLite reports all integers as Int64
        assert_eq!(as_i32(&DataType::Int64(Some(42))).unwrap(), 42);
        assert_eq!(as_i64(&DataType::Int32(Some(7))).unwrap(), 7);
        assert_eq!(as_u32(&DataType::Int64(Some(9))).unwrap(), 9);
        assert_eq!(as_u64(&DataType::Int64(Some(11))).unwrap(), 11);
        assert!(as_bool(&DataType::Int64(Some(1))).unwrap());
        assert!(!as_bool(&DataType::Int64(Some(0))).unwrap());
    }

    #[test]
    fn narrowing_is_checked() {
        as_i32(&DataType::Int64(Some(i64::from(i32::MAX) + 1))).unwrap_err();
        as_u32(&DataType::Int64(Some(-1))).unwrap_err();
        as_u64(&DataType::Int32(Some(-5))).unwrap_err();
    }

    #[test]
    fn type_mismatches_are_mapping_errors() {
        let err = as_string(&DataType::Int32(Some(3))).unwrap_err();
        assert!(matches!(err, Error::Mapping(_)));
        as_binary(&DataType::Str(Some("not binary".to_string()))).unwrap_err();
        as_i64(&DataType::Boolean(Some(true))).unwrap_err();
    }

    #[test]
    fn timestamp_parses_both_formats() {
        let rfc = as_timestamp(&DataType::Timestamp(Some("2024-01-15T10:30:45Z".to_string())))
            .unwrap();
        assert_eq!(rfc.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-15 10:30:45");

        // driver-as-text fallback
        let text =
            as_timestamp(&DataType::Str(Some("2024-01-15 10:30:45.123".to_string()))).unwrap();
        assert_eq!(text.format("%H:%M:%S").to_string(), "10:30:45");

        let err = as_timestamp(&DataType::Timestamp(Some("invalid".to_string()))).unwrap_err();
        assert!(err.to_string().contains("unsupported timestamp"));
    }

    #[test]
    fn date_parses_iso_format() {
        let date = as_date(&DataType::Str(Some("2024-01-15".to_string()))).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        as_date(&DataType::Str(Some("15/01/2024".to_string()))).unwrap_err();
    }

    #[test]
    fn json_from_text_and_binary() {
        let from_text = as_json(&DataType::Str(Some(r#"{"a":1}"#.to_string()))).unwrap();
        assert_eq!(from_text["a"], 1);
        let from_bytes = as_json(&DataType::Binary(Some(b"[1,2]".to_vec()))).unwrap();
        assert_eq!(from_bytes.as_array().unwrap().len(), 2);
        as_json(&DataType::Str(Some("not json".to_string()))).unwrap_err();
    }

    #[test]
    fn unset_values_are_null_or_empty_string() {
        assert!(is_unset(&Value::String(None)));
        assert!(is_unset(&Value::String(Some(Box::new(String::new())))));
        assert!(is_unset(&Value::BigInt(None)));

        // zero and false are legitimate values
        assert!(!is_unset(&Value::Int(Some(0))));
        assert!(!is_unset(&Value::BigInt(Some(0))));
        assert!(!is_unset(&Value::Bool(Some(false))));
        assert!(!is_unset(&Value::String(Some(Box::new("x".to_string())))));
    }

    #[test]
    fn identity_zero_counts_as_unset() {
        assert!(id_is_unset(&Value::BigInt(Some(0))));
        assert!(id_is_unset(&Value::Int(Some(0))));
        assert!(id_is_unset(&Value::BigInt(None)));
        assert!(!id_is_unset(&Value::BigInt(Some(7))));
    }

    #[test]
    fn value_to_param_scalar_types() {
        assert_eq!(value_to_param(Value::Bool(Some(true))).unwrap(), DataType::Boolean(Some(true)));
        assert_eq!(value_to_param(Value::Int(Some(42))).unwrap(), DataType::Int32(Some(42)));
        assert_eq!(value_to_param(Value::BigInt(Some(9))).unwrap(), DataType::Int64(Some(9)));
        assert_eq!(
            value_to_param(Value::String(Some(Box::new("test".to_string())))).unwrap(),
            DataType::Str(Some("test".to_string()))
        );
        assert_eq!(
            value_to_param(Value::Bytes(Some(Box::new(vec![1, 2, 3])))).unwrap(),
            DataType::Binary(Some(vec![1, 2, 3]))
        );
        assert_eq!(value_to_param(Value::String(None)).unwrap(), DataType::Str(None));
    }

    #[test]
    fn value_to_param_temporal_types() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            value_to_param(Value::ChronoDate(Some(Box::new(date)))).unwrap(),
            DataType::Date(Some("2024-01-15".to_string()))
        );

        let dt: DateTime<Utc> = "2024-01-15T10:30:45Z".parse().unwrap();
        let param = value_to_param(Value::ChronoDateTimeUtc(Some(Box::new(dt)))).unwrap();
        let DataType::Timestamp(Some(raw)) = param else {
            panic!("expected timestamp");
        };
        assert!(raw.starts_with("2024-01-15T10:30:45"));
    }

    #[test]
    fn option_fetch_treats_present_null_as_none() {
        use ferrite_sql::Field;

        let row = Row {
            fields: vec![Field { name: "a".to_string(), value: DataType::Str(None) }],
        };
        assert_eq!(Option::<String>::fetch(&row, "a").unwrap(), None);

        let row = Row {
            fields: vec![Field {
                name: "a".to_string(),
                value: DataType::Str(Some("x".to_string())),
            }],
        };
        assert_eq!(Option::<String>::fetch(&row, "a").unwrap(), Some("x".to_string()));
    }

    #[test]
    fn option_fetch_rejects_missing_columns() {
        use ferrite_sql::Field;

        // schema drift: a declared nullable column absent from the row is
        // a mapping error, not None
        let row = Row {
            fields: vec![Field { name: "a".to_string(), value: DataType::Int64(Some(1)) }],
        };
        let err = Option::<String>::fetch(&row, "absent").unwrap_err();
        assert!(matches!(err, Error::Mapping(_)));
        assert!(err.to_string().contains("missing column 'absent'"));
    }
}
