use sea_query::Value;

use crate::{Result, Row, table};

/// Declares an ORM entity with automatic [`Entity`] trait implementation.
///
/// Every struct field is a persisted column whose column name is the field
/// name. `id = <field>` names the identity field; it must be one of the
/// declared fields (the generated impl does not compile otherwise), and the
/// macro accepts exactly one, so the "zero or multiple identity fields"
/// configuration error is a compile error rather than a query-time one.
///
/// The identity field is populated from the store's generated key after an
/// insert, so its type must convert from `i64`.
///
/// # Examples
///
/// ```ignore
/// entity! {
///     id = id,
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct User {
///         pub id: i64,
///         pub name: String,
///         pub email: String,
///     }
/// }
/// ```
#[macro_export]
macro_rules! entity {
    (
        id = $id_field:ident,
        $(#[$meta:meta])*
        pub struct $struct_name:ident {
            $(
                $(#[$field_meta:meta])*
                pub $field_name:ident : $field_type:ty
            ),* $(,)?
        }
    ) => {
        #[allow(missing_docs)]
        $(#[$meta])*
        pub struct $struct_name {
            $(
                $(#[$field_meta])*
                pub $field_name : $field_type
            ),*
        }

        impl $crate::Entity for $struct_name {
            fn type_name() -> &'static str {
                concat!(module_path!(), "::", stringify!($struct_name))
            }

            fn id_column() -> &'static str {
                stringify!($id_field)
            }

            fn columns() -> &'static [&'static str] {
                &[ $( stringify!($field_name) ),* ]
            }

            fn from_row(row: &$crate::Row) -> $crate::Result<Self> {
                Ok(Self {
                    $(
                        $field_name: <$field_type as $crate::FetchValue>::fetch(row, stringify!($field_name))?,
                    )*
                })
            }

            fn to_values(&self) -> Vec<(&'static str, $crate::Value)> {
                vec![
                    $(
                        (stringify!($field_name), self.$field_name.clone().into()),
                    )*
                ]
            }

            fn id_value(&self) -> $crate::Value {
                self.$id_field.clone().into()
            }

            fn assign_id(&mut self, id: i64) {
                self.$id_field = ::core::convert::Into::into(id);
            }
        }
    };
}

/// Per-type persistence metadata, discoverable without an instance.
///
/// Typically implemented via the [`entity!`](crate::entity) macro rather
/// than manually. Declaration order of [`columns`](Entity::columns) governs
/// both hydration and extraction, so SQL column lists and bound values
/// always agree.
pub trait Entity: Sized {
    /// The fully-qualified type name; the registry key and the input to
    /// table-name resolution.
    fn type_name() -> &'static str;

    /// The table this entity maps to, derived from the type name.
    #[must_use]
    fn table() -> String {
        table::table_name(Self::type_name())
    }

    /// Column name of the identity field.
    fn id_column() -> &'static str;

    /// Persisted column names, in declaration order.
    fn columns() -> &'static [&'static str];

    /// Construct an entity instance from a result row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Mapping`](crate::Error::Mapping) if a declared
    /// column is missing from the row or cannot be converted to the field
    /// type.
    fn from_row(row: &Row) -> Result<Self>;

    /// Extract all persisted values, column-keyed, in declaration order.
    fn to_values(&self) -> Vec<(&'static str, Value)>;

    /// Current value of the identity field.
    fn id_value(&self) -> Value;

    /// Set the identity field from a store-generated key.
    fn assign_id(&mut self, id: i64);
}
