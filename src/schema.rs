//! Suffix-based dtype normalization.
//!
//! Raw column names end in a one-letter type marker:
//!
//! | suffix   | dtype                  |
//! |----------|------------------------|
//! | `P`, `A` | [`DataType::Float64`]  |
//! | `M`      | [`DataType::Utf8`]     |
//! | `D`      | [`DataType::Date`]     |
//! | `T`, `L` | unchanged              |
//!
//! Key columns ([`KeyColumns`]) take precedence over the suffix.

use crate::config::KeyColumns;
use crate::types::{DataType, Schema};

/// Normalize the dtypes of `schema`, keeping field order.
///
/// ```
/// use homecredit_props::config::KeyColumns;
/// use homecredit_props::schema::set_dtypes;
/// use homecredit_props::types::{DataType, Field, Schema};
///
/// let keys = KeyColumns { integer: vec!["id".into()], date: vec![] };
/// let schema = Schema::new(vec![
///     Field::new("amt_P", DataType::Null),
///     Field::new("id", DataType::Null),
///     Field::new("flag_M", DataType::Null),
/// ]);
/// let out = set_dtypes(schema, &keys);
/// assert_eq!(out.data_type("amt_P"), Some(&DataType::Float64));
/// assert_eq!(out.data_type("id"), Some(&DataType::Int64));
/// assert_eq!(out.data_type("flag_M"), Some(&DataType::Utf8));
/// ```
pub fn set_dtypes(mut schema: Schema, keys: &KeyColumns) -> Schema {
    for field in &mut schema.fields {
        if let Some(dtype) = normalized_dtype(&field.name, keys) {
            field.data_type = dtype;
        }
    }
    schema
}

/// The dtype a column is forced to, or `None` when its inferred dtype stays.
pub fn normalized_dtype(name: &str, keys: &KeyColumns) -> Option<DataType> {
    if keys.is_integer(name) {
        return Some(DataType::Int64);
    }
    if keys.is_date(name) {
        return Some(DataType::Date);
    }
    match name.chars().last()? {
        'P' | 'A' => Some(DataType::Float64),
        'M' => Some(DataType::Utf8),
        'D' => Some(DataType::Date),
        // T (text-ish) and L (mixed) columns keep whatever the file stored.
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn key_columns_beat_suffix() {
        let keys = KeyColumns {
            integer: vec!["num_groupP".to_string()],
            date: vec!["decisionM".to_string()],
        };
        assert_eq!(normalized_dtype("num_groupP", &keys), Some(DataType::Int64));
        assert_eq!(normalized_dtype("decisionM", &keys), Some(DataType::Date));
    }

    #[test]
    fn unknown_suffix_and_empty_name_are_untouched() {
        let keys = Config::default().key_columns();
        assert_eq!(normalized_dtype("status_T", &keys), None);
        assert_eq!(normalized_dtype("count_L", &keys), None);
        assert_eq!(normalized_dtype("x", &keys), None);
        assert_eq!(normalized_dtype("", &keys), None);
    }
}
