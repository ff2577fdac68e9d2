//! Parquet sample-file reading.
//!
//! Only the first train file of a pattern is read. Its frame provides the raw schema and the
//! observed values of categorical columns.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use polars::prelude::{DataFrame, DataType as PlDataType, ParquetReader, SerReader};

use crate::error::PropsResult;
use crate::types::{DataType, Field, Schema};

/// Read a whole Parquet file into a polars [`DataFrame`].
pub fn read_parquet_frame(path: impl AsRef<Path>) -> PropsResult<DataFrame> {
    let file = File::open(path.as_ref())?;
    Ok(ParquetReader::new(file).finish()?)
}

/// Raw (not yet normalized) schema of a frame, in column order.
pub fn frame_schema(df: &DataFrame) -> Schema {
    Schema::new(
        df.columns()
            .iter()
            .map(|c| Field::new(c.name().as_str(), convert_dtype(c.dtype())))
            .collect(),
    )
}

/// Map a polars storage dtype onto the crate's [`DataType`].
pub fn convert_dtype(dtype: &PlDataType) -> DataType {
    match dtype {
        PlDataType::Int64 => DataType::Int64,
        PlDataType::Float64 => DataType::Float64,
        PlDataType::Boolean => DataType::Bool,
        PlDataType::String => DataType::Utf8,
        PlDataType::Date => DataType::Date,
        PlDataType::Null => DataType::Null,
        other => DataType::Other(other.to_string()),
    }
}

/// Distinct non-null, non-empty values of `column`, rendered as strings, in first-seen order.
pub fn distinct_values(df: &DataFrame, column: &str) -> PropsResult<Vec<String>> {
    let rendered = df.column(column)?.cast(&PlDataType::String)?;
    let values = rendered.str()?;

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for v in values.into_iter().flatten() {
        if !v.is_empty() && seen.insert(v) {
            out.push(v.to_string());
        }
    }
    Ok(out)
}
