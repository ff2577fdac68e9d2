//! Features description table (CSV) loading.
//!
//! The table has one row per raw feature with at least the columns `source_group`, `new_name`,
//! `agg` and `date_col`. The feature name is taken from a `feature` column when there is one,
//! otherwise from the first column. Empty cells read as empty strings; other cells are kept
//! verbatim (no whitespace trimming).

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::config::Config;
use crate::error::{PropsError, PropsResult};
use crate::types::{DataProps, FeatureDescriptor};

const KEY_COLUMN: &str = "feature";
const REQUIRED_COLUMNS: [&str; 4] = ["source_group", "new_name", "agg", "date_col"];

/// In-memory features description table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeaturesTable {
    rows: Vec<FeatureDescriptor>,
}

impl FeaturesTable {
    /// Read the table from a CSV file with headers.
    pub fn from_path(path: impl AsRef<Path>) -> PropsResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;
        Self::from_reader(&mut rdr)
    }

    /// Read the table from an existing CSV reader.
    pub fn from_reader<R: Read>(rdr: &mut csv::Reader<R>) -> PropsResult<Self> {
        let headers = rdr.headers()?.clone();

        let key_idx = headers.iter().position(|h| h == KEY_COLUMN).unwrap_or(0);
        let mut col_idxs = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in col_idxs.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers.iter().position(|h| h == name).ok_or_else(|| {
                PropsError::SchemaMismatch {
                    message: format!(
                        "missing required column '{name}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>()
                    ),
                }
            })?;
        }
        let [group_idx, new_name_idx, agg_idx, date_idx] = col_idxs;

        let mut rows = Vec::new();
        for (row_idx0, result) in rdr.records().enumerate() {
            // 1-based, plus the header row.
            let user_row = row_idx0 + 2;
            let record = result?;
            // Verbatim: a `new_name` of " " is a rename target, not a blank.
            let cell = |idx: usize| record.get(idx).unwrap_or("").to_string();

            rows.push(FeatureDescriptor {
                feature: cell(key_idx),
                source_group: cell(group_idx),
                new_name: cell(new_name_idx),
                agg: cell(agg_idx),
                is_date: parse_date_flag(user_row, record.get(date_idx).unwrap_or(""))?,
            });
        }

        Ok(Self { rows })
    }

    /// All rows, in file order.
    pub fn rows(&self) -> &[FeatureDescriptor] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep only rows whose source group satisfies `keep`.
    pub fn retain_groups<F>(mut self, mut keep: F) -> Self
    where
        F: FnMut(&str) -> bool,
    {
        self.rows.retain(|r| keep(&r.source_group));
        self
    }

    /// Rows of one source group, in file order.
    pub fn group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a FeatureDescriptor> + 'a {
        self.rows.iter().filter(move |r| r.source_group == group)
    }

    /// Lookup by feature name within one source group. The first row wins on duplicates.
    pub fn group_index<'a>(&'a self, group: &'a str) -> HashMap<&'a str, &'a FeatureDescriptor> {
        let mut index = HashMap::new();
        for row in self.group(group) {
            index.entry(row.feature.as_str()).or_insert(row);
        }
        index
    }

    /// Look up one feature of one source group.
    pub fn get(&self, group: &str, feature: &str) -> Option<&FeatureDescriptor> {
        self.rows
            .iter()
            .find(|r| r.source_group == group && r.feature == feature)
    }

    /// Names of the features flagged as date columns in a source group.
    pub fn date_features(&self, group: &str) -> Vec<String> {
        self.group(group)
            .filter(|r| r.is_date)
            .map(|r| r.feature.clone())
            .collect()
    }
}

/// Load `features_{version}.csv` and keep only the source groups present in `dfs_props`.
///
/// Reads from disk on every call.
pub fn get_features_df(dfs_props: &DataProps, version: &str, config: &Config) -> PropsResult<FeaturesTable> {
    let table = FeaturesTable::from_path(config.features_path(version))?;
    Ok(table.retain_groups(|g| dfs_props.contains_key(g)))
}

// `date_col` is numeric in practice (`1`, `1.0`, blank); only a value equal to 1 flags a date.
fn parse_date_flag(row: usize, raw: &str) -> PropsResult<bool> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(false);
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        return Ok(v == 1.0);
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" => Ok(true),
        "false" | "f" | "no" | "n" => Ok(false),
        _ => Err(PropsError::ParseError {
            row,
            column: "date_col".to_string(),
            raw: raw.to_string(),
            message: "expected a number or bool".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_flag_values() {
        assert!(parse_date_flag(2, "1").unwrap());
        assert!(parse_date_flag(2, "1.0").unwrap());
        assert!(!parse_date_flag(2, "0").unwrap());
        assert!(!parse_date_flag(2, " ").unwrap());
        assert!(parse_date_flag(2, "TRUE").unwrap());
        assert!(parse_date_flag(7, "maybe").is_err());
    }
}
