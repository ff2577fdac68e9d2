//! Path and key-column configuration.
//!
//! Everything has a built-in default; [`Config::from_json_path`] overrides any subset of keys.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PropsResult;
use crate::ingestion::paths;
use crate::types::Mode;

/// Run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the raw data (contains `parquet_files/{train,test}`).
    pub data_dir: PathBuf,
    /// Directory holding `features_{version}.csv` and the written metadata.
    pub features_dir: PathBuf,
    /// Identity column.
    pub col_id: String,
    /// Week-number column.
    pub col_week: String,
    /// Decision date column.
    pub col_date: String,
    /// Depth/group-number columns of nested tables.
    pub group_columns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            features_dir: PathBuf::from("data/features"),
            col_id: "case_id".to_string(),
            col_week: "WEEK_NUM".to_string(),
            col_date: "date_decision".to_string(),
            group_columns: vec!["num_group1".to_string(), "num_group2".to_string()],
        }
    }
}

/// Columns whose dtype is fixed regardless of their suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyColumns {
    /// Forced to `Int64`.
    pub integer: Vec<String>,
    /// Forced to `Date`.
    pub date: Vec<String>,
}

impl KeyColumns {
    pub fn is_integer(&self, name: &str) -> bool {
        self.integer.iter().any(|c| c == name)
    }

    pub fn is_date(&self, name: &str) -> bool {
        self.date.iter().any(|c| c == name)
    }
}

impl Config {
    /// Load configuration from a JSON file. Missing keys take their default value.
    pub fn from_json_path(path: impl AsRef<Path>) -> PropsResult<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Key columns consumed by [`crate::schema::set_dtypes`].
    pub fn key_columns(&self) -> KeyColumns {
        let mut integer = vec![self.col_id.clone(), self.col_week.clone()];
        integer.extend(self.group_columns.iter().cloned());
        KeyColumns {
            integer,
            date: vec![self.col_date.clone()],
        }
    }

    /// Glob pattern for the raw files of `name` in `mode`.
    pub fn gen_file_path(&self, name: &str, mode: Mode) -> String {
        paths::gen_file_path(&self.data_dir, name, mode)
    }

    /// Path of the features description table for `version`.
    pub fn features_path(&self, version: &str) -> PathBuf {
        self.features_dir.join(format!("features_{version}.csv"))
    }

    /// Path the metadata for `version` is written to.
    pub fn props_path(&self, version: &str) -> PathBuf {
        self.features_dir.join(format!("dfs_props_{version}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"data_dir": "/mnt/raw"}"#).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/mnt/raw"));
        assert_eq!(cfg.col_id, "case_id");
        assert_eq!(cfg.group_columns.len(), 2);
    }

    #[test]
    fn key_columns_cover_id_week_and_groups() {
        let keys = Config::default().key_columns();
        for c in ["case_id", "WEEK_NUM", "num_group1", "num_group2"] {
            assert!(keys.is_integer(c), "{c} should be integer");
        }
        assert!(keys.is_date("date_decision"));
        assert!(!keys.is_integer("date_decision"));
    }

    #[test]
    fn versioned_paths() {
        let cfg = Config {
            features_dir: PathBuf::from("feat"),
            ..Default::default()
        };
        assert_eq!(cfg.features_path("v2"), PathBuf::from("feat/features_v2.csv"));
        assert_eq!(cfg.props_path("v2"), PathBuf::from("feat/dfs_props_v2.json"));
    }
}
