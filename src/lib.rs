//! `homecredit-props` prepares metadata for a tabular credit-risk dataset whose raw data is split
//! into many Parquet files per *source group*.
//!
//! Given a map of source group -> raw file-name patterns, the builder:
//!
//! - locates the train/test files of each pattern (`{data_dir}/parquet_files/{mode}/{mode}_{pattern}.parquet`)
//! - reads the first train file of each pattern for its schema
//! - normalizes dtypes by the column-name suffix convention (see [`schema`])
//! - renames columns and flags categorical ones using the features table
//!   (`{features_dir}/features_{version}.csv`)
//! - aggregates everything per source group and writes it to
//!   `{features_dir}/dfs_props_{version}.json`
//!
//! ## Quick example
//!
//! ```no_run
//! use homecredit_props::config::Config;
//! use homecredit_props::props::{read_data_props, write_data_props, BuildOptions};
//! use homecredit_props::types::{DataProps, SourceGroupProps};
//!
//! # fn main() -> Result<(), homecredit_props::PropsError> {
//! let config = Config::default();
//! let mut dfs_props = DataProps::new();
//! dfs_props.insert(
//!     "applprev".to_string(),
//!     SourceGroupProps::new(["applprev_1_*", "applprev_2"]),
//! );
//!
//! let path = write_data_props(&mut dfs_props, "old", &config, &BuildOptions::default())?;
//! let reloaded = read_data_props(&path)?;
//! assert_eq!(reloaded, dfs_props);
//! println!("columns={:?}", dfs_props["applprev"].columns);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`props`]: the builder, its observers, and the on-disk store
//! - [`ingestion`]: path discovery, the features table, Parquet sample files
//! - [`schema`]: suffix-based dtype normalization
//! - [`config`]: data/features directories and key column names
//! - [`types`]: schema + metadata types
//! - [`error`]: error types used across the crate

pub mod config;
pub mod error;
pub mod ingestion;
pub mod props;
pub mod schema;
pub mod types;

pub use error::{PropsError, PropsResult};
