//! Reading the builder's inputs.
//!
//! - [`paths`]: raw-file path generation, glob discovery and part ordering
//! - [`features`]: the features description table (CSV)
//! - [`parquet`]: sample-file frames and their raw schemas

pub mod features;
pub mod parquet;
pub mod paths;

pub use features::{get_features_df, FeaturesTable};
pub use paths::{create_folder, find_paths, gen_file_path, sort_paths};
