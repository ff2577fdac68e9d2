//! Building, persisting and reloading source-group metadata.
//!
//! Most callers should use [`write_data_props`], which:
//!
//! - loads the features table for the requested version
//! - fills every group of a [`crate::types::DataProps`] (structure, columns, dtypes, categorical
//!   domains, date features)
//! - optionally reports progress/failures/alerts to a [`BuildObserver`]
//! - writes the result to `{features_dir}/dfs_props_{version}.json`
//!
//! [`read_data_props`] loads it back for the feature-generation stage.

pub mod builder;
pub mod observability;
pub mod store;

pub use builder::{build_data_props, write_data_props, BuildOptions};
pub use observability::{
    BuildContext, BuildObserver, BuildSeverity, CompositeObserver, FileObserver, GroupStats, SchemaStats,
    StdErrObserver,
};
pub use store::{read_data_props, save_data_props};
