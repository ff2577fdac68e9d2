//! Per-source-group metadata builder.

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{Config, KeyColumns};
use crate::error::{PropsError, PropsResult};
use crate::ingestion::features::{get_features_df, FeaturesTable};
use crate::ingestion::parquet::{distinct_values, frame_schema, read_parquet_frame};
use crate::ingestion::paths::find_paths;
use crate::schema::set_dtypes;
use crate::types::{DataProps, Mode, PatternStructure, SourceGroupProps};

use super::observability::{BuildContext, BuildObserver, BuildSeverity, GroupStats, SchemaStats};
use super::store::save_data_props;

/// Options controlling a build.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct BuildOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn BuildObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: BuildSeverity,
}

impl fmt::Debug for BuildOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: BuildSeverity::Critical,
        }
    }
}

/// Fill in every group of `dfs_props` from its `paths` patterns.
///
/// For each pattern the train and test files are discovered, the first train file is read for
/// its schema, dtypes are normalized, columns are renamed via the features table and the
/// categorical domains of `dummy` columns are collected. Results are accumulated per group.
///
/// When an observer is configured, progress is reported per group and pattern, and a failure is
/// reported once (with `on_alert` as well when its severity reaches `alert_at_or_above`).
///
/// # Errors
///
/// - [`PropsError::NoFilesMatched`] when a pattern has no train file
/// - I/O, CSV and Parquet errors from the underlying readers
/// - [`PropsError::InvalidPathSuffix`] when matched files cannot be ordered
pub fn build_data_props(
    dfs_props: &mut DataProps,
    version: &str,
    config: &Config,
    options: &BuildOptions,
) -> PropsResult<()> {
    let mut ctx = BuildContext::new(version);
    let result = build_all(dfs_props, version, config, options, &mut ctx);
    if let Err(e) = &result {
        report_failure(options, &ctx, e);
    }
    result
}

/// Build the metadata (see [`build_data_props`]) and write it to
/// `{features_dir}/dfs_props_{version}.json`.
///
/// Returns the path written.
pub fn write_data_props(
    dfs_props: &mut DataProps,
    version: &str,
    config: &Config,
    options: &BuildOptions,
) -> PropsResult<PathBuf> {
    build_data_props(dfs_props, version, config, options)?;

    let path = config.props_path(version);
    if let Err(e) = save_data_props(dfs_props, &path) {
        report_failure(options, &BuildContext::new(version), &e);
        return Err(e);
    }
    Ok(path)
}

fn build_all(
    dfs_props: &mut DataProps,
    version: &str,
    config: &Config,
    options: &BuildOptions,
    ctx: &mut BuildContext,
) -> PropsResult<()> {
    let features = get_features_df(dfs_props, version, config)?;
    let keys = config.key_columns();
    let base = BuildContext::new(version);

    for (name, props) in dfs_props.iter_mut() {
        *ctx = base.with_group(name);
        if let Some(obs) = options.observer.as_ref() {
            obs.on_group_started(ctx, props.paths.len());
        }

        let stats = build_group(name, props, &features, &keys, config, options, ctx)?;

        *ctx = base.with_group(name);
        if let Some(obs) = options.observer.as_ref() {
            obs.on_group_finished(ctx, stats);
        }
    }
    Ok(())
}

fn build_group(
    name: &str,
    props: &mut SourceGroupProps,
    features: &FeaturesTable,
    keys: &KeyColumns,
    config: &Config,
    options: &BuildOptions,
    ctx: &mut BuildContext,
) -> PropsResult<GroupStats> {
    let group_ctx = ctx.clone();
    let index = features.group_index(name);

    let mut structure = BTreeMap::new();
    let mut columns = BTreeSet::new();
    let mut columns_cat = BTreeMap::new();
    let mut columns_dtypes = BTreeMap::new();

    for pattern in &props.paths {
        *ctx = group_ctx.with_pattern(pattern);

        let mut entry = PatternStructure::default();
        for mode in Mode::ALL {
            entry.paths.set(mode, find_paths(&config.gen_file_path(pattern, mode))?);
        }
        let sample_path = entry
            .paths
            .train
            .first()
            .cloned()
            .ok_or_else(|| PropsError::NoFilesMatched {
                pattern: config.gen_file_path(pattern, Mode::Train),
            })?;

        // Dropped at the end of the iteration; only one sample frame is alive at a time.
        let df = read_parquet_frame(&sample_path)?;
        let schema = set_dtypes(frame_schema(&df), keys);

        if let Some(obs) = options.observer.as_ref() {
            obs.on_schema_read(
                ctx,
                &SchemaStats {
                    sample_path: sample_path.clone(),
                    train_files: entry.paths.train.len(),
                    test_files: entry.paths.test.len(),
                    columns: schema.fields.len(),
                    rows: df.height(),
                },
            );
        }

        for field in &schema.fields {
            let col = field.name.as_str();
            let descriptor = index.get(col);
            let mapped = descriptor.and_then(|d| d.rename_target()).unwrap_or(col);

            if descriptor.is_some_and(|d| d.is_dummy()) {
                columns_cat.insert(col.to_string(), distinct_values(&df, col)?);
            }
            entry.columns_map.insert(col.to_string(), mapped.to_string());
            columns.insert(mapped.to_string());
            columns_dtypes.insert(col.to_string(), field.data_type.clone());
        }

        entry.schema = schema;
        structure.insert(pattern.clone(), entry);
    }

    let stats = GroupStats {
        patterns: structure.len(),
        columns: columns.len(),
        categorical: columns_cat.len(),
    };

    props.structure = structure;
    props.columns = columns.into_iter().collect();
    props.columns_cat = columns_cat;
    props.columns_dtypes = columns_dtypes;
    props.columns_date_index = features.date_features(name);

    Ok(stats)
}

fn report_failure(options: &BuildOptions, ctx: &BuildContext, e: &PropsError) {
    if let Some(obs) = options.observer.as_ref() {
        let sev = severity_for_error(e);
        obs.on_failure(ctx, sev, e);
        if sev >= options.alert_at_or_above {
            obs.on_alert(ctx, sev, e);
        }
    }
}

fn severity_for_error(e: &PropsError) -> BuildSeverity {
    match e {
        PropsError::Io(_) => BuildSeverity::Critical,
        PropsError::Glob(_) => BuildSeverity::Critical,
        PropsError::Csv(err) => match err.kind() {
            csv::ErrorKind::Io(_) => BuildSeverity::Critical,
            _ => BuildSeverity::Error,
        },
        PropsError::Polars(err) => {
            // Polars wraps file errors without a stable structure; look for I/O in the chain.
            if error_chain_contains_io(err) {
                BuildSeverity::Critical
            } else {
                BuildSeverity::Error
            }
        }
        PropsError::Json(err) => {
            if err.is_io() {
                BuildSeverity::Critical
            } else {
                BuildSeverity::Error
            }
        }
        PropsError::GlobPattern(_) => BuildSeverity::Error,
        PropsError::NoFilesMatched { .. } => BuildSeverity::Error,
        PropsError::InvalidPathSuffix { .. } => BuildSeverity::Error,
        PropsError::SchemaMismatch { .. } => BuildSeverity::Error,
        PropsError::ParseError { .. } => BuildSeverity::Error,
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_failures_are_critical() {
        let io = PropsError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(severity_for_error(&io), BuildSeverity::Critical);
    }

    #[test]
    fn data_failures_are_errors() {
        let missing = PropsError::NoFilesMatched {
            pattern: "data/parquet_files/train/train_x_*.parquet".to_string(),
        };
        assert_eq!(severity_for_error(&missing), BuildSeverity::Error);

        let suffix = PropsError::InvalidPathSuffix {
            path: "train_x_a.parquet".to_string(),
        };
        assert_eq!(severity_for_error(&suffix), BuildSeverity::Error);
    }
}
