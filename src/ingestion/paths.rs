//! Raw-file path helpers: path generation, discovery, ordering and output folders.

use std::fs;
use std::path::Path;

use crate::error::{PropsError, PropsResult};
use crate::types::Mode;

/// Path (or glob pattern, when `name` contains wildcards) of a raw file.
///
/// Layout: `{data_dir}/parquet_files/{mode}/{mode}_{name}.parquet`. No validation is done.
pub fn gen_file_path(data_dir: impl AsRef<Path>, name: &str, mode: Mode) -> String {
    format!(
        "{}/parquet_files/{mode}/{mode}_{name}.parquet",
        data_dir.as_ref().display()
    )
}

/// Sort multi-part file names (`{name}_{n}.parquet`) by their numeric part `n`.
///
/// Zero or one paths are returned unchanged without inspecting them. Equal part numbers keep
/// lexical path order.
///
/// # Errors
///
/// [`PropsError::InvalidPathSuffix`] if any path's part is not a number.
///
/// ```
/// use homecredit_props::ingestion::sort_paths;
///
/// let paths = vec!["a_2.parquet", "a_10.parquet", "a_1.parquet"]
///     .into_iter()
///     .map(String::from)
///     .collect();
/// assert_eq!(
///     sort_paths(paths).unwrap(),
///     vec!["a_1.parquet", "a_2.parquet", "a_10.parquet"]
/// );
/// ```
pub fn sort_paths(paths: Vec<String>) -> PropsResult<Vec<String>> {
    if paths.len() <= 1 {
        return Ok(paths);
    }

    let mut keyed = paths
        .into_iter()
        .map(|p| part_number(&p).map(|n| (n, p)))
        .collect::<PropsResult<Vec<_>>>()?;
    keyed.sort();
    Ok(keyed.into_iter().map(|(_, p)| p).collect())
}

/// Expand a glob pattern and order the matches with [`sort_paths`].
///
/// A pattern that matches nothing yields an empty list.
pub fn find_paths(pattern: &str) -> PropsResult<Vec<String>> {
    let mut found = Vec::new();
    for entry in glob::glob(pattern)? {
        found.push(entry?.to_string_lossy().into_owned());
    }
    sort_paths(found)
}

/// Ensure `path` exists as a directory.
///
/// With `rm`, an existing directory tree is removed first so the result is empty.
pub fn create_folder(path: impl AsRef<Path>, rm: bool) -> PropsResult<()> {
    let path = path.as_ref();
    if rm && path.exists() {
        fs::remove_dir_all(path)?;
    }
    fs::create_dir_all(path)?;
    Ok(())
}

// Text after the last '_' up to the first '.'.
fn part_number(path: &str) -> PropsResult<u64> {
    let tail = path.rsplit('_').next().unwrap_or(path);
    let part = tail.split('.').next().unwrap_or(tail);
    part.parse::<u64>()
        .map_err(|_| PropsError::InvalidPathSuffix {
            path: path.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_number_reads_trailing_segment() {
        assert_eq!(part_number("data/train_applprev_1_12.parquet").unwrap(), 12);
        assert_eq!(part_number("x_0.parquet").unwrap(), 0);
        assert!(part_number("train_static_cb.parquet").is_err());
    }

    #[test]
    fn gen_file_path_layout() {
        assert_eq!(
            gen_file_path("data", "applprev_1_*", Mode::Test),
            "data/parquet_files/test/test_applprev_1_*.parquet"
        );
    }

    #[test]
    fn singleton_is_not_inspected() {
        let one = vec!["no_number_here.parquet".to_string()];
        assert_eq!(sort_paths(one.clone()).unwrap(), one);
        assert!(sort_paths(Vec::new()).unwrap().is_empty());
    }
}
