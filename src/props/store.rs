//! Serialized metadata on disk (JSON).

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::PropsResult;
use crate::types::DataProps;

/// Write the metadata of all groups to `path`, replacing any existing file.
///
/// The JSON is written to `{path}.tmp` next to the target and renamed over it once complete, so a
/// failed write never leaves a truncated file at `path`.
pub fn save_data_props(props: &DataProps, path: impl AsRef<Path>) -> PropsResult<()> {
    let path = path.as_ref();
    let tmp = tmp_path(path);

    let written = write_json(props, &tmp).and_then(|()| Ok(fs::rename(&tmp, path)?));
    if written.is_err() && tmp.is_file() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

/// Load metadata previously written by [`save_data_props`] (or
/// [`super::write_data_props`]).
pub fn read_data_props(path: impl AsRef<Path>) -> PropsResult<DataProps> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn write_json(props: &DataProps, path: &Path) -> PropsResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, props)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
