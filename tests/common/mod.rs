#![allow(dead_code)]

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

use homecredit_props::config::Config;
use homecredit_props::ingestion::create_folder;

/// Column data for a fixture file. Every column is written as OPTIONAL.
pub enum Col {
    Int64(Vec<Option<i64>>),
    Double(Vec<Option<f64>>),
    Utf8(Vec<Option<&'static str>>),
}

pub fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("homecredit-props-{name}-{nanos}"));
    create_folder(&dir, true).unwrap();
    dir
}

/// Config rooted at `root`, with `data/` and `features/` created underneath.
pub fn config_in(root: &Path) -> Config {
    let cfg = Config {
        data_dir: root.join("data"),
        features_dir: root.join("features"),
        ..Default::default()
    };
    for mode in ["train", "test"] {
        create_folder(cfg.data_dir.join("parquet_files").join(mode), false).unwrap();
    }
    create_folder(&cfg.features_dir, false).unwrap();
    cfg
}

pub fn write_features_csv(cfg: &Config, version: &str, body: &str) {
    std::fs::write(cfg.features_path(version), body).unwrap();
}

/// Write `{data_dir}/parquet_files/{mode}/{mode}_{name}.parquet`.
pub fn write_raw_file(cfg: &Config, mode: &str, name: &str, columns: &[(&str, Col)]) -> PathBuf {
    let path = cfg
        .data_dir
        .join("parquet_files")
        .join(mode)
        .join(format!("{mode}_{name}.parquet"));
    write_parquet(&path, columns);
    path
}

pub fn write_parquet(path: &Path, columns: &[(&str, Col)]) {
    let fields = columns
        .iter()
        .map(|(name, col)| match col {
            Col::Int64(_) => format!("OPTIONAL INT64 {name};"),
            Col::Double(_) => format!("OPTIONAL DOUBLE {name};"),
            Col::Utf8(_) => format!("OPTIONAL BINARY {name} (UTF8);"),
        })
        .collect::<Vec<_>>()
        .join("\n");
    let schema = Arc::new(parse_message_type(&format!("message schema {{\n{fields}\n}}")).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let mut rg = writer.next_row_group().unwrap();
    let mut col_idx: usize = 0;
    while let Some(mut col) = rg.next_column().unwrap() {
        match (col.untyped(), &columns[col_idx].1) {
            (ColumnWriter::Int64ColumnWriter(w), Col::Int64(v)) => {
                let (vals, defs) = split_nulls(v);
                w.write_batch(&vals, Some(&defs), None).unwrap();
            }
            (ColumnWriter::DoubleColumnWriter(w), Col::Double(v)) => {
                let (vals, defs) = split_nulls(v);
                w.write_batch(&vals, Some(&defs), None).unwrap();
            }
            (ColumnWriter::ByteArrayColumnWriter(w), Col::Utf8(v)) => {
                let (vals, defs) = split_nulls(v);
                let vals: Vec<ByteArray> = vals.into_iter().map(ByteArray::from).collect();
                w.write_batch(&vals, Some(&defs), None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
        col_idx += 1;
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

// Non-null values plus definition levels (1 = present, 0 = null).
fn split_nulls<T: Clone>(values: &[Option<T>]) -> (Vec<T>, Vec<i16>) {
    let defs = values.iter().map(|v| i16::from(v.is_some())).collect();
    let vals = values.iter().flatten().cloned().collect();
    (vals, defs)
}
