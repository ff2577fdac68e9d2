use thiserror::Error;

/// Convenience result type for metadata-building operations.
pub type PropsResult<T> = Result<T, PropsError>;

/// Error type returned by the metadata builder and its helpers.
///
/// This is a single error enum shared across path discovery, features-table loading,
/// parquet schema reading and serialization.
#[derive(Debug, Error)]
pub enum PropsError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Features CSV could not be read.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Parquet file could not be read or a column could not be converted.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Metadata (or configuration) could not be serialized/deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A generated glob pattern is not valid glob syntax.
    #[error("invalid glob pattern: {0}")]
    GlobPattern(#[from] glob::PatternError),

    /// A glob match could not be read (e.g. permission denied on a directory).
    #[error("glob error: {0}")]
    Glob(#[from] glob::GlobError),

    /// No train file matched the pattern, so there is no file to take the schema from.
    #[error("no files matched pattern '{pattern}'")]
    NoFilesMatched { pattern: String },

    /// A multi-part file name does not end in `_<number>.<ext>`.
    #[error("path '{path}' does not end with a numeric part suffix")]
    InvalidPathSuffix { path: String },

    /// The input does not have the expected shape (missing required columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A features-table cell could not be parsed.
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}
