use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::PropsError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BuildSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the build failed on the data).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Where in a build an event happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// Features/metadata version tag.
    pub version: String,
    /// Source group being processed, if any.
    pub group: Option<String>,
    /// File-name pattern being processed, if any.
    pub pattern: Option<String>,
}

impl BuildContext {
    pub(crate) fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            group: None,
            pattern: None,
        }
    }

    pub(crate) fn with_group(&self, group: &str) -> Self {
        Self {
            group: Some(group.to_string()),
            pattern: None,
            ..self.clone()
        }
    }

    pub(crate) fn with_pattern(&self, pattern: &str) -> Self {
        Self {
            pattern: Some(pattern.to_string()),
            ..self.clone()
        }
    }
}

impl fmt::Display for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "version={}", self.version)?;
        if let Some(g) = &self.group {
            write!(f, " group={g}")?;
        }
        if let Some(p) = &self.pattern {
            write!(f, " pattern={p}")?;
        }
        Ok(())
    }
}

/// Reported after the sample file of a pattern was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaStats {
    /// The sample (first train) file.
    pub sample_path: String,
    pub train_files: usize,
    pub test_files: usize,
    pub columns: usize,
    pub rows: usize,
}

/// Reported after a source group is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupStats {
    pub patterns: usize,
    /// Distinct shared column names.
    pub columns: usize,
    /// Columns with a collected categorical domain.
    pub categorical: usize,
}

/// Observer interface for build progress and outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait BuildObserver: Send + Sync {
    /// Called before the patterns of a group are processed.
    fn on_group_started(&self, _ctx: &BuildContext, _patterns: usize) {}

    /// Called when a pattern's sample file has been read.
    fn on_schema_read(&self, _ctx: &BuildContext, _stats: &SchemaStats) {}

    /// Called when a group's props are complete.
    fn on_group_finished(&self, _ctx: &BuildContext, _stats: GroupStats) {}

    /// Called when the build fails.
    fn on_failure(&self, _ctx: &BuildContext, _severity: BuildSeverity, _error: &PropsError) {}

    /// Called when a build failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &BuildContext, severity: BuildSeverity, error: &PropsError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Forwards every build event to each of its observers, in the order they were added.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn BuildObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn BuildObserver>>) -> Self {
        Self { observers }
    }

    /// Add one more observer after the existing ones.
    pub fn with(mut self, observer: Arc<dyn BuildObserver>) -> Self {
        self.observers.push(observer);
        self
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositeObserver({} observers)", self.observers.len())
    }
}

impl BuildObserver for CompositeObserver {
    fn on_group_started(&self, ctx: &BuildContext, patterns: usize) {
        for o in &self.observers {
            o.on_group_started(ctx, patterns);
        }
    }

    fn on_schema_read(&self, ctx: &BuildContext, stats: &SchemaStats) {
        for o in &self.observers {
            o.on_schema_read(ctx, stats);
        }
    }

    fn on_group_finished(&self, ctx: &BuildContext, stats: GroupStats) {
        for o in &self.observers {
            o.on_group_finished(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &BuildContext, severity: BuildSeverity, error: &PropsError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &BuildContext, severity: BuildSeverity, error: &PropsError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs build events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl BuildObserver for StdErrObserver {
    fn on_group_started(&self, ctx: &BuildContext, patterns: usize) {
        eprintln!("[props][start] {ctx} patterns={patterns}");
    }

    fn on_schema_read(&self, ctx: &BuildContext, stats: &SchemaStats) {
        eprintln!(
            "[props][schema] {ctx} sample={} train_files={} test_files={} columns={} rows={}",
            stats.sample_path, stats.train_files, stats.test_files, stats.columns, stats.rows
        );
    }

    fn on_group_finished(&self, ctx: &BuildContext, stats: GroupStats) {
        eprintln!(
            "[props][ok] {ctx} patterns={} columns={} categorical={}",
            stats.patterns, stats.columns, stats.categorical
        );
    }

    fn on_failure(&self, ctx: &BuildContext, severity: BuildSeverity, error: &PropsError) {
        eprintln!("[props][{severity:?}] {ctx} err={error}");
    }

    fn on_alert(&self, ctx: &BuildContext, severity: BuildSeverity, error: &PropsError) {
        eprintln!("[ALERT][props][{severity:?}] {ctx} err={error}");
    }
}

/// Appends one line per build event to a local log file.
///
/// Each line is `<unix seconds> <event> <details>`, where `<event>` is one of:
///
/// - `start`: a group begins, with its pattern count
/// - `schema`: a pattern's sample file was read, with its path, column and row counts
/// - `ok`: a group is complete, with its pattern, column and categorical counts
/// - `fail`: the build failed, with severity, context and error
/// - `ALERT`: a failure reached the alert threshold
///
/// Logging never fails the build: if the file cannot be opened or written, the line is dropped.
#[derive(Debug)]
pub struct FileObserver {
    log_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileObserver {
    pub fn new(log_path: impl AsRef<Path>) -> Self {
        Self {
            log_path: log_path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Log file the events go to.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn record(&self, event: &str, details: fmt::Arguments<'_>) {
        let line = format!("{} {event} {details}", unix_seconds());
        let _guard = self.write_lock.lock().ok();
        let opened = OpenOptions::new().create(true).append(true).open(&self.log_path);
        if let Ok(mut file) = opened {
            let _ = writeln!(file, "{line}");
        }
    }
}

impl BuildObserver for FileObserver {
    fn on_group_started(&self, ctx: &BuildContext, patterns: usize) {
        self.record("start", format_args!("{ctx} patterns={patterns}"));
    }

    fn on_schema_read(&self, ctx: &BuildContext, stats: &SchemaStats) {
        self.record(
            "schema",
            format_args!(
                "{ctx} sample={} columns={} rows={}",
                stats.sample_path, stats.columns, stats.rows
            ),
        );
    }

    fn on_group_finished(&self, ctx: &BuildContext, stats: GroupStats) {
        self.record(
            "ok",
            format_args!(
                "{ctx} patterns={} columns={} categorical={}",
                stats.patterns, stats.columns, stats.categorical
            ),
        );
    }

    fn on_failure(&self, ctx: &BuildContext, severity: BuildSeverity, error: &PropsError) {
        self.record("fail", format_args!("severity={severity:?} {ctx} err={error}"));
    }

    fn on_alert(&self, ctx: &BuildContext, severity: BuildSeverity, error: &PropsError) {
        self.record("ALERT", format_args!("severity={severity:?} {ctx} err={error}"));
    }
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
