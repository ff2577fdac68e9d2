//! Core data model types for the metadata builder.
//!
//! Raw files are described by a [`Schema`] (a list of typed [`Field`]s). The builder aggregates
//! per-pattern [`PatternStructure`]s into one [`SourceGroupProps`] per source group, and the
//! whole run is a [`DataProps`] map.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Logical data type for a raw column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// Calendar date.
    Date,
    /// Column with no values (all null).
    Null,
    /// Any other storage type, kept verbatim by its display name (e.g. `i32`, `datetime[μs]`).
    Other(String),
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing a raw file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the data type of a field by name, if present.
    pub fn data_type(&self, name: &str) -> Option<&DataType> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.data_type)
    }
}

/// Dataset split a raw file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    Train,
    Test,
}

impl Mode {
    /// Both splits, train first (the train split is the schema source).
    pub const ALL: [Mode; 2] = [Mode::Train, Mode::Test];

    /// Directory / file-name prefix used on disk.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Train => "train",
            Mode::Test => "test",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the features description table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    /// Raw feature (column) name.
    pub feature: String,
    /// Source group the feature belongs to.
    pub source_group: String,
    /// Rename target, empty when the column keeps its raw name.
    pub new_name: String,
    /// Aggregation marker; `"dummy"` flags a categorical column.
    pub agg: String,
    /// Whether the feature is a date column.
    pub is_date: bool,
}

impl FeatureDescriptor {
    /// Marker in the `agg` column that flags a one-hot/dummy encoded column.
    pub const DUMMY_AGG: &'static str = "dummy";

    /// The rename target, if one is set.
    pub fn rename_target(&self) -> Option<&str> {
        if self.new_name.is_empty() {
            None
        } else {
            Some(self.new_name.as_str())
        }
    }

    /// True when the feature's categorical domain should be collected.
    pub fn is_dummy(&self) -> bool {
        self.agg == Self::DUMMY_AGG
    }
}

/// Actual files found for a pattern, per split.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModePaths {
    pub train: Vec<String>,
    pub test: Vec<String>,
}

impl ModePaths {
    pub fn get(&self, mode: Mode) -> &[String] {
        match mode {
            Mode::Train => &self.train,
            Mode::Test => &self.test,
        }
    }

    pub fn set(&mut self, mode: Mode, paths: Vec<String>) {
        match mode {
            Mode::Train => self.train = paths,
            Mode::Test => self.test = paths,
        }
    }
}

/// Raw column name -> shared column name, in the raw file's column order.
///
/// Serialized as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    entries: Vec<(String, String)>,
}

impl ColumnMap {
    /// Map `raw` to `mapped`. Re-inserting a raw name replaces its target in place.
    pub fn insert(&mut self, raw: String, mapped: String) {
        match self.entries.iter_mut().find(|(r, _)| *r == raw) {
            Some(entry) => entry.1 = mapped,
            None => self.entries.push((raw, mapped)),
        }
    }

    pub fn get(&self, raw: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(r, _)| r == raw)
            .map(|(_, m)| m.as_str())
    }

    /// `(raw, mapped)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(r, m)| (r.as_str(), m.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Index<&str> for ColumnMap {
    type Output = String;

    /// # Panics
    ///
    /// Panics if `raw` is not mapped.
    fn index(&self, raw: &str) -> &String {
        self.entries
            .iter()
            .find(|(r, _)| r == raw)
            .map(|(_, m)| m)
            .unwrap_or_else(|| panic!("column '{raw}' is not in the columns map"))
    }
}

impl Serialize for ColumnMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (raw, mapped) in &self.entries {
            map.serialize_entry(raw, mapped)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ColumnMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ColumnMapVisitor)
    }
}

struct ColumnMapVisitor;

impl<'de> Visitor<'de> for ColumnMapVisitor {
    type Value = ColumnMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of raw column name to shared column name")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ColumnMap, A::Error> {
        let mut out = ColumnMap::default();
        while let Some((raw, mapped)) = access.next_entry::<String, String>()? {
            out.insert(raw, mapped);
        }
        Ok(out)
    }
}

/// Per-pattern structure: where its files are, what they look like, and how columns are renamed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternStructure {
    /// Sorted actual file paths, per split.
    pub paths: ModePaths,
    /// Normalized schema of the first train file.
    pub schema: Schema,
    /// Raw column name -> shared column name.
    pub columns_map: ColumnMap,
}

/// Metadata for one source group.
///
/// Callers fill only [`Self::paths`]; the builder fills the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceGroupProps {
    /// Raw file-name patterns (e.g. `applprev_1_*`).
    pub paths: Vec<String>,
    /// Per-pattern structure.
    pub structure: BTreeMap<String, PatternStructure>,
    /// Sorted, deduplicated shared column names across all patterns.
    pub columns: Vec<String>,
    /// Raw column -> observed categorical values.
    pub columns_cat: BTreeMap<String, Vec<String>>,
    /// Raw column -> normalized dtype.
    pub columns_dtypes: BTreeMap<String, DataType>,
    /// Feature names flagged as date columns for this group.
    pub columns_date_index: Vec<String>,
}

impl SourceGroupProps {
    /// Create props for a group from its file-name patterns.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// Metadata for a whole run, keyed by source-group name.
pub type DataProps = BTreeMap<String, SourceGroupProps>;
