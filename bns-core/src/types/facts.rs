//! Fact sets and export targets.
//!
//! A [`FactSet`] is produced once per deployment run and merged into every
//! configured [`ExportTarget`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::ARTIFACT_EXTENSION;
use crate::error::{BnsError, Result};

/// Ordered mapping from logical key to JSON value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactSet(Map<String, Value>);

impl FactSet {
    /// Creates an empty fact set.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Adds a fact, serializing the value.
    pub fn insert<V: Serialize>(&mut self, key: impl Into<String>, value: V) -> Result<()> {
        self.0.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Adds a fact that is already a JSON value.
    pub fn insert_value(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Builder form of [`FactSet::insert_value`].
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert_value(key, value);
        self
    }

    /// Returns a fact by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of top-level facts.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no facts.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over facts.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Borrows the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Converts into a JSON object value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for FactSet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for FactSet {
    type Error = BnsError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(BnsError::ValidationError(format!(
                "fact set must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Short name of a JSON value's kind, for diagnostics.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Run parameters used to resolve directory targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathParams {
    /// Chain id of the network being deployed
    pub chain_id: u64,
}

impl PathParams {
    /// Creates params for a chain id.
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id }
    }

    /// File name used inside directory targets: `<chainId>.json`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.chain_id, ARTIFACT_EXTENSION)
    }
}

/// Destination of an export.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum ExportTarget {
    /// A fixed file path.
    File(PathBuf),
    /// A directory; the file name is derived from [`PathParams`].
    Directory(PathBuf),
}

impl ExportTarget {
    /// Fixed file target.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ExportTarget::File(path.into())
    }

    /// Directory target.
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        ExportTarget::Directory(dir.into())
    }

    /// Resolves the concrete file path.
    pub fn resolve(&self, params: &PathParams) -> PathBuf {
        match self {
            ExportTarget::File(path) => path.clone(),
            ExportTarget::Directory(dir) => dir.join(params.file_name()),
        }
    }

    /// The configured path (file or directory).
    pub fn path(&self) -> &Path {
        match self {
            ExportTarget::File(path) | ExportTarget::Directory(path) => path,
        }
    }
}
