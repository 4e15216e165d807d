use std::{fs::read_to_string, path::Path};

use eyre::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Run-description keys interpolated into the chart title, never plotted.
pub const METADATA_KEYS: [&str; 3] = ["already_in", "read_percent", "total_queries"];

/// Marker rendered in the title for metadata keys the file omits.
const MISSING: &str = "n/a";

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid benchmark record: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("benchmark record must be a flat JSON object")]
    NotAnObject,
    #[error("value for operation `{key}` is not numeric")]
    NonNumeric { key: String },
}

/// One parsed benchmark result file: run metadata plus operation timings,
/// kept in file key order.
#[derive(Debug, Clone)]
pub struct BenchmarkRecord {
    fields: Map<String, Value>,
}

/// The metadata fields of a record. Any of them may be absent.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RunMetadata {
    pub already_in: Option<Value>,
    pub read_percent: Option<Value>,
    pub total_queries: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub nanos: f64,
}

/// The single-row table actually charted: operation columns in record order,
/// metadata stripped.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlotFrame {
    pub columns: Vec<Column>,
}

impl BenchmarkRecord {
    pub fn load(path: &Path) -> Result<Self> {
        let data = read_to_string(path).context(format!("Read {}", path.display()))?;
        Self::from_json(&data).context(format!("Parse {}", path.display()))
    }

    pub fn from_json(data: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(data)?;
        let Value::Object(fields) = value else {
            return Err(RecordError::NotAnObject);
        };
        Ok(Self { fields })
    }

    /// Metadata fields of the record; keys the file omits come back as `None`.
    pub fn metadata(&self) -> RunMetadata {
        // Every field is an `Option<Value>` and unknown keys are ignored, so
        // deserializing an object cannot fail.
        serde_json::from_value(Value::Object(self.fields.clone())).unwrap_or_default()
    }

    pub fn title(&self) -> String {
        self.metadata().title()
    }

    /// Strips the metadata keys and keeps the remaining operation timings in
    /// file order. Stripping a key that is absent is a no-op.
    pub fn frame(&self) -> Result<PlotFrame, RecordError> {
        let mut columns = Vec::with_capacity(self.fields.len());
        for (key, value) in &self.fields {
            if METADATA_KEYS.contains(&key.as_str()) {
                continue;
            }
            let nanos = value
                .as_f64()
                .ok_or_else(|| RecordError::NonNumeric { key: key.clone() })?;
            columns.push(Column {
                name: key.clone(),
                nanos,
            });
        }
        Ok(PlotFrame { columns })
    }
}

impl RunMetadata {
    /// Chart title, one line per metadata field.
    pub fn title(&self) -> String {
        format!(
            "already_in = {} keys\nread_percent = {}%\ntotal_queries = {}",
            display_value(&self.already_in),
            display_value(&self.read_percent),
            display_value(&self.total_queries),
        )
    }
}

impl PlotFrame {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Smallest and largest strictly positive values, if there are any.
    pub fn positive_range(&self) -> Option<(f64, f64)> {
        let mut bounds = None;
        for column in self.columns.iter().filter(|c| c.nanos > 0.0) {
            bounds = match bounds {
                None => Some((column.nanos, column.nanos)),
                Some((lo, hi)) => Some((f64::min(lo, column.nanos), f64::max(hi, column.nanos))),
            };
        }
        bounds
    }
}

fn display_value(value: &Option<Value>) -> String {
    match value {
        None => MISSING.to_owned(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
