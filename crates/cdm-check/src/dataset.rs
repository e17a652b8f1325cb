//! # Decoded Datasets
//!
//! The checks see dataset entities only through [`DataEntity`]. The bundled
//! provider reads a "decoded dataset" JSON document, the form a file takes
//! once its container format has been opened and its time axes decoded:
//!
//! ```json
//! {
//!   "attrs": {"Conventions": "CF-1.8"},
//!   "coords": [
//!     {"name": "time", "dims": ["time"], "dtype": "datetime64[ns]",
//!      "attrs": {"standard_name": "time"}, "values": ["2020-01-01T00:00:00Z"]}
//!   ],
//!   "data_vars": [
//!     {"name": "tas", "dims": ["time"], "dtype": "float32",
//!      "attrs": {"units": "K"}, "values": [280.5]}
//!   ]
//! }
//! ```
//!
//! `attrs` is either an object or a list of `[key, value]` pairs. Both keep
//! document order; only the pair form can carry non-string keys. Entity
//! `name`s may be any JSON value.
//!
//! Values are decoded according to `dtype`:
//!
//! - `datetime64*`: RFC 3339 strings (a bare date or a naive date-time is
//!   taken as UTC).
//! - `timedelta64[<unit>]`: integer counts of `ns`, `us`, `ms`, `s`, `m`,
//!   `h` or `D` (default `ns`).
//! - anything else: numbers, with `null` decoded as NaN.
//!
//! Nested arrays are flattened in row-major order.

use std::path::Path;

use cdm_core::{ArrayValues, AttrKey, Attributes, ElementKind};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::DatasetError;

/// Minimal view of a variable or coordinate.
pub trait DataEntity {
    /// Attributes as supplied by the provider, keys not yet sanitized.
    fn attributes(&self) -> &[(AttrKey, Value)];

    /// Dimension names, outermost first.
    fn dimension_names(&self) -> &[String];

    fn element_kind(&self) -> ElementKind {
        self.values().kind()
    }

    fn values(&self) -> &ArrayValues;
}

/// A variable or coordinate of a decoded dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: AttrKey,
    pub dims: Vec<String>,
    pub attrs: Attributes,
    pub values: ArrayValues,
}

impl Entity {
    pub fn new(name: impl Into<AttrKey>, dims: &[&str], values: ArrayValues) -> Self {
        Self {
            name: name.into(),
            dims: dims.iter().map(|d| d.to_string()).collect(),
            attrs: Vec::new(),
            values,
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<AttrKey>, value: impl Into<Value>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    /// A copy with one dimension renamed.
    pub fn rename_dim(&self, from: &str, to: &str) -> Self {
        let mut renamed = self.clone();
        for dim in &mut renamed.dims {
            if dim == from {
                *dim = to.to_string();
            }
        }
        renamed
    }
}

impl DataEntity for Entity {
    fn attributes(&self) -> &[(AttrKey, Value)] {
        &self.attrs
    }

    fn dimension_names(&self) -> &[String] {
        &self.dims
    }

    fn values(&self) -> &ArrayValues {
        &self.values
    }
}

/// A decoded dataset: global attributes, coordinates and data variables,
/// each in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub attrs: Attributes,
    pub coords: Vec<Entity>,
    pub data_vars: Vec<Entity>,
}

impl Dataset {
    /// Printable names of all coordinates, as they appear after
    /// sanitization.
    pub fn coordinate_names(&self) -> Vec<String> {
        self.coords.iter().map(|c| c.name.repr()).collect()
    }

    /// Open a decoded-dataset document.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Open` if the file cannot be read and
    /// `DatasetError::Decode` if it is not a valid document.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DatasetError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&content, &path.display().to_string())
    }

    /// Decode a dataset document. `origin` is used in error messages only.
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self, DatasetError> {
        let decode_error = |reason: String| DatasetError::Decode {
            path: origin.to_string(),
            reason,
        };

        let doc: DatasetDocument =
            serde_json::from_str(json).map_err(|e| decode_error(format!("invalid JSON: {e}")))?;

        let decode_all = |docs: Vec<EntityDocument>| -> Result<Vec<Entity>, DatasetError> {
            docs.into_iter()
                .map(|d| d.decode().map_err(decode_error))
                .collect()
        };

        Ok(Self {
            attrs: doc.attrs.into_attributes(),
            coords: decode_all(doc.coords)?,
            data_vars: decode_all(doc.data_vars)?,
        })
    }
}

#[derive(Deserialize)]
struct DatasetDocument {
    #[serde(default)]
    attrs: AttrsDocument,
    #[serde(default)]
    coords: Vec<EntityDocument>,
    #[serde(default)]
    data_vars: Vec<EntityDocument>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AttrsDocument {
    Map(IndexMap<String, Value>),
    Pairs(Vec<(Value, Value)>),
}

impl Default for AttrsDocument {
    fn default() -> Self {
        Self::Map(IndexMap::new())
    }
}

impl AttrsDocument {
    fn into_attributes(self) -> Attributes {
        match self {
            Self::Map(map) => map.into_iter().map(|(k, v)| (AttrKey::Name(k), v)).collect(),
            Self::Pairs(pairs) => pairs.into_iter().map(|(k, v)| (AttrKey::from(k), v)).collect(),
        }
    }
}

#[derive(Deserialize)]
struct EntityDocument {
    name: Value,
    #[serde(default)]
    dims: Vec<String>,
    #[serde(default = "default_dtype")]
    dtype: String,
    #[serde(default)]
    attrs: AttrsDocument,
    #[serde(default)]
    values: Vec<Value>,
}

fn default_dtype() -> String {
    "float64".to_string()
}

impl EntityDocument {
    fn decode(self) -> Result<Entity, String> {
        let name = AttrKey::from(self.name);
        let values = decode_values(&self.dtype, flatten(self.values))
            .map_err(|e| format!("entity {}: {e}", name.repr()))?;
        Ok(Entity {
            name,
            dims: self.dims,
            attrs: self.attrs.into_attributes(),
            values,
        })
    }
}

fn flatten(values: Vec<Value>) -> Vec<Value> {
    let mut flat = Vec::with_capacity(values.len());
    for value in values {
        match value {
            Value::Array(inner) => flat.extend(flatten(inner)),
            other => flat.push(other),
        }
    }
    flat
}

fn decode_values(dtype: &str, raw: Vec<Value>) -> Result<ArrayValues, String> {
    match ElementKind::from_dtype(dtype) {
        ElementKind::Numeric => raw
            .iter()
            .map(|v| match v {
                Value::Null => Ok(f64::NAN),
                Value::Number(n) => n.as_f64().ok_or_else(|| format!("bad number {n}")),
                Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
                other => Err(format!("expected a number for dtype {dtype}, got {other}")),
            })
            .collect::<Result<Vec<f64>, String>>()
            .map(ArrayValues::Numeric),
        ElementKind::Time => raw
            .iter()
            .map(|v| {
                v.as_str()
                    .and_then(parse_instant)
                    .ok_or_else(|| format!("expected an RFC 3339 timestamp, got {v}"))
            })
            .collect::<Result<Vec<_>, String>>()
            .map(ArrayValues::Time),
        ElementKind::Duration => {
            let nanos_per_count = timedelta_resolution(dtype)?;
            raw.iter()
                .map(|v| {
                    v.as_i64()
                        .and_then(|count| count.checked_mul(nanos_per_count))
                        .map(Duration::nanoseconds)
                        .ok_or_else(|| format!("expected an integer count for {dtype}, got {v}"))
                })
                .collect::<Result<Vec<_>, String>>()
                .map(ArrayValues::Duration)
        }
    }
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(t.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}

/// Nanoseconds per count for a `timedelta64[<unit>]` dtype.
fn timedelta_resolution(dtype: &str) -> Result<i64, String> {
    let unit = dtype
        .trim_start_matches("timedelta64")
        .trim_start_matches('[')
        .trim_end_matches(']');
    match unit {
        "" | "ns" => Ok(1),
        "us" => Ok(1_000),
        "ms" => Ok(1_000_000),
        "s" => Ok(1_000_000_000),
        "m" => Ok(60 * 1_000_000_000),
        "h" => Ok(3_600 * 1_000_000_000),
        "D" => Ok(86_400 * 1_000_000_000),
        other => Err(format!("unsupported timedelta unit '{other}'")),
    }
}
