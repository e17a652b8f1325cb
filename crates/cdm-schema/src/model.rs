//! # Schema Model
//!
//! The schema artifact is a JSON object with three keys:
//!
//! ```json
//! {
//!  "attrs": ["title", "history", ...],
//!  "coords": {"plev": {"standard_name": "air_pressure", "units": "Pa", ...}},
//!  "data_vars": {"tas": {"standard_name": "air_temperature", "units": "K"}}
//! }
//! ```
//!
//! `attrs` is ordered and the order is significant: the global-attribute
//! check reports missing attributes in this order. `coords` and `data_vars`
//! are kept in sorted maps so that serialization is deterministic.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Global attributes every dataset is expected to carry, besides
/// `Conventions` which is checked separately.
pub const DEFAULT_GLOBAL_ATTRIBUTES: [&str; 6] = [
    "title",
    "history",
    "institution",
    "source",
    "comment",
    "references",
];

const BUNDLED_SCHEMA: &str = include_str!("../schemas/cdm.json");

/// Expected ordering of a coordinate's values along its axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoredDirection {
    #[default]
    Increasing,
    Decreasing,
}

impl StoredDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
        }
    }
}

impl fmt::Display for StoredDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected metadata for one coordinate or data variable.
///
/// Fields are declared in alphabetical order so that the serialized form
/// has sorted keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_direction: Option<StoredDirection>,
    /// CF unit expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

impl Definition {
    /// Declared direction, `increasing` when the definition is silent.
    pub fn stored_direction(&self) -> StoredDirection {
        self.stored_direction.unwrap_or_default()
    }
}

/// The compiled Common Data Model schema.
///
/// Immutable once loaded; share it by reference across checks and threads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdmSchema {
    /// Recommended global attributes, in reporting order.
    #[serde(default)]
    pub attrs: Vec<String>,
    /// Coordinate name to definition.
    #[serde(default)]
    pub coords: BTreeMap<String, Definition>,
    /// Data variable name to definition.
    #[serde(default)]
    pub data_vars: BTreeMap<String, Definition>,
}

impl CdmSchema {
    /// The schema shipped with this crate.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::SchemaLoad` if the bundled artifact is not a
    /// valid schema.
    pub fn bundled() -> Result<Self, SchemaError> {
        Self::from_json_str(BUNDLED_SCHEMA, "<bundled>")
    }

    /// Parse a schema artifact. `origin` is used in error messages only.
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(json).map_err(|e| SchemaError::SchemaLoad {
            path: origin.to_string(),
            reason: format!("invalid JSON: {e}"),
        })
    }

    /// Load a schema artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::SchemaLoad` if the file cannot be read or is
    /// not a valid schema.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::SchemaLoad {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        })?;
        let schema = Self::from_json_str(&content, &path.display().to_string())?;
        tracing::info!(
            path = %path.display(),
            coords = schema.coords.len(),
            data_vars = schema.data_vars.len(),
            "loaded CDM schema"
        );
        Ok(schema)
    }

    pub fn required_global_attributes(&self) -> &[String] {
        &self.attrs
    }

    pub fn coordinate_definitions(&self) -> &BTreeMap<String, Definition> {
        &self.coords
    }

    pub fn data_variable_definitions(&self) -> &BTreeMap<String, Definition> {
        &self.data_vars
    }

    /// Serialize as pretty JSON with one-space indentation, sorted keys and
    /// a trailing newline.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, SchemaError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(buf)
    }

    pub fn to_json_string(&self) -> Result<String, SchemaError> {
        let bytes = self.to_json_bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Write the artifact to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), SchemaError> {
        std::fs::write(path, self.to_json_bytes()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_schema_loads() {
        let schema = CdmSchema::bundled().unwrap();
        assert_eq!(schema.attrs, DEFAULT_GLOBAL_ATTRIBUTES.map(String::from).to_vec());
        assert!(schema.coords.contains_key("time"));
        assert!(schema.data_vars.contains_key("tas"));
    }

    #[test]
    fn bundled_schema_is_in_canonical_form() {
        let schema = CdmSchema::bundled().unwrap();
        assert_eq!(schema.to_json_string().unwrap(), BUNDLED_SCHEMA);
    }

    #[test]
    fn stored_direction_defaults_to_increasing() {
        let schema = CdmSchema::bundled().unwrap();
        assert_eq!(
            schema.coords["time"].stored_direction(),
            StoredDirection::Increasing
        );
        assert_eq!(
            schema.coords["plev"].stored_direction(),
            StoredDirection::Decreasing
        );
    }

    #[test]
    fn missing_fields_are_omitted_on_output() {
        let mut schema = CdmSchema::default();
        schema.coords.insert(
            "leadtime".into(),
            Definition {
                units: Some("hours".into()),
                ..Definition::default()
            },
        );
        let json = schema.to_json_string().unwrap();
        assert!(json.contains(r#""units": "hours""#));
        assert!(!json.contains("standard_name"));
        assert!(!json.contains("stored_direction"));
    }

    #[test]
    fn round_trips_through_json() {
        let schema = CdmSchema::bundled().unwrap();
        let text = schema.to_json_string().unwrap();
        let back = CdmSchema::from_json_str(&text, "test").unwrap();
        assert_eq!(schema, back);
    }

    #[test]
    fn invalid_artifact_is_a_load_error() {
        let err = CdmSchema::from_json_str("{\"attrs\": 3}", "bad.json").unwrap_err();
        assert!(matches!(err, SchemaError::SchemaLoad { .. }), "{err}");
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CdmSchema::from_path(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, SchemaError::SchemaLoad { .. }));
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cdm.json");
        let schema = CdmSchema::bundled().unwrap();
        schema.write_to(&path).unwrap();
        assert_eq!(CdmSchema::from_path(&path).unwrap(), schema);
    }
}
