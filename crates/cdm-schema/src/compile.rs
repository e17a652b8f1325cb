//! # Schema Compiler
//!
//! Derives a [`CdmSchema`] from CMOR-style definition tables. Each table is
//! a JSON object with an `axis_entry` map (candidate coordinates) and a
//! `variable_entry` map (candidate data variables), keyed by an internal
//! identifier; the canonical name of each entry is its `out_name`.
//!
//! ## Filtering Rules
//!
//! - Empty strings are treated as absent.
//! - Axis `units` containing `since` are dropped: reference epochs belong to
//!   individual files, not to the schema.
//! - Axis `stored_direction` is kept only when it is not `increasing`.
//! - Variables keep `standard_name`, `long_name` and `units` only.
//! - Entries are visited sorted by `out_name`; when several tables define
//!   the same `out_name`, the last table wins.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::SchemaError;
use crate::model::{CdmSchema, Definition, StoredDirection, DEFAULT_GLOBAL_ATTRIBUTES};

/// Table files read by [`open_cmor_tables`], in merge order.
pub const CMOR_TABLE_FILES: [&str; 2] = ["CDS_coordinate.json", "CDS_variable.json"];

/// One entry of an `axis_entry` or `variable_entry` map.
///
/// Unknown fields are ignored; missing fields default to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CmorEntry {
    #[serde(default)]
    pub out_name: String,
    #[serde(default)]
    pub standard_name: String,
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub stored_direction: String,
}

/// A CMOR definition table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CmorTable {
    #[serde(default)]
    pub axis_entry: BTreeMap<String, CmorEntry>,
    #[serde(default)]
    pub variable_entry: BTreeMap<String, CmorEntry>,
}

/// Load a single definition table.
///
/// # Errors
///
/// Returns `SchemaError::TableLoad` if the file is missing or is not a
/// valid table. A missing table is fatal, never a diagnostic.
pub fn load_table(path: &Path) -> Result<CmorTable, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::TableLoad {
        path: path.display().to_string(),
        reason: format!("cannot read file: {e}"),
    })?;
    serde_json::from_str(&content).map_err(|e| SchemaError::TableLoad {
        path: path.display().to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Load the coordinate and variable tables from `tables_dir`.
pub fn open_cmor_tables(tables_dir: impl AsRef<Path>) -> Result<Vec<CmorTable>, SchemaError> {
    let tables_dir = tables_dir.as_ref();
    CMOR_TABLE_FILES
        .iter()
        .map(|name| {
            let path = tables_dir.join(name);
            let table = load_table(&path)?;
            tracing::debug!(
                path = %path.display(),
                axes = table.axis_entry.len(),
                variables = table.variable_entry.len(),
                "loaded definition table"
            );
            Ok(table)
        })
        .collect()
}

/// Compile definition tables into a CDM schema.
///
/// # Errors
///
/// Returns `SchemaError::InvalidStoredDirection` if an axis declares a
/// direction other than `increasing` or `decreasing`.
pub fn compile_tables(tables: &[CmorTable]) -> Result<CdmSchema, SchemaError> {
    let mut coords = BTreeMap::new();
    let mut data_vars = BTreeMap::new();

    for table in tables {
        for (out_name, entry) in sorted_by_out_name(&table.axis_entry) {
            let mut definition = base_definition(entry);
            definition.units = non_empty(&entry.units).filter(|u| !u.contains("since"));
            definition.stored_direction = axis_direction(out_name, &entry.stored_direction)?;
            coords.insert(out_name.to_string(), definition);
        }

        for (out_name, entry) in sorted_by_out_name(&table.variable_entry) {
            let mut definition = base_definition(entry);
            definition.units = non_empty(&entry.units);
            data_vars.insert(out_name.to_string(), definition);
        }
    }

    tracing::debug!(
        tables = tables.len(),
        coords = coords.len(),
        data_vars = data_vars.len(),
        "compiled CDM schema"
    );

    Ok(CdmSchema {
        attrs: DEFAULT_GLOBAL_ATTRIBUTES.iter().map(|a| a.to_string()).collect(),
        coords,
        data_vars,
    })
}

/// Entries paired with their output name, stably sorted by it.
/// An entry without `out_name` falls back to its table key.
fn sorted_by_out_name(entries: &BTreeMap<String, CmorEntry>) -> Vec<(&str, &CmorEntry)> {
    let mut named: Vec<(&str, &CmorEntry)> = entries
        .iter()
        .map(|(key, entry)| {
            let name = if entry.out_name.is_empty() {
                key.as_str()
            } else {
                entry.out_name.as_str()
            };
            (name, entry)
        })
        .collect();
    named.sort_by(|a, b| a.0.cmp(b.0));
    named
}

fn base_definition(entry: &CmorEntry) -> Definition {
    Definition {
        standard_name: non_empty(&entry.standard_name),
        long_name: non_empty(&entry.long_name),
        ..Definition::default()
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn axis_direction(out_name: &str, value: &str) -> Result<Option<StoredDirection>, SchemaError> {
    match value {
        "" | "increasing" => Ok(None),
        "decreasing" => Ok(Some(StoredDirection::Decreasing)),
        other => Err(SchemaError::InvalidStoredDirection {
            out_name: out_name.to_string(),
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(json: &str) -> CmorTable {
        serde_json::from_str(json).unwrap()
    }

    fn sample_table() -> CmorTable {
        table(
            r#"{
                "axis_entry": {
                    "time": {
                        "units": "seconds since 1970-1-1",
                        "out_name": "time",
                        "stored_direction": "decreasing",
                        "standard_name": "time"
                    },
                    "leadtime": {"units": "hours", "out_name": "leadtime"}
                },
                "variable_entry": {"ta": {"units": "K", "out_name": "ta"}}
            }"#,
        )
    }

    #[test]
    fn compiles_sample_table() {
        let schema = compile_tables(&[sample_table()]).unwrap();

        let time = &schema.coords["time"];
        assert_eq!(time.standard_name.as_deref(), Some("time"));
        assert_eq!(time.stored_direction, Some(StoredDirection::Decreasing));
        assert_eq!(time.units, None);

        assert_eq!(
            schema.coords["leadtime"],
            Definition {
                units: Some("hours".into()),
                ..Definition::default()
            }
        );
        assert_eq!(
            schema.data_vars["ta"],
            Definition {
                units: Some("K".into()),
                ..Definition::default()
            }
        );
        assert_eq!(schema.attrs.len(), 6);
        assert_eq!(schema.attrs[0], "title");
    }

    #[test]
    fn output_keys_in_fixed_order() {
        let schema = compile_tables(&[sample_table()]).unwrap();
        let value = serde_json::to_value(&schema).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["attrs", "coords", "data_vars"]);
    }

    #[test]
    fn later_table_wins_on_shared_out_name() {
        let first = table(r#"{"axis_entry": {"p": {"out_name": "plev", "units": "Pa"}}}"#);
        let second = table(r#"{"axis_entry": {"p2": {"out_name": "plev", "units": "hPa"}}}"#);
        let schema = compile_tables(&[first, second]).unwrap();
        assert_eq!(schema.coords["plev"].units.as_deref(), Some("hPa"));
    }

    #[test]
    fn epoch_relative_units_never_compiled() {
        let t = table(
            r#"{"axis_entry": {"t": {"out_name": "time", "units": "days since 1850-01-01"}}}"#,
        );
        let schema = compile_tables(&[t]).unwrap();
        assert_eq!(schema.coords["time"].units, None);
    }

    #[test]
    fn increasing_direction_is_omitted() {
        let t = table(
            r#"{"axis_entry": {"lat": {"out_name": "lat", "stored_direction": "increasing"}}}"#,
        );
        let schema = compile_tables(&[t]).unwrap();
        assert_eq!(schema.coords["lat"].stored_direction, None);
    }

    #[test]
    fn variables_drop_stored_direction_and_empty_fields() {
        let t = table(
            r#"{"variable_entry": {"x": {
                "out_name": "tas", "standard_name": "air_temperature",
                "long_name": "", "units": "K", "stored_direction": "decreasing"
            }}}"#,
        );
        let schema = compile_tables(&[t]).unwrap();
        let tas = &schema.data_vars["tas"];
        assert_eq!(tas.long_name, None);
        assert_eq!(tas.stored_direction, None);
        assert_eq!(tas.standard_name.as_deref(), Some("air_temperature"));
    }

    #[test]
    fn missing_out_name_falls_back_to_key() {
        let t = table(r#"{"variable_entry": {"pr": {"units": "kg m-2 s-1"}}}"#);
        let schema = compile_tables(&[t]).unwrap();
        assert!(schema.data_vars.contains_key("pr"));
    }

    #[test]
    fn invalid_direction_is_rejected() {
        let t = table(r#"{"axis_entry": {"x": {"out_name": "x", "stored_direction": "up"}}}"#);
        let err = compile_tables(&[t]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidStoredDirection { .. }), "{err}");
    }

    #[test]
    fn compilation_is_byte_stable() {
        let a = compile_tables(&[sample_table()]).unwrap().to_json_bytes().unwrap();
        let b = compile_tables(&[sample_table()]).unwrap().to_json_bytes().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn open_tables_requires_both_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("CDS_coordinate.json"), "{}").unwrap();
        let err = open_cmor_tables(dir.path()).unwrap_err();
        assert!(matches!(err, SchemaError::TableLoad { .. }));
        assert!(err.to_string().contains("CDS_variable.json"));

        std::fs::write(dir.path().join("CDS_variable.json"), "{}").unwrap();
        let tables = open_cmor_tables(dir.path()).unwrap();
        assert_eq!(tables, vec![CmorTable::default(), CmorTable::default()]);
    }

    #[test]
    fn malformed_table_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CDS_coordinate.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            load_table(&path),
            Err(SchemaError::TableLoad { .. })
        ));
    }
}
