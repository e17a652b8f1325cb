//! # Data Checks
//!
//! Structural checks on an entity's dimensions and values: every dimension
//! should be a known coordinate and be backed by a coordinate in the
//! dataset, and a coordinate axis must be strictly monotonic in its stored
//! direction.

use std::collections::BTreeMap;

use cdm_core::{Reporter, Step};
use cdm_schema::{Definition, StoredDirection};
use serde_json::Value;

use crate::dataset::DataEntity;

/// Check each dimension of `entity` against the schema coordinates and
/// the coordinates present in the dataset.
pub fn check_variable_data(
    entity: &dyn DataEntity,
    schema_coords: &BTreeMap<String, Definition>,
    dataset_coords: &[String],
    log: &mut Reporter<'_>,
) {
    for dim in entity.dimension_names() {
        if !schema_coords.contains_key(dim) {
            log.warning_with("unknown dimension", vec![("dim", Value::from(dim.as_str()))]);
        } else if !dataset_coords.iter().any(|c| c == dim) {
            log.error_with(
                "dimension with no associated coordinate",
                vec![("dim", Value::from(dim.as_str()))],
            );
        }
    }
}

/// Check that a 1-D coordinate is strictly monotonic in `direction`.
///
/// Ties violate both directions. NaN differences are not violations.
/// Emits at most one `error`.
pub fn check_coordinate_data(
    coord: &dyn DataEntity,
    direction: StoredDirection,
    log: &mut Reporter<'_>,
) {
    let steps = coord.values().steps();
    let violated = match direction {
        StoredDirection::Increasing => steps
            .iter()
            .any(|s| matches!(s, Step::Flat | Step::Descending)),
        StoredDirection::Decreasing => steps
            .iter()
            .any(|s| matches!(s, Step::Flat | Step::Ascending)),
    };
    if !violated {
        return;
    }
    match direction {
        StoredDirection::Increasing => log.error("stored direction is not increasing"),
        StoredDirection::Decreasing => log.error("stored direction is not decreasing"),
    }
}
