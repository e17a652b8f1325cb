//! # Attribute Checks
//!
//! Global attributes are checked for `Conventions` and for the schema's
//! recommended names. Variable and coordinate attributes are checked for
//! `long_name`, `units` and `standard_name` against the resolved
//! definition.
//!
//! ## Severity
//!
//! Units are recommended on data variables and required on coordinate
//! axes, so every units finding is a `warning` for a [`Role::DataVariable`]
//! and an `error` for a [`Role::Coordinate`]. All other attribute findings
//! are warnings.

use cdm_core::{ElementKind, Reporter, SanitisedMap, Severity};
use cdm_schema::Definition;
use cdm_units::{Compatibility, Unit};
use serde_json::Value;

use crate::config::CheckOptions;

/// Whether an entity is checked as a data variable or a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    DataVariable,
    Coordinate,
}

impl Role {
    /// Field name used to bind the entity name in diagnostics.
    pub fn context_key(&self) -> &'static str {
        match self {
            Self::DataVariable => "data_var_name",
            Self::Coordinate => "coord_name",
        }
    }

    pub fn units_severity(&self) -> Severity {
        match self {
            Self::DataVariable => Severity::Warning,
            Self::Coordinate => Severity::Error,
        }
    }
}

/// Check global attributes.
///
/// Reports a missing or unaccepted `Conventions` value first, then each
/// missing name of `required` in order.
pub fn check_dataset_attrs(
    attrs: &SanitisedMap<&Value>,
    required: &[String],
    options: &CheckOptions,
    log: &mut Reporter<'_>,
) {
    match attrs.get("Conventions") {
        None => log.warning("missing required Conventions attribute"),
        Some(value) => {
            if !value.as_str().is_some_and(|v| options.accepts_conventions(v)) {
                log.warning_with(
                    "invalid Conventions value",
                    vec![("conventions", (*value).clone())],
                );
            }
        }
    }

    for attr_name in required {
        if !attrs.contains_key(attr_name) {
            log.warning_with(
                "missing recommended global attribute",
                vec![("attr_name", Value::from(attr_name.as_str()))],
            );
        }
    }
}

/// Check a variable's or coordinate's attributes against its definition.
///
/// With no definition only the `long_name` and missing-`units` checks run.
pub fn check_variable_attrs(
    attrs: &SanitisedMap<&Value>,
    definition: Option<&Definition>,
    kind: ElementKind,
    role: Role,
    log: &mut Reporter<'_>,
) {
    if !attrs.contains_key("long_name") {
        log.warning("missing recommended attribute long_name");
    }

    let expected_units = definition.and_then(|d| d.units.as_deref());
    match attrs.get("units") {
        None if kind.has_implicit_units() => {}
        None => log.emit(role.units_severity(), "missing units attribute", Vec::new()),
        Some(units) => {
            if let Some(expected_units) = expected_units {
                check_units(units, expected_units, role, log);
            }
        }
    }

    let Some(expected_standard_name) = definition.and_then(|d| d.standard_name.as_deref()) else {
        return;
    };
    let mut log = log.bind("expected_standard_name", expected_standard_name);
    match attrs.get("standard_name") {
        None | Some(Value::Null) => log.warning("missing expected standard_name"),
        Some(observed) if observed.as_str() == Some(expected_standard_name) => {}
        Some(observed) => log.warning_with(
            "standard_name not valid",
            vec![("standard_name", (*observed).clone())],
        ),
    }
}

fn check_units(units: &Value, expected_units: &str, role: Role, log: &mut Reporter<'_>) {
    let mut log = log.bind("expected_units", expected_units);
    let severity = role.units_severity();
    let fields = || vec![("units", units.clone())];

    let Some(observed) = units.as_str().and_then(|u| Unit::parse(u).ok()) else {
        log.emit(severity, "units not valid", fields());
        return;
    };
    // An expected unit that does not parse cannot match anything.
    let compatibility = Unit::parse(expected_units)
        .map(|expected| observed.compare(&expected))
        .unwrap_or(Compatibility::Incompatible);

    match compatibility {
        Compatibility::Equal => {}
        Compatibility::Equivalent => log.emit(severity, "units not equal to expected", fields()),
        Compatibility::Incompatible => log.emit(severity, "units not equivalent", fields()),
    }
}
