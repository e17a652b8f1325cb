//! # Definition Resolution
//!
//! Maps an observed variable or coordinate name to its schema definition.
//! A verbatim name match resolves silently. Otherwise the name is reported
//! as unexpected and the `standard_name` attribute is used to recover:
//!
//! | `standard_name` matches | Result                                   |
//! |-------------------------|------------------------------------------|
//! | attribute absent        | `None`, "missing standard_name attribute" |
//! | zero                    | `None`, "standard_name not valid among schema" |
//! | exactly one             | that definition, "wrong name for variable" |
//! | several                 | `None`, "variables with matching standard_name" |
//!
//! Ambiguous matches are never resolved: which definition applies decides
//! which unit and name checks fire afterwards.

use std::collections::BTreeMap;

use cdm_core::{Reporter, SanitisedMap};
use cdm_schema::Definition;
use serde_json::Value;

/// Resolve `name` against `definitions`, falling back to
/// [`guess_definition`].
pub fn resolve_definition<'d>(
    name: &str,
    attrs: &SanitisedMap<&Value>,
    definitions: &'d BTreeMap<String, Definition>,
    log: &mut Reporter<'_>,
) -> Option<&'d Definition> {
    if let Some(definition) = definitions.get(name) {
        return Some(definition);
    }
    log.warning("unexpected name");
    guess_definition(attrs, definitions, log)
}

/// Find the single definition sharing the entity's `standard_name`.
pub fn guess_definition<'d>(
    attrs: &SanitisedMap<&Value>,
    definitions: &'d BTreeMap<String, Definition>,
    log: &mut Reporter<'_>,
) -> Option<&'d Definition> {
    let Some(standard_name) = attrs.get_str("standard_name") else {
        log.warning("missing standard_name attribute");
        return None;
    };
    let mut log = log.bind("standard_name", standard_name);

    let matching: Vec<(&String, &Definition)> = definitions
        .iter()
        .filter(|(_, d)| d.standard_name.as_deref() == Some(standard_name))
        .collect();

    match matching.as_slice() {
        [] => {
            log.warning("standard_name not valid among schema");
            None
        }
        [(expected_name, definition)] => {
            log.warning_with(
                "wrong name for variable",
                vec![("expected_name", Value::from(expected_name.as_str()))],
            );
            Some(*definition)
        }
        candidates => {
            let names: Vec<Value> = candidates
                .iter()
                .map(|(name, _)| Value::from(name.as_str()))
                .collect();
            log.warning_with(
                "variables with matching standard_name",
                vec![("matching_variables", Value::Array(names))],
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitise::sanitise_attributes;
    use cdm_core::{AttrKey, Diagnostic, NullSink};
    use serde_json::json;

    fn tas_attrs() -> Vec<(AttrKey, Value)> {
        vec![
            ("standard_name".into(), json!("air_temperature")),
            ("long_name".into(), json!("near-surface air temperature")),
            ("units".into(), json!("K")),
        ]
    }

    fn tas_definition() -> Definition {
        Definition {
            standard_name: Some("air_temperature".into()),
            long_name: Some("near-surface air temperature".into()),
            units: Some("K".into()),
            ..Definition::default()
        }
    }

    fn definitions(entries: &[(&str, Definition)]) -> BTreeMap<String, Definition> {
        entries
            .iter()
            .map(|(k, d)| (k.to_string(), d.clone()))
            .collect()
    }

    fn guess(
        raw: &[(AttrKey, Value)],
        defs: &BTreeMap<String, Definition>,
    ) -> (Option<Definition>, Vec<Diagnostic>) {
        let attrs = sanitise_attributes(raw, &mut Reporter::new(&mut NullSink));
        let mut sink: Vec<Diagnostic> = Vec::new();
        let found = guess_definition(&attrs, defs, &mut Reporter::new(&mut sink)).cloned();
        (found, sink)
    }

    #[test]
    fn single_match_self_heals() {
        let defs = definitions(&[("tas", tas_definition())]);
        let (found, diags) = guess(&tas_attrs(), &defs);
        assert_eq!(found, Some(tas_definition()));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "wrong name for variable");
        assert_eq!(diags[0].field_str("expected_name"), Some("tas"));
        assert_eq!(diags[0].field_str("standard_name"), Some("air_temperature"));
    }

    #[test]
    fn missing_standard_name() {
        let (found, diags) = guess(&[], &BTreeMap::new());
        assert_eq!(found, None);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "missing standard_name attribute");
    }

    #[test]
    fn no_match() {
        let (found, diags) = guess(&tas_attrs(), &BTreeMap::new());
        assert_eq!(found, None);
        assert_eq!(diags[0].message, "standard_name not valid among schema");
    }

    #[test]
    fn ambiguous_match_lists_all_candidates() {
        let time = Definition {
            standard_name: Some("time".into()),
            ..Definition::default()
        };
        let defs = definitions(&[
            ("tas", tas_definition()),
            ("ta", tas_definition()),
            ("time", time),
        ]);
        let (found, diags) = guess(&tas_attrs(), &defs);
        assert_eq!(found, None);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "variables with matching standard_name");
        assert_eq!(diags[0].field("matching_variables"), Some(&json!(["ta", "tas"])));
    }

    #[test]
    fn verbatim_name_is_silent() {
        let defs = definitions(&[("tas", tas_definition())]);
        let attrs = SanitisedMap::new();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let found = resolve_definition("tas", &attrs, &defs, &mut Reporter::new(&mut sink));
        assert_eq!(found, Some(&tas_definition()));
        assert!(sink.is_empty());
    }

    #[test]
    fn resolution_is_deterministic() {
        let defs = definitions(&[("tas", tas_definition()), ("ta", tas_definition())]);
        let raw = tas_attrs();
        let attrs = sanitise_attributes(&raw, &mut Reporter::new(&mut NullSink));
        let run = || {
            let mut sink: Vec<Diagnostic> = Vec::new();
            let found = resolve_definition("dummy", &attrs, &defs, &mut Reporter::new(&mut sink))
                .cloned();
            (found, sink)
        };
        let (first, first_diags) = run();
        let (second, second_diags) = run();
        assert_eq!(first, second);
        assert_eq!(first_diags, second_diags);
        assert_eq!(first_diags[0].message, "unexpected name");
        assert_eq!(first_diags.len(), 2);
    }
}
