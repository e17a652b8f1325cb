//! Key sanitization: every mapping read from the dataset passes through
//! [`sanitise_mapping`] before it is looked up by name.

use cdm_core::{AttrKey, Reporter, SanitisedMap};
use serde_json::Value;

/// Convert a provider mapping to a string-keyed one.
///
/// Each non-string key is replaced by its printable representation and
/// reported as a `warning` "non-string key". When two keys print the same,
/// the first occurrence is kept.
pub fn sanitise_mapping<'k, V>(
    entries: impl IntoIterator<Item = (&'k AttrKey, V)>,
    log: &mut Reporter<'_>,
) -> SanitisedMap<V> {
    let mut clean = SanitisedMap::new();
    for (key, value) in entries {
        let name = match key.as_name() {
            Some(name) => name.to_string(),
            None => {
                let repr = key.repr();
                log.warning_with("non-string key", vec![("key", Value::from(repr.as_str()))]);
                repr
            }
        };
        clean.insert_first(name, value);
    }
    clean
}

/// Sanitize a raw attribute list.
pub fn sanitise_attributes<'a>(
    attrs: &'a [(AttrKey, Value)],
    log: &mut Reporter<'_>,
) -> SanitisedMap<&'a Value> {
    sanitise_mapping(attrs.iter().map(|(k, v)| (k, v)), log)
}
