//! # Check Options
//!
//! The parts of the rule set that vary between deployments: which
//! `Conventions` values are accepted and which data variables are treated
//! as ancillary metadata. Both have defaults; an options file only needs to
//! name the fields it overrides.
//!
//! ```yaml
//! accepted_conventions: [CF-1.8, CF-1.7]
//! ancillary_variables: [crs, time_bnds]
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Accepted `Conventions` global attribute values.
pub const DEFAULT_ACCEPTED_CONVENTIONS: [&str; 3] = ["CF-1.8", "CF-1.7", "CF-1.6"];

/// Data variables exempt from the single-payload-variable rule.
pub const DEFAULT_ANCILLARY_VARIABLES: [&str; 1] = ["crs"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckOptions {
    pub accepted_conventions: Vec<String>,
    pub ancillary_variables: BTreeSet<String>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            accepted_conventions: DEFAULT_ACCEPTED_CONVENTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ancillary_variables: DEFAULT_ANCILLARY_VARIABLES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CheckOptions {
    /// Parse options from YAML. JSON documents are accepted as well.
    pub fn from_yaml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Load {
            path: origin.to_string(),
            reason: format!("invalid options: {e}"),
        })
    }

    /// Load options from a YAML or JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Load {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        })?;
        let options = Self::from_yaml_str(&content, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), ?options, "loaded check options");
        Ok(options)
    }

    pub fn accepts_conventions(&self, value: &str) -> bool {
        self.accepted_conventions.iter().any(|c| c == value)
    }

    pub fn is_ancillary(&self, name: &str) -> bool {
        self.ancillary_variables.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = CheckOptions::default();
        assert!(options.accepts_conventions("CF-1.8"));
        assert!(options.accepts_conventions("CF-1.6"));
        assert!(!options.accepts_conventions("CF-1.5"));
        assert!(options.is_ancillary("crs"));
        assert!(!options.is_ancillary("tas"));
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let options =
            CheckOptions::from_yaml_str("ancillary_variables: [crs, time_bnds]\n", "test").unwrap();
        assert!(options.is_ancillary("time_bnds"));
        assert!(options.accepts_conventions("CF-1.7"));
    }

    #[test]
    fn json_is_accepted() {
        let options =
            CheckOptions::from_yaml_str(r#"{"accepted_conventions": ["CF-1.9"]}"#, "test").unwrap();
        assert!(options.accepts_conventions("CF-1.9"));
        assert!(!options.accepts_conventions("CF-1.8"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = CheckOptions::from_yaml_str("strict: true\n", "opts.yaml").unwrap_err();
        assert!(err.to_string().contains("opts.yaml"));
    }

    #[test]
    fn from_path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.yaml");
        std::fs::write(&path, "accepted_conventions: [CF-1.8]\n").unwrap();
        let options = CheckOptions::from_path(&path).unwrap();
        assert_eq!(options.accepted_conventions, vec!["CF-1.8".to_string()]);

        assert!(CheckOptions::from_path(dir.path().join("missing.yaml")).is_err());
    }
}
