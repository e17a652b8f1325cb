//! # Schema Errors
//!
//! Failures to load or compile a schema are fatal for the caller: they are
//! returned as [`SchemaError`] and never folded into the diagnostic stream.

use thiserror::Error;

/// Error loading, compiling or writing a CDM schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema artifact could not be read or parsed.
    #[error("schema load error for '{path}': {reason}")]
    SchemaLoad {
        /// Path or identifier of the artifact.
        path: String,
        /// Reason the artifact could not be loaded.
        reason: String,
    },

    /// A CMOR definition table could not be read or parsed.
    #[error("definition table load error for '{path}': {reason}")]
    TableLoad {
        /// Path to the table file.
        path: String,
        /// Reason the table could not be loaded.
        reason: String,
    },

    /// An axis entry declares a direction other than increasing/decreasing.
    #[error("invalid stored_direction '{value}' for axis '{out_name}'")]
    InvalidStoredDirection {
        /// Output name of the offending axis.
        out_name: String,
        /// The value found in the table.
        value: String,
    },

    /// JSON serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
