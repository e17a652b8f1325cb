//! # Check Errors
//!
//! Only two things can stop a check: the dataset cannot be read or decoded,
//! or the options file is unusable. Everything else is a diagnostic.

use thiserror::Error;

/// The dataset could not be opened or decoded.
///
/// Raised before any diagnostic is emitted for the file.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The file could not be read.
    #[error("cannot open file as a CDM dataset '{path}': {reason}")]
    Open {
        /// Path to the dataset file.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },

    /// The file was read but is not a valid dataset document.
    #[error("cannot decode dataset '{path}': {reason}")]
    Decode {
        /// Path or identifier of the dataset.
        path: String,
        /// What failed to decode.
        reason: String,
    },
}

/// The check options could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config load error for '{path}': {reason}")]
    Load {
        /// Path to the options file.
        path: String,
        /// Reason the file could not be loaded.
        reason: String,
    },
}
