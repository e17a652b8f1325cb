//! # cdm-cli: CDS Common Data Model Command-Line Interface
//!
//! Thin wrapper over `cdm-check` and `cdm-schema`.
//!
//! ## Subcommands
//!
//! - `check-file`: Check a decoded dataset and print its diagnostics
//! - `cmor-to-cdm`: Compile the CDM schema from a directory of CMOR tables
//!
//! ## Exit Codes
//!
//! | Code | Meaning                                             |
//! |------|-----------------------------------------------------|
//! | 0    | Success; no error-level diagnostics                  |
//! | 1    | The dataset has at least one error-level diagnostic  |
//! | 2    | Fatal failure: unreadable input, schema or options   |
//!
//! ## Crate Policy
//!
//! - `main.rs` owns the top-level parser and tracing setup; subcommand
//!   arguments and handlers live here and return `anyhow::Result<u8>`.
//! - No check logic here.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cdm_check::CheckOptions;
use cdm_schema::CdmSchema;

pub mod check;
pub mod cmor;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Check options file (YAML or JSON).
    pub config: Option<PathBuf>,
    /// Schema artifact overriding the bundled schema.
    pub schema: Option<PathBuf>,
}

impl GlobalOptions {
    pub fn load_schema(&self) -> Result<CdmSchema> {
        match &self.schema {
            Some(path) => CdmSchema::from_path(path)
                .with_context(|| format!("failed to load schema {}", path.display())),
            None => CdmSchema::bundled().context("bundled CDM schema is invalid"),
        }
    }

    pub fn load_check_options(&self) -> Result<CheckOptions> {
        match &self.config {
            Some(path) => CheckOptions::from_path(path)
                .with_context(|| format!("failed to load options {}", path.display())),
            None => Ok(CheckOptions::default()),
        }
    }
}
