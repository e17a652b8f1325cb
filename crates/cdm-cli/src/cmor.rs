//! # CMOR-to-CDM Subcommand
//!
//! Compiles `CDS_coordinate.json` and `CDS_variable.json` from a tables
//! directory into the CDM schema artifact.
//!
//! ```bash
//! cdscdm cmor-to-cdm path/to/cmor-tables > cdm.json
//! cdscdm cmor-to-cdm path/to/cmor-tables --out crates/cdm-schema/schemas/cdm.json
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cdm_schema::{compile_tables, open_cmor_tables};
use clap::Args;

/// Arguments for the cmor-to-cdm subcommand.
#[derive(Args, Debug)]
pub struct CmorToCdmArgs {
    /// Directory holding the CMOR definition tables.
    pub tables_dir: PathBuf,

    /// Write the schema here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Execute the cmor-to-cdm subcommand.
pub fn run_cmor_to_cdm(args: &CmorToCdmArgs) -> Result<u8> {
    let tables = open_cmor_tables(&args.tables_dir)
        .with_context(|| format!("failed to open tables in {}", args.tables_dir.display()))?;
    let schema = compile_tables(&tables).context("failed to compile CDM schema")?;

    match &args.out {
        Some(out) => {
            schema
                .write_to(out)
                .with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!(
                path = %out.display(),
                coords = schema.coords.len(),
                data_vars = schema.data_vars.len(),
                "wrote CDM schema"
            );
        }
        None => {
            let bytes = schema.to_json_bytes()?;
            std::io::stdout()
                .lock()
                .write_all(&bytes)
                .context("failed to write to stdout")?;
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn cmor_testdata() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../testdata/cmor")
    }

    #[test]
    fn writes_schema_to_out_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("cdm.json");
        let args = CmorToCdmArgs {
            tables_dir: cmor_testdata(),
            out: Some(out.clone()),
        };
        assert_eq!(run_cmor_to_cdm(&args).unwrap(), 0);

        let schema = cdm_schema::CdmSchema::from_path(&out).unwrap();
        assert_eq!(
            schema.coords["time"].stored_direction,
            Some(cdm_schema::StoredDirection::Decreasing)
        );
        assert_eq!(schema.data_vars["ta"].units.as_deref(), Some("K"));
    }

    #[test]
    fn missing_tables_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let args = CmorToCdmArgs {
            tables_dir: dir.path().to_path_buf(),
            out: None,
        };
        let err = run_cmor_to_cdm(&args).unwrap_err();
        assert!(format!("{err:#}").contains("CDS_coordinate.json"));
    }
}
