//! # Check-File Subcommand
//!
//! ```bash
//! cdscdm check-file testdata/bad_grid.json
//! cdscdm check-file --format json testdata/bad_grid.json | jq .event
//! cdscdm -v check-file --format log testdata/cdm_grid.json
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cdm_check::Checker;
use cdm_core::{CountingSink, Diagnostic, Reporter, TracingSink};
use clap::{Args, ValueEnum};

use crate::GlobalOptions;

/// How diagnostics are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One `[severity] message key="value"` line per diagnostic.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
    /// Forward to the log output as `WARN` / `ERROR` events.
    Log,
}

/// Arguments for the check-file subcommand.
#[derive(Args, Debug)]
pub struct CheckFileArgs {
    /// Decoded dataset document to check.
    pub path: PathBuf,

    /// Output format for diagnostics.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the check-file subcommand, printing to stdout.
pub fn run_check_file(args: &CheckFileArgs, globals: &GlobalOptions) -> Result<u8> {
    let stdout = std::io::stdout();
    check_file_to(args, globals, &mut stdout.lock())
}

/// Execute the check-file subcommand, printing to `out`.
///
/// Returns 1 if any error-level diagnostic was emitted, 0 otherwise.
pub fn check_file_to(
    args: &CheckFileArgs,
    globals: &GlobalOptions,
    out: &mut impl Write,
) -> Result<u8> {
    let schema = globals.load_schema()?;
    let options = globals.load_check_options()?;
    let checker = Checker::with_options(&schema, options);
    let path = &args.path;

    let (warnings, errors) = match args.format {
        OutputFormat::Log => {
            let mut sink = CountingSink::new(TracingSink);
            checker
                .check_file(path, &mut Reporter::new(&mut sink))
                .with_context(|| format!("failed to check {}", path.display()))?;
            (sink.warnings(), sink.errors())
        }
        format => {
            let mut sink = CountingSink::new(Vec::<Diagnostic>::new());
            checker
                .check_file(path, &mut Reporter::new(&mut sink))
                .with_context(|| format!("failed to check {}", path.display()))?;
            let (warnings, errors) = (sink.warnings(), sink.errors());
            render(&sink.into_inner(), format, out)?;
            (warnings, errors)
        }
    };

    tracing::info!(
        file_path = %path.display(),
        warnings,
        errors,
        "check-file finished"
    );
    Ok(u8::from(errors > 0))
}

fn render(diagnostics: &[Diagnostic], format: OutputFormat, out: &mut impl Write) -> Result<()> {
    for diagnostic in diagnostics {
        match format {
            OutputFormat::Json => {
                let line = serde_json::to_string(diagnostic)?;
                writeln!(out, "{line}")?;
            }
            _ => writeln!(out, "{diagnostic}")?,
        }
    }
    Ok(())
}
