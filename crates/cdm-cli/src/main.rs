//! # cdscdm CLI entry point
//!
//! Parses command-line arguments, initializes tracing, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cdm_cli::check::{run_check_file, CheckFileArgs};
use cdm_cli::cmor::{run_cmor_to_cdm, CmorToCdmArgs};
use cdm_cli::GlobalOptions;

/// Exit code for failures that stop a command before it completes.
const EXIT_FATAL: u8 = 2;

/// CDS Common Data Model tools.
///
/// Checks decoded datasets against the CDM schema and compiles the schema
/// from CMOR definition tables.
#[derive(Parser, Debug)]
#[command(name = "cdscdm", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a check options file (YAML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to a CDM schema artifact, instead of the bundled schema.
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Emit log output as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a decoded dataset against the CDM schema.
    CheckFile(CheckFileArgs),

    /// Compile the CDM schema from CMOR coordinate and variable tables.
    CmorToCdm(CmorToCdmArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level; RUST_LOG takes precedence.
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let globals = GlobalOptions {
        config: cli.config,
        schema: cli.schema,
    };

    let result = match cli.command {
        Commands::CheckFile(args) => run_check_file(&args, &globals),
        Commands::CmorToCdm(args) => run_cmor_to_cdm(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdm_cli::check::OutputFormat;

    #[test]
    fn cli_parse_check_file_defaults() {
        let cli = Cli::try_parse_from(["cdscdm", "check-file", "data.json"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
        match cli.command {
            Commands::CheckFile(args) => {
                assert_eq!(args.path, PathBuf::from("data.json"));
                assert_eq!(args.format, OutputFormat::Text);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parse_check_file_json_format() {
        let cli =
            Cli::try_parse_from(["cdscdm", "check-file", "--format", "json", "data.json"]).unwrap();
        if let Commands::CheckFile(args) = cli.command {
            assert_eq!(args.format, OutputFormat::Json);
        } else {
            panic!("expected check-file");
        }
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "cdscdm",
            "check-file",
            "data.json",
            "-vv",
            "--config",
            "opts.yaml",
            "--schema",
            "cdm.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("opts.yaml")));
        assert_eq!(cli.schema, Some(PathBuf::from("cdm.json")));
        assert!(!cli.log_json);
    }

    #[test]
    fn cli_parse_log_json() {
        let cli = Cli::try_parse_from([
            "cdscdm",
            "--log-json",
            "check-file",
            "--format",
            "log",
            "data.json",
        ])
        .unwrap();
        assert!(cli.log_json);
        if let Commands::CheckFile(args) = cli.command {
            assert_eq!(args.format, OutputFormat::Log);
        } else {
            panic!("expected check-file");
        }
    }

    #[test]
    fn cli_parse_cmor_to_cdm() {
        let cli =
            Cli::try_parse_from(["cdscdm", "cmor-to-cdm", "tables", "--out", "cdm.json"]).unwrap();
        match cli.command {
            Commands::CmorToCdm(args) => {
                assert_eq!(args.tables_dir, PathBuf::from("tables"));
                assert_eq!(args.out, Some(PathBuf::from("cdm.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["cdscdm", "check-file", "--format", "xml", "x"]).is_err());
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["cdscdm"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
