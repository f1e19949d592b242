//! bmt-api - Validation gate and static API build
//!
//! `validate` is the CI check over the canonical store; `build` runs the
//! same gate and then regenerates the API tree.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use bmt_api::{build_api, run_gate, write_tree, ValidationSummary};
use bmt_common::config::{PathsConfig, TomlConfig};
use bmt_common::logging;

/// Command-line arguments for bmt-api
#[derive(Parser, Debug)]
#[command(name = "bmt-api")]
#[command(about = "Validate the mod database and build the static API")]
#[command(version)]
struct Args {
    /// Repository root; relative config paths resolve against it
    #[arg(long, global = true, default_value = ".", env = "BMT_ROOT")]
    root: PathBuf,

    /// Explicit config file (must exist)
    #[arg(long, global = true, env = "BMT_CONFIG")]
    config: Option<PathBuf>,

    /// Store file, overriding `[paths] data_file`
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Schema file, overriding `[paths] schema_file`
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Output directory, overriding `[paths] dist_dir`
    #[arg(long, global = true)]
    dist: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the store against the schema and the integrity rules
    Validate,

    /// Validate, then regenerate the API tree
    Build,
}

impl Args {
    fn paths(&self, config: &TomlConfig) -> PathsConfig {
        let resolved = config.paths.resolve(&self.root);
        PathsConfig {
            data_file: self.data.clone().unwrap_or(resolved.data_file),
            schema_file: self.schema.clone().unwrap_or(resolved.schema_file),
            dist_dir: self.dist.clone().unwrap_or(resolved.dist_dir),
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config = TomlConfig::resolve(args.config.as_deref(), &args.root)
        .context("Failed to load configuration")?;
    logging::init(&config.logging);

    info!("Starting bmt-api v{}", env!("CARGO_PKG_VERSION"));

    let paths = args.paths(&config);
    info!("Store: {}", paths.data_file.display());
    info!("Schema: {}", paths.schema_file.display());

    let summary = run_gate(&paths.data_file, &paths.schema_file).context("Validation failed")?;
    print_report(&summary);

    if !summary.passed() {
        error!("Database is invalid");
        return Ok(ExitCode::FAILURE);
    }
    info!(
        "Done: {} mods validated, {} warnings",
        summary.mod_count,
        summary.integrity.warnings.len()
    );

    match args.command {
        Command::Validate => Ok(ExitCode::SUCCESS),
        Command::Build => {
            let validated = summary
                .into_store()
                .context("Validated store unavailable")?;
            let tree = build_api(&validated, bmt_common::time::now());
            write_tree(&tree, &paths.dist_dir)
                .with_context(|| format!("Failed to write API tree to {}", paths.dist_dir.display()))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_report(summary: &ValidationSummary) {
    for line in summary.report_lines() {
        println!("{}", line);
    }
}
