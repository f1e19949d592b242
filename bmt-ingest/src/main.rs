//! bmt-ingest - Issue-form intake for the mod compatibility database
//!
//! Invoked once per issue by the automation workflow. Reads the parsed
//! issue form from `ISSUE_DATA`, applies the submission or dispute to the
//! store and appends `key=value` step outputs to `GITHUB_OUTPUT`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use bmt_common::config::{LoggingConfig, TomlConfig};
use bmt_common::{logging, JsonFileStore};
use bmt_ingest::{
    DisabledVerifier, DisputeProcessor, IdentityVerifier, IngestError, IngestResult, IssueFields,
    ModrinthClient, StepOutputs, SubmissionProcessor,
};

/// Command-line arguments for bmt-ingest
#[derive(Parser, Debug)]
#[command(name = "bmt-ingest")]
#[command(about = "Apply issue-form submissions and disputes to the mod database")]
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

    /// Step output file; outputs go to stdout when unset
    #[arg(long, global = true, env = "GITHUB_OUTPUT")]
    output: Option<PathBuf>,

    /// Issue form fields as a JSON object
    #[arg(long, global = true, env = "ISSUE_DATA", hide_env_values = true)]
    issue_data: Option<String>,

    /// Issue number, echoed back in the outputs
    #[arg(long, global = true, env = "ISSUE_NUMBER")]
    issue_number: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append a new mod record
    Submit {
        /// Submitter identity recorded as `reported_by`
        #[arg(long, env = "ISSUE_AUTHOR")]
        author: Option<String>,

        /// Skip the Modrinth project lookup
        #[arg(long)]
        no_verify: bool,
    },

    /// Remove an existing mod record
    Dispute,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config = match TomlConfig::resolve(args.config.as_deref(), &args.root) {
        Ok(config) => config,
        Err(e) => {
            logging::init(&LoggingConfig::default());
            let message = format!("Failed to load configuration: {}", e);
            error!("{}", message);
            emit(&StepOutputs::fatal(message), args.output.as_deref())?;
            return Ok(ExitCode::FAILURE);
        }
    };
    logging::init(&config.logging);

    info!("Starting bmt-ingest v{}", env!("CARGO_PKG_VERSION"));

    let outputs = match run(&args, &config).await {
        Ok(outputs) => outputs,
        Err(e) => {
            match &e {
                IngestError::StoreUnreadable(source) => error!("{}: {}", e, source),
                IngestError::InvalidIssueData(reason) => error!("{}: {}", e, reason),
                _ => error!("{}", e),
            }
            StepOutputs::fatal(e.to_string())
        }
    };

    emit(&outputs, args.output.as_deref())?;

    if outputs.is_valid() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

async fn run(args: &Args, config: &TomlConfig) -> IngestResult<StepOutputs> {
    let issue = IssueFields::parse(args.issue_data.as_deref())?;
    let issue_number = args.issue_number.as_deref();

    let data_file = args
        .data
        .clone()
        .unwrap_or_else(|| config.paths.resolve(&args.root).data_file);
    info!("Store: {}", data_file.display());
    let store = JsonFileStore::new(data_file);

    match &args.command {
        Command::Submit { author, no_verify } => {
            let verifier: Arc<dyn IdentityVerifier> = if *no_verify || !config.modrinth.verify {
                info!("Modrinth verification disabled");
                Arc::new(DisabledVerifier)
            } else {
                Arc::new(ModrinthClient::from_config(&config.modrinth)?)
            };

            let processor = SubmissionProcessor::new(store, verifier);
            let outcome = processor.process(&issue, author.as_deref()).await?;
            Ok(StepOutputs::for_submission(&outcome, issue_number))
        }
        Command::Dispute => {
            let processor = DisputeProcessor::new(store);
            let outcome = processor.process(&issue)?;
            Ok(StepOutputs::for_dispute(&outcome, issue_number))
        }
    }
}

fn emit(outputs: &StepOutputs, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => outputs
            .append_to(path)
            .with_context(|| format!("Failed to write step outputs to {}", path.display())),
        None => {
            print!("{}", outputs.render());
            Ok(())
        }
    }
}
