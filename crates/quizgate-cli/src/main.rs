//! # quizgate CLI Entry Point
//!
//! Initializes tracing, gates on the environment configuration, and
//! dispatches to handler modules.

use std::process::ExitCode;

use clap::Parser;
use quizgate_cli::{fields, payload, startup};
use quizgate_schema::ConfigValidator;

/// quizgate — configuration and submission checks.
#[derive(Parser, Debug)]
#[command(name = "quizgate", version, about)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate the process environment and print the resolved configuration.
    CheckEnv,
    /// Validate a submission payload.
    CheckSubmission(payload::CheckSubmissionArgs),
    /// List the recognised configuration keys.
    Fields(fields::FieldsArgs),
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Commands::Fields(args) = &cli.command {
        fields::run(args)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = startup::load_config_or_exit(&ConfigValidator::new());
    tracing::info!(
        node_env = %config.node_env,
        port = config.port,
        use_proxy = config.use_proxy,
        "configuration loaded"
    );

    match cli.command {
        Commands::CheckEnv => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::CheckSubmission(args) => {
            if payload::run(&args)? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(payload::SUBMISSION_EXIT_CODE))
            }
        }
        Commands::Fields(_) => Ok(ExitCode::SUCCESS),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output only.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e:#}");
            ExitCode::from(payload::SUBMISSION_EXIT_CODE)
        }
    }
}
