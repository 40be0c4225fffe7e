// licrec CLI - batch reconciliation of license-number registries

mod exit_codes;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::EXIT_RUNTIME;

#[derive(Parser)]
#[command(name = "licrec")]
#[command(about = "Reconcile license numbers between a primary registry and secondary spreadsheets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a reconciliation from a TOML config file
    #[command(after_help = "\
Examples:
  licrec run recon.toml
  licrec run recon.toml --json
  licrec run recon.toml --output result.json")]
    Run {
        /// Path to the recon TOML config file
        config: PathBuf,

        /// Print the JSON result to stdout in addition to the summary
        #[arg(long)]
        json: bool,

        /// Write the JSON result to a file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a recon config without running
    #[command(after_help = "\
Examples:
  licrec validate recon.toml")]
    Validate {
        /// Path to the recon TOML config file
        config: PathBuf,
    },
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: None,
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(EXIT_RUNTIME, message)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            json,
            output,
        } => run::cmd_run(&config, json, output.as_deref()),
        Commands::Validate { config } => run::cmd_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(err.code)
        }
    }
}
