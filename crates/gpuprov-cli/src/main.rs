//! CLI entry point - the composition root.
//!
//! Loads `.env` files, initialises logging, composes the context via
//! bootstrap and routes commands to handlers.

use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use gpuprov_cli::handlers::install::InstallArgs;
use gpuprov_cli::handlers::plan::PlanArgs;
use gpuprov_cli::{Cli, CliError, Commands, bootstrap_from_env, handlers};
use gpuprov_runtime::prompt::{AutoConfirmPrompt, CliPrompt, InstallPrompt, NonInteractivePrompt};

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialise logging")
}

fn load_env_files() {
    // Working directory first; dotenvy never overrides variables already set.
    let _ = dotenvy::dotenv();
    if let Ok(path) = gpuprov_core::env_file_path()
        && path.exists()
    {
        let _ = dotenvy::from_path(path);
    }
}

fn select_prompt(auto: bool) -> Box<dyn InstallPrompt> {
    if auto {
        Box::new(AutoConfirmPrompt)
    } else if std::io::stdin().is_terminal() {
        Box::new(CliPrompt::new())
    } else {
        Box::new(NonInteractivePrompt)
    }
}

async fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Classify { name } => {
            handlers::classify::execute(&name);
        }
        Commands::Paths => {
            handlers::paths::execute()?;
        }
        Commands::Outcome { json } => {
            handlers::outcome::execute(json)?;
        }
        Commands::Detect { json } => {
            let ctx = bootstrap_from_env()?;
            handlers::detect::execute(&ctx, json)?;
        }
        Commands::Plan {
            choice,
            os,
            driver_cuda,
            installed,
            json,
        } => {
            let ctx = bootstrap_from_env()?;
            let args = PlanArgs {
                choice,
                os,
                driver_cuda,
                installed,
                json,
            };
            handlers::plan::execute(&ctx, args).await?;
        }
        Commands::Install {
            choice,
            auto,
            no_profile,
        } => {
            let ctx = bootstrap_from_env()?;
            let prompt = select_prompt(auto);
            let args = InstallArgs {
                choice,
                auto,
                no_profile,
            };
            handlers::install::execute(&ctx, args, prompt.as_ref()).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    load_env_files();
    let cli = Cli::parse();
    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Warning: {e:#}");
    }

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    match run(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
