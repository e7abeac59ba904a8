use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

use forager::cli::commands::{self, CommandContext};
use forager::cli::{Cli, Commands};
use forager::ForagerError;

fn main() {
    let cli = Cli::parse();

    // FORAGER_LOG wins; otherwise -v raises the default level
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let log_level = std::env::var("FORAGER_LOG").unwrap_or_else(|_| default_level.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<ForagerError>() {
            Some(ForagerError::Configuration(_)) => 2,
            Some(ForagerError::Io(_)) | Some(ForagerError::NotFound(_)) => 3,
            Some(ForagerError::Parse(_)) | Some(ForagerError::Serialization(_)) => 4,
            Some(ForagerError::InvalidInput(_)) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = forager::config::load_or_default(cli.config.as_deref())?;
    let ctx = CommandContext::new(config, cli.format);

    match cli.command {
        Commands::Resolve(args) => commands::resolve::run(args, &ctx),
        Commands::Season(args) => commands::season::run(args, &ctx),
        Commands::Months(args) => commands::months::run(args, &ctx),
    }
}
