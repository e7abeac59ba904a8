pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::OutputFormat;

#[derive(Parser)]
#[command(
    name = "forager",
    version,
    about = "Find how far the nearest recent observation of each plant species is",
    long_about = "Forager queries the iNaturalist observation catalog with an expanding search \
                  radius (2 to 32 km by default) and reports, per species, the distance from \
                  your location to the nearest research-grade observation."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to $FORAGER_CONFIG or ~/.forager/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (overrides the configuration file)
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve nearest observation distances for a species file
    Resolve(commands::resolve::ResolveArgs),

    /// List species ripe in a month with their nearest observation distances
    Season(commands::season::SeasonArgs),

    /// Show which months a plant dataset covers
    Months(commands::months::MonthsArgs),
}
