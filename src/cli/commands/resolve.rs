use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::CommandContext;
use crate::cli::output::rows_table;
use crate::config::OutputFormat;
use crate::plants::{load_species_query, rows};
use crate::types::Coordinate;

#[derive(Args)]
pub struct ResolveArgs {
    /// JSON object mapping taxon id to name, e.g. {"47602": "Salmonberry"}
    #[arg(short, long)]
    pub species: PathBuf,

    /// Latitude of your location in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude of your location in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,
}

pub fn run(args: ResolveArgs, ctx: &CommandContext) -> Result<()> {
    let query = load_species_query(&args.species)?;
    let origin = Coordinate::new(args.lat, args.lng)?;

    if query.is_empty() {
        println!("No species in {}", args.species.display());
        return Ok(());
    }

    let resolution = ctx.resolve(&query, origin)?;

    match ctx.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&resolution.distances)?);
        }
        OutputFormat::Table => {
            let rows = rows(&query, &resolution.distances);
            println!("{}", rows_table(&rows, ctx.precision()));
            println!(
                "\n● Resolved {} of {} species in {} catalog queries",
                resolution.resolved_count(),
                query.len(),
                resolution.passes.len()
            );
        }
    }

    Ok(())
}
