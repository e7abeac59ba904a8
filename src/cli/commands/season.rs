use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::CommandContext;
use crate::cli::output::rows_table;
use crate::config::OutputFormat;
use crate::plants::{self, filter_by_name, load_plant_records, Month, SeasonalCalendar, SortOrder};
use crate::types::Coordinate;

#[derive(Args)]
pub struct SeasonArgs {
    /// Plant dataset: JSON array of {"Month Ripe", "iNaturalist ID", "Common Name"} rows
    #[arg(short, long)]
    pub plants: PathBuf,

    /// Latitude of your location in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude of your location in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,

    /// Ripening month (defaults to the current month)
    #[arg(short, long)]
    pub month: Option<Month>,

    /// Only species whose name contains this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Row order
    #[arg(long, value_enum, default_value = "id")]
    pub sort: SortOrder,
}

pub fn run(args: SeasonArgs, ctx: &CommandContext) -> Result<()> {
    let records = load_plant_records(&args.plants)?;
    let calendar = SeasonalCalendar::from_records(&records);
    let month = args.month.unwrap_or_else(Month::current);
    let origin = Coordinate::new(args.lat, args.lng)?;

    let ripe = calendar.species_for(month);
    let query = filter_by_name(&ripe, args.search.as_deref().unwrap_or(""));

    if query.is_empty() {
        println!("No species ripe in {} match the current filters.", month);
        return Ok(());
    }

    let resolution = ctx.resolve(&query, origin)?;
    let mut rows = plants::rows(&query, &resolution.distances);
    plants::sort_rows(&mut rows, args.sort);

    match ctx.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => {
            println!("[•] Ripe in {}\n", month);
            println!("{}", rows_table(&rows, ctx.precision()));
        }
    }

    Ok(())
}
