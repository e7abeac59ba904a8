use anyhow::Result;
use clap::Args;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};
use std::path::PathBuf;

use super::CommandContext;
use crate::config::OutputFormat;
use crate::plants::{load_plant_records, SeasonalCalendar};

#[derive(Args)]
pub struct MonthsArgs {
    /// Plant dataset to summarise
    #[arg(short, long)]
    pub plants: PathBuf,
}

pub fn run(args: MonthsArgs, ctx: &CommandContext) -> Result<()> {
    let records = load_plant_records(&args.plants)?;
    let calendar = SeasonalCalendar::from_records(&records);
    let months = calendar.months();

    if months.is_empty() {
        println!("No usable records in {}", args.plants.display());
        return Ok(());
    }

    match ctx.format {
        OutputFormat::Json => {
            let summary: Vec<serde_json::Value> = months
                .iter()
                .map(|m| serde_json::json!({ "month": m, "species": calendar.species_count(*m) }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL).apply_modifier(UTF8_ROUND_CORNERS);
            table.set_header(vec![
                Cell::new("Month").add_attribute(Attribute::Bold).fg(Color::Green),
                Cell::new("Species").add_attribute(Attribute::Bold).fg(Color::Green),
            ]);
            for month in months {
                table.add_row(vec![
                    Cell::new(month.name()),
                    Cell::new(calendar.species_count(month).to_string()),
                ]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}
