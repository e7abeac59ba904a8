//! Terminal rendering for resolution results

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::plants::SpeciesRow;

pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Distance cell text; unresolved species show as unknown
pub fn format_distance(distance_km: Option<f64>, precision: usize) -> String {
    match distance_km {
        Some(d) => format!("{:.*} km", precision, d),
        None => "unknown".to_string(),
    }
}

pub fn rows_table(rows: &[SpeciesRow], precision: usize) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Taxon").add_attribute(Attribute::Bold).fg(Color::Green),
        Cell::new("Name").add_attribute(Attribute::Bold).fg(Color::Green),
        Cell::new("Nearest").add_attribute(Attribute::Bold).fg(Color::Green),
    ]);

    for row in rows {
        let distance = Cell::new(format_distance(row.distance_km, precision))
            .set_alignment(CellAlignment::Right);
        let distance = if row.distance_km.is_none() {
            distance.fg(Color::DarkGrey)
        } else {
            distance
        };
        table.add_row(vec![
            Cell::new(row.species.to_string()),
            Cell::new(&row.name),
            distance,
        ]);
    }

    table
}
