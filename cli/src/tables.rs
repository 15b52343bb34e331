use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use quantities::rate::{self, CentsPerKilowattHour};

use crate::catalog::Catalog;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

pub fn catalog_table(catalog: &Catalog) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Category", "Appliance", "Min", "Max", "Unit", "Schedulable"]);
    for appliance in catalog.appliances() {
        table.add_row(vec![
            Cell::new(&appliance.category).add_attribute(Attribute::Dim),
            Cell::new(&appliance.name),
            Cell::new(format!("{:.3}", appliance.min.into_inner()))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", appliance.max.into_inner()))
                .set_alignment(CellAlignment::Right),
            Cell::new(&appliance.unit),
            Cell::new(if appliance.schedulable { "yes" } else { "no" }),
        ]);
    }
    table
}

/// Hourly rates of one day, hours above the day's mean in red.
pub fn day_prices_table(rates: &[Option<CentsPerKilowattHour>]) -> Table {
    let known: Vec<CentsPerKilowattHour> = rates.iter().copied().flatten().collect();
    let mean = rate::mean(&known);
    let mut table = new_table();
    table.set_header(vec!["Hour", "Rate"]);
    for (hour, rate) in rates.iter().enumerate() {
        let rate_cell = match rate {
            Some(rate) => Cell::new(rate.to_string())
                .set_alignment(CellAlignment::Right)
                .fg(if mean.is_some_and(|mean| *rate >= mean) { Color::Red } else { Color::Green }),
            None => Cell::new("–").add_attribute(Attribute::Dim),
        };
        table.add_row(vec![Cell::new(format!("{hour:02}:00")), rate_cell]);
    }
    table
}
