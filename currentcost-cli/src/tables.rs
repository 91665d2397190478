use comfy_table::{Attribute, Cell, CellAlignment, Table, modifiers, presets};

use crate::core::series::DurationalReading;

pub fn build_durations_table(readings: &[DurationalReading]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(vec!["Date", "Start", "End", "Energy", "Mean power"]);
    for reading in readings {
        table.add_row(vec![
            Cell::new(reading.start.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(reading.start.format("%H:%M")),
            Cell::new(reading.end.format("%H:%M")).add_attribute(Attribute::Dim),
            Cell::new(reading.energy).set_alignment(CellAlignment::Right),
            Cell::new(reading.mean_power()).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};
    use currentcost_quantities::energy::KilowattHours;

    use super::*;

    #[test]
    fn durations_table_ok() {
        let reading = DurationalReading {
            start: Local.with_ymd_and_hms(2024, 1, 10, 13, 0, 0).unwrap(),
            end: Local.with_ymd_and_hms(2024, 1, 10, 15, 0, 0).unwrap(),
            energy: KilowattHours::from(3.0),
        };
        let table = build_durations_table(&[reading]).to_string();
        assert!(table.contains("Jan 10"));
        assert!(table.contains("3.000 kWh"));
        assert!(table.contains("1500 W"));
    }
}
