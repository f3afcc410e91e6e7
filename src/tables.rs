use comfy_table::{Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    fmt::{FormattedPower, NumberFormat},
    quantity::power::Watts,
    reading::Circuit,
};

#[must_use]
pub fn build_circuits_table(circuits: &[Circuit], number_format: NumberFormat) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec!["Circuit", "Now", "Today", "Month to date", "Daily average"]);
    for circuit in circuits {
        let mut row = vec![Cell::new(&circuit.display_name)];
        row.extend(circuit.reading.fields().into_iter().map(|(_, watts)| {
            Cell::new(FormattedPower::new(watts, number_format))
                .set_alignment(CellAlignment::Right)
                .fg(if watts < Watts::ZERO { Color::Green } else { Color::Reset })
        }));
        table.add_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::MetricReading;

    #[test]
    fn build_circuits_table_ok() {
        let circuits = [Circuit {
            display_name: "House".to_owned(),
            reading: MetricReading {
                now: Watts(2_345_000.0),
                today: Watts(-1_500.0),
                month_to_date: Watts(5_000.0),
                average_daily: Watts(300.0),
            },
        }];
        let table = build_circuits_table(&circuits, NumberFormat::C).to_string();
        assert!(table.contains("House"));
        assert!(table.contains("2.35 M"));
        assert!(table.contains("-1.50 K"));
        assert!(table.contains("300.00"));
    }
}
