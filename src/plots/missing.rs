// Missing values per column

use super::{caption_font, category_axis, category_label, label_font};
use crate::graph::Figure;
use crate::output::{Chart, OutputMode, Rendered};
use crate::palette::{PRIMARY, TEXT};
use crate::stats::MissingValues;
use anyhow::{Context, Result};
use plotters::prelude::*;

pub fn plot_missing_values(data: &MissingValues, mode: &OutputMode) -> Result<Rendered> {
    missing_values_chart(data, Figure::default())?.emit(mode)
}

/// Bar per column scaled against the total row count, annotated "<missing>(<%>)"
pub fn missing_values_chart(data: &MissingValues, figure: Figure) -> Result<Chart> {
    if data.data.is_empty() {
        anyhow::bail!("Missing values chart requires at least one column");
    }

    let columns: Vec<String> = data.data.iter().map(|(name, _)| name.to_string()).collect();
    let values: Vec<f64> = data.data.iter().map(|(_, entry)| entry.missing).collect();
    let notes: Vec<String> = data
        .data
        .iter()
        .map(|(_, entry)| format!("{}({})", format_number(entry.missing), format_number(entry.percent)))
        .collect();

    let highest = if data.count > 0.0 { data.count } else { 1.0 };

    figure.render(|root| {
        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .caption("Missing Values", caption_font())
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(category_axis(columns.len()), 0f64..(1.05 * highest))
            .context("Failed to build chart")?;

        let formatter = |x: &f64| category_label(&columns, *x);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(columns.len())
            .x_label_formatter(&formatter)
            .draw()
            .context("Failed to draw mesh")?;

        chart
            .draw_series(values.iter().enumerate().map(|(i, &missing)| {
                let x = i as f64;
                Rectangle::new([(x - 0.4, 0.0), (x + 0.4, missing)], PRIMARY.filled())
            }))
            .context("Failed to draw missing value bars")?;

        // Anchored at the left edge of each slot, just above the bar
        let note_font = label_font().color(&TEXT);
        chart
            .draw_series(notes.iter().zip(values.iter()).enumerate().map(|(i, (note, &missing))| {
                let y = (missing + highest * 0.05).min(highest);
                Text::new(note.clone(), (i as f64 - 0.5, y), note_font.clone())
            }))
            .context("Failed to draw annotations")?;

        Ok(())
    })
}

/// Integers without a trailing ".0"
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
