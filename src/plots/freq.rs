// Frequency bar chart

use super::{caption_font, category_axis, category_label, ellipsis, first_column, label_font, LABEL_LENGTH};
use crate::graph::Figure;
use crate::output::{Chart, OutputMode, Rendered};
use crate::palette::PRIMARY;
use crate::stats::{ColumnMap, FreqEntry};
use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::FontTransform;

/// Render the value frequencies of the first column
pub fn plot_freq(data: &ColumnMap<Vec<FreqEntry>>, mode: &OutputMode) -> Result<Rendered> {
    let (name, entries) = first_column(data, "Frequency")?;
    freq_chart(name, entries, Figure::default())?.emit(mode)
}

/// One bar per value, in the order given
pub fn freq_chart(name: &str, entries: &[FreqEntry], figure: Figure) -> Result<Chart> {
    if entries.is_empty() {
        anyhow::bail!("Frequency '{}' has no values", name);
    }

    let labels: Vec<String> = entries
        .iter()
        .map(|e| ellipsis(&e.label(), LABEL_LENGTH))
        .collect();
    let counts: Vec<f64> = entries.iter().map(|e| e.count).collect();

    let y_top = counts.iter().cloned().fold(0.0, f64::max);
    let y_top = if y_top > 0.0 { y_top * 1.05 } else { 1.0 };
    let caption = format!("Frequency '{}'", name);

    figure.render(|root| {
        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .caption(&caption, caption_font())
            .x_label_area_size(140)
            .y_label_area_size(60)
            .build_cartesian_2d(category_axis(labels.len()), 0f64..y_top)
            .context("Failed to build chart")?;

        let formatter = |x: &f64| category_label(&labels, *x);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&formatter)
            .x_label_style(label_font().transform(FontTransform::Rotate270))
            .draw()
            .context("Failed to draw mesh")?;

        chart
            .draw_series(counts.iter().enumerate().map(|(i, &count)| {
                let x = i as f64;
                Rectangle::new([(x - 0.4, 0.0), (x + 0.4, count)], PRIMARY.filled())
            }))
            .context("Failed to draw frequency bars")?;

        Ok(())
    })
}
