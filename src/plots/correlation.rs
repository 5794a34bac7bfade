// Correlation heatmap

use super::{category_axis, category_label, label_font};
use crate::graph::Figure;
use crate::output::{Chart, OutputMode, Rendered};
use crate::palette::DivergingPalette;
use crate::stats::CorrelationMatrix;
use anyhow::{Context, Result};
use plotters::prelude::*;

pub fn plot_correlation(matrix: &CorrelationMatrix, mode: &OutputMode) -> Result<Rendered> {
    let figure = Figure::default();
    // Heatmap cells stay square
    let side = figure.width.min(figure.height);
    correlation_chart(matrix, Figure::new(side, side))?.emit(mode)
}

/// Cell (row i, column j) is drawn with row 0 at the top
pub fn correlation_chart(matrix: &CorrelationMatrix, figure: Figure) -> Result<Chart> {
    matrix.validate()?;

    let n = matrix.columns.len();
    let palette = DivergingPalette::correlation();
    // Rows are listed top to bottom, so the y labels run in reverse
    let row_labels: Vec<String> = matrix.columns.iter().rev().cloned().collect();

    figure.render(|root| {
        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(100)
            .build_cartesian_2d(category_axis(n), category_axis(n))
            .context("Failed to build chart")?;

        let x_formatter = |x: &f64| category_label(&matrix.columns, *x);
        let y_formatter = |y: &f64| category_label(&row_labels, *y);
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .label_style(label_font())
            .draw()
            .context("Failed to draw mesh")?;

        chart
            .draw_series(matrix.values.iter().enumerate().flat_map(|(i, row)| {
                let y = (n - 1 - i) as f64;
                row.iter().enumerate().map(move |(j, &value)| {
                    let x = j as f64;
                    Rectangle::new(
                        [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                        palette.color(value).filled(),
                    )
                })
            }))
            .context("Failed to draw heatmap cells")?;

        Ok(())
    })
}
