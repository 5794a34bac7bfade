// Box-and-whisker chart from summary statistics

use super::{caption_font, category_axis, category_label, first_column};
use crate::graph::{min_max, pad_range, Figure};
use crate::output::{Chart, OutputMode, Rendered};
use crate::palette::{MEAN, MEDIAN, PRIMARY};
use crate::stats::{BoxStats, ColumnMap};
use anyhow::{Context, Result};
use plotters::prelude::*;

const BOX_HALF_WIDTH: f64 = 0.25;
const CAP_HALF_WIDTH: f64 = 0.125;

/// Render the boxes of the first column
pub fn plot_boxplot(data: &ColumnMap<Vec<BoxStats>>, mode: &OutputMode) -> Result<Rendered> {
    let (name, boxes) = first_column(data, "Boxplot")?;
    boxplot_chart(name, boxes, Figure::default())?.emit(mode)
}

pub fn boxplot_chart(name: &str, boxes: &[BoxStats], figure: Figure) -> Result<Chart> {
    if boxes.is_empty() {
        anyhow::bail!("Boxplot '{}' has no boxes", name);
    }

    for (i, b) in boxes.iter().enumerate() {
        if !(b.whislo <= b.q1 && b.q1 <= b.med && b.med <= b.q3 && b.q3 <= b.whishi) {
            anyhow::bail!(
                "Boxplot '{}' box {} is not ordered (whislo <= q1 <= med <= q3 <= whishi)",
                name,
                i + 1
            );
        }
    }

    let labels: Vec<String> = boxes
        .iter()
        .enumerate()
        .map(|(i, b)| b.label.clone().unwrap_or_else(|| (i + 1).to_string()))
        .collect();

    let extent: Vec<f64> = boxes
        .iter()
        .flat_map(|b| {
            [b.whislo, b.whishi]
                .into_iter()
                .chain(b.fliers.iter().copied())
                .chain(b.mean)
        })
        .collect();
    let (y_min, y_max) = min_max(&extent);
    let (y_lo, y_hi) = pad_range(y_min, y_max);

    let mut whiskers = Vec::new();
    let mut medians = Vec::new();
    for (i, b) in boxes.iter().enumerate() {
        let x = i as f64;
        whiskers.push(vec![(x, b.q1), (x, b.whislo)]);
        whiskers.push(vec![(x, b.q3), (x, b.whishi)]);
        whiskers.push(vec![(x - CAP_HALF_WIDTH, b.whislo), (x + CAP_HALF_WIDTH, b.whislo)]);
        whiskers.push(vec![(x - CAP_HALF_WIDTH, b.whishi), (x + CAP_HALF_WIDTH, b.whishi)]);
        medians.push(vec![(x - BOX_HALF_WIDTH, b.med), (x + BOX_HALF_WIDTH, b.med)]);
    }

    figure.render(|root| {
        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .caption(name, caption_font())
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(category_axis(boxes.len()), y_lo..y_hi)
            .context("Failed to build chart")?;

        let formatter = |x: &f64| category_label(&labels, *x);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&formatter)
            .draw()
            .context("Failed to draw mesh")?;

        let corners = |i: usize, b: &BoxStats| {
            let x = i as f64;
            [(x - BOX_HALF_WIDTH, b.q1), (x + BOX_HALF_WIDTH, b.q3)]
        };

        chart
            .draw_series(
                boxes
                    .iter()
                    .enumerate()
                    .map(|(i, b)| Rectangle::new(corners(i, b), WHITE.filled())),
            )
            .context("Failed to fill boxes")?;

        chart
            .draw_series(
                boxes
                    .iter()
                    .enumerate()
                    .map(|(i, b)| Rectangle::new(corners(i, b), PRIMARY.stroke_width(1))),
            )
            .context("Failed to outline boxes")?;

        chart
            .draw_series(
                whiskers
                    .iter()
                    .map(|points| PathElement::new(points.clone(), PRIMARY.stroke_width(1))),
            )
            .context("Failed to draw whiskers")?;

        chart
            .draw_series(
                medians
                    .iter()
                    .map(|points| PathElement::new(points.clone(), MEDIAN.stroke_width(2))),
            )
            .context("Failed to draw medians")?;

        chart
            .draw_series(boxes.iter().enumerate().flat_map(|(i, b)| {
                b.fliers
                    .iter()
                    .map(move |&f| Circle::new((i as f64, f), 3, PRIMARY.stroke_width(1)))
            }))
            .context("Failed to draw fliers")?;

        chart
            .draw_series(boxes.iter().enumerate().filter_map(|(i, b)| {
                b.mean
                    .map(|m| TriangleMarker::new((i as f64, m), 5, MEAN.filled()))
            }))
            .context("Failed to draw means")?;

        Ok(())
    })
}
