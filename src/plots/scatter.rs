// Scatter plot of two columns

use super::label_font;
use crate::graph::{min_max, pad_range, Figure};
use crate::output::{Chart, OutputMode, Rendered};
use crate::palette::PRIMARY;
use crate::stats::ScatterData;
use anyhow::{Context, Result};
use plotters::prelude::*;

pub fn plot_scatterplot(data: &ScatterData, mode: &OutputMode) -> Result<Rendered> {
    scatter_chart(data, Figure::default())?.emit(mode)
}

pub fn scatter_chart(data: &ScatterData, figure: Figure) -> Result<Chart> {
    let xs = &data.x.data;
    let ys = &data.y.data;

    if xs.len() != ys.len() {
        anyhow::bail!(
            "X and Y data must have the same length (x: {}, y: {})",
            xs.len(),
            ys.len()
        );
    }

    if xs.is_empty() {
        anyhow::bail!("Cannot create scatter plot with no data points");
    }

    let (x_min, x_max) = min_max(xs);
    let (y_min, y_max) = min_max(ys);
    let (x_lo, x_hi) = pad_range(x_min, x_max);
    let (y_lo, y_hi) = pad_range(y_min, y_max);
    let radius = marker_radius(data.s);

    figure.render(|root| {
        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .context("Failed to build chart")?;

        chart
            .configure_mesh()
            .x_desc(&data.x.name)
            .y_desc(&data.y.name)
            .axis_desc_style(label_font())
            .draw()
            .context("Failed to draw mesh")?;

        chart
            .draw_series(
                xs.iter()
                    .zip(ys.iter())
                    .filter(|(x, y)| x.is_finite() && y.is_finite())
                    .map(|(&x, &y)| Circle::new((x, y), radius, PRIMARY.mix(0.5).filled())),
            )
            .context("Failed to draw scatter points")?;

        Ok(())
    })
}

/// Pixel radius for a marker area given in points squared (100 dpi)
fn marker_radius(size: f64) -> i32 {
    let diameter_pt = size.max(0.0).sqrt();
    ((diameter_pt * 100.0 / 72.0) / 2.0).round().max(1.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ScatterAxis;

    fn data(xs: Vec<f64>, ys: Vec<f64>) -> ScatterData {
        ScatterData {
            x: ScatterAxis { name: "height".to_string(), data: xs },
            y: ScatterAxis { name: "weight".to_string(), data: ys },
            s: 36.0,
        }
    }

    #[test]
    fn test_marker_radius() {
        assert_eq!(marker_radius(36.0), 4);
        assert_eq!(marker_radius(0.0), 1);
        assert_eq!(marker_radius(-5.0), 1);
    }

    #[test]
    fn test_scatter_chart_renders_png() {
        let chart = scatter_chart(
            &data(vec![150.0, 160.0, 170.0], vec![50.0, 62.0, 71.0]),
            Figure::new(300, 200),
        )
        .unwrap();
        assert_eq!(&chart.png[0..4], &[137, 80, 78, 71]);
    }

    #[test]
    fn test_scatter_single_point() {
        assert!(scatter_chart(&data(vec![1.0], vec![1.0]), Figure::new(200, 150)).is_ok());
    }

    #[test]
    fn test_scatter_length_mismatch() {
        let result = scatter_chart(&data(vec![1.0, 2.0], vec![1.0]), Figure::new(200, 150));
        assert!(result.is_err());
    }

    #[test]
    fn test_scatter_empty() {
        let result = plot_scatterplot(&data(vec![], vec![]), &OutputMode::Base64);
        assert!(result.is_err());
    }
}
