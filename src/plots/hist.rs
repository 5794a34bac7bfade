// Histogram from precomputed bins

use super::{caption_font, first_column};
use crate::graph::{pad_range, Figure};
use crate::output::{Chart, OutputMode, Rendered};
use crate::palette::PRIMARY;
use crate::stats::{ColumnMap, HistBin};
use anyhow::{Context, Result};
use plotters::prelude::*;

/// Render the histogram of the first column
pub fn plot_hist(
    data: &ColumnMap<Vec<HistBin>>,
    mode: &OutputMode,
    sub_title: &str,
) -> Result<Rendered> {
    let (name, bins) = first_column(data, "Histogram")?;
    hist_chart(name, bins, sub_title, Figure::default())?.emit(mode)
}

/// Bars centered on each bin, 90% as wide as the first bin
pub fn hist_chart(name: &str, bins: &[HistBin], sub_title: &str, figure: Figure) -> Result<Chart> {
    let first = bins
        .first()
        .ok_or_else(|| anyhow::anyhow!("Histogram '{}' has no bins", name))?;
    let last = &bins[bins.len() - 1];

    let width = 0.9 * (first.upper - first.lower);
    let bars: Vec<(f64, f64)> = bins
        .iter()
        .map(|bin| ((bin.lower + bin.upper) / 2.0, bin.count))
        .collect();

    let (x_min, x_max) = pad_range(first.lower, last.upper);
    let y_top = bars.iter().map(|(_, c)| *c).fold(0.0, f64::max);
    let y_top = if y_top > 0.0 { y_top * 1.05 } else { 1.0 };

    let caption = format!("Histogram '{}' {}", name, sub_title);
    let caption = caption.trim_end().to_string();

    figure.render(|root| {
        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .caption(&caption, caption_font())
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, 0f64..y_top)
            .context("Failed to build chart")?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .draw()
            .context("Failed to draw mesh")?;

        chart
            .draw_series(bars.iter().map(|&(center, count)| {
                Rectangle::new(
                    [(center - width / 2.0, 0.0), (center + width / 2.0, count)],
                    PRIMARY.filled(),
                )
            }))
            .context("Failed to draw histogram bars")?;

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bins() -> Vec<HistBin> {
        vec![
            HistBin { lower: -87.3, upper: -70.5, count: 0.0 },
            HistBin { lower: -70.5, upper: -53.6, count: 22094.0 },
            HistBin { lower: -53.6, upper: -36.8, count: 2.0 },
        ]
    }

    #[test]
    fn test_hist_chart_renders_png() {
        let chart = hist_chart("lat", &bins(), "", Figure::new(300, 200)).unwrap();
        assert_eq!(&chart.png[0..4], &[137, 80, 78, 71]);
    }

    #[test]
    fn test_hist_chart_all_zero_counts() {
        let zero = vec![HistBin { lower: 0.0, upper: 1.0, count: 0.0 }];
        assert!(hist_chart("z", &zero, "sub", Figure::new(200, 150)).is_ok());
    }

    #[test]
    fn test_hist_without_bins_is_error() {
        assert!(hist_chart("empty", &[], "", Figure::new(200, 150)).is_err());
    }

    #[test]
    fn test_plot_hist_base64() {
        let data: ColumnMap<Vec<HistBin>> = vec![("lat", bins())].into_iter().collect();
        let rendered = plot_hist(&data, &OutputMode::Base64, "2024").unwrap();
        assert!(rendered.as_base64().unwrap().starts_with("iVBORw0KGgo"));
    }

    #[test]
    fn test_plot_hist_discard() {
        let data: ColumnMap<Vec<HistBin>> = vec![("lat", bins())].into_iter().collect();
        let rendered = plot_hist(&data, &OutputMode::Discard, "").unwrap();
        assert_eq!(rendered, Rendered::Nothing);
    }
}
