// Figure rendering: draw into an RGB buffer and encode it as PNG

use crate::output::Chart;
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Default figure size: 12x5 inches at 100 dpi
pub const DEFAULT_WIDTH: u32 = 1200;
pub const DEFAULT_HEIGHT: u32 = 500;
/// Largest bitmap a figure may allocate (about 200 MB of RGB)
pub const MAX_PIXELS: usize = 8192 * 8192;

/// Pixel size of the figure a chart is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Figure {
    pub width: u32,
    pub height: u32,
}

impl Default for Figure {
    fn default() -> Self {
        Figure {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Figure {
    pub fn new(width: u32, height: u32) -> Self {
        Figure { width, height }
    }

    /// Run `draw` against a white drawing area and return the encoded chart
    pub fn render<F>(&self, draw: F) -> Result<Chart>
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()>,
    {
        if self.width == 0 || self.height == 0 {
            anyhow::bail!(
                "Figure dimensions must be positive (width: {}, height: {})",
                self.width,
                self.height
            );
        }

        let buffer_len = (self.width as usize)
            .checked_mul(self.height as usize)
            .filter(|&pixels| pixels <= MAX_PIXELS)
            .map(|pixels| pixels * 3)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Figure dimensions are too large (width: {}, height: {}, limit: {} pixels)",
                    self.width,
                    self.height,
                    MAX_PIXELS
                )
            })?;
        let mut buffer = vec![0u8; buffer_len];

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height))
                .into_drawing_area();

            root.fill(&WHITE).context("Failed to fill background")?;

            draw(&root)?;

            root.present().context("Failed to present drawing")?;
        }

        let png = encode_png(&buffer, self.width, self.height)?;
        tracing::debug!(
            width = self.width,
            height = self.height,
            bytes = png.len(),
            "rendered figure"
        );

        Ok(Chart::new(self.width, self.height, png))
    }
}

fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }
    Ok(png_bytes)
}

/// Pad a numeric range by 5% on each side; degenerate ranges widen by 1
pub fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding, max + padding)
    }
}

/// Min and max of a slice, ignoring NaN
pub fn min_max(values: &[f64]) -> (f64, f64) {
    let min = values
        .iter()
        .cloned()
        .filter(|v| !v.is_nan())
        .fold(f64::INFINITY, f64::min);
    let max = values
        .iter()
        .cloned()
        .filter(|v| !v.is_nan())
        .fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_range_normal() {
        let (lo, hi) = pad_range(0.0, 10.0);
        assert_eq!(lo, -0.5);
        assert_eq!(hi, 10.5);
    }

    #[test]
    fn test_pad_range_degenerate() {
        assert_eq!(pad_range(3.0, 3.0), (2.0, 4.0));
    }

    #[test]
    fn test_pad_range_empty_input() {
        let (min, max) = min_max(&[]);
        assert_eq!(pad_range(min, max), (0.0, 1.0));
    }

    #[test]
    fn test_min_max_skips_nan() {
        assert_eq!(min_max(&[2.0, f64::NAN, -1.0, 5.0]), (-1.0, 5.0));
    }

    #[test]
    fn test_render_blank_figure_is_png() {
        let chart = Figure::new(40, 30).render(|_| Ok(())).unwrap();
        assert_eq!(chart.width, 40);
        assert_eq!(chart.height, 30);
        assert_eq!(&chart.png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_render_rejects_zero_size() {
        assert!(Figure::new(0, 10).render(|_| Ok(())).is_err());
    }

    #[test]
    fn test_render_rejects_oversized() {
        assert!(Figure::new(70000, 70000).render(|_| Ok(())).is_err());
        assert!(Figure::new(u32::MAX, u32::MAX).render(|_| Ok(())).is_err());
    }
}
