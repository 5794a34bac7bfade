// Fixed chart colors and the diverging palette used by heatmaps

use plotters::style::{Color, HSLColor, RGBColor};

/// Bars, box outlines, scatter markers
pub const PRIMARY: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
/// Median lines
pub const MEDIAN: RGBColor = RGBColor(0xff, 0x7f, 0x0e);
/// Mean markers
pub const MEAN: RGBColor = RGBColor(0x2c, 0xa0, 0x2c);
/// Annotation text
pub const TEXT: RGBColor = RGBColor(0x33, 0x33, 0x33);

/// Two-hue palette through a light center, for values in -1..=1
#[derive(Debug, Clone, Copy)]
pub struct DivergingPalette {
    negative: (u8, u8, u8),
    center: (u8, u8, u8),
    positive: (u8, u8, u8),
}

impl DivergingPalette {
    /// Build from two hues in degrees (saturation 75%, lightness 50%)
    pub fn new(negative_hue: f64, positive_hue: f64) -> Self {
        DivergingPalette {
            negative: hue_rgb(negative_hue),
            center: (0xf2, 0xf2, 0xf2),
            positive: hue_rgb(positive_hue),
        }
    }

    /// Blue for negative correlation, red for positive
    pub fn correlation() -> Self {
        DivergingPalette::new(220.0, 10.0)
    }

    /// Color for `value`, clamped to -1..=1. NaN maps to the center.
    pub fn color(&self, value: f64) -> RGBColor {
        if value.is_nan() {
            return RGBColor(self.center.0, self.center.1, self.center.2);
        }
        let v = value.clamp(-1.0, 1.0);
        let end = if v < 0.0 { self.negative } else { self.positive };
        let t = v.abs();
        RGBColor(
            lerp(self.center.0, end.0, t),
            lerp(self.center.1, end.1, t),
            lerp(self.center.2, end.2, t),
        )
    }
}

fn hue_rgb(hue: f64) -> (u8, u8, u8) {
    HSLColor(hue.rem_euclid(360.0) / 360.0, 0.75, 0.5).rgb()
}

fn lerp(from: u8, to: u8, t: f64) -> u8 {
    (from as f64 + (to as f64 - from as f64) * t).round() as u8
}
