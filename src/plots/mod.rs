// Chart renderers for pre-aggregated column statistics

pub mod boxplot;
pub mod correlation;
pub mod freq;
pub mod hist;
pub mod missing;
pub mod scatter;

pub use boxplot::{boxplot_chart, plot_boxplot};
pub use correlation::{correlation_chart, plot_correlation};
pub use freq::{freq_chart, plot_freq};
pub use hist::{hist_chart, plot_hist};
pub use missing::{missing_values_chart, plot_missing_values};
pub use scatter::{plot_scatterplot, scatter_chart};

use crate::stats::ColumnMap;
use anyhow::Result;
use plotters::style::{FontDesc, IntoFont};
use std::ops::Range;

pub(crate) fn caption_font() -> FontDesc<'static> {
    ("sans-serif", 22).into_font()
}

pub(crate) fn label_font() -> FontDesc<'static> {
    ("sans-serif", 14).into_font()
}

/// Maximum characters shown for a category label
pub const LABEL_LENGTH: usize = 20;

/// Shorten `text` to `length` characters, marking the cut with "..."
pub fn ellipsis(text: &str, length: usize) -> String {
    if text.chars().count() > length {
        let mut shortened: String = text.chars().take(length).collect();
        shortened.push_str("...");
        shortened
    } else {
        text.to_string()
    }
}

/// The column a single-chart renderer draws. Extra columns are skipped.
pub fn first_column<'a, T>(data: &'a ColumnMap<T>, kind: &str) -> Result<(&'a str, &'a T)> {
    let (name, stats) = data
        .first()
        .ok_or_else(|| anyhow::anyhow!("{} requires at least one column", kind))?;
    if data.len() > 1 {
        tracing::warn!(
            chart = kind,
            rendered = name,
            skipped = data.len() - 1,
            "only the first column is rendered"
        );
    }
    Ok((name, stats))
}

/// Axis for `n` categories: one unit per category, centered on 0..n.
/// With `n` labels requested the ticks land on the centers.
pub(crate) fn category_axis(n: usize) -> Range<f64> {
    -0.5..(n as f64 - 0.5)
}

/// Label for a tick on a category axis
pub(crate) fn category_label(labels: &[String], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ellipsis_short_text_unchanged() {
        assert_eq!(ellipsis("short", 20), "short");
        assert_eq!(ellipsis("exactly-twenty-chars", 20), "exactly-twenty-chars");
    }

    #[test]
    fn test_ellipsis_long_text() {
        assert_eq!(ellipsis("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_ellipsis_counts_chars_not_bytes() {
        assert_eq!(ellipsis("ñandú ñandú", 5), "ñandú...");
    }

    #[test]
    fn test_category_label() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_label(&labels, 0.0), "a");
        assert_eq!(category_label(&labels, 1.0), "b");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }

    #[test]
    fn test_category_axis_spans_slots() {
        assert_eq!(category_axis(3), -0.5..2.5);
    }

    #[test]
    fn test_first_column_empty_is_error() {
        let data: ColumnMap<Vec<f64>> = ColumnMap::new();
        assert!(first_column(&data, "Histogram").is_err());
    }
}
