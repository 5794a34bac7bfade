// Column function engines
//
// `Functions` holds the implementations every engine shares. Operations whose
// evaluation depends on the backend go through the `SeriesFunctions` handler
// attached to each series.

pub mod base;
pub mod dates;
pub mod memory;

pub use base::Functions;
pub use memory::MemoryFunctions;

use crate::error::Result;
use crate::series::{Series, Value};
use serde::Serialize;

/// Smallest and largest value of a column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Range {
    pub min: Value,
    pub max: Value,
}

/// Backend-specific column functions
pub trait SeriesFunctions: Send + Sync {
    /// Short engine name used in logs
    fn engine(&self) -> &'static str;

    // Aggregations
    fn kurtosis(&self, series: &Series) -> Result<Value>;
    fn skew(&self, series: &Series) -> Result<Value>;
    fn range(&self, series: &Series) -> Result<Range>;

    // Math
    fn exp(&self, series: &Series) -> Result<Series>;
    fn sqrt(&self, series: &Series) -> Result<Series>;
    fn floor(&self, series: &Series) -> Result<Series>;
    fn ceil(&self, series: &Series) -> Result<Series>;
    fn radians(&self, series: &Series) -> Result<Series>;
    fn degrees(&self, series: &Series) -> Result<Series>;
    fn ln(&self, series: &Series) -> Result<Series>;
    /// Base 10 logarithm
    fn log(&self, series: &Series) -> Result<Series>;
    fn clip(&self, series: &Series, lower: f64, upper: f64) -> Result<Series>;

    // Trigonometry
    fn sin(&self, series: &Series) -> Result<Series>;
    fn cos(&self, series: &Series) -> Result<Series>;
    fn tan(&self, series: &Series) -> Result<Series>;
    fn asin(&self, series: &Series) -> Result<Series>;
    fn acos(&self, series: &Series) -> Result<Series>;
    fn atan(&self, series: &Series) -> Result<Series>;
    fn sinh(&self, series: &Series) -> Result<Series>;
    fn cosh(&self, series: &Series) -> Result<Series>;
    fn tanh(&self, series: &Series) -> Result<Series>;
    fn asinh(&self, series: &Series) -> Result<Series>;
    fn acosh(&self, series: &Series) -> Result<Series>;
    fn atanh(&self, series: &Series) -> Result<Series>;

    // Dates
    fn date_format(
        &self,
        series: &Series,
        current_format: Option<&str>,
        output_format: Option<&str>,
    ) -> Result<Series>;
    /// Whole years from each date to the engine's reference date
    fn years_between(&self, series: &Series, date_format: Option<&str>) -> Result<Series>;

    // Text
    fn replace_string(&self, series: &Series, search: &[String], replace_by: &str) -> Result<Series>;
    fn remove_special_chars(&self, series: &Series) -> Result<Series>;
    fn remove_accents(&self, series: &Series) -> Result<Series>;
}
