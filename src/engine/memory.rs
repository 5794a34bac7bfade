// In-memory engine: evaluates backend functions eagerly over the series values

use super::base::{central_moment, mean_of, Functions};
use super::dates::{parse_datetime, DEFAULT_OUTPUT_FORMAT};
use super::{Range, SeriesFunctions};
use crate::error::{FunctionError, Result};
use crate::series::{Series, Value};
use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Local, NaiveDate};

#[derive(Debug, Clone, Default)]
pub struct MemoryFunctions {
    /// Date `years_between` counts up to; today when unset
    reference_date: Option<NaiveDate>,
}

impl MemoryFunctions {
    pub fn with_reference_date(date: NaiveDate) -> Self {
        MemoryFunctions {
            reference_date: Some(date),
        }
    }

    fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

impl SeriesFunctions for MemoryFunctions {
    fn engine(&self) -> &'static str {
        "memory"
    }

    /// Bias-corrected excess kurtosis; needs four values
    fn kurtosis(&self, series: &Series) -> Result<Value> {
        let numbers = series.aggregate_numbers()?;
        let n = numbers.len() as f64;
        if numbers.len() < 4 {
            return Ok(Value::Null);
        }
        let Some(mean) = mean_of(&numbers) else {
            return Ok(Value::Null);
        };
        let m2 = central_moment(&numbers, mean, 2);
        if m2 == 0.0 {
            return Ok(Value::Number(0.0));
        }
        let m4 = central_moment(&numbers, mean, 4);
        let g2 = m4 / (m2 * m2) - 3.0;
        let adjusted = ((n + 1.0) * g2 + 6.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0));
        Ok(Value::Number(adjusted))
    }

    /// Bias-corrected sample skewness; needs three values
    fn skew(&self, series: &Series) -> Result<Value> {
        let numbers = series.aggregate_numbers()?;
        let n = numbers.len() as f64;
        if numbers.len() < 3 {
            return Ok(Value::Null);
        }
        let Some(mean) = mean_of(&numbers) else {
            return Ok(Value::Null);
        };
        let m2 = central_moment(&numbers, mean, 2);
        if m2 == 0.0 {
            return Ok(Value::Number(0.0));
        }
        let m3 = central_moment(&numbers, mean, 3);
        let g1 = m3 / m2.powf(1.5);
        Ok(Value::Number(g1 * (n * (n - 1.0)).sqrt() / (n - 2.0)))
    }

    fn range(&self, series: &Series) -> Result<Range> {
        Ok(Range {
            min: Functions::min(series)?,
            max: Functions::max(series)?,
        })
    }

    fn exp(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::exp)
    }

    fn sqrt(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::sqrt)
    }

    fn floor(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::floor)
    }

    fn ceil(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::ceil)
    }

    fn radians(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::to_radians)
    }

    fn degrees(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::to_degrees)
    }

    fn ln(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::ln)
    }

    fn log(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::log10)
    }

    fn clip(&self, series: &Series, lower: f64, upper: f64) -> Result<Series> {
        if lower.is_nan() || upper.is_nan() {
            return Err(FunctionError::invalid_argument("clip", "bounds must be numbers, found NaN"));
        }
        if lower > upper {
            return Err(FunctionError::invalid_argument(
                "clip",
                format!("lower bound {} exceeds upper bound {}", lower, upper),
            ));
        }
        series.map_numbers(|x| x.clamp(lower, upper))
    }

    fn sin(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::sin)
    }

    fn cos(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::cos)
    }

    fn tan(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::tan)
    }

    fn asin(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::asin)
    }

    fn acos(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::acos)
    }

    fn atan(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::atan)
    }

    fn sinh(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::sinh)
    }

    fn cosh(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::cosh)
    }

    fn tanh(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::tanh)
    }

    fn asinh(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::asinh)
    }

    fn acosh(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::acosh)
    }

    fn atanh(&self, series: &Series) -> Result<Series> {
        series.map_numbers(f64::atanh)
    }

    fn date_format(
        &self,
        series: &Series,
        current_format: Option<&str>,
        output_format: Option<&str>,
    ) -> Result<Series> {
        let output = output_format.unwrap_or(DEFAULT_OUTPUT_FORMAT);
        if StrftimeItems::new(output).any(|item| matches!(item, Item::Error)) {
            return Err(FunctionError::invalid_argument(
                "date_format",
                format!("invalid output format '{}'", output),
            ));
        }
        series.try_map_texts(|s| {
            let dt = parse_datetime(s, current_format)?;
            Ok(Value::Text(dt.format(output).to_string()))
        })
    }

    fn years_between(&self, series: &Series, date_format: Option<&str>) -> Result<Series> {
        let reference = self.reference_date();
        series.try_map_texts(|s| {
            let date = parse_datetime(s, date_format)?.date();
            Ok(Value::Number(whole_years(date, reference) as f64))
        })
    }

    fn replace_string(&self, series: &Series, search: &[String], replace_by: &str) -> Result<Series> {
        Ok(series.map_texts(|s| {
            let replaced = search
                .iter()
                .filter(|needle| !needle.is_empty())
                .fold(s.to_string(), |acc, needle| acc.replace(needle.as_str(), replace_by));
            Value::Text(replaced)
        }))
    }

    fn remove_special_chars(&self, series: &Series) -> Result<Series> {
        Ok(series.map_texts(|s| {
            Value::Text(
                s.chars()
                    .filter(|c| c.is_alphanumeric() || c.is_whitespace())
                    .collect(),
            )
        }))
    }

    fn remove_accents(&self, series: &Series) -> Result<Series> {
        Ok(series.map_texts(|s| Value::Text(s.chars().map(strip_accent).collect())))
    }
}

/// Completed years from `from` to `to`; negative when `from` is later
fn whole_years(from: NaiveDate, to: NaiveDate) -> i32 {
    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years
}

/// Base letter for precomposed Latin letters (Latin-1, Latin Extended-A and
/// B, and Latin Extended Additional); other characters pass through
fn strip_accent(c: char) -> char {
    match c {
        'ǎ' | 'ǟ' | 'ǡ' | 'ǻ' | 'ȁ' | 'ȃ' | 'ȧ' | 'ạ' | 'ả' | 'ấ' | 'ầ' | 'ẩ' | 'ẫ' | 'ậ' | 'ắ' | 'ằ'
        | 'ẳ' | 'ẵ' | 'ặ' => 'a',
        'Ǎ' | 'Ǟ' | 'Ǡ' | 'Ǻ' | 'Ȁ' | 'Ȃ' | 'Ȧ' | 'Ạ' | 'Ả' | 'Ấ' | 'Ầ' | 'Ẩ' | 'Ẫ' | 'Ậ' | 'Ắ' | 'Ằ'
        | 'Ẳ' | 'Ẵ' | 'Ặ' => 'A',
        'đ' => 'd',
        'Đ' => 'D',
        'ȅ' | 'ȇ' | 'ȩ' | 'ẹ' | 'ẻ' | 'ẽ' | 'ế' | 'ề' | 'ể' | 'ễ' | 'ệ' => 'e',
        'Ȅ' | 'Ȇ' | 'Ȩ' | 'Ẹ' | 'Ẻ' | 'Ẽ' | 'Ế' | 'Ề' | 'Ể' | 'Ễ' | 'Ệ' => 'E',
        'ǧ' | 'ǵ' => 'g',
        'Ǧ' | 'Ǵ' => 'G',
        'ǐ' | 'ȉ' | 'ȋ' | 'ỉ' | 'ị' => 'i',
        'Ǐ' | 'Ȉ' | 'Ȋ' | 'Ỉ' | 'Ị' => 'I',
        'ǹ' => 'n',
        'Ǹ' => 'N',
        'ǒ' | 'ǫ' | 'ǭ' | 'ȍ' | 'ȏ' | 'ȫ' | 'ȭ' | 'ȯ' | 'ȱ' | 'ơ' | 'ọ' | 'ỏ' | 'ố' | 'ồ' | 'ổ' | 'ỗ'
        | 'ộ' | 'ớ' | 'ờ' | 'ở' | 'ỡ' | 'ợ' => 'o',
        'Ǒ' | 'Ǫ' | 'Ǭ' | 'Ȍ' | 'Ȏ' | 'Ȫ' | 'Ȭ' | 'Ȯ' | 'Ȱ' | 'Ơ' | 'Ọ' | 'Ỏ' | 'Ố' | 'Ồ' | 'Ổ' | 'Ỗ'
        | 'Ộ' | 'Ớ' | 'Ờ' | 'Ở' | 'Ỡ' | 'Ợ' => 'O',
        'ȑ' | 'ȓ' => 'r',
        'Ȑ' | 'Ȓ' => 'R',
        'ș' => 's',
        'Ș' => 'S',
        'ț' => 't',
        'Ț' => 'T',
        'ǔ' | 'ǖ' | 'ǘ' | 'ǚ' | 'ǜ' | 'ȕ' | 'ȗ' | 'ư' | 'ụ' | 'ủ' | 'ứ' | 'ừ' | 'ử' | 'ữ' | 'ự' => 'u',
        'Ǔ' | 'Ǖ' | 'Ǘ' | 'Ǚ' | 'Ǜ' | 'Ȕ' | 'Ȗ' | 'Ư' | 'Ụ' | 'Ủ' | 'Ứ' | 'Ừ' | 'Ử' | 'Ữ' | 'Ự' => 'U',
        'ỳ' | 'ỵ' | 'ỷ' | 'ỹ' | 'ȳ' => 'y',
        'Ỳ' | 'Ỵ' | 'Ỷ' | 'Ỹ' | 'Ȳ' => 'Y',
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => 'A',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'Ç' | 'Ć' | 'Ĉ' | 'Ċ' | 'Č' => 'C',
        'ď' => 'd',
        'Ď' => 'D',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => 'E',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => 'G',
        'ĥ' => 'h',
        'Ĥ' => 'H',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => 'I',
        'ĵ' => 'j',
        'Ĵ' => 'J',
        'ķ' => 'k',
        'Ķ' => 'K',
        'ĺ' | 'ļ' | 'ľ' => 'l',
        'Ĺ' | 'Ļ' | 'Ľ' => 'L',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'Ñ' | 'Ń' | 'Ņ' | 'Ň' => 'N',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ō' | 'ŏ' | 'ő' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ō' | 'Ŏ' | 'Ő' => 'O',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'Ŕ' | 'Ŗ' | 'Ř' => 'R',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'Ś' | 'Ŝ' | 'Ş' | 'Š' => 'S',
        'ţ' | 'ť' => 't',
        'Ţ' | 'Ť' => 'T',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => 'U',
        'ŵ' => 'w',
        'Ŵ' => 'W',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'Ý' | 'Ÿ' | 'Ŷ' => 'Y',
        'ź' | 'ż' | 'ž' => 'z',
        'Ź' | 'Ż' | 'Ž' => 'Z',
        other => other,
    }
}
