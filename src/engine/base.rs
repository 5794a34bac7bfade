// Shared column functions, identical for every engine

use super::dates::parse_datetime;
use crate::error::{FunctionError, Result};
use crate::series::{Series, Value, ValueKey};
use chrono::{Datelike, Timelike};
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Implementations shared by all engines
pub struct Functions;

impl Functions {
    // Aggregations

    pub fn min(series: &Series) -> Result<Value> {
        let numbers = series.aggregate_numbers()?;
        Ok(extreme(&numbers, f64::min))
    }

    pub fn max(series: &Series) -> Result<Value> {
        let numbers = series.aggregate_numbers()?;
        Ok(extreme(&numbers, f64::max))
    }

    pub fn mean(series: &Series) -> Result<Value> {
        let numbers = series.aggregate_numbers()?;
        Ok(mean_of(&numbers).map(Value::Number).unwrap_or(Value::Null))
    }

    /// Median absolute deviation
    pub fn mad(series: &Series) -> Result<Value> {
        let numbers = series.aggregate_numbers()?;
        let Some(median) = median_of(&numbers) else {
            return Ok(Value::Null);
        };
        let deviations: Vec<f64> = numbers.iter().map(|x| (x - median).abs()).collect();
        Ok(median_of(&deviations).map(Value::Number).unwrap_or(Value::Null))
    }

    /// Most frequent non-null values, in order of first appearance
    pub fn mode(series: &Series) -> Result<Series> {
        let mut counts: HashMap<ValueKey<'_>, usize> = HashMap::new();
        let mut order = Vec::new();
        for value in series.values().iter().filter(|v| !is_missing(v)) {
            let count = counts.entry(value.key()).or_insert(0);
            if *count == 0 {
                order.push(value);
            }
            *count += 1;
        }
        let top = counts.values().copied().max().unwrap_or(0);
        let modes = order
            .into_iter()
            .filter(|v| counts.get(&v.key()) == Some(&top))
            .cloned()
            .collect();
        Ok(series.with_values(modes))
    }

    /// Sample standard deviation
    pub fn std(series: &Series) -> Result<Value> {
        let numbers = series.aggregate_numbers()?;
        Ok(variance_of(&numbers)
            .map(|v| Value::Number(v.sqrt()))
            .unwrap_or(Value::Null))
    }

    pub fn sum(series: &Series) -> Result<Value> {
        let numbers = series.aggregate_numbers()?;
        Ok(Value::Number(numbers.iter().sum()))
    }

    /// Sample variance
    pub fn var(series: &Series) -> Result<Value> {
        let numbers = series.aggregate_numbers()?;
        Ok(variance_of(&numbers).map(Value::Number).unwrap_or(Value::Null))
    }

    /// Linear-interpolated percentiles; each fraction must be within 0..=1
    pub fn percentile(series: &Series, fractions: &[f64]) -> Result<Vec<Value>> {
        if let Some(bad) = fractions.iter().find(|q| !(0.0..=1.0).contains(*q)) {
            return Err(FunctionError::invalid_argument(
                "percentile",
                format!("fraction {} is outside 0..=1", bad),
            ));
        }
        let mut numbers = series.aggregate_numbers()?;
        numbers.sort_by(f64::total_cmp);
        Ok(fractions
            .iter()
            .map(|&q| {
                quantile_sorted(&numbers, q)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            })
            .collect())
    }

    // Math

    pub fn abs(series: &Series) -> Result<Series> {
        series.map_numbers(f64::abs)
    }

    /// Remainder with the sign of the divisor
    pub fn r#mod(series: &Series, other: f64) -> Result<Series> {
        if other == 0.0 {
            return Err(FunctionError::invalid_argument("mod", "division by zero"));
        }
        series.map_numbers(|x| {
            let r = x % other;
            if r != 0.0 && (r < 0.0) != (other < 0.0) {
                r + other
            } else {
                r
            }
        })
    }

    pub fn pow(series: &Series, other: f64) -> Result<Series> {
        series.map_numbers(|x| x.powf(other))
    }

    /// Round half away from zero to `decimals` places (negative rounds to tens, hundreds...)
    pub fn round(series: &Series, decimals: i32) -> Result<Series> {
        let factor = 10f64.powi(decimals);
        if factor == 0.0 {
            return series.map_numbers(|x| if x.is_finite() { 0.0 } else { x });
        }
        // Past f64 precision there is nothing left to round
        series.map_numbers(|x| {
            let scaled = x * factor;
            if scaled.is_finite() {
                scaled.round() / factor
            } else {
                x
            }
        })
    }

    // Text

    pub fn lower(series: &Series) -> Result<Series> {
        Ok(series.map_texts(|s| Value::Text(s.to_lowercase())))
    }

    pub fn upper(series: &Series) -> Result<Series> {
        Ok(series.map_texts(|s| Value::Text(s.to_uppercase())))
    }

    /// First capture group of `pattern` (or the whole match); null when nothing matches
    pub fn extract(series: &Series, pattern: &str) -> Result<Series> {
        let regex = compile(pattern)?;
        Ok(series.map_texts(|s| {
            regex
                .captures(s)
                .and_then(|caps| caps.get(1).or_else(|| caps.get(0)))
                .map(|m| Value::Text(m.as_str().to_string()))
                .unwrap_or(Value::Null)
        }))
    }

    /// Characters `start..end`; `end` defaults to the end of the text
    pub fn slice(series: &Series, start: usize, end: Option<usize>) -> Result<Series> {
        if let Some(end) = end {
            if end < start {
                return Err(FunctionError::invalid_argument(
                    "slice",
                    format!("end {} is before start {}", end, start),
                ));
            }
        }
        Ok(series.map_texts(|s| {
            let taken: String = match end {
                Some(end) => s.chars().skip(start).take(end - start).collect(),
                None => s.chars().skip(start).collect(),
            };
            Value::Text(taken)
        }))
    }

    /// Title case: first letter of each word upper, the rest lower
    pub fn proper(series: &Series) -> Result<Series> {
        Ok(series.map_texts(|s| Value::Text(title_case(s))))
    }

    pub fn trim(series: &Series) -> Result<Series> {
        Ok(series.map_texts(|s| Value::Text(s.trim().to_string())))
    }

    pub fn remove_white_spaces(series: &Series) -> Result<Series> {
        Ok(series.map_texts(|s| Value::Text(s.chars().filter(|c| !c.is_whitespace()).collect())))
    }

    /// Length in characters
    pub fn len(series: &Series) -> Result<Series> {
        Ok(series.map_texts(|s| Value::Number(s.chars().count() as f64)))
    }

    /// Character index of the first occurrence of `sub`, or -1
    pub fn find(series: &Series, sub: &str) -> Result<Series> {
        Ok(series.map_texts(|s| char_index(s, s.find(sub))))
    }

    /// Character index of the last occurrence of `sub`, or -1
    pub fn rfind(series: &Series, sub: &str) -> Result<Series> {
        Ok(series.map_texts(|s| char_index(s, s.rfind(sub))))
    }

    pub fn left(series: &Series, n: usize) -> Result<Series> {
        Ok(series.map_texts(|s| Value::Text(s.chars().take(n).collect())))
    }

    pub fn right(series: &Series, n: usize) -> Result<Series> {
        Ok(series.map_texts(|s| {
            let count = s.chars().count();
            Value::Text(s.chars().skip(count.saturating_sub(n)).collect())
        }))
    }

    pub fn starts_with(series: &Series, prefix: &str) -> Result<Series> {
        Ok(series.map_texts(|s| Value::Bool(s.starts_with(prefix))))
    }

    pub fn ends_with(series: &Series, suffix: &str) -> Result<Series> {
        Ok(series.map_texts(|s| Value::Bool(s.ends_with(suffix))))
    }

    /// Character for each code point; invalid code points become null
    pub fn char(series: &Series) -> Result<Series> {
        let values = series
            .numbers_or_nulls()?
            .into_iter()
            .map(|code| {
                code.filter(|c| c.fract() == 0.0 && *c >= 0.0 && *c <= u32::MAX as f64)
                    .and_then(|c| char::from_u32(c as u32))
                    .map(|c| Value::Text(c.to_string()))
                    .unwrap_or(Value::Null)
            })
            .collect();
        Ok(series.with_values(values))
    }

    /// Code point of the first character; empty text becomes null
    pub fn unicode(series: &Series) -> Result<Series> {
        Ok(series.map_texts(|s| {
            s.chars()
                .next()
                .map(|c| Value::Number(c as u32 as f64))
                .unwrap_or(Value::Null)
        }))
    }

    pub fn exact(series: &Series, other: &str) -> Result<Series> {
        Ok(series.map_texts(|s| Value::Bool(s == other)))
    }

    // Dates

    pub fn year(series: &Series, format: Option<&str>) -> Result<Series> {
        date_part(series, format, |dt| dt.year() as f64)
    }

    pub fn month(series: &Series, format: Option<&str>) -> Result<Series> {
        date_part(series, format, |dt| dt.month() as f64)
    }

    pub fn day(series: &Series, format: Option<&str>) -> Result<Series> {
        date_part(series, format, |dt| dt.day() as f64)
    }

    pub fn hour(series: &Series, format: Option<&str>) -> Result<Series> {
        date_part(series, format, |dt| dt.hour() as f64)
    }

    pub fn minute(series: &Series, format: Option<&str>) -> Result<Series> {
        date_part(series, format, |dt| dt.minute() as f64)
    }

    pub fn second(series: &Series, format: Option<&str>) -> Result<Series> {
        date_part(series, format, |dt| dt.second() as f64)
    }

    /// Day of the week, Monday = 0
    pub fn weekday(series: &Series, format: Option<&str>) -> Result<Series> {
        date_part(series, format, |dt| dt.weekday().num_days_from_monday() as f64)
    }

    // Counts and sets

    /// Nulls and NaN numbers
    pub fn count_na(series: &Series) -> Result<Value> {
        let count = series
            .values()
            .iter()
            .filter(|v| is_missing(v))
            .count();
        Ok(Value::Number(count as f64))
    }

    pub fn count_zeros(series: &Series) -> Result<Value> {
        let numbers = series.numbers()?;
        Ok(Value::Number(numbers.iter().filter(|n| **n == 0.0).count() as f64))
    }

    /// Distinct non-null values
    pub fn count_uniques(series: &Series) -> Result<Value> {
        let distinct: HashSet<ValueKey<'_>> = series
            .values()
            .iter()
            .filter(|v| !v.is_null())
            .map(Value::key)
            .collect();
        Ok(Value::Number(distinct.len() as f64))
    }

    /// Distinct values, in order of first appearance
    pub fn unique(series: &Series) -> Result<Series> {
        let mut seen = HashSet::new();
        let values = series
            .values()
            .iter()
            .filter(|v| seen.insert(v.key()))
            .cloned()
            .collect();
        Ok(series.with_values(values))
    }

    /// Replace whole-word occurrences of any of `search`
    pub fn replace_words(series: &Series, search: &[String], replace_by: &str) -> Result<Series> {
        if search.is_empty() {
            return Ok(series.clone());
        }
        let alternatives: Vec<String> = search.iter().map(|w| regex::escape(w)).collect();
        let regex = compile(&format!(r"\b(?:{})\b", alternatives.join("|")))?;
        Ok(series.map_texts(|s| Value::Text(regex.replace_all(s, regex::NoExpand(replace_by)).into_owned())))
    }

    /// Replace values that equal any of `search` entirely
    pub fn replace_match(series: &Series, search: &[String], replace_by: &str) -> Result<Series> {
        Ok(series.map_texts(|s| {
            if search.iter().any(|candidate| candidate == s) {
                Value::Text(replace_by.to_string())
            } else {
                Value::Text(s.to_string())
            }
        }))
    }
}

fn date_part<F>(series: &Series, format: Option<&str>, part: F) -> Result<Series>
where
    F: Fn(&chrono::NaiveDateTime) -> f64,
{
    series.try_map_texts(|s| parse_datetime(s, format).map(|dt| Value::Number(part(&dt))))
}

fn char_index(text: &str, byte_index: Option<usize>) -> Value {
    match byte_index {
        Some(i) => Value::Number(text[..i].chars().count() as f64),
        None => Value::Number(-1.0),
    }
}

pub(crate) fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| FunctionError::InvalidRegex {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(c);
            at_word_start = true;
        }
    }
    result
}

/// Null and NaN both count as missing
fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Number(n) => n.is_nan(),
        _ => false,
    }
}

fn extreme(numbers: &[f64], pick: fn(f64, f64) -> f64) -> Value {
    numbers
        .iter()
        .copied()
        .filter(|n| !n.is_nan())
        .reduce(pick)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

pub(crate) fn mean_of(numbers: &[f64]) -> Option<f64> {
    if numbers.is_empty() {
        None
    } else {
        Some(numbers.iter().sum::<f64>() / numbers.len() as f64)
    }
}

/// Sample variance (n - 1); needs at least two values
pub(crate) fn variance_of(numbers: &[f64]) -> Option<f64> {
    if numbers.len() < 2 {
        return None;
    }
    let mean = mean_of(numbers)?;
    let squares: f64 = numbers.iter().map(|x| (x - mean).powi(2)).sum();
    Some(squares / (numbers.len() - 1) as f64)
}

/// Population central moment of order `k`
pub(crate) fn central_moment(numbers: &[f64], mean: f64, k: i32) -> f64 {
    numbers.iter().map(|x| (x - mean).powi(k)).sum::<f64>() / numbers.len() as f64
}

fn median_of(numbers: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = numbers.iter().copied().filter(|n| !n.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, 0.5)
}

fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let weight = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * weight)
}
