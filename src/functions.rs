// Per-column function dispatch
//
// Each function forwards either to the shared `Functions` implementation or to
// the backend handler attached to the series.

use crate::engine::{Functions, Range};
use crate::error::{FunctionError, Result};
use crate::series::{Series, Value};
use serde::Serialize;

// Aggregations

pub fn min(series: &Series) -> Result<Value> {
    Functions::min(series)
}

pub fn max(series: &Series) -> Result<Value> {
    Functions::max(series)
}

pub fn kurtosis(series: &Series) -> Result<Value> {
    series.functions().kurtosis(series)
}

pub fn skew(series: &Series) -> Result<Value> {
    series.functions().skew(series)
}

pub fn mean(series: &Series) -> Result<Value> {
    Functions::mean(series)
}

pub fn mad(series: &Series) -> Result<Value> {
    Functions::mad(series)
}

pub fn mode(series: &Series) -> Result<Series> {
    Functions::mode(series)
}

pub fn std(series: &Series) -> Result<Value> {
    Functions::std(series)
}

pub fn sum(series: &Series) -> Result<Value> {
    Functions::sum(series)
}

pub fn var(series: &Series) -> Result<Value> {
    Functions::var(series)
}

pub fn percentile(series: &Series, fractions: &[f64]) -> Result<Vec<Value>> {
    Functions::percentile(series, fractions)
}

// Math

pub fn abs(series: &Series) -> Result<Series> {
    Functions::abs(series)
}

pub fn exp(series: &Series) -> Result<Series> {
    series.functions().exp(series)
}

pub fn sqrt(series: &Series) -> Result<Series> {
    series.functions().sqrt(series)
}

pub fn r#mod(series: &Series, other: f64) -> Result<Series> {
    Functions::r#mod(series, other)
}

pub fn pow(series: &Series, other: f64) -> Result<Series> {
    Functions::pow(series, other)
}

pub fn floor(series: &Series) -> Result<Series> {
    series.functions().floor(series)
}

pub fn ceil(series: &Series) -> Result<Series> {
    series.functions().ceil(series)
}

pub fn round(series: &Series, decimals: i32) -> Result<Series> {
    Functions::round(series, decimals)
}

pub fn range(series: &Series) -> Result<Range> {
    series.functions().range(series)
}

pub fn radians(series: &Series) -> Result<Series> {
    series.functions().radians(series)
}

pub fn degrees(series: &Series) -> Result<Series> {
    series.functions().degrees(series)
}

pub fn ln(series: &Series) -> Result<Series> {
    series.functions().ln(series)
}

pub fn log(series: &Series) -> Result<Series> {
    series.functions().log(series)
}

// Trigonometry

pub fn sin(series: &Series) -> Result<Series> {
    series.functions().sin(series)
}

pub fn cos(series: &Series) -> Result<Series> {
    series.functions().cos(series)
}

pub fn tan(series: &Series) -> Result<Series> {
    series.functions().tan(series)
}

pub fn asin(series: &Series) -> Result<Series> {
    series.functions().asin(series)
}

pub fn acos(series: &Series) -> Result<Series> {
    series.functions().acos(series)
}

pub fn atan(series: &Series) -> Result<Series> {
    series.functions().atan(series)
}

pub fn sinh(series: &Series) -> Result<Series> {
    series.functions().sinh(series)
}

pub fn cosh(series: &Series) -> Result<Series> {
    series.functions().cosh(series)
}

pub fn tanh(series: &Series) -> Result<Series> {
    series.functions().tanh(series)
}

pub fn asinh(series: &Series) -> Result<Series> {
    series.functions().asinh(series)
}

pub fn acosh(series: &Series) -> Result<Series> {
    series.functions().acosh(series)
}

pub fn atanh(series: &Series) -> Result<Series> {
    series.functions().atanh(series)
}

// Text

pub fn lower(series: &Series) -> Result<Series> {
    Functions::lower(series)
}

pub fn upper(series: &Series) -> Result<Series> {
    Functions::upper(series)
}

pub fn extract(series: &Series, pattern: &str) -> Result<Series> {
    Functions::extract(series, pattern)
}

pub fn slice(series: &Series, start: usize, end: Option<usize>) -> Result<Series> {
    Functions::slice(series, start, end)
}

pub fn proper(series: &Series) -> Result<Series> {
    Functions::proper(series)
}

pub fn trim(series: &Series) -> Result<Series> {
    Functions::trim(series)
}

pub fn remove_white_spaces(series: &Series) -> Result<Series> {
    Functions::remove_white_spaces(series)
}

pub fn len(series: &Series) -> Result<Series> {
    Functions::len(series)
}

pub fn find(series: &Series, sub: &str) -> Result<Series> {
    Functions::find(series, sub)
}

pub fn rfind(series: &Series, sub: &str) -> Result<Series> {
    Functions::rfind(series, sub)
}

pub fn left(series: &Series, n: usize) -> Result<Series> {
    Functions::left(series, n)
}

pub fn right(series: &Series, n: usize) -> Result<Series> {
    Functions::right(series, n)
}

pub fn starts_with(series: &Series, prefix: &str) -> Result<Series> {
    Functions::starts_with(series, prefix)
}

pub fn ends_with(series: &Series, suffix: &str) -> Result<Series> {
    Functions::ends_with(series, suffix)
}

pub fn char(series: &Series) -> Result<Series> {
    Functions::char(series)
}

pub fn unicode(series: &Series) -> Result<Series> {
    Functions::unicode(series)
}

pub fn exact(series: &Series, other: &str) -> Result<Series> {
    Functions::exact(series, other)
}

// Dates

pub fn date_format(
    series: &Series,
    current_format: Option<&str>,
    output_format: Option<&str>,
) -> Result<Series> {
    series
        .functions()
        .date_format(series, current_format, output_format)
}

pub fn year(series: &Series, format: Option<&str>) -> Result<Series> {
    Functions::year(series, format)
}

pub fn month(series: &Series, format: Option<&str>) -> Result<Series> {
    Functions::month(series, format)
}

pub fn day(series: &Series, format: Option<&str>) -> Result<Series> {
    Functions::day(series, format)
}

pub fn hour(series: &Series, format: Option<&str>) -> Result<Series> {
    Functions::hour(series, format)
}

pub fn minute(series: &Series, format: Option<&str>) -> Result<Series> {
    Functions::minute(series, format)
}

pub fn second(series: &Series, format: Option<&str>) -> Result<Series> {
    Functions::second(series, format)
}

pub fn weekday(series: &Series, format: Option<&str>) -> Result<Series> {
    Functions::weekday(series, format)
}

pub fn years_between(series: &Series, date_format: Option<&str>) -> Result<Series> {
    series.functions().years_between(series, date_format)
}

// Other

pub fn count_na(series: &Series) -> Result<Value> {
    Functions::count_na(series)
}

pub fn count_zeros(series: &Series) -> Result<Value> {
    Functions::count_zeros(series)
}

pub fn count_uniques(series: &Series) -> Result<Value> {
    Functions::count_uniques(series)
}

pub fn unique(series: &Series) -> Result<Series> {
    Functions::unique(series)
}

pub fn replace_string(series: &Series, search: &[String], replace_by: &str) -> Result<Series> {
    series.functions().replace_string(series, search, replace_by)
}

pub fn replace_words(series: &Series, search: &[String], replace_by: &str) -> Result<Series> {
    Functions::replace_words(series, search, replace_by)
}

pub fn replace_match(series: &Series, search: &[String], replace_by: &str) -> Result<Series> {
    Functions::replace_match(series, search, replace_by)
}

pub fn remove_special_chars(series: &Series) -> Result<Series> {
    series.functions().remove_special_chars(series)
}

pub fn remove_accents(series: &Series) -> Result<Series> {
    series.functions().remove_accents(series)
}

pub fn clip(series: &Series, lower_bound: f64, upper_bound: f64) -> Result<Series> {
    series.functions().clip(series, lower_bound, upper_bound)
}

/// Result of a function looked up by name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FunctionOutput {
    Value(Value),
    List(Vec<Value>),
    Range(Range),
    Series(Series),
}

impl From<Value> for FunctionOutput {
    fn from(v: Value) -> Self {
        FunctionOutput::Value(v)
    }
}

impl From<Vec<Value>> for FunctionOutput {
    fn from(v: Vec<Value>) -> Self {
        FunctionOutput::List(v)
    }
}

impl From<Range> for FunctionOutput {
    fn from(r: Range) -> Self {
        FunctionOutput::Range(r)
    }
}

impl From<Series> for FunctionOutput {
    fn from(s: Series) -> Self {
        FunctionOutput::Series(s)
    }
}

/// Names accepted by [`apply`]
pub const FUNCTION_NAMES: &[&str] = &[
    "min", "max", "kurtosis", "skew", "mean", "mad", "mode", "std", "sum", "var", "percentile",
    "abs", "exp", "sqrt", "mod", "pow", "floor", "ceil", "round", "range", "radians", "degrees",
    "ln", "log", "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "asinh",
    "acosh", "atanh", "lower", "upper", "extract", "slice", "proper", "trim",
    "remove_white_spaces", "len", "find", "rfind", "left", "right", "starts_with", "ends_with",
    "char", "unicode", "exact", "date_format", "year", "month", "day", "hour", "minute", "second",
    "weekday", "years_between", "count_na", "count_zeros", "count_uniques", "unique",
    "replace_string", "replace_words", "replace_match", "remove_special_chars", "remove_accents",
    "clip",
];

/// Run the function called `name` with positional `args`
pub fn apply(name: &str, series: &Series, args: &[Value]) -> Result<FunctionOutput> {
    tracing::debug!(
        function = name,
        column = series.name(),
        engine = series.functions().engine(),
        args = args.len(),
        "applying function"
    );

    let args = Args { function: name, values: args };
    let output = match name {
        "min" => min(series)?.into(),
        "max" => max(series)?.into(),
        "kurtosis" => kurtosis(series)?.into(),
        "skew" => skew(series)?.into(),
        "mean" => mean(series)?.into(),
        "mad" => mad(series)?.into(),
        "mode" => mode(series)?.into(),
        "std" => std(series)?.into(),
        "sum" => sum(series)?.into(),
        "var" => var(series)?.into(),
        "percentile" => percentile(series, &args.numbers_from(0)?)?.into(),
        "abs" => abs(series)?.into(),
        "exp" => exp(series)?.into(),
        "sqrt" => sqrt(series)?.into(),
        "mod" => r#mod(series, args.number(0)?)?.into(),
        "pow" => pow(series, args.number(0)?)?.into(),
        "floor" => floor(series)?.into(),
        "ceil" => ceil(series)?.into(),
        "round" => round(series, args.decimals(0)?)?.into(),
        "range" => range(series)?.into(),
        "radians" => radians(series)?.into(),
        "degrees" => degrees(series)?.into(),
        "ln" => ln(series)?.into(),
        "log" => log(series)?.into(),
        "sin" => sin(series)?.into(),
        "cos" => cos(series)?.into(),
        "tan" => tan(series)?.into(),
        "asin" => asin(series)?.into(),
        "acos" => acos(series)?.into(),
        "atan" => atan(series)?.into(),
        "sinh" => sinh(series)?.into(),
        "cosh" => cosh(series)?.into(),
        "tanh" => tanh(series)?.into(),
        "asinh" => asinh(series)?.into(),
        "acosh" => acosh(series)?.into(),
        "atanh" => atanh(series)?.into(),
        "lower" => lower(series)?.into(),
        "upper" => upper(series)?.into(),
        "extract" => extract(series, &args.text(0)?)?.into(),
        "slice" => slice(series, args.index(0)?, args.optional_index(1)?)?.into(),
        "proper" => proper(series)?.into(),
        "trim" => trim(series)?.into(),
        "remove_white_spaces" => remove_white_spaces(series)?.into(),
        "len" => len(series)?.into(),
        "find" => find(series, &args.text(0)?)?.into(),
        "rfind" => rfind(series, &args.text(0)?)?.into(),
        "left" => left(series, args.index(0)?)?.into(),
        "right" => right(series, args.index(0)?)?.into(),
        "starts_with" => starts_with(series, &args.text(0)?)?.into(),
        "ends_with" => ends_with(series, &args.text(0)?)?.into(),
        "char" => char(series)?.into(),
        "unicode" => unicode(series)?.into(),
        "exact" => exact(series, &args.text(0)?)?.into(),
        "date_format" => {
            let current = args.optional_text(0)?;
            let output = args.optional_text(1)?;
            date_format(series, current.as_deref(), output.as_deref())?.into()
        }
        "year" => year(series, args.optional_text(0)?.as_deref())?.into(),
        "month" => month(series, args.optional_text(0)?.as_deref())?.into(),
        "day" => day(series, args.optional_text(0)?.as_deref())?.into(),
        "hour" => hour(series, args.optional_text(0)?.as_deref())?.into(),
        "minute" => minute(series, args.optional_text(0)?.as_deref())?.into(),
        "second" => second(series, args.optional_text(0)?.as_deref())?.into(),
        "weekday" => weekday(series, args.optional_text(0)?.as_deref())?.into(),
        "years_between" => years_between(series, args.optional_text(0)?.as_deref())?.into(),
        "count_na" => count_na(series)?.into(),
        "count_zeros" => count_zeros(series)?.into(),
        "count_uniques" => count_uniques(series)?.into(),
        "unique" => unique(series)?.into(),
        "replace_string" => {
            let (search, replace_by) = args.search_and_replacement()?;
            replace_string(series, &search, &replace_by)?.into()
        }
        "replace_words" => {
            let (search, replace_by) = args.search_and_replacement()?;
            replace_words(series, &search, &replace_by)?.into()
        }
        "replace_match" => {
            let (search, replace_by) = args.search_and_replacement()?;
            replace_match(series, &search, &replace_by)?.into()
        }
        "remove_special_chars" => remove_special_chars(series)?.into(),
        "remove_accents" => remove_accents(series)?.into(),
        "clip" => clip(series, args.number(0)?, args.number(1)?)?.into(),
        unknown => return Err(FunctionError::UnknownFunction(unknown.to_string())),
    };
    Ok(output)
}

/// Positional arguments for a function applied by name
struct Args<'a> {
    function: &'a str,
    values: &'a [Value],
}

impl Args<'_> {
    fn get(&self, i: usize) -> Result<&Value> {
        self.values.get(i).ok_or_else(|| {
            FunctionError::invalid_argument(self.function, format!("missing argument {}", i + 1))
        })
    }

    fn invalid(&self, i: usize, expected: &str, found: &Value) -> FunctionError {
        FunctionError::invalid_argument(
            self.function,
            format!("argument {} must be {}, found {:?}", i + 1, expected, found),
        )
    }

    fn number(&self, i: usize) -> Result<f64> {
        let value = self.get(i)?;
        value.as_number().ok_or_else(|| self.invalid(i, "a number", value))
    }

    fn integer(&self, i: usize) -> Result<i64> {
        let n = self.number(i)?;
        if n.fract() != 0.0 {
            return Err(self.invalid(i, "an integer", &Value::Number(n)));
        }
        Ok(n as i64)
    }

    fn decimals(&self, i: usize) -> Result<i32> {
        let n = self.integer(i)?;
        i32::try_from(n).map_err(|_| self.invalid(i, "a 32-bit integer", &Value::Number(n as f64)))
    }

    fn index(&self, i: usize) -> Result<usize> {
        let n = self.integer(i)?;
        usize::try_from(n).map_err(|_| self.invalid(i, "a non-negative integer", &Value::Number(n as f64)))
    }

    fn optional_index(&self, i: usize) -> Result<Option<usize>> {
        match self.values.get(i) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.index(i).map(Some),
        }
    }

    fn text(&self, i: usize) -> Result<String> {
        let value = self.get(i)?;
        value.as_text().ok_or_else(|| self.invalid(i, "text", value))
    }

    fn optional_text(&self, i: usize) -> Result<Option<String>> {
        match self.values.get(i) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.text(i).map(Some),
        }
    }

    fn numbers_from(&self, start: usize) -> Result<Vec<f64>> {
        if self.values.len() <= start {
            return Err(FunctionError::invalid_argument(self.function, "expected at least one value"));
        }
        (start..self.values.len()).map(|i| self.number(i)).collect()
    }

    /// Leading arguments are search terms, the last is the replacement
    fn search_and_replacement(&self) -> Result<(Vec<String>, String)> {
        if self.values.len() < 2 {
            return Err(FunctionError::invalid_argument(
                self.function,
                "expected search terms followed by a replacement",
            ));
        }
        let last = self.values.len() - 1;
        let search = (0..last).map(|i| self.text(i)).collect::<Result<Vec<_>>>()?;
        Ok((search, self.text(last)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MemoryFunctions, SeriesFunctions};
    use std::sync::{Arc, Mutex};

    /// Delegates to the in-memory engine and records which backend methods ran
    #[derive(Default)]
    struct RecordingFunctions {
        inner: MemoryFunctions,
        calls: Mutex<Vec<&'static str>>,
    }

    impl RecordingFunctions {
        fn record(&self, name: &'static str) {
            self.calls.lock().unwrap().push(name);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SeriesFunctions for RecordingFunctions {
        fn engine(&self) -> &'static str {
            "recording"
        }
        fn kurtosis(&self, s: &Series) -> Result<Value> {
            self.record("kurtosis");
            self.inner.kurtosis(s)
        }
        fn skew(&self, s: &Series) -> Result<Value> {
            self.record("skew");
            self.inner.skew(s)
        }
        fn range(&self, s: &Series) -> Result<Range> {
            self.record("range");
            self.inner.range(s)
        }
        fn exp(&self, s: &Series) -> Result<Series> {
            self.record("exp");
            self.inner.exp(s)
        }
        fn sqrt(&self, s: &Series) -> Result<Series> {
            self.record("sqrt");
            self.inner.sqrt(s)
        }
        fn floor(&self, s: &Series) -> Result<Series> {
            self.record("floor");
            self.inner.floor(s)
        }
        fn ceil(&self, s: &Series) -> Result<Series> {
            self.record("ceil");
            self.inner.ceil(s)
        }
        fn radians(&self, s: &Series) -> Result<Series> {
            self.record("radians");
            self.inner.radians(s)
        }
        fn degrees(&self, s: &Series) -> Result<Series> {
            self.record("degrees");
            self.inner.degrees(s)
        }
        fn ln(&self, s: &Series) -> Result<Series> {
            self.record("ln");
            self.inner.ln(s)
        }
        fn log(&self, s: &Series) -> Result<Series> {
            self.record("log");
            self.inner.log(s)
        }
        fn clip(&self, s: &Series, lower: f64, upper: f64) -> Result<Series> {
            self.record("clip");
            self.inner.clip(s, lower, upper)
        }
        fn sin(&self, s: &Series) -> Result<Series> {
            self.record("sin");
            self.inner.sin(s)
        }
        fn cos(&self, s: &Series) -> Result<Series> {
            self.record("cos");
            self.inner.cos(s)
        }
        fn tan(&self, s: &Series) -> Result<Series> {
            self.record("tan");
            self.inner.tan(s)
        }
        fn asin(&self, s: &Series) -> Result<Series> {
            self.record("asin");
            self.inner.asin(s)
        }
        fn acos(&self, s: &Series) -> Result<Series> {
            self.record("acos");
            self.inner.acos(s)
        }
        fn atan(&self, s: &Series) -> Result<Series> {
            self.record("atan");
            self.inner.atan(s)
        }
        fn sinh(&self, s: &Series) -> Result<Series> {
            self.record("sinh");
            self.inner.sinh(s)
        }
        fn cosh(&self, s: &Series) -> Result<Series> {
            self.record("cosh");
            self.inner.cosh(s)
        }
        fn tanh(&self, s: &Series) -> Result<Series> {
            self.record("tanh");
            self.inner.tanh(s)
        }
        fn asinh(&self, s: &Series) -> Result<Series> {
            self.record("asinh");
            self.inner.asinh(s)
        }
        fn acosh(&self, s: &Series) -> Result<Series> {
            self.record("acosh");
            self.inner.acosh(s)
        }
        fn atanh(&self, s: &Series) -> Result<Series> {
            self.record("atanh");
            self.inner.atanh(s)
        }
        fn date_format(&self, s: &Series, current: Option<&str>, output: Option<&str>) -> Result<Series> {
            self.record("date_format");
            self.inner.date_format(s, current, output)
        }
        fn years_between(&self, s: &Series, format: Option<&str>) -> Result<Series> {
            self.record("years_between");
            self.inner.years_between(s, format)
        }
        fn replace_string(&self, s: &Series, search: &[String], replace_by: &str) -> Result<Series> {
            self.record("replace_string");
            self.inner.replace_string(s, search, replace_by)
        }
        fn remove_special_chars(&self, s: &Series) -> Result<Series> {
            self.record("remove_special_chars");
            self.inner.remove_special_chars(s)
        }
        fn remove_accents(&self, s: &Series) -> Result<Series> {
            self.record("remove_accents");
            self.inner.remove_accents(s)
        }
    }

    fn recorded(values: Vec<Value>) -> (Series, Arc<RecordingFunctions>) {
        let engine = Arc::new(RecordingFunctions::default());
        let series = Series::with_functions("col", values, engine.clone());
        (series, engine)
    }

    fn numeric() -> Vec<Value> {
        vec![Value::Number(0.25), Value::Number(0.5), Value::Number(0.75), Value::Number(1.0)]
    }

    #[test]
    fn test_backend_functions_reach_engine() {
        let (series, engine) = recorded(numeric());
        kurtosis(&series).unwrap();
        skew(&series).unwrap();
        range(&series).unwrap();
        exp(&series).unwrap();
        sqrt(&series).unwrap();
        floor(&series).unwrap();
        ceil(&series).unwrap();
        radians(&series).unwrap();
        degrees(&series).unwrap();
        ln(&series).unwrap();
        log(&series).unwrap();
        clip(&series, 0.0, 0.5).unwrap();
        assert_eq!(
            engine.calls(),
            vec![
                "kurtosis", "skew", "range", "exp", "sqrt", "floor", "ceil", "radians", "degrees",
                "ln", "log", "clip"
            ]
        );
    }

    #[test]
    fn test_trigonometry_reaches_engine() {
        let (series, engine) = recorded(numeric());
        sin(&series).unwrap();
        cos(&series).unwrap();
        tan(&series).unwrap();
        asin(&series).unwrap();
        acos(&series).unwrap();
        atan(&series).unwrap();
        sinh(&series).unwrap();
        cosh(&series).unwrap();
        tanh(&series).unwrap();
        asinh(&series).unwrap();
        acosh(&series).unwrap();
        atanh(&series).unwrap();
        assert_eq!(
            engine.calls(),
            vec![
                "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "asinh",
                "acosh", "atanh"
            ]
        );
    }

    #[test]
    fn test_text_and_date_backend_functions_reach_engine() {
        let (series, engine) = recorded(vec![Value::from("2020-01-02")]);
        date_format(&series, Some("%Y-%m-%d"), Some("%d/%m/%Y")).unwrap();
        years_between(&series, Some("%Y-%m-%d")).unwrap();
        replace_string(&series, &["-".to_string()], "/").unwrap();
        remove_special_chars(&series).unwrap();
        remove_accents(&series).unwrap();
        assert_eq!(
            engine.calls(),
            vec![
                "date_format",
                "years_between",
                "replace_string",
                "remove_special_chars",
                "remove_accents"
            ]
        );
    }

    #[test]
    fn test_shared_functions_bypass_engine() {
        let (series, engine) = recorded(numeric());
        min(&series).unwrap();
        max(&series).unwrap();
        mean(&series).unwrap();
        mad(&series).unwrap();
        mode(&series).unwrap();
        std(&series).unwrap();
        sum(&series).unwrap();
        var(&series).unwrap();
        percentile(&series, &[0.5]).unwrap();
        abs(&series).unwrap();
        r#mod(&series, 2.0).unwrap();
        pow(&series, 2.0).unwrap();
        round(&series, 1).unwrap();
        lower(&series).unwrap();
        upper(&series).unwrap();
        trim(&series).unwrap();
        count_na(&series).unwrap();
        count_zeros(&series).unwrap();
        count_uniques(&series).unwrap();
        unique(&series).unwrap();
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn test_apply_by_name() {
        let series = Series::new("n", vec![Value::Number(1.0), Value::Number(3.0)]);
        assert_eq!(apply("mean", &series, &[]).unwrap(), FunctionOutput::Value(Value::Number(2.0)));
        assert_eq!(
            apply("percentile", &series, &[Value::Number(0.0), Value::Number(1.0)]).unwrap(),
            FunctionOutput::List(vec![Value::Number(1.0), Value::Number(3.0)])
        );
        assert_eq!(
            apply("range", &series, &[]).unwrap(),
            FunctionOutput::Range(Range { min: Value::Number(1.0), max: Value::Number(3.0) })
        );
        let FunctionOutput::Series(clipped) = apply("clip", &series, &[Value::Number(2.0), Value::Number(2.5)]).unwrap() else {
            panic!("clip should return a series");
        };
        assert_eq!(clipped.values(), &[Value::Number(2.0), Value::Number(2.5)]);
    }

    #[test]
    fn test_apply_text_arguments() {
        let series = Series::new("t", vec![Value::from("a-b c-d")]);
        let FunctionOutput::Series(replaced) =
            apply("replace_string", &series, &[Value::from("-"), Value::from(" ")]).unwrap()
        else {
            panic!("replace_string should return a series");
        };
        assert_eq!(replaced.values(), &[Value::from("a b c d")]);

        let FunctionOutput::Series(sliced) =
            apply("slice", &series, &[Value::Number(2.0)]).unwrap()
        else {
            panic!("slice should return a series");
        };
        assert_eq!(sliced.values(), &[Value::from("b c-d")]);
    }

    #[test]
    fn test_apply_unknown_function() {
        let series = Series::new("n", vec![]);
        assert_eq!(
            apply("median_of_medians", &series, &[]).unwrap_err(),
            FunctionError::UnknownFunction("median_of_medians".to_string())
        );
    }

    #[test]
    fn test_apply_missing_argument() {
        let series = Series::new("n", vec![Value::Number(1.0)]);
        assert!(matches!(
            apply("pow", &series, &[]),
            Err(FunctionError::InvalidArgument { .. })
        ));
        assert!(matches!(
            apply("left", &series, &[Value::Number(-1.0)]),
            Err(FunctionError::InvalidArgument { .. })
        ));
        assert!(matches!(
            apply("replace_words", &series, &[Value::from("only")]),
            Err(FunctionError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_apply_round_rejects_out_of_range_decimals() {
        let series = Series::new("n", vec![Value::Number(1.23456)]);
        assert!(matches!(
            apply("round", &series, &[Value::Number(4294967297.0)]),
            Err(FunctionError::InvalidArgument { .. })
        ));
        let FunctionOutput::Series(rounded) = apply("round", &series, &[Value::Number(2.0)]).unwrap() else {
            panic!("round should return a series");
        };
        assert_eq!(rounded.values(), &[Value::Number(1.23)]);
    }

    #[test]
    fn test_apply_clip_nan_bound_is_error() {
        let series = Series::new("n", vec![Value::Number(1.0), Value::Number(5.0)]);
        assert!(matches!(
            apply("clip", &series, &[Value::from("NaN"), Value::Number(1.0)]),
            Err(FunctionError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_every_listed_name_is_dispatched() {
        let series = Series::new("n", vec![]);
        for name in FUNCTION_NAMES {
            let result = apply(name, &series, &[]);
            assert!(
                !matches!(result, Err(FunctionError::UnknownFunction(_))),
                "{} is listed but not dispatched",
                name
            );
        }
    }

    #[test]
    fn test_output_serializes_untagged() {
        let output = FunctionOutput::Range(Range { min: Value::Number(1.0), max: Value::Null });
        assert_eq!(serde_json::to_string(&output).unwrap(), r#"{"min":1.0,"max":null}"#);
    }
}
