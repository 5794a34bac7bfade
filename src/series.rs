// Column handle passed through the function dispatcher

use crate::engine::{MemoryFunctions, SeriesFunctions};
use crate::error::{FunctionError, Result};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
        }
    }

    /// Numeric view: numbers as-is, numeric text parsed
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Text view of any non-null value
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(format_number(*n)),
            Value::Text(s) => Some(s.clone()),
        }
    }

    pub(crate) fn key(&self) -> ValueKey<'_> {
        match self {
            Value::Null => ValueKey::Null,
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Number(n) => {
                let n = if *n == 0.0 { 0.0 } else { *n };
                let bits = if n.is_nan() { f64::NAN.to_bits() } else { n.to_bits() };
                ValueKey::Number(bits)
            }
            Value::Text(s) => ValueKey::Text(s),
        }
    }
}

/// Hashable identity of a value; -0.0 equals 0.0 and all NaNs are equal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey<'a> {
    Null,
    Bool(bool),
    Number(u64),
    Text(&'a str),
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A named column bound to the engine that evaluates its backend-specific functions
#[derive(Clone)]
pub struct Series {
    name: String,
    values: Vec<Value>,
    functions: Arc<dyn SeriesFunctions>,
}

impl Series {
    /// A series evaluated by the in-memory engine
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Series::with_functions(name, values, Arc::new(MemoryFunctions::default()))
    }

    pub fn with_functions(
        name: impl Into<String>,
        values: Vec<Value>,
        functions: Arc<dyn SeriesFunctions>,
    ) -> Self {
        Series {
            name: name.into(),
            values,
            functions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The backend handler for this series
    pub fn functions(&self) -> &dyn SeriesFunctions {
        self.functions.as_ref()
    }

    /// New values under the same name and engine
    pub fn with_values(&self, values: Vec<Value>) -> Series {
        Series {
            name: self.name.clone(),
            values,
            functions: Arc::clone(&self.functions),
        }
    }

    /// Non-null values as numbers
    pub fn numbers(&self) -> Result<Vec<f64>> {
        self.values
            .iter()
            .filter(|v| !v.is_null())
            .map(|v| v.as_number().ok_or_else(|| self.mismatch("number", v)))
            .collect()
    }

    /// Values an aggregation sees: numbers with nulls and NaN dropped
    pub fn aggregate_numbers(&self) -> Result<Vec<f64>> {
        let mut numbers = self.numbers()?;
        numbers.retain(|n| !n.is_nan());
        Ok(numbers)
    }

    /// Numbers with nulls kept in place
    pub fn numbers_or_nulls(&self) -> Result<Vec<Option<f64>>> {
        self.values
            .iter()
            .map(|v| match v {
                Value::Null => Ok(None),
                other => other
                    .as_number()
                    .map(Some)
                    .ok_or_else(|| self.mismatch("number", other)),
            })
            .collect()
    }

    /// Apply `f` to every number; nulls stay null
    pub fn map_numbers<F: Fn(f64) -> f64>(&self, f: F) -> Result<Series> {
        let values = self
            .values
            .iter()
            .map(|v| match v {
                Value::Null => Ok(Value::Null),
                other => other
                    .as_number()
                    .map(|n| Value::Number(f(n)))
                    .ok_or_else(|| self.mismatch("number", other)),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.with_values(values))
    }

    /// Apply `f` to the text form of every value; nulls stay null
    pub fn map_texts<F: Fn(&str) -> Value>(&self, f: F) -> Series {
        let values = self
            .values
            .iter()
            .map(|v| match v.as_text() {
                Some(text) => f(&text),
                None => Value::Null,
            })
            .collect();
        self.with_values(values)
    }

    /// Fallible form of [`Series::map_texts`]
    pub fn try_map_texts<F: Fn(&str) -> Result<Value>>(&self, f: F) -> Result<Series> {
        let values = self
            .values
            .iter()
            .map(|v| match v.as_text() {
                Some(text) => f(&text),
                None => Ok(Value::Null),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.with_values(values))
    }

    fn mismatch(&self, expected: &'static str, found: &Value) -> FunctionError {
        FunctionError::TypeMismatch {
            column: self.name.clone(),
            expected,
            found: format!("{} {:?}", found.type_name(), found),
        }
    }
}

impl fmt::Debug for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Series")
            .field("name", &self.name)
            .field("values", &self.values)
            .field("engine", &self.functions.engine())
            .finish()
    }
}

impl PartialEq for Series {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.values == other.values
    }
}

impl Serialize for Series {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Series", 2)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("values", &self.values)?;
        state.end()
    }
}

#[derive(Deserialize)]
struct SeriesData {
    name: String,
    values: Vec<Value>,
}

impl<'de> Deserialize<'de> for Series {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let data = SeriesData::deserialize(deserializer)?;
        Ok(Series::new(data.name, data.values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_json_forms() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, true, 1.5, 3, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Number(1.5),
                Value::Number(3.0),
                Value::Text("x".to_string())
            ]
        );
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"[null,true,1.5,3.0,"x"]"#);
    }

    #[test]
    fn test_value_text_form() {
        assert_eq!(Value::Number(3.0).as_text(), Some("3".to_string()));
        assert_eq!(Value::Number(2.5).as_text(), Some("2.5".to_string()));
        assert_eq!(Value::Bool(false).as_text(), Some("false".to_string()));
        assert_eq!(Value::Null.as_text(), None);
    }

    #[test]
    fn test_value_number_form() {
        assert_eq!(Value::from(" 4.5 ").as_number(), Some(4.5));
        assert_eq!(Value::from("abc").as_number(), None);
        assert_eq!(Value::Bool(true).as_number(), None);
    }

    #[test]
    fn test_value_key_normalizes_zero_and_nan() {
        assert_eq!(Value::Number(-0.0).key(), Value::Number(0.0).key());
        assert_eq!(Value::Number(f64::NAN).key(), Value::Number(-f64::NAN).key());
    }

    #[test]
    fn test_numbers_skips_nulls() {
        let s = Series::new("n", vec![Value::Number(1.0), Value::Null, "2".into()]);
        assert_eq!(s.numbers().unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_numbers_rejects_text() {
        let s = Series::new("n", vec![Value::Number(1.0), "oops".into()]);
        match s.numbers() {
            Err(FunctionError::TypeMismatch { column, expected, .. }) => {
                assert_eq!(column, "n");
                assert_eq!(expected, "number");
            }
            other => panic!("expected type mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_map_numbers_keeps_nulls() {
        let s = Series::new("n", vec![Value::Number(2.0), Value::Null]);
        let doubled = s.map_numbers(|n| n * 2.0).unwrap();
        assert_eq!(doubled.values(), &[Value::Number(4.0), Value::Null]);
        assert_eq!(doubled.name(), "n");
    }

    #[test]
    fn test_series_json_round_trip_shape() {
        let s: Series = serde_json::from_str(r#"{"name": "a", "values": [1, null]}"#).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.functions().engine(), "memory");
        assert_eq!(
            serde_json::to_string(&s).unwrap(),
            r#"{"name":"a","values":[1.0,null]}"#
        );
    }
}
