// Pre-aggregated column statistics accepted by the plotting helpers

use anyhow::Result;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::marker::PhantomData;

/// Column name to statistics, in the order the columns were given
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> ColumnMap<T> {
    pub fn new() -> Self {
        ColumnMap { entries: Vec::new() }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: T) {
        self.entries.push((name.into(), value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<(&str, &T)> {
        self.entries.first().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}

impl<T> Default for ColumnMap<T> {
    fn default() -> Self {
        ColumnMap::new()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for ColumnMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        ColumnMap {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ColumnMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ColumnMapVisitor(PhantomData))
    }
}

struct ColumnMapVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for ColumnMapVisitor<T> {
    type Value = ColumnMap<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of column name to statistics")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, value)) = access.next_entry::<String, T>()? {
            entries.push((name, value));
        }
        Ok(ColumnMap { entries })
    }
}

/// One histogram bin
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistBin {
    pub lower: f64,
    pub upper: f64,
    pub count: f64,
}

/// Boxplot summary for one box
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoxStats {
    #[serde(default)]
    pub label: Option<String>,
    pub med: f64,
    pub q1: f64,
    pub q3: f64,
    pub whislo: f64,
    pub whishi: f64,
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub fliers: Vec<f64>,
}

/// A value and how often it occurs
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FreqEntry {
    pub value: serde_json::Value,
    pub count: f64,
}

impl FreqEntry {
    /// Display text for the value; strings are shown without quotes
    pub fn label(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => "null".to_string(),
            other => other.to_string(),
        }
    }
}

/// Missing count for one column
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MissingEntry {
    pub missing: f64,
    #[serde(rename = "%")]
    pub percent: f64,
}

/// Missing counts across a dataset
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MissingValues {
    /// Total number of rows
    pub count: f64,
    pub data: ColumnMap<MissingEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScatterAxis {
    pub name: String,
    pub data: Vec<f64>,
}

/// Paired coordinates for a scatter plot
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScatterData {
    pub x: ScatterAxis,
    pub y: ScatterAxis,
    /// Marker size in points squared
    #[serde(default = "default_marker_size")]
    pub s: f64,
}

fn default_marker_size() -> f64 {
    36.0
}

/// Square correlation matrix
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn validate(&self) -> Result<()> {
        let n = self.columns.len();
        if n == 0 {
            anyhow::bail!("Correlation matrix has no columns");
        }
        if self.values.len() != n {
            anyhow::bail!(
                "Correlation matrix must have one row per column (columns: {}, rows: {})",
                n,
                self.values.len()
            );
        }
        for (i, row) in self.values.iter().enumerate() {
            if row.len() != n {
                anyhow::bail!(
                    "Correlation matrix row {} has {} values, expected {}",
                    i + 1,
                    row.len(),
                    n
                );
            }
        }
        Ok(())
    }
}
