// Output modes for rendered charts

use anyhow::{Context, Result};
use base64::Engine as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a rendered chart goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Write the PNG to a file
    Image(PathBuf),
    /// Return the PNG as a base64 string
    Base64,
    /// Render and drop the result
    Discard,
}

impl OutputMode {
    /// Parse an output mode name. `"image"` needs a path; unrecognized names discard.
    pub fn from_name(name: &str, path: Option<&Path>) -> Result<Self> {
        match name {
            "image" => {
                let path = path.ok_or_else(|| anyhow::anyhow!("Output mode 'image' requires a path"))?;
                Ok(OutputMode::Image(path.to_path_buf()))
            }
            "base64" => Ok(OutputMode::Base64),
            other => {
                tracing::debug!(mode = other, "unrecognized output mode, discarding chart");
                Ok(OutputMode::Discard)
            }
        }
    }
}

/// Result of emitting a chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Written(PathBuf),
    Base64(String),
    Nothing,
}

impl Rendered {
    pub fn as_base64(&self) -> Option<&str> {
        match self {
            Rendered::Base64(s) => Some(s),
            _ => None,
        }
    }
}

/// An encoded PNG chart
#[derive(Debug, Clone)]
pub struct Chart {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl Chart {
    pub fn new(width: u32, height: u32, png: Vec<u8>) -> Self {
        Chart { width, height, png }
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.png)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, &self.png)
            .with_context(|| format!("Failed to write chart to '{}'", path.display()))
    }

    /// Hand the chart to its destination
    pub fn emit(self, mode: &OutputMode) -> Result<Rendered> {
        match mode {
            OutputMode::Image(path) => {
                self.save(path)?;
                Ok(Rendered::Written(path.clone()))
            }
            OutputMode::Base64 => Ok(Rendered::Base64(self.to_base64())),
            OutputMode::Discard => Ok(Rendered::Nothing),
        }
    }
}
