//! # OutputFormatter
//!
//! Renders contract reports and check outcomes as pretty JSON, JSON Lines, or
//! human-readable text.
//!
//! ```
//! use guard_core::output::{OutputFormat, OutputFormatter};
//!
//! let formatter = OutputFormatter::new(OutputFormat::JsonLines);
//! let output = formatter.format_value(&vec!["int", "float"]).unwrap();
//! assert_eq!(output, r#"["int","float"]"#);
//! ```

use crate::report::ContractViolation;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The text report layout
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
    /// One JSON object per line
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "human" | "text" => Some(Self::Human),
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Json => "json",
            Self::JsonLines => "jsonl",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format any serializable value.
    pub fn format_value<T: Serialize>(&self, value: &T) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::JsonLines => Ok(serde_json::to_string(value)?),
            OutputFormat::Human => {
                let json = serde_json::to_value(value)?;
                Ok(json_to_human(&json, 0))
            }
        }
    }

    /// Format a contract report. Human output is the report's own text layout.
    pub fn format_violation(&self, violation: &ContractViolation) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(violation.to_string()),
            _ => self.format_value(violation),
        }
    }

    /// Write a formatted value followed by a newline.
    pub fn write_value<T: Serialize, W: Write>(&self, value: &T, writer: &mut W) -> Result<()> {
        let output = self.format_value(value)?;
        writeln!(writer, "{}", output)?;
        Ok(())
    }

    pub fn write_violation<W: Write>(
        &self,
        violation: &ContractViolation,
        writer: &mut W,
    ) -> Result<()> {
        let output = self.format_violation(violation)?;
        writeln!(writer, "{}", output)?;
        Ok(())
    }
}

/// Indented `key: value` rendering of a JSON tree.
fn json_to_human(value: &serde_json::Value, indent: usize) -> String {
    let prefix = "  ".repeat(indent);
    match value {
        serde_json::Value::Array(items) if items.is_empty() => format!("{}(empty list)", prefix),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    format!("{}-\n{}", prefix, json_to_human(item, indent + 1))
                }
                _ => format!("{}- {}", prefix, json_scalar(item)),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        serde_json::Value::Object(map) if map.is_empty() => format!("{}(empty)", prefix),
        serde_json::Value::Object(map) => map
            .iter()
            .map(|(key, v)| {
                if v.is_object() || v.is_array() {
                    format!("{}{}:\n{}", prefix, key, json_to_human(v, indent + 1))
                } else {
                    format!("{}{}: {}", prefix, key, json_scalar(v))
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        scalar => format!("{}{}", prefix, json_scalar(scalar)),
    }
}

fn json_scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "(null)".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
