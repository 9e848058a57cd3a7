// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! Output formatting for lenses-cli
//!
//! Results go to stdout in the selected format, logs and hints to stderr,
//! so the output of every command can be piped.
//!
//! - **JSON** (default): pretty-printed
//! - **YAML**: through `serde_yaml`
//! - **Table**: one `key: value` line per field; lists of objects become
//!   aligned columns

use lenses_cli::error::LensesCliError;
use log::info;
use serde_json::Value;
use std::io::{self, Write};

/// Output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Pretty JSON
    Json,
    /// Human-readable table
    Table,
    /// YAML
    Yaml,
}

impl From<crate::OutputFormat> for Format {
    fn from(format: crate::OutputFormat) -> Self {
        match format {
            crate::OutputFormat::Json => Format::Json,
            crate::OutputFormat::Table => Format::Table,
            crate::OutputFormat::Yaml => Format::Yaml,
        }
    }
}

/// Renders command results and errors
#[derive(Debug)]
pub struct OutputHandler {
    format: Format,
    quiet: bool,
}

impl OutputHandler {
    /// Create a handler for `format`; `quiet` silences informational messages
    pub fn new(format: crate::OutputFormat, quiet: bool) -> Self {
        Self {
            format: format.into(),
            quiet,
        }
    }

    /// Print a successful result
    ///
    /// # Errors
    ///
    /// The value cannot be rendered in the selected format, or stdout
    /// cannot be written.
    pub fn success(&self, value: Value) -> Result<(), LensesCliError> {
        let output = self.render(&value)?;
        writeln!(io::stdout().lock(), "{}", output.trim_end())?;
        Ok(())
    }

    /// Print an error
    ///
    /// JSON goes to stdout so scripts can parse it; the other formats print a
    /// message to stderr.
    pub fn error(&self, error: LensesCliError) {
        let error_json = error.to_json();

        match self.format {
            Format::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&error_json).unwrap_or_default()
                );
            }
            Format::Table | Format::Yaml => {
                eprintln!("Error: {error}");
                if let Some(details) = error_json.get("error").and_then(|e| e.get("details")) {
                    if !details.is_null() {
                        eprintln!(
                            "Details: {}",
                            serde_json::to_string_pretty(details).unwrap_or_default()
                        );
                    }
                }
            }
        }
    }

    /// Log an informational message unless quiet
    pub fn info<T: AsRef<str>>(&self, message: T) {
        if !self.quiet {
            info!("{}", message.as_ref());
        }
    }

    /// Print a hint for humans on stderr unless quiet
    pub fn hint<T: AsRef<str>>(&self, message: T) {
        if !self.quiet {
            eprintln!("{}", message.as_ref());
        }
    }

    fn render(&self, value: &Value) -> Result<String, LensesCliError> {
        Ok(match self.format {
            Format::Json => format_json(value)?,
            Format::Table => format_table(value),
            Format::Yaml => format_yaml(value)?,
        })
    }
}

fn format_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

fn format_yaml(value: &Value) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(value)
}

fn format_table(value: &Value) -> String {
    match value {
        Value::Object(map) if map.is_empty() => "(empty)\n".to_string(),
        Value::Object(map) => {
            let mut output = String::new();
            for (key, value) in map {
                match value {
                    Value::Array(rows) if rows.iter().all(Value::is_object) => {
                        output.push_str(&format!("{key}:\n"));
                        output.push_str(&format_rows(rows));
                    }
                    _ => output.push_str(&format!("{key}: {}\n", format_value_brief(value))),
                }
            }
            output
        }
        Value::Array(rows) => format_rows(rows),
        _ => format!("{}\n", format_value_brief(value)),
    }
}

/// Aligned columns, headed by the keys of the first row
fn format_rows(rows: &[Value]) -> String {
    let columns: Vec<&String> = match rows.first() {
        Some(Value::Object(first)) => first.keys().collect(),
        _ => return "  (none)\n".to_string(),
    };

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    row.get(column.as_str())
                        .map(format_value_brief)
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let line = |values: Vec<&str>| -> String {
        let padded: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect();
        format!("  {}\n", padded.join("  ").trim_end())
    };

    let header: Vec<String> = columns.iter().map(|c| c.to_uppercase()).collect();
    let mut output = line(header.iter().map(String::as_str).collect());
    for row in &cells {
        output.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    output
}

fn format_value_brief(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => match arr.as_slice() {
            [] => "[]".to_string(),
            [single] => format_value_brief(single),
            _ => format!("[{} items]", arr.len()),
        },
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{k}={}", format_value_brief(v)))
            .collect::<Vec<_>>()
            .join(", "),
    }
}
