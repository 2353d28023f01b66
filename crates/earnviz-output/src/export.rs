//! Export functionality for earnings summaries and chart data.
//!
//! This module provides CSV and JSON export for [`IncomeSummary`] and
//! [`SankeyData`].

use crate::sankey::{LABEL_BREAK, SankeyData};
use crate::summary::IncomeSummary;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output was not valid UTF-8.
    #[error("Invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn write_csv<T: Serialize>(records: impl IntoIterator<Item = T>) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn write_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, ExportError> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

/// Flattened summary line for CSV export.
#[derive(Debug, Serialize)]
struct SummaryRecord<'a> {
    symbol: &'a str,
    period_end: String,
    line: &'a str,
    depth: u8,
    amount: i64,
    pct_of_revenue: Option<f64>,
}

impl Exporter for IncomeSummary {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self.lines.iter().map(|line| SummaryRecord {
                symbol: &self.symbol,
                period_end: self.period_end.to_string(),
                line: &line.label,
                depth: line.depth,
                amount: line.amount,
                pct_of_revenue: line.pct_of_revenue,
            })),
            ExportFormat::Json => write_json(self, false),
            ExportFormat::PrettyJson => write_json(self, true),
        }
    }
}

/// One link of a Sankey chart for CSV export.
#[derive(Debug, Serialize)]
struct LinkRecord {
    source: String,
    target: String,
    value: u64,
    color: String,
}

impl SankeyData {
    fn plain_label(&self, index: usize) -> String {
        self.labels
            .get(index)
            .map(|label| label.replace(LABEL_BREAK, " "))
            .unwrap_or_default()
    }
}

impl Exporter for SankeyData {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv((0..self.link_count()).map(|link| LinkRecord {
                source: self.plain_label(self.source[link]),
                target: self.plain_label(self.target[link]),
                value: self.value[link],
                color: self.link_colors[link].clone(),
            })),
            ExportFormat::Json => write_json(self, false),
            ExportFormat::PrettyJson => write_json(self, true),
        }
    }
}
