//! Error types for data operations.

use earnviz_model::ReportError;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while fetching an income statement.
#[derive(Debug, Error)]
pub enum DataError {
    /// Yahoo Finance API error
    #[error("Yahoo Finance API error: {0}")]
    YahooApi(String),

    /// SEC EDGAR API error
    #[error("EDGAR API error: {0}")]
    EdgarApi(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Missing data
    #[error("Missing data for {symbol}: {reason}")]
    MissingData {
        /// Symbol that was queried
        symbol: String,
        /// Reason for missing data
        reason: String,
    },

    /// A required income-statement line item is absent
    #[error("{symbol} did not report {field}")]
    MissingField {
        /// Symbol that was queried
        symbol: String,
        /// Line item that is missing
        field: &'static str,
    },

    /// A reported value is not a whole number
    #[error("Malformed value for {field}: {value}")]
    MalformedValue {
        /// Line item the value belongs to
        field: &'static str,
        /// Value as reported
        value: String,
    },

    /// Invalid symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Unknown provider name
    #[error("Unknown provider: {0} (expected edgar, yahoo or fixture)")]
    UnknownProvider(String),

    /// CIK not found for ticker
    #[error("CIK not found for ticker: {0}")]
    CikNotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report construction error
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl DataError {
    /// True if the error means the ticker is unknown or has no usable data,
    /// as opposed to a failure talking to the provider.
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MissingData { .. } | Self::MissingField { .. } | Self::CikNotFound(_)
        )
    }
}
