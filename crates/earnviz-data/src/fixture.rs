//! Statements served from a local JSON file.
//!
//! The file holds an array of [`IncomeStatement`] values in their serde form:
//!
//! ```json
//! [
//!   {
//!     "symbol": "NVDA",
//!     "period_end": "2023-07-30",
//!     "unit": "millions",
//!     "source": "fixture",
//!     "items": { "Total Revenue": 13507, "Cost Of Revenue": 4045 }
//!   }
//! ]
//! ```

use crate::error::{DataError, Result};
use crate::provider::IncomeStatementProvider;
use crate::statement::IncomeStatement;
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;

/// Provider name recorded in logs.
pub const SOURCE: &str = "fixture";

/// Offline provider over a fixed set of statements.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    statements: HashMap<String, IncomeStatement>,
}

impl FixtureProvider {
    /// Create a provider from statements. Later entries win on duplicate symbols.
    pub fn new(statements: impl IntoIterator<Item = IncomeStatement>) -> Self {
        Self {
            statements: statements
                .into_iter()
                .map(|s| (s.symbol.to_uppercase(), s))
                .collect(),
        }
    }

    /// Parse statements from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let statements: Vec<IncomeStatement> = serde_json::from_str(json)?;
        Ok(Self::new(statements))
    }

    /// Load statements from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let provider = Self::from_json(&json)?;
        tracing::debug!(
            path = %path.display(),
            count = provider.len(),
            "loaded fixture statements"
        );
        Ok(provider)
    }

    /// Number of statements.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// True if there are no statements.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Symbols with a statement, sorted.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.statements.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }

    fn lookup(&self, symbol: &str) -> Result<IncomeStatement> {
        self.statements
            .get(&symbol.to_uppercase())
            .cloned()
            .ok_or_else(|| DataError::MissingData {
                symbol: symbol.to_string(),
                reason: "no fixture statement".to_string(),
            })
    }
}

impl IncomeStatementProvider for FixtureProvider {
    fn name(&self) -> &'static str {
        SOURCE
    }

    fn latest_quarter(&self, symbol: &str) -> impl Future<Output = Result<IncomeStatement>> + Send {
        std::future::ready(self.lookup(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::LineItem;
    use chrono::NaiveDate;
    use earnviz_model::Unit;

    fn statement(symbol: &str, revenue: i64) -> IncomeStatement {
        IncomeStatement::new(
            symbol,
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            Unit::Dollars,
            SOURCE,
        )
        .with_item(LineItem::TotalRevenue, revenue)
    }

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let provider = FixtureProvider::new([statement("msft", 100)]);
        let found = provider.latest_quarter("MSFT").await.unwrap();
        assert_eq!(found.get(LineItem::TotalRevenue), Some(100));
    }

    #[tokio::test]
    async fn test_unknown_symbol() {
        let provider = FixtureProvider::new([statement("MSFT", 100)]);
        let err = provider.latest_quarter("ZZZZ").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_later_duplicates_win() {
        let provider = FixtureProvider::new([statement("MSFT", 1), statement("MSFT", 2)]);
        assert_eq!(provider.len(), 1);
        assert_eq!(
            provider.lookup("MSFT").unwrap().get(LineItem::TotalRevenue),
            Some(2)
        );
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = FixtureProvider::from_path(dir.path().join("absent.json"));
        assert!(matches!(result, Err(DataError::Io(_))));
    }

    #[test]
    fn test_from_json_rejects_fractional_values() {
        let json = r#"[{"symbol": "X", "period_end": "2024-03-31", "unit": "dollars",
                        "source": "fixture", "items": {"Total Revenue": 1.5}}]"#;
        assert!(matches!(
            FixtureProvider::from_json(json),
            Err(DataError::Serialization(_))
        ));
    }
}
