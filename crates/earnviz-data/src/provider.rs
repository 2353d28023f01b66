//! The provider boundary and runtime provider selection.

use crate::config::DataConfig;
use crate::edgar::EdgarProvider;
use crate::error::{DataError, Result};
use crate::fixture::FixtureProvider;
use crate::statement::IncomeStatement;
use crate::yahoo::YahooProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::str::FromStr;

/// Source of quarterly income statements.
pub trait IncomeStatementProvider {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Fetch the most recent quarterly statement for a symbol.
    ///
    /// # Errors
    ///
    /// Unknown symbols yield an error for which
    /// [`DataError::is_not_found`] is true.
    fn latest_quarter(&self, symbol: &str) -> impl Future<Output = Result<IncomeStatement>> + Send;
}

/// Which provider to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// SEC EDGAR company facts
    #[default]
    Edgar,
    /// Yahoo Finance fundamentals timeseries
    Yahoo,
    /// Local JSON statements
    Fixture,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edgar => write!(f, "edgar"),
            Self::Yahoo => write!(f, "yahoo"),
            Self::Fixture => write!(f, "fixture"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edgar" | "sec" => Ok(Self::Edgar),
            "yahoo" => Ok(Self::Yahoo),
            "fixture" | "fixtures" => Ok(Self::Fixture),
            other => Err(DataError::UnknownProvider(other.to_string())),
        }
    }
}

/// A provider chosen at runtime.
#[derive(Debug)]
pub enum Provider {
    /// SEC EDGAR
    Edgar(EdgarProvider),
    /// Yahoo Finance
    Yahoo(YahooProvider),
    /// Local fixtures
    Fixture(FixtureProvider),
}

impl Provider {
    /// Construct the provider of the given kind.
    ///
    /// # Errors
    ///
    /// The fixture provider needs `config.fixtures`; network providers fail
    /// only if the HTTP client cannot be built.
    pub fn from_config(kind: ProviderKind, config: &DataConfig) -> Result<Self> {
        let provider = match kind {
            ProviderKind::Edgar => Self::Edgar(EdgarProvider::new(config)?),
            ProviderKind::Yahoo => Self::Yahoo(YahooProvider::new(config)?),
            ProviderKind::Fixture => {
                let path = config.fixtures.as_ref().ok_or_else(|| {
                    DataError::Parse("fixture provider requires a fixtures file".to_string())
                })?;
                Self::Fixture(FixtureProvider::from_path(path)?)
            }
        };
        tracing::debug!(provider = provider.name(), "provider ready");
        Ok(provider)
    }

    /// Kind of this provider.
    pub const fn kind(&self) -> ProviderKind {
        match self {
            Self::Edgar(_) => ProviderKind::Edgar,
            Self::Yahoo(_) => ProviderKind::Yahoo,
            Self::Fixture(_) => ProviderKind::Fixture,
        }
    }
}

impl From<FixtureProvider> for Provider {
    fn from(provider: FixtureProvider) -> Self {
        Self::Fixture(provider)
    }
}

impl IncomeStatementProvider for Provider {
    fn name(&self) -> &'static str {
        match self {
            Self::Edgar(p) => p.name(),
            Self::Yahoo(p) => p.name(),
            Self::Fixture(p) => p.name(),
        }
    }

    fn latest_quarter(&self, symbol: &str) -> impl Future<Output = Result<IncomeStatement>> + Send {
        async move {
            match self {
                Self::Edgar(p) => p.latest_quarter(symbol).await,
                Self::Yahoo(p) => p.latest_quarter(symbol).await,
                Self::Fixture(p) => p.latest_quarter(symbol).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("edgar", ProviderKind::Edgar)]
    #[case("SEC", ProviderKind::Edgar)]
    #[case("Yahoo", ProviderKind::Yahoo)]
    #[case(" fixture ", ProviderKind::Fixture)]
    fn test_parse_kind(#[case] raw: &str, #[case] expected: ProviderKind) {
        assert_eq!(raw.parse::<ProviderKind>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_kind() {
        assert!(matches!(
            "bloomberg".parse::<ProviderKind>(),
            Err(DataError::UnknownProvider(_))
        ));
    }

    #[test]
    fn test_kind_display_round_trips() {
        for kind in [ProviderKind::Edgar, ProviderKind::Yahoo, ProviderKind::Fixture] {
            assert_eq!(kind.to_string().parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_fixture_kind_requires_path() {
        let result = Provider::from_config(ProviderKind::Fixture, &DataConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_network_providers_construct_offline() {
        let config = DataConfig::default();
        let edgar = Provider::from_config(ProviderKind::Edgar, &config).unwrap();
        let yahoo = Provider::from_config(ProviderKind::Yahoo, &config).unwrap();
        assert_eq!(edgar.kind(), ProviderKind::Edgar);
        assert_eq!(yahoo.name(), "yahoo-finance");
    }
}
