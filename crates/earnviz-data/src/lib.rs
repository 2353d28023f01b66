#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/earnviz/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod config;
pub mod edgar;
pub mod error;
pub mod fixture;
pub mod provider;
pub mod statement;
pub mod yahoo;

pub use cache::ResponseCache;
pub use config::{DEFAULT_USER_AGENT, DataConfig};
pub use error::{DataError, Result};
pub use fixture::FixtureProvider;
pub use provider::{IncomeStatementProvider, Provider, ProviderKind};
pub use statement::{IncomeStatement, LineItem, normalize_symbol};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
