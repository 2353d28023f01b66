//! Provider configuration.

use std::path::PathBuf;
use std::time::Duration;

/// User agent for SEC EDGAR requests (SEC requires identifying information).
pub const DEFAULT_USER_AGENT: &str = "earnviz/0.1 (contact@example.com)";

/// Settings shared by all network providers.
///
/// Passed to each provider at construction; there is no process-wide default
/// to override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    /// Directory for cached lookup tables. `None` disables caching.
    pub cache_dir: Option<PathBuf>,
    /// User agent sent to SEC EDGAR.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// How long a cached lookup table stays fresh.
    pub cache_max_age: Duration,
    /// Statement file for the fixture provider.
    pub fixtures: Option<PathBuf>,
}

impl DataConfig {
    /// Set the cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the fixture statement file.
    pub fn with_fixtures(mut self, path: impl Into<PathBuf>) -> Self {
        self.fixtures = Some(path.into());
        self
    }

    /// Set the request timeout.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            cache_max_age: Duration::from_secs(24 * 60 * 60),
            fixtures: None,
        }
    }
}
