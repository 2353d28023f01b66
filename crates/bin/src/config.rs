//! Runtime configuration from the environment.
//!
//! Values come from `EARNVIZ_*` variables (a `.env` file is loaded first when
//! present). Command-line flags override them afterwards.

use crate::error::{Result, ServerError};
use crate::logging::LogFormat;
use earnviz_data::{DataConfig, Provider, ProviderKind};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default address for `earnviz serve`.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Binary configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the web form listens on.
    pub listen_addr: SocketAddr,
    /// Statement source.
    pub provider: ProviderKind,
    /// Settings handed to the provider.
    pub data: DataConfig,
    /// Log line format.
    pub log_format: LogFormat,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Fails if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let listen_raw =
            lookup("EARNVIZ_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = parse_listen_addr("EARNVIZ_LISTEN_ADDR", &listen_raw)?;

        let provider = match lookup("EARNVIZ_PROVIDER") {
            Some(raw) => {
                raw.parse::<ProviderKind>()
                    .map_err(|e| ServerError::InvalidConfig {
                        name: "EARNVIZ_PROVIDER",
                        value: raw.clone(),
                        reason: e.to_string(),
                    })?
            }
            None => ProviderKind::default(),
        };

        let cache_dir = lookup("EARNVIZ_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_cache_dir);
        let mut data = DataConfig::default().with_cache_dir(cache_dir);

        if let Some(path) = lookup("EARNVIZ_FIXTURES") {
            data = data.with_fixtures(path);
        }
        if let Some(user_agent) = lookup("EARNVIZ_USER_AGENT") {
            data = data.with_user_agent(user_agent);
        }
        if let Some(raw) = lookup("EARNVIZ_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ServerError::InvalidConfig {
                    name: "EARNVIZ_TIMEOUT_SECS",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
            data = data.with_timeout(Duration::from_secs(secs));
        }

        let log_format = lookup("EARNVIZ_LOG_FORMAT")
            .and_then(|raw| raw.parse::<LogFormat>().ok())
            .unwrap_or_default();

        Ok(Self {
            listen_addr,
            provider,
            data,
            log_format,
        })
    }

    /// Build the configured provider.
    ///
    /// # Errors
    ///
    /// Fails if the fixture provider is selected without a readable fixture
    /// file, or the HTTP client cannot be built.
    pub fn provider(&self) -> Result<Provider> {
        Provider::from_config(self.provider, &self.data).map_err(ServerError::Provider)
    }
}

/// `dirs::cache_dir()/earnviz`, or `./earnviz` when the platform has none.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("earnviz")
}

/// Parse a socket address, naming `name` in the error.
///
/// # Errors
///
/// Fails if `raw` is not `host:port`.
pub fn parse_listen_addr(name: &'static str, raw: &str) -> Result<SocketAddr> {
    raw.trim()
        .parse::<SocketAddr>()
        .map_err(|e| ServerError::InvalidConfig {
            name,
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
        assert_eq!(config.provider, ProviderKind::Edgar);
        assert_eq!(config.data.cache_dir, Some(default_cache_dir()));
        assert_eq!(config.data.fixtures, None);
        assert_eq!(config.data.timeout, DataConfig::default().timeout);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("EARNVIZ_LISTEN_ADDR", "0.0.0.0:9000"),
            ("EARNVIZ_PROVIDER", "fixture"),
            ("EARNVIZ_FIXTURES", "/tmp/statements.json"),
            ("EARNVIZ_CACHE_DIR", "/tmp/earnviz-cache"),
            ("EARNVIZ_USER_AGENT", "tests tests@example.com"),
            ("EARNVIZ_TIMEOUT_SECS", "5"),
            ("EARNVIZ_LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(config.provider, ProviderKind::Fixture);
        assert_eq!(
            config.data.fixtures,
            Some(PathBuf::from("/tmp/statements.json"))
        );
        assert_eq!(
            config.data.cache_dir,
            Some(PathBuf::from("/tmp/earnviz-cache"))
        );
        assert_eq!(config.data.user_agent, "tests tests@example.com");
        assert_eq!(config.data.timeout, Duration::from_secs(5));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values() {
        let err = config(&[("EARNVIZ_LISTEN_ADDR", "localhost")]).unwrap_err();
        assert!(matches!(
            err,
            ServerError::InvalidConfig {
                name: "EARNVIZ_LISTEN_ADDR",
                ..
            }
        ));

        let err = config(&[("EARNVIZ_PROVIDER", "bloomberg")]).unwrap_err();
        assert!(err.to_string().contains("bloomberg"));

        let err = config(&[("EARNVIZ_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(
            err,
            ServerError::InvalidConfig {
                name: "EARNVIZ_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn test_fixture_provider_needs_a_file() {
        let config = config(&[("EARNVIZ_PROVIDER", "fixture")]).unwrap();
        assert!(matches!(config.provider(), Err(ServerError::Provider(_))));
    }
}
