//! SEC EDGAR API client with rate limiting.

use crate::cache::ResponseCache;
use crate::config::DataConfig;
use crate::edgar::facts::CompanyFacts;
use crate::error::{DataError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

/// SEC EDGAR API base URL
const EDGAR_BASE_URL: &str = "https://data.sec.gov";

/// Ticker table (hosted at www.sec.gov, not data.sec.gov)
const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// Cache key of the ticker table
const COMPANY_TICKERS_KEY: &str = "company_tickers.json";

/// Default rate limit: 10 requests per second (SEC requirement)
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);

/// Company information from tickers endpoint
/// The SEC returns: {"0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}, ...}
#[derive(Debug, Deserialize)]
struct CompanyInfo {
    /// CIK as a number (SEC returns this as an integer despite the name)
    cik_str: u64,
    /// Ticker symbol
    ticker: String,
}

/// Find a ticker's zero-padded CIK in the SEC ticker table.
pub(crate) fn find_cik(tickers_json: &str, ticker: &str) -> Result<String> {
    let data: HashMap<String, CompanyInfo> = serde_json::from_str(tickers_json)
        .map_err(|e| DataError::EdgarApi(format!("Failed to parse company tickers: {}", e)))?;

    data.values()
        .find(|company| company.ticker.eq_ignore_ascii_case(ticker))
        .map(|company| format!("{:0>10}", company.cik_str))
        .ok_or_else(|| DataError::CikNotFound(ticker.to_string()))
}

/// Rate limiter to ensure we don't exceed SEC's rate limits
#[derive(Debug)]
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// SEC EDGAR API client with rate limiting
pub struct EdgarClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    cache: ResponseCache,
    base_url: String,
}

impl EdgarClient {
    /// Create a new EDGAR client with default settings (10 req/sec, no cache)
    pub fn new() -> Result<Self> {
        Self::with_config(&DataConfig::default())
    }

    /// Create a new EDGAR client from provider configuration
    ///
    /// # Example
    /// ```no_run
    /// use earnviz_data::{DataConfig, edgar::EdgarClient};
    ///
    /// # fn example() -> earnviz_data::Result<()> {
    /// let config = DataConfig::default().with_cache_dir("/tmp/earnviz");
    /// let client = EdgarClient::with_config(&config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_config(config: &DataConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(DEFAULT_RATE_LIMIT))),
            cache: ResponseCache::new(config.cache_dir.clone(), config.cache_max_age),
            base_url: EDGAR_BASE_URL.to_string(),
        })
    }

    async fn get_text(&self, url: &str, what: &str) -> Result<String> {
        self.rate_limiter.lock().await.wait().await;
        tracing::debug!(url, "EDGAR request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(DataError::Network)?;

        if !response.status().is_success() {
            return Err(DataError::EdgarApi(format!(
                "Failed to fetch {}: HTTP {}",
                what,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| DataError::EdgarApi(format!("Failed to read {}: {}", what, e)))
    }

    /// Look up a company's CIK number from its ticker symbol
    ///
    /// The ticker table is cached when a cache directory is configured.
    ///
    /// # Returns
    /// The company's CIK number as a zero-padded 10-digit string
    ///
    /// # Errors
    /// Returns `DataError::CikNotFound` if the ticker is not found
    pub async fn get_company_cik(&self, ticker: &str) -> Result<String> {
        if ticker.is_empty() {
            return Err(DataError::InvalidSymbol("Empty ticker".to_string()));
        }

        if let Some(body) = self.cache.get(COMPANY_TICKERS_KEY) {
            match find_cik(&body, ticker) {
                Ok(cik) => return Ok(cik),
                // Newly listed tickers may be missing from a cached table.
                Err(DataError::CikNotFound(_)) => {}
                Err(e) => tracing::warn!(error = %e, "ignoring unreadable ticker cache"),
            }
        }

        let body = self
            .get_text(COMPANY_TICKERS_URL, "company tickers")
            .await?;
        let cik = find_cik(&body, ticker);
        if let Err(e) = self.cache.put(COMPANY_TICKERS_KEY, &body) {
            tracing::warn!(error = %e, "failed to cache ticker table");
        }
        cik
    }

    /// Fetch all XBRL facts reported by a company
    ///
    /// # Arguments
    /// * `cik` - Company's CIK number (can be with or without padding)
    pub async fn get_company_facts(&self, cik: &str) -> Result<CompanyFacts> {
        if cik.is_empty() {
            return Err(DataError::InvalidSymbol("Empty CIK".to_string()));
        }

        let cik_padded = format!("{:0>10}", cik);
        let url = format!(
            "{}/api/xbrl/companyfacts/CIK{}.json",
            self.base_url, cik_padded
        );
        let body = self
            .get_text(&url, &format!("company facts for CIK {}", cik_padded))
            .await?;

        CompanyFacts::parse_json(&body)
    }
}

impl std::fmt::Debug for EdgarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgarClient")
            .field("base_url", &self.base_url)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
