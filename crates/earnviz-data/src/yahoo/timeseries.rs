//! Quarterly income statements from the Yahoo Finance fundamentals timeseries.

use crate::config::DataConfig;
use crate::error::{DataError, Result};
use crate::provider::IncomeStatementProvider;
use crate::statement::{IncomeStatement, LineItem, whole_number};
use chrono::{NaiveDate, Utc};
use earnviz_model::Unit;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;

/// Provider name recorded on statements.
pub const SOURCE: &str = "yahoo-finance";

const TIMESERIES_URL: &str =
    "https://query2.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries";

/// Yahoo rejects requests without a browser-like user agent.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";

/// How far back to ask for quarterly data.
const LOOKBACK_DAYS: i64 = 2 * 365;

/// Timeseries type name for a line item, e.g. `quarterlyTotalRevenue`.
pub fn series_type(item: LineItem) -> String {
    format!("quarterly{}", item.label().replace(' ', ""))
}

/// Parse a timeseries response into the statement for the latest quarter.
///
/// The period is the latest `asOfDate` of the revenue series; other series
/// contribute only their value for that date.
pub fn parse_timeseries(symbol: &str, json: &str) -> Result<IncomeStatement> {
    let response: TimeseriesResponse = serde_json::from_str(json)
        .map_err(|e| DataError::Parse(format!("Failed to parse Yahoo timeseries: {}", e)))?;

    if let Some(error) = response.timeseries.error {
        return Err(DataError::YahooApi(error.to_string()));
    }

    let mut series: HashMap<LineItem, Vec<Observation>> = HashMap::new();
    for result in response.timeseries.result {
        for item in LineItem::ALL {
            let Some(values) = result.extra.get(&series_type(item)) else {
                continue;
            };
            let observations: Vec<Option<Observation>> = serde_json::from_value(values.clone())
                .map_err(|e| {
                    DataError::Parse(format!("Malformed {} series: {}", item.label(), e))
                })?;
            series
                .entry(item)
                .or_default()
                .extend(observations.into_iter().flatten());
        }
    }

    let period_end = series
        .get(&LineItem::TotalRevenue)
        .and_then(|obs| obs.iter().map(|o| o.as_of_date).max())
        .ok_or_else(|| DataError::MissingData {
            symbol: symbol.to_string(),
            reason: "no quarterly revenue from Yahoo Finance".to_string(),
        })?;

    let mut statement = IncomeStatement::new(symbol, period_end, Unit::Dollars, SOURCE);
    for (item, observations) in &series {
        let Some(obs) = observations.iter().find(|o| o.as_of_date == period_end) else {
            continue;
        };
        if let Some(currency) = obs.currency_code.as_deref().filter(|c| *c != "USD") {
            tracing::warn!(symbol, field = item.label(), currency, "non-USD value");
        }
        statement
            .items
            .insert(*item, whole_number(*item, obs.reported_value.raw)?);
    }

    Ok(statement)
}

/// Income statement provider backed by Yahoo Finance.
#[derive(Debug)]
pub struct YahooProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooProvider {
    /// Create a provider from configuration.
    pub fn new(config: &DataConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            base_url: TIMESERIES_URL.to_string(),
        })
    }

    fn request_url(&self, symbol: &str) -> String {
        let types: Vec<String> = LineItem::ALL.into_iter().map(series_type).collect();
        let now = Utc::now().timestamp();
        format!(
            "{}/{symbol}?symbol={symbol}&type={}&period1={}&period2={now}",
            self.base_url,
            types.join(","),
            now - LOOKBACK_DAYS * 24 * 60 * 60,
        )
    }
}

impl IncomeStatementProvider for YahooProvider {
    fn name(&self) -> &'static str {
        SOURCE
    }

    fn latest_quarter(&self, symbol: &str) -> impl Future<Output = Result<IncomeStatement>> + Send {
        async move {
            let url = self.request_url(symbol);
            tracing::debug!(url, "Yahoo request");

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(DataError::Network)?;

            if !response.status().is_success() {
                return Err(DataError::YahooApi(format!(
                    "Failed to fetch timeseries for {}: HTTP {}",
                    symbol,
                    response.status()
                )));
            }

            let body = response.text().await.map_err(DataError::Network)?;
            parse_timeseries(symbol, &body)
        }
    }
}

#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    timeseries: Timeseries,
}

#[derive(Debug, Deserialize)]
struct Timeseries {
    #[serde(default)]
    result: Vec<SeriesResult>,
    #[serde(default)]
    error: Option<Value>,
}

/// One series per result; its values sit under a key named after the type.
#[derive(Debug, Deserialize)]
struct SeriesResult {
    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Observation {
    as_of_date: NaiveDate,
    #[serde(default)]
    currency_code: Option<String>,
    reported_value: ReportedValue,
}

#[derive(Debug, Deserialize)]
struct ReportedValue {
    raw: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "timeseries": {
            "result": [
                {
                    "meta": {"symbol": ["NVDA"], "type": ["quarterlyTotalRevenue"]},
                    "timestamp": [1682812800, 1690675200],
                    "quarterlyTotalRevenue": [
                        {"asOfDate": "2023-04-30", "periodType": "3M", "currencyCode": "USD",
                         "reportedValue": {"raw": 7192000000, "fmt": "7.19B"}},
                        {"asOfDate": "2023-07-30", "periodType": "3M", "currencyCode": "USD",
                         "reportedValue": {"raw": 13507000000, "fmt": "13.51B"}}
                    ]
                },
                {
                    "meta": {"symbol": ["NVDA"], "type": ["quarterlyTaxProvision"]},
                    "timestamp": [1682812800, 1690675200],
                    "quarterlyTaxProvision": [
                        null,
                        {"asOfDate": "2023-07-30", "periodType": "3M", "currencyCode": "USD",
                         "reportedValue": {"raw": 793000000, "fmt": "793M"}}
                    ]
                },
                {
                    "meta": {"symbol": ["NVDA"], "type": ["quarterlyResearchAndDevelopment"]}
                }
            ],
            "error": null
        }
    }"#;

    #[test]
    fn test_series_type() {
        assert_eq!(series_type(LineItem::TotalRevenue), "quarterlyTotalRevenue");
        assert_eq!(
            series_type(LineItem::SellingGeneralAndAdministration),
            "quarterlySellingGeneralAndAdministration"
        );
    }

    #[test]
    fn test_parse_latest_quarter() {
        let statement = parse_timeseries("NVDA", RESPONSE).unwrap();

        assert_eq!(
            statement.period_end,
            NaiveDate::from_ymd_opt(2023, 7, 30).unwrap()
        );
        assert_eq!(statement.unit, Unit::Dollars);
        assert_eq!(statement.source, SOURCE);
        assert_eq!(statement.get(LineItem::TotalRevenue), Some(13_507_000_000));
        assert_eq!(statement.get(LineItem::TaxProvision), Some(793_000_000));
        assert_eq!(statement.get(LineItem::ResearchAndDevelopment), None);
    }

    #[test]
    fn test_parse_without_revenue() {
        let json = r#"{"timeseries": {"result": [], "error": null}}"#;
        let err = parse_timeseries("ZZZZ", json).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_parse_api_error() {
        let json = r#"{"timeseries": {"result": [], "error": {"code": "Bad Request"}}}"#;
        assert!(matches!(
            parse_timeseries("AAPL", json),
            Err(DataError::YahooApi(_))
        ));
    }

    #[test]
    fn test_request_url_lists_every_series() {
        let provider = YahooProvider::new(&DataConfig::default()).unwrap();
        let url = provider.request_url("AAPL");
        assert!(url.contains("/AAPL?symbol=AAPL&type=quarterlyTotalRevenue,"));
        assert!(url.contains("quarterlyTaxProvision"));
    }
}
