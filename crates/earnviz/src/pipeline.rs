//! Ticker to chart, end to end.
//!
//! Fetch the latest quarter, normalize it to whole dollars, derive the
//! report and flow graph, then render. Every step is terminal on failure:
//! no partial chart is ever produced.

use chrono::Datelike;
use earnviz_data::{DataError, IncomeStatement, IncomeStatementProvider, normalize_symbol};
use earnviz_model::{EarningsReport, FlowGraph, assemble_graph, build_report};
use earnviz_output::{Artifact, Destination, IncomeSummary, RenderError, render};
use thiserror::Error;

/// Errors from the ticker-to-chart pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fetching or converting the statement failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Rendering the chart failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl PipelineError {
    /// True if the ticker is unknown or lacks required data.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Data(e) if e.is_not_found())
    }

    /// True if the ticker itself was rejected.
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::Data(DataError::InvalidSymbol(_)))
    }
}

/// One quarter's statement and the report derived from it.
#[derive(Debug, Clone)]
pub struct Quarter {
    /// Statement as returned by the provider.
    pub statement: IncomeStatement,
    /// Derived report in whole dollars.
    pub report: EarningsReport,
}

impl Quarter {
    /// Derive the report from a statement.
    ///
    /// # Errors
    ///
    /// Fails if a required line item is missing or a value overflows when
    /// scaled to dollars.
    pub fn from_statement(statement: IncomeStatement) -> Result<Self, PipelineError> {
        let fields = statement.to_financial_fields()?;
        Ok(Self {
            statement,
            report: build_report(fields),
        })
    }

    /// Flow graph of the report.
    pub fn graph(&self) -> FlowGraph {
        assemble_graph(&self.report)
    }

    /// Default chart title.
    pub fn title(&self) -> String {
        chart_title(&self.statement)
    }

    /// Text summary of the report.
    pub fn summary(&self) -> IncomeSummary {
        IncomeSummary::from_report(
            self.statement.symbol.clone(),
            self.statement.period_end,
            &self.report,
        )
    }
}

/// A rendered chart with the data behind it.
#[derive(Debug, Clone)]
pub struct Chart {
    /// Chart title.
    pub title: String,
    /// Statement as returned by the provider.
    pub statement: IncomeStatement,
    /// Derived report.
    pub report: EarningsReport,
    /// Rendered output.
    pub artifact: Artifact,
}

/// Title for a statement's chart, e.g. `NVDA Earnings Q3 2023`.
///
/// The quarter is the calendar quarter the period ends in, which differs
/// from the fiscal quarter for companies with offset fiscal years.
pub fn chart_title(statement: &IncomeStatement) -> String {
    format!(
        "{} Earnings Q{} {}",
        statement.symbol,
        statement.calendar_quarter(),
        statement.period_end.year()
    )
}

/// Fetch and derive the latest quarter for a ticker.
///
/// The ticker is trimmed and uppercased before the provider sees it.
///
/// # Errors
///
/// Fails on an invalid ticker, a provider error, or unusable statement data.
pub async fn quarter_for_ticker<P>(provider: &P, ticker: &str) -> Result<Quarter, PipelineError>
where
    P: IncomeStatementProvider + Sync,
{
    let symbol = normalize_symbol(ticker)?;
    tracing::debug!(symbol, provider = provider.name(), "fetching latest quarter");

    let statement = provider.latest_quarter(&symbol).await?;
    tracing::debug!(
        symbol,
        period_end = %statement.period_end,
        unit = %statement.unit,
        items = statement.items.len(),
        "fetched statement"
    );

    Quarter::from_statement(statement)
}

/// Render a quarter's chart.
///
/// # Errors
///
/// Fails if the chart cannot be rendered or written.
pub fn chart_for_quarter(
    quarter: Quarter,
    title: Option<&str>,
    destination: &Destination,
) -> Result<Chart, PipelineError> {
    let title = title.map_or_else(|| quarter.title(), str::to_string);
    let artifact = render(&quarter.graph(), &title, destination)?;

    Ok(Chart {
        title,
        statement: quarter.statement,
        report: quarter.report,
        artifact,
    })
}

/// Fetch the latest quarter for a ticker and render its chart.
///
/// # Errors
///
/// See [`quarter_for_ticker`] and [`chart_for_quarter`].
pub async fn chart_for_ticker<P>(
    provider: &P,
    ticker: &str,
    destination: &Destination,
) -> Result<Chart, PipelineError>
where
    P: IncomeStatementProvider + Sync,
{
    let quarter = quarter_for_ticker(provider, ticker).await?;
    let chart = chart_for_quarter(quarter, None, destination)?;
    tracing::info!(title = %chart.title, format = %chart.artifact.format, "rendered chart");
    Ok(chart)
}
