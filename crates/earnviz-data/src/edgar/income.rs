//! Quarterly income statements from SEC EDGAR filings.

use crate::config::DataConfig;
use crate::edgar::client::EdgarClient;
use crate::edgar::facts::CompanyFacts;
use crate::error::{DataError, Result};
use crate::provider::IncomeStatementProvider;
use crate::statement::{IncomeStatement, LineItem, whole_number};
use chrono::NaiveDate;
use earnviz_model::Unit;
use std::future::Future;

/// Provider name recorded on statements.
pub const SOURCE: &str = "sec-edgar";

/// US-GAAP concepts that may carry a line item, in order of preference.
///
/// Companies switch tags over time (revenue moved to the ASC 606 concepts
/// around 2018), so each line item has fallbacks.
pub const fn concepts_for(item: LineItem) -> &'static [&'static str] {
    match item {
        LineItem::TotalRevenue => &[
            "Revenues",
            "RevenueFromContractWithCustomerExcludingAssessedTax",
            "RevenueFromContractWithCustomerIncludingAssessedTax",
            "SalesRevenueNet",
        ],
        LineItem::CostOfRevenue => &[
            "CostOfRevenue",
            "CostOfGoodsAndServicesSold",
            "CostOfGoodsSold",
            "CostOfGoodsAndServiceExcludingDepreciationDepletionAndAmortization",
        ],
        LineItem::OperatingExpense => &["OperatingExpenses"],
        LineItem::ResearchAndDevelopment => &[
            "ResearchAndDevelopmentExpense",
            "ResearchAndDevelopmentExpenseExcludingAcquiredInProcessCost",
        ],
        LineItem::SellingGeneralAndAdministration => &["SellingGeneralAndAdministrativeExpense"],
        LineItem::PretaxIncome => &[
            "IncomeLossFromContinuingOperationsBeforeIncomeTaxesExtraordinaryItemsNoncontrollingInterest",
            "IncomeLossFromContinuingOperationsBeforeIncomeTaxesMinorityInterestAndIncomeLossFromEquityMethodInvestments",
        ],
        LineItem::TaxProvision => &["IncomeTaxExpenseBenefit"],
    }
}

/// Period a statement is read for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuarterPeriod {
    /// Filed as a quarter in a 10-Q.
    Reported {
        start: Option<NaiveDate>,
        end: NaiveDate,
    },
    /// Fourth quarter: the fiscal year less its first nine months. Filers
    /// report Q4 only inside the annual 10-K.
    FourthQuarter {
        start: Option<NaiveDate>,
        nine_month_end: NaiveDate,
        end: NaiveDate,
    },
}

impl QuarterPeriod {
    const fn end(self) -> NaiveDate {
        match self {
            Self::Reported { end, .. } | Self::FourthQuarter { end, .. } => end,
        }
    }

    fn value(self, facts: &CompanyFacts, concept: &str) -> Option<f64> {
        match self {
            Self::Reported { start, end } => facts.value_for_period(concept, start, end),
            Self::FourthQuarter {
                start,
                nine_month_end,
                end,
            } => {
                let year = facts.value_for_period(concept, start, end)?;
                let nine_months = facts.value_for_period(concept, start, nine_month_end)?;
                Some(year - nine_months)
            }
        }
    }
}

fn latest_period(symbol: &str, facts: &CompanyFacts) -> Result<QuarterPeriod> {
    let revenue = concepts_for(LineItem::TotalRevenue);
    let quarter = revenue
        .iter()
        .flat_map(|concept| facts.quarterly(concept))
        .max_by_key(|f| (f.end, f.filed));
    let year = revenue
        .iter()
        .flat_map(|concept| facts.annual(concept))
        .max_by_key(|f| (f.end, f.filed))
        .filter(|year| quarter.is_none_or(|q| year.end > q.end));

    if let Some(year) = year {
        let nine_months = revenue
            .iter()
            .flat_map(|concept| facts.nine_months(concept))
            .filter(|f| f.start == year.start && f.end < year.end)
            .max_by_key(|f| f.end);
        match nine_months {
            Some(nine_months) => {
                return Ok(QuarterPeriod::FourthQuarter {
                    start: year.start,
                    nine_month_end: nine_months.end,
                    end: year.end,
                });
            }
            None => {
                tracing::warn!(symbol, end = %year.end, "annual revenue without nine-month figure");
            }
        }
    }

    quarter
        .map(|q| QuarterPeriod::Reported {
            start: q.start,
            end: q.end,
        })
        .ok_or_else(|| DataError::MissingData {
            symbol: symbol.to_string(),
            reason: "no quarterly revenue in SEC filings".to_string(),
        })
}

/// Build the statement for the most recent quarter in a company's facts.
///
/// The period is the latest quarter-length revenue period, unless a fiscal
/// year ends after it. The fourth quarter is then the annual value less the
/// nine-month year-to-date value, for every line item. Each line item is
/// read for exactly the chosen period.
pub fn latest_quarter_statement(symbol: &str, facts: &CompanyFacts) -> Result<IncomeStatement> {
    let period = latest_period(symbol, facts)?;
    let end = period.end();
    tracing::debug!(symbol, ?period, "selected quarter");

    let mut statement = IncomeStatement::new(symbol, end, Unit::Dollars, SOURCE);
    for item in LineItem::ALL {
        let value = concepts_for(item)
            .iter()
            .find_map(|concept| period.value(facts, concept));
        match value {
            Some(v) => {
                statement.items.insert(item, whole_number(item, v)?);
            }
            None if item.is_required() => {
                tracing::warn!(symbol, field = item.label(), %end, "line item not reported");
            }
            None => {}
        }
    }

    Ok(statement)
}

/// Income statement provider backed by SEC EDGAR XBRL company facts.
#[derive(Debug)]
pub struct EdgarProvider {
    client: EdgarClient,
}

impl EdgarProvider {
    /// Create a provider from configuration.
    pub fn new(config: &DataConfig) -> Result<Self> {
        Ok(Self {
            client: EdgarClient::with_config(config)?,
        })
    }
}

impl IncomeStatementProvider for EdgarProvider {
    fn name(&self) -> &'static str {
        SOURCE
    }

    fn latest_quarter(&self, symbol: &str) -> impl Future<Output = Result<IncomeStatement>> + Send {
        async move {
            let cik = self.client.get_company_cik(symbol).await?;
            tracing::debug!(symbol, cik, "resolved CIK");
            let facts = self.client.get_company_facts(&cik).await?;
            latest_quarter_statement(symbol, &facts)
        }
    }
}
