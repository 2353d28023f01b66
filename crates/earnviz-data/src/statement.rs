//! Income statement table returned by providers.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use earnviz_model::{FinancialFields, Unit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Income-statement line items a provider can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LineItem {
    /// Total revenue
    #[serde(rename = "Total Revenue")]
    TotalRevenue,
    /// Cost of revenue
    #[serde(rename = "Cost Of Revenue")]
    CostOfRevenue,
    /// Total operating expense
    #[serde(rename = "Operating Expense")]
    OperatingExpense,
    /// Research and development expense
    #[serde(rename = "Research And Development")]
    ResearchAndDevelopment,
    /// Selling, general and administrative expense
    #[serde(rename = "Selling General And Administration")]
    SellingGeneralAndAdministration,
    /// Income before tax
    #[serde(rename = "Pretax Income")]
    PretaxIncome,
    /// Income tax provision, negative for a benefit
    #[serde(rename = "Tax Provision")]
    TaxProvision,
}

impl LineItem {
    /// Every line item, in statement order.
    pub const ALL: [Self; 7] = [
        Self::TotalRevenue,
        Self::CostOfRevenue,
        Self::OperatingExpense,
        Self::ResearchAndDevelopment,
        Self::SellingGeneralAndAdministration,
        Self::PretaxIncome,
        Self::TaxProvision,
    ];

    /// Field name as it appears in provider tables.
    pub const fn label(self) -> &'static str {
        match self {
            Self::TotalRevenue => "Total Revenue",
            Self::CostOfRevenue => "Cost Of Revenue",
            Self::OperatingExpense => "Operating Expense",
            Self::ResearchAndDevelopment => "Research And Development",
            Self::SellingGeneralAndAdministration => "Selling General And Administration",
            Self::PretaxIncome => "Pretax Income",
            Self::TaxProvision => "Tax Provision",
        }
    }

    /// Whether a statement without this item is unusable.
    ///
    /// Optional items count as zero when absent.
    pub const fn is_required(self) -> bool {
        !matches!(
            self,
            Self::ResearchAndDevelopment | Self::SellingGeneralAndAdministration
        )
    }
}

/// Income-statement figures for one reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatement {
    /// Ticker symbol
    pub symbol: String,
    /// Last day of the reporting period
    pub period_end: NaiveDate,
    /// Unit the item values are denominated in
    pub unit: Unit,
    /// Provider that produced the statement
    pub source: String,
    /// Reported line items
    pub items: BTreeMap<LineItem, i64>,
}

impl IncomeStatement {
    /// Create an empty statement.
    pub fn new(symbol: impl Into<String>, period_end: NaiveDate, unit: Unit, source: &str) -> Self {
        Self {
            symbol: symbol.into(),
            period_end,
            unit,
            source: source.to_string(),
            items: BTreeMap::new(),
        }
    }

    /// Add a line item, replacing any previous value.
    pub fn with_item(mut self, item: LineItem, value: i64) -> Self {
        self.items.insert(item, value);
        self
    }

    /// Value of a line item, if reported.
    pub fn get(&self, item: LineItem) -> Option<i64> {
        self.items.get(&item).copied()
    }

    /// Calendar quarter (1-4) the period ends in.
    pub fn calendar_quarter(&self) -> u32 {
        use chrono::Datelike;
        self.period_end.month0() / 3 + 1
    }

    /// Convert to model fields, normalizing to whole dollars.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MissingField`] if a required line item is absent.
    pub fn to_financial_fields(&self) -> Result<FinancialFields> {
        let required = |item: LineItem| {
            self.get(item).ok_or_else(|| DataError::MissingField {
                symbol: self.symbol.clone(),
                field: item.label(),
            })
        };

        let mut builder = FinancialFields::builder(self.unit)
            .revenue(required(LineItem::TotalRevenue)?)
            .cost_of_revenue(required(LineItem::CostOfRevenue)?)
            .operating_expense(required(LineItem::OperatingExpense)?)
            .pretax_income(required(LineItem::PretaxIncome)?)
            .income_tax(required(LineItem::TaxProvision)?);

        if let Some(rd) = self.get(LineItem::ResearchAndDevelopment) {
            builder = builder.opex_item("Research and Development", rd);
        }
        if let Some(sga) = self.get(LineItem::SellingGeneralAndAdministration) {
            builder = builder.opex_item("Sales, General & Admin", sga);
        }

        Ok(builder.build()?)
    }
}

/// Trim and uppercase a ticker, rejecting anything that is not a plausible symbol.
///
/// # Errors
///
/// Returns [`DataError::InvalidSymbol`] for empty or malformed input.
pub fn normalize_symbol(raw: &str) -> Result<String> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
    }
    let valid = symbol.len() <= 12
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^'));
    if !valid {
        return Err(DataError::InvalidSymbol(raw.trim().to_string()));
    }
    Ok(symbol)
}

/// Convert a provider's floating-point value to a whole number.
pub(crate) fn whole_number(field: LineItem, value: f64) -> Result<i64> {
    const LIMIT: f64 = 9.0e18;
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > LIMIT {
        return Err(DataError::MalformedValue {
            field: field.label(),
            value: value.to_string(),
        });
    }
    Ok(value as i64)
}
