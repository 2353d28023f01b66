//! Earnings report construction.
//!
//! [`FinancialFields`] holds the raw income-statement figures for one period,
//! normalized to whole dollars. [`build_report`] derives the subtotals that the
//! flow graph is drawn from.

use crate::error::ReportError;
use crate::graph::is_reserved_name;
use crate::money::Unit;
use serde::{Deserialize, Serialize};

/// Largest magnitude, in whole dollars, accepted for any field.
///
/// One quadrillion dollars. Keeps every subtotal well inside `i64`.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// A named operating-expense line item (e.g. research and development).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpexItem {
    /// Display name of the line item.
    pub name: String,
    /// Amount in whole dollars.
    pub amount: i64,
}

impl OpexItem {
    /// Create a new line item.
    pub fn new(name: impl Into<String>, amount: i64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// Raw income-statement figures for a single reporting period.
///
/// All amounts are whole dollars. Income tax is signed: a negative value is a
/// tax benefit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialFields {
    /// Total revenue.
    pub revenue: i64,
    /// Cost of revenue (cost of goods sold).
    pub cost_of_revenue: i64,
    /// Total operating expense.
    pub operating_expense: i64,
    /// Named operating-expense line items, in presentation order.
    pub opex_items: Vec<OpexItem>,
    /// Income before tax.
    pub pretax_income: i64,
    /// Income tax provision; negative for a benefit.
    pub income_tax: i64,
}

impl FinancialFields {
    /// Start collecting fields reported in `unit`.
    pub const fn builder(unit: Unit) -> FinancialFieldsBuilder {
        FinancialFieldsBuilder::new(unit)
    }
}

/// Builder for [`FinancialFields`].
///
/// Values are given in the builder's declared unit and normalized to whole
/// dollars by [`FinancialFieldsBuilder::build`].
#[derive(Debug, Clone)]
pub struct FinancialFieldsBuilder {
    unit: Unit,
    revenue: Option<i64>,
    cost_of_revenue: Option<i64>,
    operating_expense: Option<i64>,
    opex_items: Vec<(String, i64)>,
    pretax_income: Option<i64>,
    income_tax: Option<i64>,
}

impl FinancialFieldsBuilder {
    /// Create an empty builder for values in `unit`.
    pub const fn new(unit: Unit) -> Self {
        Self {
            unit,
            revenue: None,
            cost_of_revenue: None,
            operating_expense: None,
            opex_items: Vec::new(),
            pretax_income: None,
            income_tax: None,
        }
    }

    /// Set total revenue.
    pub const fn revenue(mut self, value: i64) -> Self {
        self.revenue = Some(value);
        self
    }

    /// Set cost of revenue.
    pub const fn cost_of_revenue(mut self, value: i64) -> Self {
        self.cost_of_revenue = Some(value);
        self
    }

    /// Set total operating expense.
    pub const fn operating_expense(mut self, value: i64) -> Self {
        self.operating_expense = Some(value);
        self
    }

    /// Add a named operating-expense line item.
    ///
    /// Items with the same name are summed.
    pub fn opex_item(mut self, name: impl Into<String>, value: i64) -> Self {
        let name = name.into();
        match self.opex_items.iter_mut().find(|(n, _)| *n == name) {
            Some((_, amount)) => *amount = amount.saturating_add(value),
            None => self.opex_items.push((name, value)),
        }
        self
    }

    /// Set income before tax.
    pub const fn pretax_income(mut self, value: i64) -> Self {
        self.pretax_income = Some(value);
        self
    }

    /// Set the income tax provision (negative for a benefit).
    pub const fn income_tax(mut self, value: i64) -> Self {
        self.income_tax = Some(value);
        self
    }

    /// Build the fields, normalizing every value to whole dollars.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::MissingField`] if a required field was not set,
    /// [`ReportError::EmptyItemName`] for an unnamed line item,
    /// [`ReportError::ReservedItemName`] for a line item named like a fixed
    /// node, [`ReportError::Overflow`] if normalization overflows, or
    /// [`ReportError::OutOfRange`] if a value exceeds [`MAX_AMOUNT`].
    pub fn build(self) -> Result<FinancialFields, ReportError> {
        let unit = self.unit;
        let dollars = |value: i64, field: &'static str| {
            let value = unit.to_dollars(value)?;
            if value.unsigned_abs() > MAX_AMOUNT.unsigned_abs() {
                return Err(ReportError::OutOfRange { field, value });
            }
            Ok(value)
        };
        let required = |value: Option<i64>, field: &'static str| {
            value
                .ok_or(ReportError::MissingField(field))
                .and_then(|v| dollars(v, field))
        };

        let opex_items = self
            .opex_items
            .into_iter()
            .map(|(name, amount)| {
                if name.trim().is_empty() {
                    return Err(ReportError::EmptyItemName);
                }
                if is_reserved_name(&name) {
                    return Err(ReportError::ReservedItemName(name));
                }
                Ok(OpexItem::new(name, dollars(amount, "operating expense item")?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let named_total = opex_items
            .iter()
            .try_fold(0_i64, |total, item| total.checked_add(item.amount))
            .filter(|total| total.unsigned_abs() <= MAX_AMOUNT.unsigned_abs());
        if named_total.is_none() {
            return Err(ReportError::OutOfRange {
                field: "operating expense items",
                value: opex_items
                    .iter()
                    .fold(0_i64, |total, item| total.saturating_add(item.amount)),
            });
        }

        Ok(FinancialFields {
            revenue: required(self.revenue, "revenue")?,
            cost_of_revenue: required(self.cost_of_revenue, "cost of revenue")?,
            operating_expense: required(self.operating_expense, "operating expense")?,
            opex_items,
            pretax_income: required(self.pretax_income, "pretax income")?,
            income_tax: required(self.income_tax, "income tax")?,
        })
    }
}

/// Income statement with derived subtotals.
///
/// Constructed once by [`build_report`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EarningsReport {
    fields: FinancialFields,
    gross_profit: i64,
    operating_income: i64,
    other_income: i64,
    net_income: i64,
    opex_other: i64,
}

impl EarningsReport {
    /// Total revenue.
    pub const fn revenue(&self) -> i64 {
        self.fields.revenue
    }

    /// Cost of revenue.
    pub const fn cost_of_revenue(&self) -> i64 {
        self.fields.cost_of_revenue
    }

    /// Total operating expense.
    pub const fn operating_expense(&self) -> i64 {
        self.fields.operating_expense
    }

    /// Named operating-expense line items.
    pub fn opex_items(&self) -> &[OpexItem] {
        &self.fields.opex_items
    }

    /// Income before tax.
    pub const fn pretax_income(&self) -> i64 {
        self.fields.pretax_income
    }

    /// Income tax provision; negative for a benefit.
    pub const fn income_tax(&self) -> i64 {
        self.fields.income_tax
    }

    /// Revenue minus cost of revenue.
    pub const fn gross_profit(&self) -> i64 {
        self.gross_profit
    }

    /// Gross profit minus total operating expense.
    pub const fn operating_income(&self) -> i64 {
        self.operating_income
    }

    /// Pretax income not explained by operating income.
    pub const fn other_income(&self) -> i64 {
        self.other_income
    }

    /// Pretax income minus income tax.
    pub const fn net_income(&self) -> i64 {
        self.net_income
    }

    /// Operating expense not covered by the named line items.
    ///
    /// Negative when the named items exceed the total.
    pub const fn opex_other(&self) -> i64 {
        self.opex_other
    }
}

/// Derive an [`EarningsReport`] from raw fields.
///
/// Integer arithmetic; inconsistent inputs (cost above revenue, line items
/// above total) produce negative subtotals rather than errors. Fields from
/// [`FinancialFieldsBuilder`] are bounded by [`MAX_AMOUNT`], so every subtotal
/// is exact. Hand-built fields with larger values saturate at the `i64`
/// limits instead of wrapping.
pub fn build_report(fields: FinancialFields) -> EarningsReport {
    let gross_profit = fields.revenue.saturating_sub(fields.cost_of_revenue);
    let operating_income = gross_profit.saturating_sub(fields.operating_expense);
    let other_income = fields.pretax_income.saturating_sub(operating_income);
    let net_income = fields.pretax_income.saturating_sub(fields.income_tax);
    let named_opex = fields
        .opex_items
        .iter()
        .fold(0_i64, |total, item| total.saturating_add(item.amount));
    let opex_other = fields.operating_expense.saturating_sub(named_opex);

    EarningsReport {
        fields,
        gross_profit,
        operating_income,
        other_income,
        net_income,
        opex_other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nvidia_fields() -> FinancialFields {
        FinancialFields::builder(Unit::Dollars)
            .revenue(20_699)
            .cost_of_revenue(6_589)
            .operating_expense(5_169)
            .opex_item("R&D", 3_916)
            .opex_item("SG&A", 1_253)
            .pretax_income(9_190)
            .income_tax(958)
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_report_subtotals() {
        let report = build_report(nvidia_fields());

        assert_eq!(report.gross_profit(), 14_110);
        assert_eq!(report.operating_income(), 8_941);
        assert_eq!(report.other_income(), 249);
        assert_eq!(report.net_income(), 8_232);
        assert_eq!(report.opex_other(), 0);
    }

    #[test]
    fn test_negative_gross_profit_is_not_rejected() {
        let fields = FinancialFields::builder(Unit::Dollars)
            .revenue(100)
            .cost_of_revenue(150)
            .operating_expense(20)
            .pretax_income(-70)
            .income_tax(0)
            .build()
            .unwrap();
        let report = build_report(fields);

        assert_eq!(report.gross_profit(), -50);
        assert_eq!(report.operating_income(), -70);
        assert_eq!(report.other_income(), 0);
        assert_eq!(report.net_income(), -70);
    }

    #[test]
    fn test_items_exceeding_total_give_negative_other() {
        let fields = FinancialFields::builder(Unit::Dollars)
            .revenue(1_000)
            .cost_of_revenue(400)
            .operating_expense(300)
            .opex_item("R&D", 250)
            .opex_item("SG&A", 100)
            .pretax_income(300)
            .income_tax(30)
            .build()
            .unwrap();

        assert_eq!(build_report(fields).opex_other(), -50);
    }

    #[test]
    fn test_builder_normalizes_units() {
        let fields = FinancialFields::builder(Unit::Millions)
            .revenue(20_699)
            .cost_of_revenue(6_589)
            .operating_expense(5_169)
            .opex_item("R&D", 3_916)
            .pretax_income(9_190)
            .income_tax(-100)
            .build()
            .unwrap();

        assert_eq!(fields.revenue, 20_699_000_000);
        assert_eq!(fields.opex_items[0].amount, 3_916_000_000);
        assert_eq!(fields.income_tax, -100_000_000);
    }

    #[test]
    fn test_builder_merges_duplicate_items() {
        let fields = FinancialFields::builder(Unit::Dollars)
            .revenue(10)
            .cost_of_revenue(1)
            .operating_expense(5)
            .opex_item("R&D", 2)
            .opex_item("SG&A", 1)
            .opex_item("R&D", 1)
            .pretax_income(4)
            .income_tax(1)
            .build()
            .unwrap();

        assert_eq!(
            fields.opex_items,
            vec![OpexItem::new("R&D", 3), OpexItem::new("SG&A", 1)]
        );
    }

    #[test]
    fn test_builder_missing_field() {
        let result = FinancialFields::builder(Unit::Dollars)
            .revenue(10)
            .cost_of_revenue(1)
            .operating_expense(5)
            .pretax_income(4)
            .build();

        assert_eq!(result, Err(ReportError::MissingField("income tax")));
    }

    #[test]
    fn test_builder_rejects_unnamed_item() {
        let result = FinancialFields::builder(Unit::Dollars)
            .revenue(10)
            .cost_of_revenue(1)
            .operating_expense(5)
            .opex_item("  ", 5)
            .pretax_income(4)
            .income_tax(1)
            .build();

        assert_eq!(result, Err(ReportError::EmptyItemName));
    }

    #[test]
    fn test_builder_rejects_fixed_node_names() {
        for name in ["Other", "Revenue", "tax", "Net Profit "] {
            let result = FinancialFields::builder(Unit::Millions)
                .revenue(1_000)
                .cost_of_revenue(400)
                .operating_expense(300)
                .opex_item(name, 100)
                .pretax_income(300)
                .income_tax(30)
                .build();

            assert_eq!(
                result,
                Err(ReportError::ReservedItemName(name.to_string())),
                "{name}"
            );
        }
    }

    #[test]
    fn test_builder_rejects_out_of_range_values() {
        let result = FinancialFields::builder(Unit::Dollars)
            .revenue(i64::MAX - 10)
            .cost_of_revenue(-100)
            .operating_expense(0)
            .pretax_income(0)
            .income_tax(0)
            .build();

        assert_eq!(
            result,
            Err(ReportError::OutOfRange {
                field: "revenue",
                value: i64::MAX - 10,
            })
        );
    }

    #[test]
    fn test_builder_rejects_item_total_out_of_range() {
        let result = FinancialFields::builder(Unit::Dollars)
            .revenue(0)
            .cost_of_revenue(0)
            .operating_expense(0)
            .opex_item("R&D", MAX_AMOUNT)
            .opex_item("SG&A", MAX_AMOUNT)
            .pretax_income(0)
            .income_tax(0)
            .build();

        assert!(matches!(
            result,
            Err(ReportError::OutOfRange {
                field: "operating expense items",
                ..
            })
        ));
    }

    #[test]
    fn test_largest_accepted_values_are_exact() {
        let fields = FinancialFields::builder(Unit::Dollars)
            .revenue(MAX_AMOUNT)
            .cost_of_revenue(-MAX_AMOUNT)
            .operating_expense(-MAX_AMOUNT)
            .pretax_income(-MAX_AMOUNT)
            .income_tax(MAX_AMOUNT)
            .build()
            .unwrap();
        let report = build_report(fields);

        assert_eq!(report.gross_profit(), 2 * MAX_AMOUNT);
        assert_eq!(report.operating_income(), 3 * MAX_AMOUNT);
        assert_eq!(report.other_income(), -4 * MAX_AMOUNT);
        assert_eq!(report.net_income(), -2 * MAX_AMOUNT);
    }

    #[test]
    fn test_hand_built_extremes_saturate() {
        let fields = FinancialFields {
            revenue: i64::MAX - 10,
            cost_of_revenue: -100,
            operating_expense: 0,
            opex_items: Vec::new(),
            pretax_income: i64::MIN,
            income_tax: 1,
        };
        let report = build_report(fields);

        assert_eq!(report.gross_profit(), i64::MAX);
        assert_eq!(report.net_income(), i64::MIN);
    }
}
