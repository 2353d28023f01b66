//! Text summary of an earnings report.
//!
//! Lists each income-statement line with its amount, abbreviated amount and
//! share of revenue, for terminal or Markdown display.

use crate::format::format_dollar_amount;
use chrono::NaiveDate;
use earnviz_model::EarningsReport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One line of the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryLine {
    /// Line label.
    pub label: String,
    /// Amount in whole dollars.
    pub amount: i64,
    /// Abbreviated amount, e.g. `$1.5B`.
    pub formatted: String,
    /// Amount as a percentage of revenue; `None` when revenue is zero.
    pub pct_of_revenue: Option<f64>,
    /// Nesting depth: 0 for totals, 1 for operating-expense items.
    pub depth: u8,
}

/// Income summary for one reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSummary {
    /// Ticker symbol.
    pub symbol: String,
    /// Last day of the period.
    pub period_end: NaiveDate,
    /// Lines in statement order.
    pub lines: Vec<SummaryLine>,
}

impl IncomeSummary {
    /// Summarize a report.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use earnviz_model::{FinancialFields, Unit, build_report};
    /// use earnviz_output::IncomeSummary;
    ///
    /// let fields = FinancialFields::builder(Unit::Millions)
    ///     .revenue(1_000)
    ///     .cost_of_revenue(400)
    ///     .operating_expense(300)
    ///     .pretax_income(300)
    ///     .income_tax(60)
    ///     .build()
    ///     .unwrap();
    /// let summary = IncomeSummary::from_report(
    ///     "ACME",
    ///     NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
    ///     &build_report(fields),
    /// );
    ///
    /// assert_eq!(summary.line("Net Income").unwrap().formatted, "$240M");
    /// ```
    pub fn from_report(
        symbol: impl Into<String>,
        period_end: NaiveDate,
        report: &EarningsReport,
    ) -> Self {
        let revenue = report.revenue();
        let line = |label: &str, amount: i64, depth: u8| SummaryLine {
            label: label.to_string(),
            amount,
            formatted: format_dollar_amount(amount),
            pct_of_revenue: (revenue != 0).then(|| amount as f64 / revenue as f64 * 100.0),
            depth,
        };

        let mut lines = vec![
            line("Revenue", revenue, 0),
            line("Cost of Revenue", report.cost_of_revenue(), 0),
            line("Gross Profit", report.gross_profit(), 0),
            line("Operating Expenses", report.operating_expense(), 0),
        ];
        lines.extend(
            report
                .opex_items()
                .iter()
                .map(|item| line(&item.name, item.amount, 1)),
        );
        if report.opex_other() != 0 {
            lines.push(line("Other", report.opex_other(), 1));
        }
        lines.extend([
            line("Operating Income", report.operating_income(), 0),
            line("Other Income", report.other_income(), 0),
            line("Pretax Income", report.pretax_income(), 0),
            line("Income Tax", report.income_tax(), 0),
            line("Net Income", report.net_income(), 0),
        ]);

        Self {
            symbol: symbol.into(),
            period_end,
            lines,
        }
    }

    /// Find a line by label.
    pub fn line(&self, label: &str) -> Option<&SummaryLine> {
        self.lines.iter().find(|l| l.label == label)
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\nIncome Summary: {} (quarter ending {})\n",
            self.symbol, self.period_end
        ));
        output.push_str(&"=".repeat(72));
        output.push('\n');
        output.push_str(&format!(
            "{:<32} {:>20} {:>8} {:>9}\n",
            "Line", "Amount ($)", "Short", "% Rev"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        for line in &self.lines {
            let label = format!("{}{}", "  ".repeat(line.depth as usize), line.label);
            output.push_str(&format!(
                "{:<32} {:>20} {:>8} {:>9}\n",
                label,
                line.amount,
                line.formatted,
                line.pct_of_revenue
                    .map(|p| format!("{:.1}%", p))
                    .unwrap_or_else(|| "-".to_string()),
            ));
        }

        output.push_str(&"=".repeat(72));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Income Summary: {}\n\n", self.symbol));
        output.push_str(&format!("**Quarter ending:** {}\n\n", self.period_end));
        output.push_str("| Line | Amount | % of Revenue |\n");
        output.push_str("|------|-------:|-------------:|\n");

        for line in &self.lines {
            let label = if line.depth > 0 {
                format!("&nbsp;&nbsp;{}", line.label)
            } else {
                format!("**{}**", line.label)
            };
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                label.replace('|', "\\|"),
                line.formatted,
                line.pct_of_revenue
                    .map(|p| format!("{:.1}%", p))
                    .unwrap_or_else(|| "-".to_string()),
            ));
        }

        output
    }
}

impl fmt::Display for IncomeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Income Summary: {} ({})", self.symbol, self.period_end)?;
        for line in &self.lines {
            writeln!(
                f,
                "{}{}: {}",
                "  ".repeat(line.depth as usize + 1),
                line.label,
                line.formatted
            )?;
        }
        Ok(())
    }
}
