//! Integration tests for provider response parsing

use chrono::NaiveDate;
use earnviz_data::edgar::{CompanyFacts, latest_quarter_statement};
use earnviz_data::yahoo::parse_timeseries;
use earnviz_data::{
    DataConfig, DataError, FixtureProvider, IncomeStatementProvider, LineItem, Provider,
    ProviderKind,
};
use earnviz_model::{Unit, build_report};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).unwrap()
}

#[test]
fn test_edgar_picks_latest_quarter_across_tags() {
    let facts = CompanyFacts::parse_json(&read_fixture("edgar_companyfacts.json")).unwrap();
    let statement = latest_quarter_statement("AAPL", &facts).unwrap();

    assert_eq!(
        statement.period_end,
        NaiveDate::from_ymd_opt(2023, 7, 1).unwrap()
    );
    assert_eq!(statement.unit, Unit::Dollars);
    assert_eq!(statement.get(LineItem::TotalRevenue), Some(81_797_000_000));
    assert_eq!(statement.get(LineItem::CostOfRevenue), Some(45_384_000_000));
    assert_eq!(statement.get(LineItem::OperatingExpense), Some(13_415_000_000));
    assert_eq!(
        statement.get(LineItem::ResearchAndDevelopment),
        Some(7_442_000_000)
    );
    assert_eq!(
        statement.get(LineItem::SellingGeneralAndAdministration),
        Some(5_973_000_000)
    );
    assert_eq!(statement.get(LineItem::PretaxIncome), Some(23_071_000_000));
    assert_eq!(statement.get(LineItem::TaxProvision), Some(2_852_000_000));
}

#[test]
fn test_edgar_statement_builds_report() {
    let facts = CompanyFacts::parse_json(&read_fixture("edgar_companyfacts.json")).unwrap();
    let statement = latest_quarter_statement("AAPL", &facts).unwrap();
    let report = build_report(statement.to_financial_fields().unwrap());

    assert_eq!(report.gross_profit(), 36_413_000_000);
    assert_eq!(report.operating_income(), 22_998_000_000);
    assert_eq!(report.net_income(), 20_219_000_000);
    assert_eq!(report.opex_other(), 0);
}

#[test]
fn test_edgar_derives_fourth_quarter_from_annual_filing() {
    let facts = CompanyFacts::parse_json(&read_fixture("edgar_companyfacts_10k.json")).unwrap();
    let statement = latest_quarter_statement("NWND", &facts).unwrap();

    assert_eq!(
        statement.period_end,
        NaiveDate::from_ymd_opt(2023, 12, 30).unwrap()
    );
    assert_eq!(statement.calendar_quarter(), 4);
    assert_eq!(statement.get(LineItem::TotalRevenue), Some(400_000_000));
    assert_eq!(statement.get(LineItem::CostOfRevenue), Some(220_000_000));
    assert_eq!(statement.get(LineItem::OperatingExpense), Some(80_000_000));
    assert_eq!(
        statement.get(LineItem::ResearchAndDevelopment),
        Some(50_000_000)
    );
    assert_eq!(
        statement.get(LineItem::SellingGeneralAndAdministration),
        Some(30_000_000)
    );
    assert_eq!(statement.get(LineItem::PretaxIncome), Some(100_000_000));
    assert_eq!(statement.get(LineItem::TaxProvision), Some(20_000_000));

    let report = build_report(statement.to_financial_fields().unwrap());
    assert_eq!(report.operating_income(), 100_000_000);
    assert_eq!(report.net_income(), 80_000_000);
}

#[test]
fn test_yahoo_picks_latest_as_of_date() {
    let statement = parse_timeseries("MSFT", &read_fixture("yahoo_timeseries.json")).unwrap();

    assert_eq!(
        statement.period_end,
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    );
    assert_eq!(statement.calendar_quarter(), 1);
    assert_eq!(statement.get(LineItem::TotalRevenue), Some(61_858_000_000));
    assert_eq!(statement.get(LineItem::PretaxIncome), Some(26_894_000_000));
    assert_eq!(statement.items.len(), LineItem::ALL.len());
}

#[tokio::test]
async fn test_fixture_file_provider() {
    let config = DataConfig::default().with_fixtures(fixture("statements.json"));
    let provider = Provider::from_config(ProviderKind::Fixture, &config).unwrap();

    let statement = provider.latest_quarter("nvda").await.unwrap();
    assert_eq!(statement.symbol, "NVDA");
    assert_eq!(statement.unit, Unit::Millions);

    let fields = statement.to_financial_fields().unwrap();
    assert_eq!(fields.revenue, 13_507_000_000);
    assert_eq!(fields.opex_items.len(), 2);
}

#[tokio::test]
async fn test_fixture_missing_required_fields() {
    let provider = FixtureProvider::from_path(fixture("statements.json")).unwrap();
    let statement = provider.latest_quarter("ACME").await.unwrap();

    let err = statement.to_financial_fields().unwrap_err();
    assert!(matches!(err, DataError::MissingField { field: "Pretax Income", .. }));
}

#[tokio::test]
async fn test_fixture_unknown_symbol() {
    let provider = FixtureProvider::from_path(fixture("statements.json")).unwrap();
    assert_eq!(provider.symbols(), vec!["ACME", "NVDA", "RIVN"]);

    let err = provider.latest_quarter("ZZZZ").await.unwrap_err();
    assert!(err.is_not_found());
}
