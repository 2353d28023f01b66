//! SEC EDGAR income statements.
//!
//! This module provides:
//! - Company CIK lookup from ticker symbols (cached on disk)
//! - XBRL company facts retrieval and parsing
//! - Extraction of the latest quarterly income statement
//!
//! # Example
//!
//! ```no_run
//! use earnviz_data::{DataConfig, IncomeStatementProvider, edgar::EdgarProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = EdgarProvider::new(&DataConfig::default())?;
//!     let statement = provider.latest_quarter("AAPL").await?;
//!     println!("Quarter ending {}: {:?}", statement.period_end, statement.items);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod facts;
pub mod income;

pub use client::EdgarClient;
pub use facts::{CompanyFacts, Fact};
pub use income::{EdgarProvider, latest_quarter_statement};
