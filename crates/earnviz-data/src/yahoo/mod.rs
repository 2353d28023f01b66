//! Yahoo Finance income statements.

pub mod timeseries;

pub use timeseries::{YahooProvider, parse_timeseries};
