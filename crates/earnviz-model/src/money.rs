//! Monetary units.
//!
//! Providers report income-statement values in different denominations (SEC
//! filings in whole dollars, hand-entered figures often in millions). Every
//! value entering the model carries a declared [`Unit`] and is normalized to
//! whole dollars once, at the builder. Nothing downstream guesses a unit from
//! the size of a number.

use crate::error::ReportError;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Denomination of incoming monetary values.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Whole dollars.
    #[default]
    #[display("dollars")]
    Dollars,
    /// Thousands of dollars.
    #[display("thousands")]
    Thousands,
    /// Millions of dollars.
    #[display("millions")]
    Millions,
}

impl Unit {
    /// Number of whole dollars in one unit.
    pub const fn scale(self) -> i64 {
        match self {
            Self::Dollars => 1,
            Self::Thousands => 1_000,
            Self::Millions => 1_000_000,
        }
    }

    /// Convert a value in this unit to whole dollars.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Overflow`] if the scaled value does not fit in an `i64`.
    pub fn to_dollars(self, value: i64) -> Result<i64, ReportError> {
        value
            .checked_mul(self.scale())
            .ok_or(ReportError::Overflow { value, unit: self })
    }

    /// Parse a unit name as used in fixture files and on the command line.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dollars" | "usd" | "1" => Some(Self::Dollars),
            "thousands" | "k" | "1000" => Some(Self::Thousands),
            "millions" | "m" | "1000000" => Some(Self::Millions),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Unit::Dollars, 958, 958)]
    #[case(Unit::Thousands, 958, 958_000)]
    #[case(Unit::Millions, 958, 958_000_000)]
    #[case(Unit::Millions, -100, -100_000_000)]
    fn test_to_dollars(#[case] unit: Unit, #[case] value: i64, #[case] expected: i64) {
        assert_eq!(unit.to_dollars(value).unwrap(), expected);
    }

    #[test]
    fn test_to_dollars_overflow() {
        let result = Unit::Millions.to_dollars(i64::MAX / 10);
        assert!(matches!(result, Err(ReportError::Overflow { .. })));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Unit::parse("Millions"), Some(Unit::Millions));
        assert_eq!(Unit::parse(" usd "), Some(Unit::Dollars));
        assert_eq!(Unit::parse("k"), Some(Unit::Thousands));
        assert_eq!(Unit::parse("billions"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Unit::Millions.to_string(), "millions");
    }
}
