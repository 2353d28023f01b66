//! Error types for report construction.

use crate::money::Unit;
use thiserror::Error;

/// Errors that can occur while collecting financial fields.
///
/// Report arithmetic itself never fails; only the input boundary does.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// A required income-statement field was never provided.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// An operating-expense line item has no name.
    #[error("Operating expense line item has an empty name")]
    EmptyItemName,

    /// An operating-expense line item reuses a fixed node's name.
    #[error("Line item name {0:?} is reserved")]
    ReservedItemName(String),

    /// A value lies outside the supported range.
    #[error("{field} of {value} dollars is outside the supported range")]
    OutOfRange {
        /// Field the value belongs to
        field: &'static str,
        /// Value in whole dollars
        value: i64,
    },

    /// Normalizing a value to whole dollars overflowed.
    #[error("Value {value} in {unit} does not fit in whole dollars")]
    Overflow {
        /// Value as provided
        value: i64,
        /// Unit it was provided in
        unit: Unit,
    },
}
