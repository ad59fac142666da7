use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    #[error("no billing item at index {index} (sheet has {len})")]
    NoSuchItem { index: usize, len: usize },

    #[error("unit price must not be negative (got {0})")]
    NegativePrice(Decimal),

    /// An amount left the range `Decimal` can represent.
    #[error("{0} is out of range")]
    Overflow(&'static str),
}
