use thiserror::Error;

use crate::sale::SaleStatus;

/// Business-rule failures raised by the sale aggregate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SaleError {
    #[error("amount must be greater than zero (got {0})")]
    InvalidAmount(f64),

    #[error("invalid status value: {0:?}")]
    InvalidStatus(String),

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: SaleStatus, to: SaleStatus },
}
