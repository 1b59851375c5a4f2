//! Error taxonomy for forage generation and catalog parsing.

use thiserror::Error;

/// Errors surfaced by `generate` and the sampler.
#[derive(Debug, Error, PartialEq)]
pub enum ForageError {
    #[error("{field} must be a whole number of at least 1 (got {value:?})")]
    InvalidInput { field: &'static str, value: String },
    #[error("cannot draw {draws} ingredient(s) from an empty pool")]
    EmptyPool { draws: u64 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ForageError {
    pub(crate) fn invalid(field: &'static str, value: impl ToString) -> Self {
        Self::InvalidInput {
            field,
            value: value.to_string(),
        }
    }
}

/// Errors raised when tuning configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite value of at least {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("draw rate window invalid (min {min} > max {max})")]
    RateWindow { min: i64, max: i64 },
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: i64 },
}

/// Errors raised while parsing ingredient or tag catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ingredient name {0:?} appears more than once")]
    DuplicateName(String),
}
