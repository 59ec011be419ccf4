//! Error types for Quantum Capital investment products
//!
//! Provides a unified error type and domain-specific error variants

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::rate_tier::TierId;

/// Result type alias using QuantumError
pub type Result<T> = std::result::Result<T, QuantumError>;

/// Unified error type for tier administration and simulation
#[derive(Debug, Error)]
pub enum QuantumError {
    // Tier validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // Simulation errors
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    // Collaborator errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Rate tier {0} is not loaded")]
    TierNotFound(TierId),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Which dimension of a tier a range error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeAxis {
    Amount,
    Term,
}

impl std::fmt::Display for RangeAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeAxis::Amount => write!(f, "amount"),
            RangeAxis::Term => write!(f, "term"),
        }
    }
}

/// Reasons a proposed tier is rejected by the tier store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{field}' is required and must be numeric")]
    MissingField { field: &'static str },

    #[error("Field '{field}' must not be negative")]
    NegativeValue { field: &'static str },

    #[error("Interest rate must be greater than zero")]
    ZeroRate,

    #[error("The {0} lower bound must be strictly less than its upper bound")]
    InvertedRange(RangeAxis),

    #[error("An unbounded-amount tier already exists (tier {existing})")]
    DuplicateUnboundedAmount { existing: TierId },

    #[error("Tier overlaps existing tier {existing} in both amount and term")]
    OverlappingTier { existing: TierId },

    #[error("Tier {existing} already covers this amount range within the same term band")]
    DuplicateRangeSameTermBand { existing: TierId },
}

/// Reasons a simulator query cannot be resolved
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Input '{field}' is required and must be greater than zero")]
    MissingInput { field: &'static str },

    #[error("Amount {capital} is outside the configured range ({min} to {})", upper_bound_label(.max))]
    OutOfConfiguredRange {
        capital: Decimal,
        min: Decimal,
        max: Option<Decimal>,
    },

    #[error("Term of {months} months is outside the allowed range of 1 to {max} months")]
    TermConversionOutOfBounds { months: i64, max: u32 },

    #[error("Term of {days} days exceeds the longest representable term")]
    TermOutOfRange { days: i64 },

    #[error("Minimum available term is unknown: no rate tiers are loaded")]
    TermMinimumUnknown,

    #[error("No rate tier applies to amount {capital} for {term_days} days")]
    NoMatchingTier { capital: Decimal, term_days: u32 },

    #[error("Interest calculation overflow")]
    Overflow,
}

fn upper_bound_label(max: &Option<Decimal>) -> String {
    match max {
        Some(max) => max.to_string(),
        None => "unbounded".to_string(),
    }
}

impl ResolutionError {
    /// Out-of-range amounts are surfaced as a warning rather than a hard input error
    pub fn is_warning(&self) -> bool {
        matches!(self, ResolutionError::OutOfConfiguredRange { .. })
    }
}

/// Failures of the rate tier repository collaborator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Repository returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Repository unreachable: {0}")]
    Transport(String),

    #[error("Malformed repository payload: {0}")]
    Decode(String),

    #[error("Tier {0} not found in repository")]
    NotFound(TierId),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Decode(err.to_string())
    }
}

impl From<anyhow::Error> for QuantumError {
    fn from(err: anyhow::Error) -> Self {
        QuantumError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = QuantumError::Validation(ValidationError::OverlappingTier { existing: 7 });
        assert!(err.to_string().contains("tier 7"));
    }

    #[test]
    fn test_inverted_range_names_axis() {
        let err = ValidationError::InvertedRange(RangeAxis::Term);
        assert!(err.to_string().contains("term lower bound"));
    }

    #[test]
    fn test_out_of_range_is_warning() {
        let err = ResolutionError::OutOfConfiguredRange {
            capital: dec!(10),
            min: dec!(100),
            max: None,
        };
        assert!(err.is_warning());
        assert!(err.to_string().contains("unbounded"));
        assert!(!ResolutionError::TermMinimumUnknown.is_warning());
    }
}
