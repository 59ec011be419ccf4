//! # Quantum Common
//!
//! Shared types and errors for Quantum Capital's investment products.
//!
//! ## Core Types
//!
//! - [`RateTier`]: a configured (amount range × term range) → rate mapping
//! - [`TierDraft`]/[`TierSpec`]: admin input before and after validation
//! - [`TierRange`]: inclusive range with an optional open upper bound
//! - [`Query`]/[`Simulation`]: investment simulator input and outcome
//!
//! ## Errors
//!
//! - [`ValidationError`]: a proposed tier was rejected
//! - [`ResolutionError`]: a query could not be resolved to a tier
//! - [`RepositoryError`]: the tier repository collaborator failed

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{
    QuantumError, RangeAxis, RepositoryError, ResolutionError, Result, ValidationError,
};
pub use types::{
    query::{Query, Simulation, TermUnit},
    range::{AmountRange, TermRange, TierRange},
    rate_tier::{RateTier, TierDraft, TierId, TierSpec},
};

/// Quantum Common version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
