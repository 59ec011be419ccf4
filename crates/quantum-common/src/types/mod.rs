//! Core data types for rate tiers and investment simulation

pub mod query;
pub mod range;
pub mod rate_tier;
