//! Tier store module
//!
//! Provides rate tier administration with:
//! - Ordered validation against the current tier set
//! - Create/update/delete staged through the repository
//! - Display ordering by term, then amount

pub mod tier_store;
pub mod validation;

pub use tier_store::{StoreStatus, TierStore};
pub use validation::TierValidator;
