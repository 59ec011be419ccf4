//! Rate tier persistence backends

pub mod http;
pub mod repository;

pub use http::{decode_records, HttpTierRepository, NewTierPayload, TierRecord, UpdateTierPayload};
pub use repository::{InMemoryTierRepository, TierRepository};
