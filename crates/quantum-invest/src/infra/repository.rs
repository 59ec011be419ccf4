//! Rate tier repository seam
//!
//! The tier store never talks to the backend directly; it goes through
//! [`TierRepository`] so the HTTP client can be swapped for the in-memory
//! implementation in tests and offline runs.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use quantum_common::{RateTier, RepositoryError, TierId, TierSpec};

/// Persistence collaborator for rate tiers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TierRepository: Send + Sync {
    /// Fetch the complete tier set
    async fn fetch_all(&self) -> Result<Vec<RateTier>, RepositoryError>;

    /// Persist a new tier and return it with its assigned id
    async fn create(&self, spec: TierSpec) -> Result<RateTier, RepositoryError>;

    /// Replace an existing tier, keeping its id
    async fn update(&self, tier: RateTier) -> Result<(), RepositoryError>;

    /// Delete a tier
    async fn delete(&self, id: TierId) -> Result<(), RepositoryError>;
}

/// Process-local repository
///
/// Assigns sequential ids starting at 1. Performs no validation of its own,
/// matching a backend that trusts the admin screen.
pub struct InMemoryTierRepository {
    tiers: RwLock<BTreeMap<TierId, RateTier>>,
    next_id: AtomicI64,
}

impl InMemoryTierRepository {
    pub fn new() -> Self {
        Self {
            tiers: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Repository pre-populated with existing tiers
    pub fn with_tiers(tiers: impl IntoIterator<Item = RateTier>) -> Self {
        let tiers: BTreeMap<TierId, RateTier> = tiers.into_iter().map(|t| (t.id, t)).collect();
        let next_id = tiers.keys().next_back().map_or(1, |max| max + 1);
        Self {
            tiers: RwLock::new(tiers),
            next_id: AtomicI64::new(next_id),
        }
    }

    /// Number of stored tiers
    pub fn len(&self) -> usize {
        self.tiers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.read().is_empty()
    }
}

impl Default for InMemoryTierRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TierRepository for InMemoryTierRepository {
    async fn fetch_all(&self) -> Result<Vec<RateTier>, RepositoryError> {
        Ok(self.tiers.read().values().cloned().collect())
    }

    async fn create(&self, spec: TierSpec) -> Result<RateTier, RepositoryError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let tier = RateTier::from_spec(id, spec);
        self.tiers.write().insert(id, tier.clone());
        Ok(tier)
    }

    async fn update(&self, tier: RateTier) -> Result<(), RepositoryError> {
        let mut tiers = self.tiers.write();
        match tiers.get_mut(&tier.id) {
            Some(existing) => {
                *existing = tier;
                Ok(())
            }
            None => Err(RepositoryError::NotFound(tier.id)),
        }
    }

    async fn delete(&self, id: TierId) -> Result<(), RepositoryError> {
        self.tiers
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound(id))
    }
}
