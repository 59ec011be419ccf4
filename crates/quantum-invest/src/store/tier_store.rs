//! Tier Store
//!
//! Authoritative in-memory copy of the configured rate tiers. Every mutation
//! holds the write lock across validate → persist → commit, so a candidate is
//! always checked against the set it is committed into.

use std::sync::Arc;

use quantum_common::{QuantumError, RateTier, Result, TierDraft, TierId, TierSpec, ValidationError};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::validation::TierValidator;
use crate::infra::TierRepository;

/// What the store is doing, for callers that gate their own UI on it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreStatus {
    #[default]
    Idle,
    Loading,
    Saving,
    /// Last operation failed with this message
    Failed(String),
}

/// In-memory rate tier set backed by a [`TierRepository`]
pub struct TierStore {
    repository: Arc<dyn TierRepository>,
    validator: TierValidator,
    /// Kept sorted by term lower bound, then amount lower bound
    tiers: RwLock<Vec<RateTier>>,
    status: parking_lot::RwLock<StoreStatus>,
}

impl TierStore {
    pub fn new(repository: Arc<dyn TierRepository>) -> Self {
        Self::with_validator(repository, TierValidator::default())
    }

    pub fn with_validator(repository: Arc<dyn TierRepository>, validator: TierValidator) -> Self {
        Self {
            repository,
            validator,
            tiers: RwLock::new(Vec::new()),
            status: parking_lot::RwLock::new(StoreStatus::Idle),
        }
    }

    /// Current status
    pub fn status(&self) -> StoreStatus {
        self.status.read().clone()
    }

    fn set_status(&self, status: StoreStatus) {
        *self.status.write() = status;
    }

    /// Record the outcome of an operation in the status
    fn settle<T>(&self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.set_status(StoreStatus::Idle),
            Err(e) => {
                warn!("Tier store operation failed: {}", e);
                self.set_status(StoreStatus::Failed(e.to_string()));
            }
        }
        result
    }

    /// Replace the tier set wholesale from the repository
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<usize> {
        let mut tiers = self.tiers.write().await;
        self.set_status(StoreStatus::Loading);

        let result = self.repository.fetch_all().await.map_err(QuantumError::from);
        let loaded = self.settle(result)?;

        *tiers = loaded;
        tiers.sort_by(RateTier::display_order);
        info!(count = tiers.len(), "Loaded rate tiers");
        Ok(tiers.len())
    }

    /// Tiers sorted for display (term lower bound, then amount lower bound)
    pub async fn list_tiers(&self) -> Vec<RateTier> {
        self.tiers.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.tiers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tiers.read().await.is_empty()
    }

    /// Validate a candidate against the current set without committing it
    pub async fn validate(
        &self,
        draft: &TierDraft,
        exclude_id: Option<TierId>,
    ) -> std::result::Result<TierSpec, ValidationError> {
        let tiers = self.tiers.read().await;
        self.validator.validate(draft, &tiers, exclude_id)
    }

    /// Validate, persist and add a new tier
    #[instrument(skip(self))]
    pub async fn create(&self, draft: &TierDraft) -> Result<RateTier> {
        let mut tiers = self.tiers.write().await;

        let spec = match self.validator.validate(draft, &tiers, None) {
            Ok(spec) => spec,
            Err(e) => return self.settle(Err(e.into())),
        };

        self.set_status(StoreStatus::Saving);
        let result = self.repository.create(spec).await.map_err(QuantumError::from);
        let created = self.settle(result)?;

        tiers.push(created.clone());
        tiers.sort_by(RateTier::display_order);
        info!(id = created.id, "Created rate tier");
        Ok(created)
    }

    /// Validate and persist an amended tier, keeping its id
    #[instrument(skip(self))]
    pub async fn update(&self, id: TierId, draft: &TierDraft) -> Result<RateTier> {
        let mut tiers = self.tiers.write().await;

        let Some(position) = tiers.iter().position(|t| t.id == id) else {
            return self.settle(Err(QuantumError::TierNotFound(id)));
        };

        let spec = match self.validator.validate(draft, &tiers, Some(id)) {
            Ok(spec) => spec,
            Err(e) => return self.settle(Err(e.into())),
        };
        let amended = RateTier::from_spec(id, spec);

        self.set_status(StoreStatus::Saving);
        let result = self
            .repository
            .update(amended.clone())
            .await
            .map_err(QuantumError::from);
        self.settle(result)?;

        tiers[position] = amended.clone();
        tiers.sort_by(RateTier::display_order);
        info!(id, "Updated rate tier");
        Ok(amended)
    }

    /// Delete a tier. The local set is only touched once the repository succeeds.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: TierId) -> Result<()> {
        let mut tiers = self.tiers.write().await;

        self.set_status(StoreStatus::Saving);
        let result = self.repository.delete(id).await.map_err(QuantumError::from);
        self.settle(result)?;

        let before = tiers.len();
        tiers.retain(|t| t.id != id);
        debug!(id, removed = before - tiers.len(), "Deleted rate tier");
        Ok(())
    }
}
