//! # Quantum Invest
//!
//! Investment rate-tier administration and simulation for Quantum Capital.
//!
//! ## Interest Formula
//!
//! ```text
//! net = capital × rate/100 × days/360 × (1 − tax)
//! ```
//!
//! Where:
//! - rate: percentage of the single tier covering (capital, days)
//! - days: term in days; a term in months maps to `min_term + (months − 1) × 30`
//! - tax: withholding on gross interest (2%)
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │               InvestmentService               │
//! │  ┌───────────────────┐  ┌──────────────────┐  │
//! │  │    TierStore      │  │   RateResolver   │  │
//! │  │ validate + CRUD   │─▶│ convert, lookup, │  │
//! │  │ (sorted snapshot) │  │ interest, grid   │  │
//! │  └─────────┬─────────┘  └──────────────────┘  │
//! │            │                                  │
//! │  ┌─────────┴─────────────────────────────┐    │
//! │  │            TierRepository             │    │
//! │  │   (HTTP backend or in-memory)         │    │
//! │  └───────────────────────────────────────┘    │
//! └───────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod infra;
pub mod resolver;
pub mod store;

use std::sync::Arc;

use quantum_common::{Query, Result, Simulation};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, instrument};

pub use config::{InvestConfig, RepositorySettings, ResolverSettings};
pub use infra::{HttpTierRepository, InMemoryTierRepository, TierRepository};
pub use resolver::{RateResolver, TierGrid};
pub use store::{StoreStatus, TierStore, TierValidator};

/// Tax withheld from gross interest
pub const DEFAULT_TAX_RATE: Decimal = dec!(0.02);

/// Days per year used to prorate annual rates
pub const DAY_COUNT_BASIS: u32 = 360;

/// Days added per month beyond the first when converting terms
pub const DAYS_PER_MONTH: u32 = 30;

/// Longest term a depositor may enter in months
pub const MAX_TERM_MONTHS: u32 = 60;

/// Tolerance when comparing amount bounds for duplicate tiers
pub const AMOUNT_TOLERANCE: Decimal = dec!(0.001);

/// Decimal places of the reported net interest
pub const INTEREST_DECIMALS: u32 = 2;

/// Grid cell shown when no tier defines a (term, amount) combination
pub const GRID_PLACEHOLDER: &str = "—";

/// Tier administration and simulation over one repository
pub struct InvestmentService {
    store: TierStore,
    resolver: RateResolver,
}

impl InvestmentService {
    pub fn new(repository: Arc<dyn TierRepository>, settings: ResolverSettings) -> Self {
        let validator = TierValidator::new(settings.amount_tolerance);
        Self {
            store: TierStore::with_validator(repository, validator),
            resolver: RateResolver::new(settings),
        }
    }

    /// Tier administration
    pub fn store(&self) -> &TierStore {
        &self.store
    }

    pub fn resolver(&self) -> &RateResolver {
        &self.resolver
    }

    /// Resolve a query against the tiers currently held by the store
    #[instrument(skip(self))]
    pub async fn simulate(&self, query: &Query) -> Result<Simulation> {
        let tiers = self.store.list_tiers().await;
        debug!(tiers = tiers.len(), "Simulating against current tier set");
        Ok(self.resolver.resolve(&tiers, query)?)
    }

    /// Cross-tabulated view of the current tier set
    pub async fn grid(&self) -> TierGrid {
        let tiers = self.store.list_tiers().await;
        self.resolver.grid(&tiers)
    }
}
