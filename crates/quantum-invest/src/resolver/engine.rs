//! Rate resolution engine
//!
//! Turns a simulator [`Query`] into the single applicable [`RateTier`] and a
//! net interest figure. All currency math is done in `Decimal`; the result is
//! rounded once, at the end, half away from zero.

use quantum_common::{AmountRange, Query, RateTier, ResolutionError, Simulation, TermUnit};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, instrument};

use super::conversion::{min_available_term_days, months_to_days};
use super::grid::TierGrid;
use crate::config::ResolverSettings;

type Resolution<T> = std::result::Result<T, ResolutionError>;

/// Resolves simulator queries against a tier set
#[derive(Debug, Clone, Default)]
pub struct RateResolver {
    settings: ResolverSettings,
}

impl RateResolver {
    pub fn new(settings: ResolverSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Smallest configured `term_from`, anchor of month conversion
    pub fn min_available_term_days(&self, tiers: &[RateTier]) -> Option<u32> {
        min_available_term_days(tiers)
    }

    /// Term in days for a positive `term` given in `unit`
    pub fn term_in_days(&self, tiers: &[RateTier], term: i64, unit: TermUnit) -> Resolution<u32> {
        match unit {
            TermUnit::Days => {
                u32::try_from(term).map_err(|_| ResolutionError::TermOutOfRange { days: term })
            }
            TermUnit::Months => {
                let max = self.settings.max_term_months;
                let months = u32::try_from(term)
                    .ok()
                    .filter(|m| (1..=max).contains(m))
                    .ok_or(ResolutionError::TermConversionOutOfBounds { months: term, max })?;

                let min_days = self
                    .min_available_term_days(tiers)
                    .ok_or(ResolutionError::TermMinimumUnknown)?;
                let days = months_to_days(min_days, months, self.settings.days_per_month);
                debug!(months, min_days, days, "Converted term to days");
                Ok(days)
            }
        }
    }

    /// `[min amount_from, max amount_to]`, open above if any tier is unbounded
    pub fn configured_amount_range(&self, tiers: &[RateTier]) -> Option<AmountRange> {
        let from = tiers.iter().map(|t| t.amount_from).min()?;
        let to = tiers
            .iter()
            .map(|t| t.amount_to)
            .collect::<Option<Vec<Decimal>>>()
            .and_then(|bounds| bounds.into_iter().max());
        Some(AmountRange::new(from, to))
    }

    /// First tier, in iteration order, covering both capital and term
    pub fn find_tier<'a>(
        &self,
        tiers: &'a [RateTier],
        capital: Decimal,
        term_days: u32,
    ) -> Option<&'a RateTier> {
        tiers.iter().find(|t| t.applies_to(capital, term_days))
    }

    /// `capital × rate/100 × days/basis × (1 − tax)`, rounded to 2 decimals
    pub fn net_interest(
        &self,
        capital: Decimal,
        rate: Decimal,
        term_days: u32,
    ) -> Resolution<Decimal> {
        let after_tax = Decimal::ONE - self.settings.tax_rate;
        let divisor = Decimal::ONE_HUNDRED * Decimal::from(self.settings.day_count_basis);

        let net = capital
            .checked_mul(rate)
            .and_then(|v| v.checked_mul(Decimal::from(term_days)))
            .and_then(|v| v.checked_mul(after_tax))
            .and_then(|v| v.checked_div(divisor))
            .ok_or(ResolutionError::Overflow)?;

        Ok(net.round_dp_with_strategy(
            crate::INTEREST_DECIMALS,
            RoundingStrategy::MidpointAwayFromZero,
        ))
    }

    /// Resolve a query to its tier and payout.
    ///
    /// Checks, in order: capital, term, configured amount range, term
    /// conversion, tier lookup.
    #[instrument(skip(self, tiers), fields(tier_count = tiers.len()))]
    pub fn resolve(&self, tiers: &[RateTier], query: &Query) -> Resolution<Simulation> {
        let capital = query
            .capital
            .filter(|c| *c > Decimal::ZERO)
            .ok_or(ResolutionError::MissingInput { field: "capital" })?;
        let term = query
            .term
            .filter(|t| *t > 0)
            .ok_or(ResolutionError::MissingInput { field: "term" })?;

        // Unknown before tiers are loaded; conversion or lookup reports that case
        if let Some(range) = self.configured_amount_range(tiers) {
            if !range.contains(capital) {
                debug!(%capital, "Capital outside configured range");
                return Err(ResolutionError::OutOfConfiguredRange {
                    capital,
                    min: range.from,
                    max: range.to,
                });
            }
        }

        let term_days = self.term_in_days(tiers, term, query.unit)?;

        let tier = self
            .find_tier(tiers, capital, term_days)
            .ok_or(ResolutionError::NoMatchingTier { capital, term_days })?;

        let net_interest = self.net_interest(capital, tier.rate, term_days)?;
        let total_payout = capital
            .checked_add(net_interest)
            .ok_or(ResolutionError::Overflow)?;
        debug!(tier = tier.id, %net_interest, "Resolved simulation");

        Ok(Simulation {
            tier: tier.clone(),
            capital,
            term_days,
            rate: tier.rate,
            tax_rate: self.settings.tax_rate,
            net_interest,
            total_payout,
            computed_at: chrono::Utc::now().timestamp_millis(),
        })
    }

    /// Cross-tabulated view of the tier set
    pub fn grid(&self, tiers: &[RateTier]) -> TierGrid {
        TierGrid::build(tiers)
    }
}
