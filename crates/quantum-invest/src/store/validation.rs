//! Tier validation
//!
//! Checks run in a fixed order and the first failure is reported:
//!
//! 1. required fields present
//! 2. no negative values
//! 3. non-zero rate
//! 4. amount range ordered
//! 5. term range ordered
//! 6. at most one unbounded-amount tier
//! 7. no tier intersecting in both amount and term
//! 8. no tier with the same amount range touching the same term band
//!
//! Overlap (7) requires both dimensions to intersect. Tiers sharing only a
//! boundary value do not overlap, and any number of open-ended term tiers may
//! coexist.

use quantum_common::{
    AmountRange, RangeAxis, RateTier, TermRange, TierDraft, TierId, TierSpec, ValidationError,
};
use rust_decimal::Decimal;
use tracing::debug;

/// Validates proposed tiers against an existing tier set
#[derive(Debug, Clone, Copy)]
pub struct TierValidator {
    /// Tolerance when comparing amount bounds for duplicates
    amount_tolerance: Decimal,
}

impl Default for TierValidator {
    fn default() -> Self {
        Self::new(crate::AMOUNT_TOLERANCE)
    }
}

impl TierValidator {
    pub fn new(amount_tolerance: Decimal) -> Self {
        Self { amount_tolerance }
    }

    /// Validate `draft` against `existing`, ignoring the tier `exclude_id`
    /// (the tier being amended, if any).
    pub fn validate(
        &self,
        draft: &TierDraft,
        existing: &[RateTier],
        exclude_id: Option<TierId>,
    ) -> Result<TierSpec, ValidationError> {
        let spec = Self::check_fields(draft)?;
        let others: Vec<&RateTier> = existing
            .iter()
            .filter(|t| Some(t.id) != exclude_id)
            .collect();

        let amount = spec.amount_range();
        let term = spec.term_range();

        if amount.is_open() {
            if let Some(other) = others.iter().find(|t| t.amount_to.is_none()) {
                debug!(existing = other.id, "Rejected second unbounded-amount tier");
                return Err(ValidationError::DuplicateUnboundedAmount { existing: other.id });
            }
        }

        // Same-amount pairs are left to the duplicate check, which reports
        // the more specific reason and covers every such overlap.
        if let Some(other) = others.iter().find(|t| {
            !self.same_amounts(&amount, t)
                && amount.overlaps(&t.amount_range())
                && term.overlaps(&t.term_range())
        }) {
            debug!(existing = other.id, "Rejected overlapping tier");
            return Err(ValidationError::OverlappingTier { existing: other.id });
        }

        if let Some(other) = others
            .iter()
            .find(|t| self.same_amounts(&amount, t) && term.touches(&t.term_range()))
        {
            debug!(existing = other.id, "Rejected duplicate amount range in term band");
            return Err(ValidationError::DuplicateRangeSameTermBand { existing: other.id });
        }

        Ok(spec)
    }

    fn same_amounts(&self, amount: &AmountRange, tier: &RateTier) -> bool {
        amount.matches_within(&tier.amount_range(), self.amount_tolerance)
    }

    /// Per-field checks (steps 1-5), independent of other tiers
    pub fn check_fields(draft: &TierDraft) -> Result<TierSpec, ValidationError> {
        let amount_from = draft
            .amount_from
            .ok_or(ValidationError::MissingField { field: "amount_from" })?;
        let term_from = draft
            .term_from
            .ok_or(ValidationError::MissingField { field: "term_from" })?;
        let rate = draft
            .rate
            .ok_or(ValidationError::MissingField { field: "rate" })?;

        // Terms beyond `u32` are not meaningful day counts
        ensure_day_count(term_from, "term_from")?;
        if let Some(term_to) = draft.term_to {
            ensure_day_count(term_to, "term_to")?;
        }

        if amount_from < Decimal::ZERO {
            return Err(ValidationError::NegativeValue { field: "amount_from" });
        }
        if matches!(draft.amount_to, Some(to) if to < Decimal::ZERO) {
            return Err(ValidationError::NegativeValue { field: "amount_to" });
        }
        if term_from < 0 {
            return Err(ValidationError::NegativeValue { field: "term_from" });
        }
        if matches!(draft.term_to, Some(to) if to < 0) {
            return Err(ValidationError::NegativeValue { field: "term_to" });
        }
        if rate < Decimal::ZERO {
            return Err(ValidationError::NegativeValue { field: "rate" });
        }

        if rate.is_zero() {
            return Err(ValidationError::ZeroRate);
        }

        let amount = AmountRange::new(amount_from, draft.amount_to);
        if amount.is_inverted() {
            return Err(ValidationError::InvertedRange(RangeAxis::Amount));
        }

        let term_from = days(term_from, "term_from")?;
        let term_to = draft.term_to.map(|to| days(to, "term_to")).transpose()?;
        let term = TermRange::new(term_from, term_to);
        if term.is_inverted() {
            return Err(ValidationError::InvertedRange(RangeAxis::Term));
        }

        Ok(TierSpec::new(amount, term, rate))
    }
}

fn ensure_day_count(value: i64, field: &'static str) -> Result<(), ValidationError> {
    if value > i64::from(u32::MAX) {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}

/// Non-negative and in range by the time this runs
fn days(value: i64, field: &'static str) -> Result<u32, ValidationError> {
    u32::try_from(value).map_err(|_| ValidationError::NegativeValue { field })
}
