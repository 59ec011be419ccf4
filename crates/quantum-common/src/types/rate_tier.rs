//! Rate Tier - (amount range × term range) → interest rate
//!
//! A tier is the unit of configuration for investment products. Terms are
//! always expressed in days; amounts in the product currency.
//!
//! - [`TierDraft`]: raw admin input, every field optional
//! - [`TierSpec`]: a draft that passed validation, not yet persisted
//! - [`RateTier`]: a persisted tier carrying its repository id

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::range::{AmountRange, TermRange};

/// Repository-assigned tier identifier
pub type TierId = i64;

/// A configured and persisted rate tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTier {
    /// Identifier assigned by the repository on creation
    pub id: TierId,

    /// Inclusive lower bound of the deposit amount
    pub amount_from: Decimal,

    /// Inclusive upper bound of the deposit amount, `None` when unbounded
    pub amount_to: Option<Decimal>,

    /// Inclusive lower bound of the term in days
    pub term_from: u32,

    /// Inclusive upper bound of the term in days, `None` when unbounded
    pub term_to: Option<u32>,

    /// Interest rate as a percentage (5 means 5%)
    pub rate: Decimal,
}

impl RateTier {
    /// Attach a repository id to a validated spec
    pub fn from_spec(id: TierId, spec: TierSpec) -> Self {
        Self {
            id,
            amount_from: spec.amount_from,
            amount_to: spec.amount_to,
            term_from: spec.term_from,
            term_to: spec.term_to,
            rate: spec.rate,
        }
    }

    /// The tier without its id
    pub fn spec(&self) -> TierSpec {
        TierSpec {
            amount_from: self.amount_from,
            amount_to: self.amount_to,
            term_from: self.term_from,
            term_to: self.term_to,
            rate: self.rate,
        }
    }

    #[inline]
    pub fn amount_range(&self) -> AmountRange {
        AmountRange::new(self.amount_from, self.amount_to)
    }

    #[inline]
    pub fn term_range(&self) -> TermRange {
        TermRange::new(self.term_from, self.term_to)
    }

    /// Whether this tier covers the given capital and term (all bounds inclusive)
    pub fn applies_to(&self, capital: Decimal, term_days: u32) -> bool {
        self.amount_range().contains(capital) && self.term_range().contains(term_days)
    }

    /// Display ordering: by term lower bound, then amount lower bound
    pub fn display_order(a: &RateTier, b: &RateTier) -> Ordering {
        a.term_from
            .cmp(&b.term_from)
            .then_with(|| a.amount_from.cmp(&b.amount_from))
    }
}

/// A validated tier that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSpec {
    pub amount_from: Decimal,
    pub amount_to: Option<Decimal>,
    pub term_from: u32,
    pub term_to: Option<u32>,
    pub rate: Decimal,
}

impl TierSpec {
    pub fn new(amount: AmountRange, term: TermRange, rate: Decimal) -> Self {
        Self {
            amount_from: amount.from,
            amount_to: amount.to,
            term_from: term.from,
            term_to: term.to,
            rate,
        }
    }

    #[inline]
    pub fn amount_range(&self) -> AmountRange {
        AmountRange::new(self.amount_from, self.amount_to)
    }

    #[inline]
    pub fn term_range(&self) -> TermRange {
        TermRange::new(self.term_from, self.term_to)
    }
}

/// Raw admin form input for a tier
///
/// Fields are optional because the form may be submitted incomplete, and terms
/// are signed so that negative input reaches validation instead of failing to
/// parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDraft {
    pub amount_from: Option<Decimal>,
    pub amount_to: Option<Decimal>,
    pub term_from: Option<i64>,
    pub term_to: Option<i64>,
    pub rate: Option<Decimal>,
}

impl TierDraft {
    /// Draft with the required fields set and both upper bounds open
    pub fn new(amount_from: Decimal, term_from: i64, rate: Decimal) -> Self {
        Self {
            amount_from: Some(amount_from),
            amount_to: None,
            term_from: Some(term_from),
            term_to: None,
            rate: Some(rate),
        }
    }

    /// Set the amount upper bound
    pub fn with_amount_to(mut self, amount_to: Decimal) -> Self {
        self.amount_to = Some(amount_to);
        self
    }

    /// Set the term upper bound (days)
    pub fn with_term_to(mut self, term_to: i64) -> Self {
        self.term_to = Some(term_to);
        self
    }

    /// Build a draft from form strings. Blank or non-numeric input leaves the
    /// field unset.
    pub fn parse(
        amount_from: &str,
        amount_to: &str,
        term_from: &str,
        term_to: &str,
        rate: &str,
    ) -> Self {
        Self {
            amount_from: parse_field(amount_from),
            amount_to: parse_field(amount_to),
            term_from: parse_field(term_from),
            term_to: parse_field(term_to),
            rate: parse_field(rate),
        }
    }
}

impl From<TierSpec> for TierDraft {
    fn from(spec: TierSpec) -> Self {
        Self {
            amount_from: Some(spec.amount_from),
            amount_to: spec.amount_to,
            term_from: Some(i64::from(spec.term_from)),
            term_to: spec.term_to.map(i64::from),
            rate: Some(spec.rate),
        }
    }
}

impl From<&RateTier> for TierDraft {
    fn from(tier: &RateTier) -> Self {
        tier.spec().into()
    }
}

fn parse_field<T: std::str::FromStr>(raw: &str) -> Option<T> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}
