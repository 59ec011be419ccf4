//! Tier ranges with optional open upper bounds
//!
//! Both tier dimensions (deposit amount and term in days) are described by an
//! inclusive lower bound and an optional inclusive upper bound. An absent upper
//! bound means "and above" and compares as +∞ everywhere below.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inclusive range with an optional open upper bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TierRange<T> {
    /// Inclusive lower bound
    pub from: T,
    /// Inclusive upper bound, `None` when open-ended
    pub to: Option<T>,
}

/// Deposit amount range
pub type AmountRange = TierRange<Decimal>;

/// Term range in days
pub type TermRange = TierRange<u32>;

/// `value < upper`, with an absent upper bound treated as +∞
fn strictly_below<T: Ord>(value: &T, upper: &Option<T>) -> bool {
    upper.as_ref().map_or(true, |upper| value < upper)
}

/// `value <= upper`, with an absent upper bound treated as +∞
fn at_or_below<T: Ord>(value: &T, upper: &Option<T>) -> bool {
    upper.as_ref().map_or(true, |upper| value <= upper)
}

impl<T: Ord + Copy> TierRange<T> {
    pub fn new(from: T, to: Option<T>) -> Self {
        Self { from, to }
    }

    /// Range with both bounds set
    pub fn bounded(from: T, to: T) -> Self {
        Self { from, to: Some(to) }
    }

    /// Range with no upper bound
    pub fn open(from: T) -> Self {
        Self { from, to: None }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.to.is_none()
    }

    /// Upper bound present and not strictly above the lower bound
    pub fn is_inverted(&self) -> bool {
        matches!(self.to, Some(to) if self.from >= to)
    }

    /// Inclusive membership test
    pub fn contains(&self, value: T) -> bool {
        value >= self.from && at_or_below(&value, &self.to)
    }

    /// Half-open intersection: `fromA < toB && toA > fromB`.
    ///
    /// Ranges that only share a boundary value do not overlap, so adjacent
    /// tiers such as `[0, 1000]` and `[1000, ∞)` can coexist.
    pub fn overlaps(&self, other: &Self) -> bool {
        strictly_below(&self.from, &other.to) && strictly_below(&other.from, &self.to)
    }

    /// Inclusive intersection: ranges sharing even a single boundary value touch
    pub fn touches(&self, other: &Self) -> bool {
        at_or_below(&self.from, &other.to) && at_or_below(&other.from, &self.to)
    }
}

impl<T: Ord> PartialOrd for TierRange<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordered by lower bound, then upper bound with open ranges last
impl<T: Ord> Ord for TierRange<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.from.cmp(&other.from).then_with(|| match (&self.to, &other.to) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
    }
}

impl TierRange<Decimal> {
    /// Both bounds equal within `tolerance`; two open upper bounds are equal
    pub fn matches_within(&self, other: &Self, tolerance: Decimal) -> bool {
        let close = |a: Decimal, b: Decimal| (a - b).abs() < tolerance;
        let upper = match (self.to, other.to) {
            (Some(a), Some(b)) => close(a, b),
            (None, None) => true,
            _ => false,
        };
        close(self.from, other.from) && upper
    }

    /// Display label, e.g. `$1,000 - $5,000` or `$5,000 or more`
    pub fn label(&self) -> String {
        match self.to {
            Some(to) => format!("${} - ${}", format_amount(self.from), format_amount(to)),
            None => format!("${} or more", format_amount(self.from)),
        }
    }
}

impl TierRange<u32> {
    /// Display label, e.g. `30 - 89 days` or `90 days onward`
    pub fn label(&self) -> String {
        match self.to {
            Some(to) => format!("{} - {} days", self.from, to),
            None => format!("{} days onward", self.from),
        }
    }
}

/// Format an amount with thousands separators and at most two decimals
pub fn format_amount(amount: Decimal) -> String {
    let rendered = amount.round_dp(2).normalize().to_string();
    let (sign, digits) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}
