//! Term unit conversion
//!
//! A term entered in months is anchored to the shortest configured term:
//!
//! ```text
//! days = min_term_from + (months − 1) × 30
//! ```
//!
//! so one month always lands in the first term band.

use quantum_common::RateTier;

/// Smallest `term_from` across the tier set, `None` before tiers are loaded
pub fn min_available_term_days(tiers: &[RateTier]) -> Option<u32> {
    tiers.iter().map(|t| t.term_from).min()
}

/// Convert a month count (≥ 1) to days, saturating instead of overflowing
pub fn months_to_days(min_term_days: u32, months: u32, days_per_month: u32) -> u32 {
    min_term_days.saturating_add(months.saturating_sub(1).saturating_mul(days_per_month))
}
