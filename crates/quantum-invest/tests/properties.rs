//! Property tests for tier validation and rate resolution

use proptest::prelude::*;
use quantum_common::{Query, RateTier, TierDraft, TierId};
use quantum_invest::{RateResolver, TierValidator};
use rust_decimal::Decimal;

/// (amount_from, amount_to, term_from, term_to, rate in basis points)
type RawTier = (u32, Option<u32>, u32, Option<u32>, u32);

fn raw_tier() -> impl Strategy<Value = RawTier> {
    (
        0u32..5_000,
        prop::option::weighted(0.8, 1u32..5_000),
        0u32..400,
        prop::option::weighted(0.8, 1u32..400),
        1u32..1_500,
    )
        .prop_map(|(af, at, tf, tt, bp)| (af, at.map(|w| af + w), tf, tt.map(|w| tf + w), bp))
}

fn draft((af, at, tf, tt, bp): RawTier) -> TierDraft {
    TierDraft {
        amount_from: Some(Decimal::from(af)),
        amount_to: at.map(Decimal::from),
        term_from: Some(i64::from(tf)),
        term_to: tt.map(i64::from),
        rate: Some(Decimal::new(i64::from(bp), 2)),
    }
}

/// Admit candidates one by one, keeping only what validation accepts
fn admitted(candidates: Vec<RawTier>) -> Vec<RateTier> {
    let validator = TierValidator::default();
    let mut accepted: Vec<RateTier> = Vec::new();
    for (i, raw) in candidates.into_iter().enumerate() {
        if let Ok(spec) = validator.validate(&draft(raw), &accepted, None) {
            accepted.push(RateTier::from_spec(i as TierId + 1, spec));
        }
    }
    accepted
}

proptest! {
    #[test]
    fn accepted_tiers_never_overlap_in_both_dimensions(
        candidates in prop::collection::vec(raw_tier(), 1..30)
    ) {
        let tiers = admitted(candidates);
        for (i, a) in tiers.iter().enumerate() {
            for b in &tiers[i + 1..] {
                prop_assert!(
                    !(a.amount_range().overlaps(&b.amount_range())
                        && a.term_range().overlaps(&b.term_range())),
                    "tiers {} and {} overlap", a.id, b.id
                );
            }
        }
    }

    #[test]
    fn at_most_one_unbounded_amount_tier(
        candidates in prop::collection::vec(raw_tier(), 1..30)
    ) {
        let tiers = admitted(candidates);
        prop_assert!(tiers.iter().filter(|t| t.amount_to.is_none()).count() <= 1);
    }

    #[test]
    fn month_conversion_steps_by_thirty_days(
        candidates in prop::collection::vec(raw_tier(), 1..10),
        months in 1i64..60,
    ) {
        let tiers = admitted(candidates);
        prop_assume!(!tiers.is_empty());

        let resolver = RateResolver::default();
        let min = resolver.min_available_term_days(&tiers).unwrap();
        let unit = quantum_common::TermUnit::Months;

        prop_assert_eq!(resolver.term_in_days(&tiers, 1, unit).unwrap(), min);
        let k = resolver.term_in_days(&tiers, months, unit).unwrap();
        let next = resolver.term_in_days(&tiers, months + 1, unit).unwrap();
        prop_assert_eq!(next, k + 30);
    }

    #[test]
    fn resolution_is_idempotent(
        candidates in prop::collection::vec(raw_tier(), 1..20),
        capital in 1u32..10_000,
        term in 1i64..500,
    ) {
        let tiers = admitted(candidates);
        let resolver = RateResolver::default();
        let query = Query::days(Decimal::from(capital), term);

        let first = resolver.resolve(&tiers, &query);
        let second = resolver.resolve(&tiers, &query);
        match (first, second) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.tier.id, b.tier.id);
                prop_assert_eq!(a.net_interest, b.net_interest);
            }
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            (a, b) => prop_assert!(false, "diverged: {:?} vs {:?}", a, b),
        }
    }

    #[test]
    fn inverted_bounds_always_rejected(
        from in 1u32..5_000,
        shrink in 0u32..5_000,
    ) {
        let to = from.saturating_sub(shrink);
        let draft = TierDraft::new(Decimal::from(from), 30, Decimal::ONE)
            .with_amount_to(Decimal::from(to));
        prop_assert!(TierValidator::check_fields(&draft).is_err());
    }
}
