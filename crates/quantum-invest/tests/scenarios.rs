//! End-to-end tier administration and simulation
//!
//! Drives `InvestmentService` over an in-memory repository:
//! - simulation against a two-column tier grid
//! - month-based terms anchored to the shortest tier
//! - duplicate and out-of-range rejections
//! - create → list round trip through the repository

use std::sync::Arc;

use quantum_common::{
    QuantumError, Query, RangeAxis, RateTier, ResolutionError, TierDraft, ValidationError,
};
use quantum_invest::{
    InMemoryTierRepository, InvestmentService, ResolverSettings, StoreStatus, TierRepository,
};
use rust_decimal_macros::dec;

fn two_column_tiers() -> Vec<RateTier> {
    vec![
        RateTier {
            id: 1,
            amount_from: dec!(0),
            amount_to: Some(dec!(1000)),
            term_from: 30,
            term_to: Some(89),
            rate: dec!(5),
        },
        RateTier {
            id: 2,
            amount_from: dec!(1000),
            amount_to: None,
            term_from: 30,
            term_to: Some(89),
            rate: dec!(6),
        },
    ]
}

async fn service_with(tiers: Vec<RateTier>) -> (InvestmentService, Arc<InMemoryTierRepository>) {
    let repository = Arc::new(InMemoryTierRepository::with_tiers(tiers));
    let service = InvestmentService::new(repository.clone(), ResolverSettings::default());
    service.store().load().await.unwrap();
    (service, repository)
}

#[tokio::test]
async fn test_small_capital_resolves_first_column() {
    let (service, _) = service_with(two_column_tiers()).await;

    let sim = service.simulate(&Query::days(dec!(500), 60)).await.unwrap();

    assert_eq!(sim.tier.id, 1);
    assert_eq!(sim.rate, dec!(5));
    assert_eq!(sim.net_interest, dec!(4.08));
    assert_eq!(sim.total_payout, dec!(504.08));
}

#[tokio::test]
async fn test_large_capital_resolves_open_column() {
    let (service, _) = service_with(two_column_tiers()).await;

    let sim = service.simulate(&Query::days(dec!(1500), 60)).await.unwrap();

    assert_eq!(sim.tier.id, 2);
    assert_eq!(sim.rate, dec!(6));
    assert_eq!(sim.net_interest, dec!(14.70));
}

#[tokio::test]
async fn test_one_month_maps_to_shortest_term() {
    let (service, _) = service_with(two_column_tiers()).await;

    let sim = service.simulate(&Query::months(dec!(500), 1)).await.unwrap();

    assert_eq!(sim.term_days, 30);
    assert_eq!(sim.tier.id, 1);
}

#[tokio::test]
async fn test_duplicate_amount_range_is_rejected() {
    let (service, repository) = service_with(two_column_tiers()).await;
    let before = service.store().list_tiers().await;

    let duplicate = TierDraft::new(dec!(0), 60, dec!(4.5))
        .with_amount_to(dec!(1000))
        .with_term_to(120);

    assert_eq!(
        service.store().validate(&duplicate, None).await,
        Err(ValidationError::DuplicateRangeSameTermBand { existing: 1 })
    );
    let err = service.store().create(&duplicate).await.unwrap_err();
    assert!(matches!(
        err,
        QuantumError::Validation(ValidationError::DuplicateRangeSameTermBand { existing: 1 })
    ));

    assert_eq!(service.store().list_tiers().await, before);
    assert_eq!(repository.len(), 2);
}

#[tokio::test]
async fn test_capital_below_every_tier_is_out_of_range() {
    let mut tiers = two_column_tiers();
    tiers[0].amount_from = dec!(100);
    let (service, _) = service_with(tiers).await;

    let err = service
        .simulate(&Query::days(dec!(50), 60))
        .await
        .unwrap_err();

    match err {
        QuantumError::Resolution(e) => {
            assert!(e.is_warning());
            assert_eq!(
                e,
                ResolutionError::OutOfConfiguredRange {
                    capital: dec!(50),
                    min: dec!(100),
                    max: None,
                }
            );
        }
        other => panic!("expected resolution error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_created_tier_round_trips() {
    let (service, repository) = service_with(two_column_tiers()).await;

    let draft = TierDraft::new(dec!(0), 90, dec!(5.5))
        .with_amount_to(dec!(1000))
        .with_term_to(179);
    let created = service.store().create(&draft).await.unwrap();

    let listed = service.store().list_tiers().await;
    let found = listed.iter().find(|t| t.id == created.id).unwrap();
    assert_eq!(found.amount_from, dec!(0));
    assert_eq!(found.amount_to, Some(dec!(1000)));
    assert_eq!(found.term_from, 90);
    assert_eq!(found.term_to, Some(179));
    assert_eq!(found.rate, dec!(5.5));

    // Persisted, so a reload sees it too
    assert_eq!(repository.fetch_all().await.unwrap().len(), 3);
    assert_eq!(service.store().load().await.unwrap(), 3);
    assert_eq!(service.store().status(), StoreStatus::Idle);
}

#[tokio::test]
async fn test_grid_reflects_store() {
    let (service, _) = service_with(two_column_tiers()).await;
    service
        .store()
        .create(&TierDraft::new(dec!(0), 90, dec!(5.5)).with_amount_to(dec!(1000)))
        .await
        .unwrap();

    let grid = service.grid().await;

    assert_eq!(grid.terms().len(), 2);
    assert_eq!(grid.amounts().len(), 2);
    assert_eq!(grid.cell(1, 0), Some(dec!(5.5)));
    assert_eq!(grid.cell_label(1, 1), "—");
}

#[tokio::test]
async fn test_update_then_delete() {
    let (service, _) = service_with(two_column_tiers()).await;

    let updated = service
        .store()
        .update(
            2,
            &TierDraft::new(dec!(1000), 30, dec!(6.25)).with_term_to(89),
        )
        .await
        .unwrap();
    assert_eq!(updated.id, 2);

    let sim = service.simulate(&Query::days(dec!(1500), 60)).await.unwrap();
    assert_eq!(sim.rate, dec!(6.25));

    service.store().delete(2).await.unwrap();
    let err = service
        .simulate(&Query::days(dec!(1500), 60))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        QuantumError::Resolution(ResolutionError::OutOfConfiguredRange { .. })
    ));
}

#[tokio::test]
async fn test_rejected_update_changes_nothing() {
    let (service, repository) = service_with(two_column_tiers()).await;
    let before = service.store().list_tiers().await;

    // Lowering tier 2's floor into tier 1's amounts overlaps it
    let err = service
        .store()
        .update(
            2,
            &TierDraft::new(dec!(500), 30, dec!(6)).with_term_to(89),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        QuantumError::Validation(ValidationError::OverlappingTier { existing: 1 })
    ));

    let err = service
        .store()
        .update(
            1,
            &TierDraft::new(dec!(0), 89, dec!(5))
                .with_amount_to(dec!(1000))
                .with_term_to(30),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        QuantumError::Validation(ValidationError::InvertedRange(RangeAxis::Term))
    ));

    assert_eq!(service.store().list_tiers().await, before);
    assert_eq!(repository.fetch_all().await.unwrap(), two_column_tiers());
}
