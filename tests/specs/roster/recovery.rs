//! Durability specs: committed state survives a restart

use crate::prelude::*;
use rota_core::{PostId, SwapStatus, UserId};

#[tokio::test]
async fn committed_roster_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let day = date(2025, 11, 1);

    let swap_id = {
        let f = fixture_at(dir.path());
        seed_roster(&f.engine, day).await;

        let allocation = f
            .engine
            .assign(&UserId::from("u-1"), &PostId::from("p-1"), day, false, None)
            .await
            .unwrap();
        f.engine.publish_day(day).await.unwrap();
        let swap = f
            .engine
            .request_swap(&UserId::from("u-1"), &UserId::from("u-2"), &allocation.id, "cover request")
            .await
            .unwrap();
        f.engine.approve_swap(&swap.id).await.unwrap();
        swap.id
    };

    // A fresh engine over the same directory sees the committed facts
    let f = fixture_at(dir.path());
    assert!(f.engine.day(day).unwrap().is_published());

    let allocations = f.engine.allocations_on(day);
    assert_eq!(allocations.len(), 1);
    assert_eq!(allocations[0].user_id, UserId::from("u-2"));

    assert_eq!(f.engine.swap(&swap_id).unwrap().status, SwapStatus::Approved);
    assert_eq!(f.engine.user(&UserId::from("u-2")).unwrap().normal_count, 1);
    assert_eq!(f.engine.outstanding_debts(&UserId::from("u-1")).len(), 1);
}

#[tokio::test]
async fn a_rejected_transaction_is_absent_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let day = date(2025, 11, 1);

    {
        let f = fixture_at(dir.path());
        seed_roster(&f.engine, day).await;
        f.engine
            .assign(&UserId::from("u-1"), &PostId::from("p-1"), day, false, None)
            .await
            .unwrap();

        // Double-booking is refused and must leave no trace
        let err = f
            .engine
            .assign(&UserId::from("u-1"), &PostId::from("p-2"), day, false, None)
            .await
            .unwrap_err();
        assert!(matches!(err, rota_engine::EngineError::Ineligible { .. }));
    }

    let f = fixture_at(dir.path());
    assert_eq!(f.engine.allocations_on(day).len(), 1);
    assert_eq!(f.engine.user(&UserId::from("u-1")).unwrap().normal_count, 1);
}
