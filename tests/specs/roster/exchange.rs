//! Exchange workflow specs

use crate::prelude::*;
use rota_core::{Clock, PostId, SwapStatus, UserId};
use rota_engine::{EngineError, SwapDecision};

#[tokio::test]
async fn unavailable_substitute_is_auto_rejected_on_approval() {
    let f = fixture();
    let day = date(2025, 11, 1);

    // User A holds an allocation on 2025-11-01 at post P2
    f.engine.add_user(user("user-a", "2")).await.unwrap();
    f.engine.add_user(user("user-b", "2")).await.unwrap();
    f.engine
        .add_post(rota_core::Post::new("p2", "P2", ["2"]))
        .await
        .unwrap();
    f.engine
        .create_day(day, rota_core::RoutineType::Normal)
        .await
        .unwrap();
    let allocation = f
        .engine
        .assign(&UserId::from("user-a"), &PostId::from("p2"), day, false, None)
        .await
        .unwrap();
    f.engine.publish_day(day).await.unwrap();

    // A requests a swap with B; B then becomes unavailable that day
    let swap = f
        .engine
        .request_swap(
            &UserId::from("user-a"),
            &UserId::from("user-b"),
            &allocation.id,
            "appointment",
        )
        .await
        .unwrap();
    f.engine
        .add_unavailability(&UserId::from("user-b"), day, day, None)
        .await
        .unwrap();

    // Approval auto-rejects with the resolver's reason
    let decision = f.engine.approve_swap(&swap.id).await.unwrap();
    match decision {
        SwapDecision::AutoRejected { verdict } => {
            assert_eq!(verdict.summary(), "unavailable");
        }
        other => panic!("expected auto-rejection, got {other:?}"),
    }

    let swap = f.engine.swap(&swap.id).unwrap();
    assert_eq!(swap.status, SwapStatus::Rejected);

    // Original allocation unchanged
    assert_eq!(
        f.engine.allocation(&allocation.id).unwrap().user_id,
        UserId::from("user-a")
    );
}

#[tokio::test]
async fn approval_changes_one_allocation_and_at_most_one_debt() {
    let f = fixture();
    let day = date(2025, 11, 1);
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
    let decision = f.engine.approve_swap(&swap.id).await.unwrap();

    let SwapDecision::Approved { allocation: moved, debt } = decision else {
        panic!("expected approval");
    };
    assert_eq!(moved.user_id, UserId::from("u-2"));
    assert_eq!(f.engine.allocations_on(day).len(), 1);

    let debt = debt.expect("one debt for a normal slot");
    assert_eq!(debt.debtor, UserId::from("u-1"));
    assert_eq!(debt.creditor, UserId::from("u-2"));
    assert_eq!(f.engine.outstanding_debts(&UserId::from("u-1")).len(), 1);

    // Settling closes the obligation
    let settled = f.engine.settle_debt(&debt.id).await.unwrap();
    assert!(!settled.is_outstanding());
    assert!(f.engine.outstanding_debts(&UserId::from("u-1")).is_empty());
}

#[tokio::test]
async fn terminal_swaps_refuse_further_resolution_without_side_effects() {
    let f = fixture();
    let day = date(2025, 11, 1);
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
    f.engine.reject_swap(&swap.id, None).await.unwrap();

    let before_counters = f.engine.user(&UserId::from("u-2")).unwrap();

    let err = f.engine.approve_swap(&swap.id).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
    let err = f.engine.reject_swap(&swap.id, None).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));

    // No side effects from the failed resolutions
    assert_eq!(
        f.engine.allocation(&allocation.id).unwrap().user_id,
        UserId::from("u-1")
    );
    assert_eq!(f.engine.user(&UserId::from("u-2")).unwrap(), before_counters);
    assert!(f.engine.outstanding_debts(&UserId::from("u-1")).is_empty());
}

#[tokio::test]
async fn the_identity_provider_stamps_the_responder() {
    let f = fixture();
    let day = date(2025, 11, 1);
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

    f.identity.set_operator("duty-sergeant");
    f.engine.approve_swap(&swap.id).await.unwrap();

    let swap = f.engine.swap(&swap.id).unwrap();
    assert_eq!(swap.responder, Some(UserId::from("duty-sergeant")));
    assert_eq!(swap.responded_at, Some(f.clock.now()));
}
