//! Allocation table specs

use crate::prelude::*;
use rota_core::{IneligibleReason, Post, PostId, UserId};
use rota_engine::EngineError;
use std::collections::BTreeSet;

#[tokio::test]
async fn cohort_restriction_rejects_and_admits() {
    let f = fixture();
    let day = date(2025, 10, 22);

    // Post P1 restricts cohort to "2"
    f.engine.add_user(user("user-a", "1")).await.unwrap();
    f.engine.add_user(user("user-b", "2")).await.unwrap();
    f.engine
        .add_post(Post::new("p1", "P1", ["2"]))
        .await
        .unwrap();
    f.engine
        .create_day(day, rota_core::RoutineType::Normal)
        .await
        .unwrap();

    // User A (cohort "1") is refused with a structured reason
    let err = f
        .engine
        .assign(&UserId::from("user-a"), &PostId::from("p1"), day, false, None)
        .await
        .unwrap_err();
    match err {
        EngineError::Ineligible { verdict } => {
            assert_eq!(verdict.reasons, vec![IneligibleReason::CohortNotPermitted]);
            assert_eq!(verdict.summary(), "cohort mismatch");
        }
        other => panic!("expected Ineligible, got {other:?}"),
    }

    // User B (cohort "2", no conflicts) succeeds with tag = None
    let allocation = f
        .engine
        .assign(&UserId::from("user-b"), &PostId::from("p1"), day, false, None)
        .await
        .unwrap();
    assert_eq!(allocation.user_id, UserId::from("user-b"));
    assert!(allocation.tag.is_none());
}

#[tokio::test]
async fn eligibility_is_a_pure_function_of_its_inputs() {
    let f = fixture();
    let day = date(2025, 10, 22);
    seed_roster(&f.engine, day).await;
    f.presence
        .set_status("u-2", rota_core::PresenceStatus::Out);

    let first = f
        .engine
        .check_eligibility(&UserId::from("u-2"), &PostId::from("p-1"), day, None)
        .await
        .unwrap();
    let second = f
        .engine
        .check_eligibility(&UserId::from("u-2"), &PostId::from("p-1"), day, None)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.reasons, vec![IneligibleReason::Absent]);

    // The check itself never mutates anything
    assert!(f.engine.allocations_on(day).is_empty());
}

#[tokio::test]
async fn at_most_one_allocation_per_user_per_day_after_mixed_operations() {
    let f = fixture();
    let day = date(2025, 10, 22);
    seed_roster(&f.engine, day).await;

    let a1 = f
        .engine
        .assign(&UserId::from("u-1"), &PostId::from("p-1"), day, false, None)
        .await
        .unwrap();
    f.engine
        .assign(&UserId::from("u-2"), &PostId::from("p-2"), day, false, None)
        .await
        .unwrap();

    // Reassign u-1's slot to u-3, then swap u-2's duty to u-1 via the workflow
    f.engine.reassign(&a1.id, &UserId::from("u-3")).await.unwrap();
    f.engine.publish_day(day).await.unwrap();

    let a2 = f
        .engine
        .allocations_on(day)
        .into_iter()
        .find(|a| a.user_id == UserId::from("u-2"))
        .unwrap();
    let swap = f
        .engine
        .request_swap(&UserId::from("u-2"), &UserId::from("u-1"), &a2.id, "cover request")
        .await
        .unwrap();
    f.engine.approve_swap(&swap.id).await.unwrap();

    // Invariant: no (user, date) pair appears twice
    let mut seen = BTreeSet::new();
    for allocation in f.engine.allocations_on(day) {
        assert!(
            seen.insert((allocation.user_id.clone(), allocation.date)),
            "user {} double-booked",
            allocation.user_id
        );
    }
    assert_eq!(seen.len(), 2);
}

#[tokio::test]
async fn generated_days_respect_every_restriction() {
    let f = fixture();
    let day = date(2025, 10, 26);

    f.engine.add_user(user("u-1", "1")).await.unwrap();
    f.engine.add_user(user("u-2", "2")).await.unwrap();
    f.engine.add_user(user("u-3", "2")).await.unwrap();
    f.engine
        .add_post(Post::new("p-1", "Main Gate", ["2"]))
        .await
        .unwrap();
    f.engine
        .add_unavailability(
            &UserId::from("u-2"),
            day,
            day,
            Some("medical".into()),
        )
        .await
        .unwrap();

    let created = f
        .engine
        .generate_day(day, rota_core::RoutineType::Heightened)
        .await
        .unwrap();

    // Cohort "1" and the unavailable user are both passed over
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].user_id, UserId::from("u-3"));
    assert_eq!(
        f.engine.user(&UserId::from("u-3")).unwrap().heightened_count,
        1
    );
}
