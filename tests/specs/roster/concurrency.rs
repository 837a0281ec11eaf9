//! Concurrency specs
//!
//! The store serializes commits; the unique index and version guards are
//! the last line of defense. Exactly one of two racing mutations may
//! commit, and the loser surfaces a typed error, never a partial write.

use crate::prelude::*;
use rota_core::{PostId, UserId};
use rota_engine::{EngineError, SwapDecision};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_approvals_for_the_same_substitute_commit_exactly_once() {
    let f = fixture();
    let day = date(2025, 11, 2);
    seed_roster(&f.engine, day).await;

    // u-1 and u-2 each hold a post; both ask u-3 to stand in
    let a1 = f
        .engine
        .assign(&UserId::from("u-1"), &PostId::from("p-1"), day, false, None)
        .await
        .unwrap();
    let a2 = f
        .engine
        .assign(&UserId::from("u-2"), &PostId::from("p-2"), day, false, None)
        .await
        .unwrap();
    f.engine.publish_day(day).await.unwrap();

    let s1 = f
        .engine
        .request_swap(&UserId::from("u-1"), &UserId::from("u-3"), &a1.id, "cover request")
        .await
        .unwrap();
    let s2 = f
        .engine
        .request_swap(&UserId::from("u-2"), &UserId::from("u-3"), &a2.id, "cover request")
        .await
        .unwrap();

    let engine_a = f.engine.clone();
    let engine_b = f.engine.clone();
    let (r1, r2) = tokio::join!(
        tokio::spawn(async move { engine_a.approve_swap(&s1.id).await }),
        tokio::spawn(async move { engine_b.approve_swap(&s2.id).await }),
    );
    let outcomes = [r1.unwrap(), r2.unwrap()];

    let approvals = outcomes
        .iter()
        .filter(|r| matches!(r, Ok(SwapDecision::Approved { .. })))
        .count();
    assert_eq!(approvals, 1, "exactly one approval must commit");

    // The loser saw either the commit-time conflict or the revalidation
    let loser = outcomes
        .iter()
        .find(|r| !matches!(r, Ok(SwapDecision::Approved { .. })))
        .unwrap();
    match loser {
        Err(EngineError::Conflict(_)) => {}
        Ok(SwapDecision::AutoRejected { .. }) => {}
        other => panic!("unexpected loser outcome: {other:?}"),
    }

    // u-3 holds exactly one allocation on the date
    let held: Vec<_> = f
        .engine
        .allocations_on(day)
        .into_iter()
        .filter(|a| a.user_id == UserId::from("u-3"))
        .collect();
    assert_eq!(held.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_assignments_for_the_same_user_commit_exactly_once() {
    let f = fixture();
    let day = date(2025, 11, 2);
    seed_roster(&f.engine, day).await;

    let engine_a = f.engine.clone();
    let engine_b = f.engine.clone();
    let (r1, r2) = tokio::join!(
        tokio::spawn(async move {
            engine_a
                .assign(&UserId::from("u-1"), &PostId::from("p-1"), day, false, None)
                .await
        }),
        tokio::spawn(async move {
            engine_b
                .assign(&UserId::from("u-1"), &PostId::from("p-2"), day, false, None)
                .await
        }),
    );
    let outcomes = [r1.unwrap(), r2.unwrap()];

    let successes = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one assignment must commit");

    let loser = outcomes.iter().find(|r| r.is_err()).unwrap();
    match loser {
        Err(EngineError::Conflict(_)) | Err(EngineError::Ineligible { .. }) => {}
        other => panic!("unexpected loser outcome: {other:?}"),
    }

    assert_eq!(f.engine.allocations_on(day).len(), 1);
    // The counter was credited exactly once
    assert_eq!(f.engine.user(&UserId::from("u-1")).unwrap().normal_count, 1);
}
