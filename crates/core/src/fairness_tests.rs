use super::*;
use crate::user::{Gender, UserId};
use proptest::prelude::*;

fn make_user(id: &str, normal: u64, heightened: u64, punishment: i64) -> User {
    let mut user = User::new(id, "x", "1", 2025, "infantry", Gender::Male);
    user.normal_count = normal;
    user.heightened_count = heightened;
    user.punishment_balance = punishment;
    user
}

#[test]
fn punishment_owers_rank_first() {
    let a = make_user("u-a", 0, 0, 0);
    let b = make_user("u-b", 10, 0, 2);

    let ranked = rank_candidates(vec![&a, &b], RoutineType::Normal);
    assert_eq!(ranked[0].id, UserId::from("u-b"));
}

#[test]
fn fewest_services_rank_next() {
    let a = make_user("u-a", 5, 1, 0);
    let b = make_user("u-b", 2, 9, 0);

    let ranked = rank_candidates(vec![&a, &b], RoutineType::Normal);
    assert_eq!(ranked[0].id, UserId::from("u-b"));

    // The heightened counter drives heightened days
    let ranked = rank_candidates(vec![&a, &b], RoutineType::Heightened);
    assert_eq!(ranked[0].id, UserId::from("u-a"));
}

#[test]
fn ties_break_on_user_id() {
    let a = make_user("u-b", 3, 0, 0);
    let b = make_user("u-a", 3, 0, 0);

    let ranked = rank_candidates(vec![&a, &b], RoutineType::Normal);
    assert_eq!(ranked[0].id, UserId::from("u-a"));
}

#[test]
fn assignment_increments_the_routine_counter() {
    let mut user = make_user("u-1", 2, 1, 0);

    apply_assignment(&mut user, RoutineType::Normal, false);
    assert_eq!(user.normal_count, 3);
    assert_eq!(user.heightened_count, 1);

    apply_assignment(&mut user, RoutineType::Heightened, false);
    assert_eq!(user.heightened_count, 2);
}

#[test]
fn punishment_assignment_pays_the_balance() {
    let mut user = make_user("u-1", 0, 0, 2);

    apply_assignment(&mut user, RoutineType::Normal, true);
    assert_eq!(user.punishment_balance, 1);
    assert_eq!(user.normal_count, 1);
}

proptest! {
    #[test]
    fn counters_never_decrease_under_assignment(
        normal in 0u64..1000,
        heightened in 0u64..1000,
        punishment in 1i64..100,
        is_punishment: bool,
    ) {
        let mut user = make_user("u-1", normal, heightened, punishment);
        apply_assignment(&mut user, RoutineType::Normal, is_punishment);
        prop_assert!(user.normal_count >= normal);
        prop_assert!(user.heightened_count >= heightened);
        prop_assert!(user.punishment_balance >= 0);
        prop_assert!(user.punishment_balance <= punishment);
    }

    #[test]
    fn ranking_is_deterministic_and_total(
        counts in proptest::collection::vec((0u64..50, 0i64..5), 1..20)
    ) {
        let users: Vec<User> = counts
            .iter()
            .enumerate()
            .map(|(i, (n, p))| make_user(&format!("u-{i:02}"), *n, 0, *p))
            .collect();

        let refs: Vec<&User> = users.iter().collect();
        let first = rank_candidates(refs.clone(), RoutineType::Normal);
        let second = rank_candidates(refs, RoutineType::Normal);

        let ids = |v: &[&User]| v.iter().map(|u| u.id.clone()).collect::<Vec<_>>();
        prop_assert_eq!(ids(&first), ids(&second));
        prop_assert_eq!(first.len(), users.len());
    }
}
