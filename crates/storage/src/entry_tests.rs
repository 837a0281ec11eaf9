use super::*;
use rota_core::{RosterDay, RoutineType, User, UserId};

fn sample_ops() -> Vec<RosterOp> {
    vec![
        RosterOp::DayCreate {
            day: RosterDay::new(
                chrono::NaiveDate::from_ymd_opt(2025, 10, 22).unwrap(),
                RoutineType::Normal,
            ),
        },
        RosterOp::UserDelete {
            id: UserId::from("u-1"),
        },
    ]
}

#[test]
fn entry_round_trips_through_a_line() {
    let entry = WalEntry::new(7, "m-1", sample_ops());
    let line = entry.to_line().unwrap();
    let parsed = WalEntry::from_line(&line).unwrap();

    assert_eq!(parsed.sequence, 7);
    assert_eq!(parsed.machine_id, "m-1");
    assert_eq!(parsed.ops, entry.ops);
    assert!(parsed.verify());
}

#[test]
fn checksum_detects_tampered_ops() {
    let mut entry = WalEntry::new(0, "m-1", sample_ops());
    assert!(entry.verify());

    entry.ops.push(RosterOp::UserCreate {
        user: User::new("u-2", "x", "1", 2025, "infantry", rota_core::Gender::Male),
    });
    assert!(!entry.verify());
}

#[test]
fn empty_batch_is_valid() {
    let entry = WalEntry::new(0, "m-1", Vec::new());
    assert!(entry.verify());
}
