// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fairness ranking and counter arithmetic
//!
//! The pure pieces the engine's fairness ledger builds on. Counter and
//! balance mutations reach storage only through the ledger.

use crate::calendar::RoutineType;
use crate::user::User;

/// Order candidates for automatic allocation.
///
/// Whoever owes punishment serves first; among equals, the user with the
/// fewest services of the day's routine type. Ties break on user id so
/// the result is reproducible.
pub fn rank_candidates(mut candidates: Vec<&User>, routine: RoutineType) -> Vec<&User> {
    candidates.sort_by(|a, b| {
        b.punishment_balance
            .cmp(&a.punishment_balance)
            .then_with(|| a.service_count(routine).cmp(&b.service_count(routine)))
            .then_with(|| a.id.cmp(&b.id))
    });
    candidates
}

/// Apply one confirmed assignment to a user's counters.
///
/// The routine counter always increments. A punishment slot additionally
/// pays one unit of the balance; the balance never drops below zero, and
/// an underflow is a bug in the caller, not user input.
pub fn apply_assignment(user: &mut User, routine: RoutineType, is_punishment: bool) {
    match routine {
        RoutineType::Normal => user.normal_count += 1,
        RoutineType::Heightened => user.heightened_count += 1,
    }
    if is_punishment {
        debug_assert!(
            user.punishment_balance > 0,
            "punishment assignment for {} with no balance owed",
            user.id
        );
        user.punishment_balance = (user.punishment_balance - 1).max(0);
    }
}

#[cfg(test)]
#[path = "fairness_tests.rs"]
mod tests;
