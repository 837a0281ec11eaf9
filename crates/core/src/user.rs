// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Roster personnel
//!
//! A user carries the accumulated fairness counters the ledger ranks on:
//! one counter per routine type plus the punishment balance. The counters
//! are mutated only by the fairness ledger.

use crate::calendar::RoutineType;
use serde::{Deserialize, Serialize};

/// Unique identifier for a user
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        UserId(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

/// Gender recorded for a user, matched against post restrictions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// A roster member with accumulated workload counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Cohort grouping used for post eligibility
    pub cohort: String,
    pub year: i32,
    pub course: String,
    pub gender: Gender,
    /// Confirmed normal-routine services
    pub normal_count: u64,
    /// Confirmed heightened-routine services (Sundays, holidays)
    pub heightened_count: u64,
    /// Disciplinary duty shifts still owed; positive means service is due
    pub punishment_balance: i64,
}

impl User {
    /// Create a user with zeroed counters
    pub fn new(
        id: impl Into<UserId>,
        name: impl Into<String>,
        cohort: impl Into<String>,
        year: i32,
        course: impl Into<String>,
        gender: Gender,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cohort: cohort.into(),
            year,
            course: course.into(),
            gender,
            normal_count: 0,
            heightened_count: 0,
            punishment_balance: 0,
        }
    }

    /// Counter for the given routine type
    pub fn service_count(&self, routine: RoutineType) -> u64 {
        match routine {
            RoutineType::Normal => self.normal_count,
            RoutineType::Heightened => self.heightened_count,
        }
    }

    pub fn owes_punishment(&self) -> bool {
        self.punishment_balance > 0
    }
}

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;
