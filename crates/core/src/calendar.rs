// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Roster day lifecycle
//!
//! A roster day classifies a calendar date (normal vs. heightened routine)
//! and moves one way from Draft to Published. Drafts are mutable previews;
//! once published the day's allocations are committed and visible, and the
//! exchange workflow accepts swap requests against it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Routine classification for a roster day.
///
/// Heightened days (Sundays, holidays) are tracked on a separate fairness
/// counter from normal weekdays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutineType {
    Normal,
    Heightened,
}

impl RoutineType {
    pub fn as_str(self) -> &'static str {
        match self {
            RoutineType::Normal => "normal",
            RoutineType::Heightened => "heightened",
        }
    }
}

impl std::fmt::Display for RoutineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a roster day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayStatus {
    Draft,
    Published,
}

/// A calendar day on the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterDay {
    pub date: NaiveDate,
    pub routine: RoutineType,
    pub status: DayStatus,
}

/// Attempted publish of a day that already left Draft
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("roster day {0} is already published")]
pub struct AlreadyPublished(pub NaiveDate);

impl RosterDay {
    /// Create a new day in Draft
    pub fn new(date: NaiveDate, routine: RoutineType) -> Self {
        Self {
            date,
            routine,
            status: DayStatus::Draft,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == DayStatus::Published
    }

    /// One-way Draft → Published transition.
    ///
    /// There is no transition back; corrections to a published day are a
    /// separate concern.
    pub fn publish(&self) -> Result<RosterDay, AlreadyPublished> {
        if self.is_published() {
            return Err(AlreadyPublished(self.date));
        }
        let mut day = self.clone();
        day.status = DayStatus::Published;
        Ok(day)
    }
}

#[cfg(test)]
#[path = "calendar_tests.rs"]
mod tests;
