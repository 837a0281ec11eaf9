// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declared unavailability windows
//!
//! Any date inside a window makes the user ineligible for every post that
//! day. Ranges are inclusive at both ends.

use crate::user::UserId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A declared absence covering an inclusive date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailabilityWindow {
    pub id: String,
    pub user_id: UserId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub reason: Option<String>,
}

impl UnavailabilityWindow {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<UserId>,
        start: NaiveDate,
        end: NaiveDate,
        reason: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            start,
            end,
            reason,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
