// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Eligibility resolution for (user, post, date) assignments
//!
//! The resolver is a pure function over a borrowed view of its inputs:
//! same inputs, same verdict. It collects every failing reason rather
//! than stopping at the first, so callers can explain a rejection in
//! full.

use crate::allocation::{Allocation, AllocationId};
use crate::post::Post;
use crate::presence::PresenceStatus;
use crate::role::{has_role, RoleGrant};
use crate::unavailability::UnavailabilityWindow;
use crate::user::User;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A reason an assignment is not legal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IneligibleReason {
    /// Post gender restriction does not admit the user
    GenderRestricted,
    /// User's cohort is not in the post's eligible set
    CohortNotPermitted,
    /// Required role missing from the effective role set at the duty instant
    MissingRole { role: String },
    /// An unavailability window of the user covers the date
    Unavailable,
    /// User already holds an allocation on the date
    AlreadyAssigned,
    /// Presence tracker reports the user currently out
    Absent,
}

impl std::fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IneligibleReason::GenderRestricted => f.write_str("gender restriction"),
            IneligibleReason::CohortNotPermitted => f.write_str("cohort mismatch"),
            IneligibleReason::MissingRole { role } => write!(f, "missing role {}", role),
            IneligibleReason::Unavailable => f.write_str("unavailable"),
            IneligibleReason::AlreadyAssigned => f.write_str("already assigned on this date"),
            IneligibleReason::Absent => f.write_str("absent"),
        }
    }
}

/// Outcome of an eligibility check; empty reasons means eligible
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Verdict {
    pub reasons: Vec<IneligibleReason>,
}

impl Verdict {
    pub fn eligible(&self) -> bool {
        self.reasons.is_empty()
    }

    /// Human-readable summary of the failing reasons, "; "-joined
    pub fn summary(&self) -> String {
        self.reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Start-of-day instant used for role-window evaluation
pub fn duty_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Borrowed view of every input the resolver consults.
///
/// `existing` is the user's allocation on `date`, if any; `exempt` names
/// an allocation being moved by a swap, which the double-booking check
/// must ignore when revalidating the substitute.
#[derive(Debug)]
pub struct EligibilityCheck<'a> {
    pub user: &'a User,
    pub post: &'a Post,
    pub date: NaiveDate,
    pub grants: &'a [RoleGrant],
    pub windows: &'a [UnavailabilityWindow],
    pub existing: Option<&'a Allocation>,
    pub exempt: Option<&'a AllocationId>,
    pub presence: PresenceStatus,
}

impl EligibilityCheck<'_> {
    /// Run every check and collect all failing reasons
    pub fn evaluate(&self) -> Verdict {
        let mut reasons = Vec::new();

        if !self.post.gender_restriction.admits(self.user.gender) {
            reasons.push(IneligibleReason::GenderRestricted);
        }

        if !self.post.admits_cohort(&self.user.cohort) {
            reasons.push(IneligibleReason::CohortNotPermitted);
        }

        if let Some(role) = &self.post.required_role {
            if !has_role(self.grants, &self.user.id, role, duty_instant(self.date)) {
                reasons.push(IneligibleReason::MissingRole { role: role.clone() });
            }
        }

        if self
            .windows
            .iter()
            .any(|w| w.user_id == self.user.id && w.contains(self.date))
        {
            reasons.push(IneligibleReason::Unavailable);
        }

        if let Some(existing) = self.existing {
            let exempted = self.exempt.is_some_and(|id| *id == existing.id);
            if !exempted {
                reasons.push(IneligibleReason::AlreadyAssigned);
            }
        }

        if self.presence == PresenceStatus::Out {
            reasons.push(IneligibleReason::Absent);
        }

        Verdict { reasons }
    }
}

#[cfg(test)]
#[path = "eligibility_tests.rs"]
mod tests;
