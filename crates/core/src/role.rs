// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Role grants and the effective role set
//!
//! A grant is either permanent or bounded by a validity window. The
//! effective role set for an instant is computed lazily at check time —
//! there is no denormalized aggregate to keep in sync. Role names compare
//! case-insensitively.

use crate::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Unique identifier for a role grant
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GrantId(pub String);

impl std::fmt::Display for GrantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validity window for a temporary grant, inclusive at both ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantWindow {
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl GrantWindow {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from <= at && at <= self.until
    }
}

/// A role held by a user, permanently or for a bounded window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    pub id: GrantId,
    pub user_id: UserId,
    pub role: String,
    /// Absent for permanent grants
    pub window: Option<GrantWindow>,
}

impl RoleGrant {
    pub fn permanent(
        id: impl Into<String>,
        user_id: impl Into<UserId>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: GrantId(id.into()),
            user_id: user_id.into(),
            role: role.into(),
            window: None,
        }
    }

    pub fn temporary(
        id: impl Into<String>,
        user_id: impl Into<UserId>,
        role: impl Into<String>,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Self {
        Self {
            id: GrantId(id.into()),
            user_id: user_id.into(),
            role: role.into(),
            window: Some(GrantWindow { from, until }),
        }
    }

    /// Whether the grant is active at the given instant
    pub fn active_at(&self, at: DateTime<Utc>) -> bool {
        self.window.as_ref().is_none_or(|w| w.contains(at))
    }

    /// Case-insensitive role name match
    pub fn grants(&self, role: &str) -> bool {
        self.role.eq_ignore_ascii_case(role)
    }
}

/// The effective role set of a user at an instant: permanent grants plus
/// temporary grants whose window contains the instant. Names are lowercased.
pub fn effective_roles(
    grants: &[RoleGrant],
    user: &UserId,
    at: DateTime<Utc>,
) -> BTreeSet<String> {
    grants
        .iter()
        .filter(|g| &g.user_id == user && g.active_at(at))
        .map(|g| g.role.to_ascii_lowercase())
        .collect()
}

/// Whether the user holds `role` at the given instant
pub fn has_role(grants: &[RoleGrant], user: &UserId, role: &str, at: DateTime<Utc>) -> bool {
    grants
        .iter()
        .any(|g| &g.user_id == user && g.active_at(at) && g.grants(role))
}

#[cfg(test)]
#[path = "role_tests.rs"]
mod tests;
