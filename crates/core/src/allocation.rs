// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Allocations: confirmed (user, post, date) assignments
//!
//! At most one allocation exists per (user, date); the storage layer
//! enforces that as a unique index. The version field is the optimistic
//! guard concurrent swap approvals race on.

use crate::post::PostId;
use crate::user::UserId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique identifier for an allocation
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AllocationId(pub String);

impl std::fmt::Display for AllocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AllocationId {
    fn from(s: &str) -> Self {
        AllocationId(s.to_string())
    }
}

/// A confirmed assignment of a user to a post on a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: AllocationId,
    pub user_id: UserId,
    pub post_id: PostId,
    pub date: NaiveDate,
    /// Slot credited against the holder's punishment balance
    pub is_punishment: bool,
    pub tag: Option<String>,
    /// Optimistic concurrency guard, bumped on every mutation
    pub version: u64,
}

impl Allocation {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<UserId>,
        post_id: impl Into<PostId>,
        date: NaiveDate,
        is_punishment: bool,
        tag: Option<String>,
    ) -> Self {
        Self {
            id: AllocationId(id.into()),
            user_id: user_id.into(),
            post_id: post_id.into(),
            date,
            is_punishment,
            tag,
            version: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_allocation_starts_at_version_zero() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 22).unwrap();
        let alloc = Allocation::new("a-1", "u-1", "p-1", date, false, None);
        assert_eq!(alloc.version, 0);
        assert!(alloc.tag.is_none());
        assert!(!alloc.is_punishment);
    }
}
