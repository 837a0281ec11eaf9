// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations persisted to the write-ahead log
//!
//! Every mutation of roster state is one of these ops. Mutations of
//! existing allocation and swap rows carry the version the writer read,
//! so a concurrent writer that lost the race fails the version guard
//! instead of silently clobbering the row.

use chrono::{DateTime, NaiveDate, Utc};
use rota_core::{
    Allocation, AllocationId, DebtEntry, DebtId, GrantId, Post, RoleGrant, RosterDay,
    RoutineType, SwapRequest, SwapId, UnavailabilityWindow, User, UserId,
};
use serde::{Deserialize, Serialize};

/// Operations that can be persisted to the WAL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RosterOp {
    // Registry rows
    /// Register a user
    UserCreate { user: User },
    /// Remove a user; cascades to their grants, windows, and allocations
    UserDelete { id: UserId },
    /// Add a role grant (permanent or temporary)
    RoleGrantAdd { grant: RoleGrant },
    /// Remove a role grant
    RoleGrantRemove { id: GrantId },
    /// Declare an unavailability window
    UnavailabilityAdd { window: UnavailabilityWindow },
    /// Remove an unavailability window
    UnavailabilityRemove { id: String },
    /// Register a duty post
    PostCreate { post: Post },

    // Roster calendar
    /// Create a roster day in Draft
    DayCreate { day: RosterDay },
    /// Publish a roster day (one-way)
    DayPublish { date: NaiveDate },

    // Allocation table
    /// Insert an allocation; fails the unique (user, date) index if taken
    AllocationCreate { allocation: Allocation },
    /// Remove an allocation under a version guard
    AllocationDelete {
        id: AllocationId,
        expected_version: u64,
    },
    /// Move an allocation to a new holder under a version guard
    AllocationReassign {
        id: AllocationId,
        new_user: UserId,
        expected_version: u64,
    },

    // Exchange workflow
    /// Insert a pending swap request
    SwapCreate { swap: SwapRequest },
    /// Resolve a pending swap as approved
    SwapApprove {
        id: SwapId,
        responder: UserId,
        responded_at: DateTime<Utc>,
        expected_version: u64,
    },
    /// Resolve a pending swap as rejected
    SwapReject {
        id: SwapId,
        responder: UserId,
        note: Option<String>,
        responded_at: DateTime<Utc>,
        expected_version: u64,
    },

    // Fairness ledger
    /// Credit one confirmed service to a user's routine counter; a
    /// punishment slot also pays one unit of the balance
    ServiceRecorded {
        user_id: UserId,
        routine: RoutineType,
        punishment: bool,
    },
    /// Move one confirmed service between users (swap approval)
    ServiceTransferred {
        from: UserId,
        to: UserId,
        routine: RoutineType,
    },
    /// Insert a pending debt entry
    DebtCreate { debt: DebtEntry },
    /// Mark a debt paid
    DebtSettle { id: DebtId, paid_at: DateTime<Utc> },

    // Durability markers
    /// A snapshot was taken at this point in the log
    SnapshotTaken { snapshot_id: String },
}
