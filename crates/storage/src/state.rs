// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized roster state from WAL replay
//!
//! `RosterState` is the in-memory representation of every roster table,
//! reconstructed by replaying WAL transactions from a snapshot. `apply`
//! is the only mutator and enforces the storage-level constraints:
//!
//! - unique `(user, date)` allocation index (no double booking)
//! - expected-version guards on allocation and swap mutations
//! - referential checks (allocations need an existing day, user, post;
//!   swaps need an existing allocation; debts need their parties)
//! - one-way day publishing
//! - user deletion cascades to grants, windows, and allocations

use crate::op::RosterOp;
use chrono::NaiveDate;
use rota_core::{
    Allocation, AllocationId, DebtEntry, DebtId, GrantId, Post, PostId, RoleGrant, RosterDay,
    SwapId, SwapRequest, UnavailabilityWindow, User, UserId,
};
use std::collections::BTreeMap;
use thiserror::Error;

/// Error applying an operation to state.
///
/// A constraint violation rejects the whole transaction the op belongs
/// to; the engine surfaces unique/version violations as conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("entity not found: {kind} {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("entity already exists: {kind} {id}")]
    AlreadyExists { kind: &'static str, id: String },
    #[error("user {user} already holds an allocation on {date}")]
    UniqueViolation { user: String, date: NaiveDate },
    #[error("stale version for {kind} {id}")]
    VersionMismatch { kind: &'static str, id: String },
    #[error("no roster day exists for {date}")]
    MissingDay { date: NaiveDate },
    #[error("invalid state transition: {0}")]
    InvalidTransition(String),
}

/// Full roster state materialized from the WAL
#[derive(Debug, Default, Clone)]
pub struct RosterState {
    users: BTreeMap<UserId, User>,
    grants: BTreeMap<GrantId, RoleGrant>,
    windows: BTreeMap<String, UnavailabilityWindow>,
    posts: BTreeMap<PostId, Post>,
    days: BTreeMap<NaiveDate, RosterDay>,
    allocations: BTreeMap<AllocationId, Allocation>,
    /// Unique index enforcing one allocation per user per day
    by_user_date: BTreeMap<(UserId, NaiveDate), AllocationId>,
    swaps: BTreeMap<SwapId, SwapRequest>,
    debts: BTreeMap<DebtId, DebtEntry>,
}

impl RosterState {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a state from snapshot rows, trusting their integrity
    pub(crate) fn restore(
        users: Vec<User>,
        grants: Vec<RoleGrant>,
        windows: Vec<UnavailabilityWindow>,
        posts: Vec<Post>,
        days: Vec<RosterDay>,
        allocations: Vec<Allocation>,
        swaps: Vec<SwapRequest>,
        debts: Vec<DebtEntry>,
    ) -> Self {
        let mut state = Self::new();
        state.users = users.into_iter().map(|u| (u.id.clone(), u)).collect();
        state.grants = grants.into_iter().map(|g| (g.id.clone(), g)).collect();
        state.windows = windows.into_iter().map(|w| (w.id.clone(), w)).collect();
        state.posts = posts.into_iter().map(|p| (p.id.clone(), p)).collect();
        state.days = days.into_iter().map(|d| (d.date, d)).collect();
        for allocation in allocations {
            state
                .by_user_date
                .insert((allocation.user_id.clone(), allocation.date), allocation.id.clone());
            state.allocations.insert(allocation.id.clone(), allocation);
        }
        state.swaps = swaps.into_iter().map(|s| (s.id.clone(), s)).collect();
        state.debts = debts.into_iter().map(|d| (d.id.clone(), d)).collect();
        state
    }

    /// Apply a single operation to the state
    pub fn apply(&mut self, op: &RosterOp) -> Result<(), ApplyError> {
        match op {
            RosterOp::UserCreate { user } => {
                if self.users.contains_key(&user.id) {
                    return Err(ApplyError::AlreadyExists {
                        kind: "user",
                        id: user.id.0.clone(),
                    });
                }
                self.users.insert(user.id.clone(), user.clone());
            }

            RosterOp::UserDelete { id } => {
                if self.users.remove(id).is_none() {
                    return Err(ApplyError::NotFound {
                        kind: "user",
                        id: id.0.clone(),
                    });
                }
                // Cascade: the user's grants, windows, and allocations go too
                self.grants.retain(|_, g| &g.user_id != id);
                self.windows.retain(|_, w| &w.user_id != id);
                let removed: Vec<AllocationId> = self
                    .allocations
                    .values()
                    .filter(|a| &a.user_id == id)
                    .map(|a| a.id.clone())
                    .collect();
                for alloc_id in removed {
                    if let Some(allocation) = self.allocations.remove(&alloc_id) {
                        self.by_user_date
                            .remove(&(allocation.user_id, allocation.date));
                    }
                }
            }

            RosterOp::RoleGrantAdd { grant } => {
                if self.grants.contains_key(&grant.id) {
                    return Err(ApplyError::AlreadyExists {
                        kind: "grant",
                        id: grant.id.0.clone(),
                    });
                }
                self.require_user(&grant.user_id)?;
                self.grants.insert(grant.id.clone(), grant.clone());
            }

            RosterOp::RoleGrantRemove { id } => {
                if self.grants.remove(id).is_none() {
                    return Err(ApplyError::NotFound {
                        kind: "grant",
                        id: id.0.clone(),
                    });
                }
            }

            RosterOp::UnavailabilityAdd { window } => {
                if self.windows.contains_key(&window.id) {
                    return Err(ApplyError::AlreadyExists {
                        kind: "window",
                        id: window.id.clone(),
                    });
                }
                self.require_user(&window.user_id)?;
                self.windows.insert(window.id.clone(), window.clone());
            }

            RosterOp::UnavailabilityRemove { id } => {
                if self.windows.remove(id).is_none() {
                    return Err(ApplyError::NotFound {
                        kind: "window",
                        id: id.clone(),
                    });
                }
            }

            RosterOp::PostCreate { post } => {
                if self.posts.contains_key(&post.id) {
                    return Err(ApplyError::AlreadyExists {
                        kind: "post",
                        id: post.id.0.clone(),
                    });
                }
                self.posts.insert(post.id.clone(), post.clone());
            }

            RosterOp::DayCreate { day } => {
                if self.days.contains_key(&day.date) {
                    return Err(ApplyError::AlreadyExists {
                        kind: "day",
                        id: day.date.to_string(),
                    });
                }
                self.days.insert(day.date, day.clone());
            }

            RosterOp::DayPublish { date } => {
                let day = self
                    .days
                    .get(date)
                    .ok_or(ApplyError::MissingDay { date: *date })?;
                let published = day
                    .publish()
                    .map_err(|e| ApplyError::InvalidTransition(e.to_string()))?;
                self.days.insert(*date, published);
            }

            RosterOp::AllocationCreate { allocation } => {
                if self.allocations.contains_key(&allocation.id) {
                    return Err(ApplyError::AlreadyExists {
                        kind: "allocation",
                        id: allocation.id.0.clone(),
                    });
                }
                self.require_user(&allocation.user_id)?;
                if !self.posts.contains_key(&allocation.post_id) {
                    return Err(ApplyError::NotFound {
                        kind: "post",
                        id: allocation.post_id.0.clone(),
                    });
                }
                if !self.days.contains_key(&allocation.date) {
                    return Err(ApplyError::MissingDay {
                        date: allocation.date,
                    });
                }
                let key = (allocation.user_id.clone(), allocation.date);
                if self.by_user_date.contains_key(&key) {
                    return Err(ApplyError::UniqueViolation {
                        user: allocation.user_id.0.clone(),
                        date: allocation.date,
                    });
                }
                self.by_user_date.insert(key, allocation.id.clone());
                self.allocations
                    .insert(allocation.id.clone(), allocation.clone());
            }

            RosterOp::AllocationDelete {
                id,
                expected_version,
            } => {
                let allocation = self.allocations.get(id).ok_or(ApplyError::NotFound {
                    kind: "allocation",
                    id: id.0.clone(),
                })?;
                if allocation.version != *expected_version {
                    return Err(ApplyError::VersionMismatch {
                        kind: "allocation",
                        id: id.0.clone(),
                    });
                }
                let key = (allocation.user_id.clone(), allocation.date);
                self.by_user_date.remove(&key);
                self.allocations.remove(id);
            }

            RosterOp::AllocationReassign {
                id,
                new_user,
                expected_version,
            } => {
                self.require_user(new_user)?;
                let allocation = self.allocations.get(id).ok_or(ApplyError::NotFound {
                    kind: "allocation",
                    id: id.0.clone(),
                })?;
                if allocation.version != *expected_version {
                    return Err(ApplyError::VersionMismatch {
                        kind: "allocation",
                        id: id.0.clone(),
                    });
                }
                let new_key = (new_user.clone(), allocation.date);
                if self.by_user_date.contains_key(&new_key) {
                    return Err(ApplyError::UniqueViolation {
                        user: new_user.0.clone(),
                        date: allocation.date,
                    });
                }
                let old_key = (allocation.user_id.clone(), allocation.date);
                let mut moved = allocation.clone();
                moved.user_id = new_user.clone();
                moved.version += 1;
                self.by_user_date.remove(&old_key);
                self.by_user_date.insert(new_key, id.clone());
                self.allocations.insert(id.clone(), moved);
            }

            RosterOp::SwapCreate { swap } => {
                if self.swaps.contains_key(&swap.id) {
                    return Err(ApplyError::AlreadyExists {
                        kind: "swap",
                        id: swap.id.0.clone(),
                    });
                }
                self.require_user(&swap.requester)?;
                self.require_user(&swap.substitute)?;
                if !self.allocations.contains_key(&swap.allocation_id) {
                    return Err(ApplyError::NotFound {
                        kind: "allocation",
                        id: swap.allocation_id.0.clone(),
                    });
                }
                self.swaps.insert(swap.id.clone(), swap.clone());
            }

            RosterOp::SwapApprove {
                id,
                responder,
                responded_at,
                expected_version,
            } => {
                let swap = self.pending_swap(id, *expected_version)?;
                let approved = swap
                    .approve(responder.clone(), *responded_at)
                    .map_err(|e| ApplyError::InvalidTransition(e.to_string()))?;
                self.swaps.insert(id.clone(), approved);
            }

            RosterOp::SwapReject {
                id,
                responder,
                note,
                responded_at,
                expected_version,
            } => {
                let swap = self.pending_swap(id, *expected_version)?;
                let rejected = swap
                    .reject(responder.clone(), note.clone(), *responded_at)
                    .map_err(|e| ApplyError::InvalidTransition(e.to_string()))?;
                self.swaps.insert(id.clone(), rejected);
            }

            RosterOp::ServiceRecorded {
                user_id,
                routine,
                punishment,
            } => {
                let user = self.users.get_mut(user_id).ok_or(ApplyError::NotFound {
                    kind: "user",
                    id: user_id.0.clone(),
                })?;
                rota_core::apply_assignment(user, *routine, *punishment);
            }

            RosterOp::ServiceTransferred { from, to, routine } => {
                self.require_user(from)?;
                self.require_user(to)?;
                if let Some(user) = self.users.get_mut(from) {
                    match routine {
                        rota_core::RoutineType::Normal => {
                            user.normal_count = user.normal_count.saturating_sub(1);
                        }
                        rota_core::RoutineType::Heightened => {
                            user.heightened_count = user.heightened_count.saturating_sub(1);
                        }
                    }
                }
                if let Some(user) = self.users.get_mut(to) {
                    match routine {
                        rota_core::RoutineType::Normal => user.normal_count += 1,
                        rota_core::RoutineType::Heightened => user.heightened_count += 1,
                    }
                }
            }

            RosterOp::DebtCreate { debt } => {
                if self.debts.contains_key(&debt.id) {
                    return Err(ApplyError::AlreadyExists {
                        kind: "debt",
                        id: debt.id.0.clone(),
                    });
                }
                self.require_user(&debt.debtor)?;
                self.require_user(&debt.creditor)?;
                if !self.swaps.contains_key(&debt.swap_id) {
                    return Err(ApplyError::NotFound {
                        kind: "swap",
                        id: debt.swap_id.0.clone(),
                    });
                }
                self.debts.insert(debt.id.clone(), debt.clone());
            }

            RosterOp::DebtSettle { id, paid_at } => {
                let debt = self.debts.get(id).ok_or(ApplyError::NotFound {
                    kind: "debt",
                    id: id.0.clone(),
                })?;
                let settled = debt
                    .settle(*paid_at)
                    .map_err(|e| ApplyError::InvalidTransition(e.to_string()))?;
                self.debts.insert(id.clone(), settled);
            }

            RosterOp::SnapshotTaken { .. } => {
                // Durability marker only
            }
        }

        Ok(())
    }

    fn require_user(&self, id: &UserId) -> Result<(), ApplyError> {
        if self.users.contains_key(id) {
            Ok(())
        } else {
            Err(ApplyError::NotFound {
                kind: "user",
                id: id.0.clone(),
            })
        }
    }

    fn pending_swap(
        &self,
        id: &SwapId,
        expected_version: u64,
    ) -> Result<&SwapRequest, ApplyError> {
        let swap = self.swaps.get(id).ok_or(ApplyError::NotFound {
            kind: "swap",
            id: id.0.clone(),
        })?;
        if swap.version != expected_version {
            return Err(ApplyError::VersionMismatch {
                kind: "swap",
                id: id.0.clone(),
            });
        }
        Ok(swap)
    }

    // === Queries ===

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.get(id)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn post(&self, id: &PostId) -> Option<&Post> {
        self.posts.get(id)
    }

    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.values()
    }

    pub fn role_grants(&self) -> impl Iterator<Item = &RoleGrant> {
        self.grants.values()
    }

    pub fn unavailability_windows(&self) -> impl Iterator<Item = &UnavailabilityWindow> {
        self.windows.values()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&RosterDay> {
        self.days.get(&date)
    }

    pub fn days(&self) -> impl Iterator<Item = &RosterDay> {
        self.days.values()
    }

    pub fn allocation(&self, id: &AllocationId) -> Option<&Allocation> {
        self.allocations.get(id)
    }

    pub fn allocations(&self) -> impl Iterator<Item = &Allocation> {
        self.allocations.values()
    }

    /// The user's allocation on a date, if any (unique by construction)
    pub fn allocation_for(&self, user: &UserId, date: NaiveDate) -> Option<&Allocation> {
        self.by_user_date
            .get(&(user.clone(), date))
            .and_then(|id| self.allocations.get(id))
    }

    pub fn allocations_on(&self, date: NaiveDate) -> Vec<&Allocation> {
        self.allocations.values().filter(|a| a.date == date).collect()
    }

    pub fn swap(&self, id: &SwapId) -> Option<&SwapRequest> {
        self.swaps.get(id)
    }

    pub fn swaps(&self) -> impl Iterator<Item = &SwapRequest> {
        self.swaps.values()
    }

    pub fn debt(&self, id: &DebtId) -> Option<&DebtEntry> {
        self.debts.get(id)
    }

    pub fn debts(&self) -> impl Iterator<Item = &DebtEntry> {
        self.debts.values()
    }

    /// Debts the user still owes
    pub fn outstanding_debts_for(&self, user: &UserId) -> Vec<&DebtEntry> {
        self.debts
            .values()
            .filter(|d| &d.debtor == user && d.is_outstanding())
            .collect()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
