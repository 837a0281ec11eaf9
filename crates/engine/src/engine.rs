// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine façade wiring storage, adapters, clock, and id generation
//!
//! The store sits behind a mutex: commits are serialized, and a commit
//! stages its whole transaction under that lock. Concurrent writers that
//! lose a race surface `Conflict` instead of corrupting state.

use crate::error::EngineError;
use crate::ledger::FairnessLedger;
use crate::retry::{is_transient, RetryPolicy};
use chrono::{DateTime, NaiveDate, Utc};
use rota_adapters::{IdentityAdapter, PresenceAdapter};
use rota_core::{
    Allocation, AllocationId, Clock, DebtEntry, DebtId, EligibilityCheck, EngineConfig, Event,
    GrantId, IdGen, Post, PostId, RoleGrant, RosterDay, RoutineType, SwapRequest, SwapId,
    UnavailabilityWindow, User, UserId, Verdict,
};
use rota_storage::{RosterOp, RosterState, RosterStore};
use std::sync::{Arc, Mutex};

/// The allocation and exchange engine
#[derive(Clone)]
pub struct Engine<P, I, C, G> {
    store: Arc<Mutex<RosterStore>>,
    presence: P,
    identity: I,
    clock: C,
    id_gen: G,
    ledger: FairnessLedger<C, G>,
    retry: RetryPolicy,
}

impl<P, I, C, G> Engine<P, I, C, G>
where
    P: PresenceAdapter,
    I: IdentityAdapter,
    C: Clock,
    G: IdGen,
{
    /// Create an engine over an opened store
    pub fn new(
        store: RosterStore,
        presence: P,
        identity: I,
        clock: C,
        id_gen: G,
        config: &EngineConfig,
    ) -> Self {
        let ledger = FairnessLedger::new(clock.clone(), id_gen.clone());
        Self {
            store: Arc::new(Mutex::new(store)),
            presence,
            identity,
            clock,
            id_gen,
            ledger,
            retry: RetryPolicy::from_section(&config.retry),
        }
    }

    pub fn ledger(&self) -> &FairnessLedger<C, G> {
        &self.ledger
    }

    pub(crate) fn presence(&self) -> &P {
        &self.presence
    }

    pub(crate) fn clock(&self) -> &C {
        &self.clock
    }

    pub(crate) fn id_gen(&self) -> &G {
        &self.id_gen
    }

    pub(crate) async fn operator(&self) -> Result<UserId, EngineError> {
        Ok(self.identity.current_operator().await?)
    }

    /// Run a read against the materialized state
    pub fn read<T>(&self, f: impl FnOnce(&RosterState) -> T) -> T {
        let store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        f(store.state())
    }

    /// Commit one transaction, retrying transient storage failures
    pub(crate) async fn commit(&self, ops: Vec<RosterOp>) -> Result<u64, EngineError> {
        let store = Arc::clone(&self.store);
        self.retry
            .retry_async(
                || {
                    let mut store = store.lock().unwrap_or_else(|e| e.into_inner());
                    store.commit(ops.clone())
                },
                is_transient,
            )
            .await
            .map_err(EngineError::from_store)
    }

    /// §4.1 contract: is this assignment legal right now?
    ///
    /// Read-only and side-effect-free. `exempt` names an allocation being
    /// moved by a swap, ignored by the double-booking check.
    pub async fn check_eligibility(
        &self,
        user_id: &UserId,
        post_id: &PostId,
        date: NaiveDate,
        exempt: Option<&AllocationId>,
    ) -> Result<Verdict, EngineError> {
        let (user, post, grants, windows, existing) = self.read(|state| {
            let user = state.user(user_id).cloned();
            let post = state.post(post_id).cloned();
            let grants: Vec<RoleGrant> = state.role_grants().cloned().collect();
            let windows: Vec<UnavailabilityWindow> =
                state.unavailability_windows().cloned().collect();
            let existing = state.allocation_for(user_id, date).cloned();
            (user, post, grants, windows, existing)
        });
        let user = user.ok_or(EngineError::NotFound {
            kind: "user",
            id: user_id.0.clone(),
        })?;
        let post = post.ok_or(EngineError::NotFound {
            kind: "post",
            id: post_id.0.clone(),
        })?;

        let presence = self.presence.status(user_id, date).await?;

        Ok(EligibilityCheck {
            user: &user,
            post: &post,
            date,
            grants: &grants,
            windows: &windows,
            existing: existing.as_ref(),
            exempt,
            presence,
        }
        .evaluate())
    }

    // === Registry surface ===
    //
    // User and post CRUD live outside the engine; these thin wrappers
    // land their rows in the store so the resolver can see them.

    pub async fn add_user(&self, user: User) -> Result<(), EngineError> {
        self.commit(vec![RosterOp::UserCreate { user }]).await?;
        Ok(())
    }

    /// Destructive: cascades to the user's grants, windows, and
    /// allocations. Roster history for the user disappears.
    pub async fn remove_user(&self, id: &UserId) -> Result<(), EngineError> {
        self.commit(vec![RosterOp::UserDelete { id: id.clone() }])
            .await?;
        tracing::info!(user = %id, "user removed with cascading rows");
        Ok(())
    }

    pub async fn add_post(&self, post: Post) -> Result<(), EngineError> {
        self.commit(vec![RosterOp::PostCreate { post }]).await?;
        Ok(())
    }

    pub async fn grant_permanent_role(
        &self,
        user_id: &UserId,
        role: &str,
    ) -> Result<RoleGrant, EngineError> {
        let grant = RoleGrant::permanent(self.id_gen.next(), user_id.clone(), role);
        self.commit(vec![RosterOp::RoleGrantAdd {
            grant: grant.clone(),
        }])
        .await?;
        Ok(grant)
    }

    pub async fn grant_temporary_role(
        &self,
        user_id: &UserId,
        role: &str,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<RoleGrant, EngineError> {
        let grant = RoleGrant::temporary(self.id_gen.next(), user_id.clone(), role, from, until);
        self.commit(vec![RosterOp::RoleGrantAdd {
            grant: grant.clone(),
        }])
        .await?;
        Ok(grant)
    }

    pub async fn revoke_role(&self, id: &GrantId) -> Result<(), EngineError> {
        self.commit(vec![RosterOp::RoleGrantRemove { id: id.clone() }])
            .await?;
        Ok(())
    }

    pub async fn add_unavailability(
        &self,
        user_id: &UserId,
        start: NaiveDate,
        end: NaiveDate,
        reason: Option<String>,
    ) -> Result<UnavailabilityWindow, EngineError> {
        let window =
            UnavailabilityWindow::new(self.id_gen.next(), user_id.clone(), start, end, reason);
        self.commit(vec![RosterOp::UnavailabilityAdd {
            window: window.clone(),
        }])
        .await?;
        Ok(window)
    }

    // === Roster calendar ===

    /// Create a roster day in Draft
    pub async fn create_day(
        &self,
        date: NaiveDate,
        routine: RoutineType,
    ) -> Result<RosterDay, EngineError> {
        let day = RosterDay::new(date, routine);
        self.commit(vec![RosterOp::DayCreate { day: day.clone() }])
            .await?;
        let event = Event::DayCreated {
            date,
            routine: routine.as_str().to_string(),
        };
        tracing::info!(event = event.name(), date = %date, routine = %routine, "roster day created");
        Ok(day)
    }

    /// One-way publish; a published day is `InvalidState`
    pub async fn publish_day(&self, date: NaiveDate) -> Result<RosterDay, EngineError> {
        self.commit(vec![RosterOp::DayPublish { date }]).await?;
        let day = self
            .read(|state| state.day(date).cloned())
            .ok_or(EngineError::NotFound {
                kind: "day",
                id: date.to_string(),
            })?;
        let event = Event::DayPublished { date };
        tracing::info!(event = event.name(), date = %date, "roster day published");
        Ok(day)
    }

    /// Publish every remaining draft day in the inclusive range.
    ///
    /// Already-published days in the range are skipped, so overlapping
    /// admin ranges are not an error. Returns the dates published.
    pub async fn publish_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, EngineError> {
        let drafts: Vec<NaiveDate> = self.read(|state| {
            state
                .days()
                .filter(|d| d.date >= start && d.date <= end && !d.is_published())
                .map(|d| d.date)
                .collect()
        });

        if drafts.is_empty() {
            return Ok(drafts);
        }

        let ops = drafts
            .iter()
            .map(|date| RosterOp::DayPublish { date: *date })
            .collect();
        self.commit(ops).await?;
        tracing::info!(from = %start, to = %end, count = drafts.len(), "roster days published");
        Ok(drafts)
    }

    // === Debt surface ===

    /// Mark a debt paid; settling a paid debt is `InvalidState`
    pub async fn settle_debt(&self, id: &DebtId) -> Result<DebtEntry, EngineError> {
        self.commit(vec![self.ledger.settle_debt(id)]).await?;
        let debt = self
            .read(|state| state.debt(id).cloned())
            .ok_or(EngineError::NotFound {
                kind: "debt",
                id: id.0.clone(),
            })?;
        let event = Event::DebtSettled { id: id.0.clone() };
        tracing::info!(event = event.name(), debt = %id, "debt settled");
        Ok(debt)
    }

    /// Debts the user still owes
    pub fn outstanding_debts(&self, user: &UserId) -> Vec<DebtEntry> {
        self.read(|state| {
            state
                .outstanding_debts_for(user)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    // === Row reads ===

    pub fn user(&self, id: &UserId) -> Option<User> {
        self.read(|state| state.user(id).cloned())
    }

    pub fn post(&self, id: &PostId) -> Option<Post> {
        self.read(|state| state.post(id).cloned())
    }

    pub fn day(&self, date: NaiveDate) -> Option<RosterDay> {
        self.read(|state| state.day(date).cloned())
    }

    pub fn allocation(&self, id: &AllocationId) -> Option<Allocation> {
        self.read(|state| state.allocation(id).cloned())
    }

    pub fn allocations_on(&self, date: NaiveDate) -> Vec<Allocation> {
        self.read(|state| state.allocations_on(date).into_iter().cloned().collect())
    }

    pub fn swap(&self, id: &SwapId) -> Option<SwapRequest> {
        self.read(|state| state.swap(id).cloned())
    }

    pub fn debt(&self, id: &DebtId) -> Option<DebtEntry> {
        self.read(|state| state.debt(id).cloned())
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
