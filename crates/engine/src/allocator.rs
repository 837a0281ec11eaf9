// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Allocation table operations
//!
//! Single assignments validate eligibility then commit; batch day
//! generation fills every post in fairness order inside one transaction
//! and aborts entirely if any post cannot be filled. The staged copy of
//! the state lets ranking see counters updated by earlier picks in the
//! same batch.

use crate::engine::Engine;
use crate::error::EngineError;
use chrono::NaiveDate;
use rota_adapters::{IdentityAdapter, PresenceAdapter};
use rota_core::{
    Allocation, AllocationId, Clock, EligibilityCheck, Event, IdGen, Post, PostId, PresenceStatus,
    RoleGrant, RosterDay, RoutineType, UnavailabilityWindow, User, UserId,
};
use rota_storage::RosterOp;
use std::collections::HashMap;

impl<P, I, C, G> Engine<P, I, C, G>
where
    P: PresenceAdapter,
    I: IdentityAdapter,
    C: Clock,
    G: IdGen,
{
    /// §4.4 assign: validate eligibility, then commit the allocation and
    /// its ledger credit as one transaction.
    pub async fn assign(
        &self,
        user_id: &UserId,
        post_id: &PostId,
        date: NaiveDate,
        punishment: bool,
        tag: Option<String>,
    ) -> Result<Allocation, EngineError> {
        let day = self.day(date).ok_or(EngineError::NotFound {
            kind: "day",
            id: date.to_string(),
        })?;

        let verdict = self.check_eligibility(user_id, post_id, date, None).await?;
        if !verdict.eligible() {
            return Err(EngineError::Ineligible { verdict });
        }

        let allocation = Allocation::new(
            self.id_gen().next(),
            user_id.clone(),
            post_id.clone(),
            date,
            punishment,
            tag,
        );
        let ops = vec![
            RosterOp::AllocationCreate {
                allocation: allocation.clone(),
            },
            self.ledger()
                .record_assignment(user_id, day.routine, punishment),
        ];
        self.commit(ops).await?;

        let event = Event::AllocationAssigned {
            id: allocation.id.0.clone(),
            user: user_id.0.clone(),
            post: post_id.0.clone(),
            date,
        };
        tracing::info!(
            event = event.name(),
            allocation = %allocation.id,
            user = %user_id,
            post = %post_id,
            date = %date,
            punishment,
            "allocation committed"
        );
        Ok(allocation)
    }

    /// Remove an allocation. Any compensating ledger adjustment is the
    /// caller's responsibility.
    pub async fn unassign(&self, id: &AllocationId) -> Result<(), EngineError> {
        let allocation = self.allocation(id).ok_or(EngineError::NotFound {
            kind: "allocation",
            id: id.0.clone(),
        })?;

        self.commit(vec![RosterOp::AllocationDelete {
            id: id.clone(),
            expected_version: allocation.version,
        }])
        .await?;

        let event = Event::AllocationReleased { id: id.0.clone() };
        tracing::info!(event = event.name(), allocation = %id, "allocation released");
        Ok(())
    }

    /// Atomic unassign + assign to a new holder. If the new holder fails
    /// eligibility the original allocation is left untouched.
    pub async fn reassign(
        &self,
        id: &AllocationId,
        new_user: &UserId,
    ) -> Result<Allocation, EngineError> {
        let allocation = self.allocation(id).ok_or(EngineError::NotFound {
            kind: "allocation",
            id: id.0.clone(),
        })?;

        let verdict = self
            .check_eligibility(new_user, &allocation.post_id, allocation.date, Some(id))
            .await?;
        if !verdict.eligible() {
            return Err(EngineError::Ineligible { verdict });
        }

        self.commit(vec![RosterOp::AllocationReassign {
            id: id.clone(),
            new_user: new_user.clone(),
            expected_version: allocation.version,
        }])
        .await?;

        let event = Event::AllocationReassigned {
            id: id.0.clone(),
            from: allocation.user_id.0.clone(),
            to: new_user.0.clone(),
        };
        tracing::info!(event = event.name(), allocation = %id, from = %allocation.user_id, to = %new_user, "allocation reassigned");

        self.allocation(id).ok_or(EngineError::NotFound {
            kind: "allocation",
            id: id.0.clone(),
        })
    }

    /// Generate the roster for one day: create the day if needed, then
    /// fill every post with the best-ranked eligible candidate.
    ///
    /// The whole day commits as one transaction. If any post has no
    /// eligible candidate the generation aborts with `NoCandidate` and
    /// nothing is written.
    pub async fn generate_day(
        &self,
        date: NaiveDate,
        routine: RoutineType,
    ) -> Result<Vec<Allocation>, EngineError> {
        let (mut staged, posts, grants, windows) = self.read(|state| {
            let posts: Vec<Post> = state.posts().cloned().collect();
            let grants: Vec<RoleGrant> = state.role_grants().cloned().collect();
            let windows: Vec<UnavailabilityWindow> =
                state.unavailability_windows().cloned().collect();
            (state.clone(), posts, grants, windows)
        });

        let mut ops: Vec<RosterOp> = Vec::new();

        if staged.day(date).is_none() {
            let op = RosterOp::DayCreate {
                day: RosterDay::new(date, routine),
            };
            staged.apply(&op).map_err(|e| {
                EngineError::from_store(rota_storage::StoreError::Apply(e))
            })?;
            ops.push(op);
        }
        // An existing day keeps its routine classification
        let day_routine = staged.day(date).map(|d| d.routine).unwrap_or(routine);

        // Presence is stable for the day; look it up once per user
        let roster: Vec<UserId> = staged.users().map(|u| u.id.clone()).collect();
        let mut presence: HashMap<UserId, PresenceStatus> = HashMap::new();
        for user_id in &roster {
            let status = self.presence().status(user_id, date).await?;
            presence.insert(user_id.clone(), status);
        }

        let mut created = Vec::new();

        for post in &posts {
            // Counters move as the batch stages, so re-read users per post
            let candidates: Vec<User> = staged.users().cloned().collect();
            let eligible: Vec<&User> = candidates
                .iter()
                .filter(|user| {
                    EligibilityCheck {
                        user,
                        post,
                        date,
                        grants: &grants,
                        windows: &windows,
                        existing: staged.allocation_for(&user.id, date),
                        exempt: None,
                        presence: presence
                            .get(&user.id)
                            .copied()
                            .unwrap_or(PresenceStatus::Present),
                    }
                    .evaluate()
                    .eligible()
                })
                .collect();

            let ranked = self.ledger().rank(eligible, day_routine);
            let Some(chosen) = ranked.first() else {
                tracing::warn!(post = %post.id, date = %date, "no eligible candidate; aborting day generation");
                return Err(EngineError::NoCandidate(post.id.clone()));
            };

            let punishment = chosen.owes_punishment();
            let allocation = Allocation::new(
                self.id_gen().next(),
                chosen.id.clone(),
                post.id.clone(),
                date,
                punishment,
                None,
            );

            let create = RosterOp::AllocationCreate {
                allocation: allocation.clone(),
            };
            let credit = self
                .ledger()
                .record_assignment(&allocation.user_id, day_routine, punishment);
            for op in [&create, &credit] {
                staged.apply(op).map_err(|e| {
                    EngineError::from_store(rota_storage::StoreError::Apply(e))
                })?;
            }
            ops.push(create);
            ops.push(credit);
            created.push(allocation);
        }

        self.commit(ops).await?;
        tracing::info!(date = %date, routine = %day_routine, filled = created.len(), "roster day generated");
        Ok(created)
    }
}

#[cfg(test)]
#[path = "allocator_tests.rs"]
mod tests;
