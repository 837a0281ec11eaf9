// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exchange workflow
//!
//! Swap requests move Pending → Approved/Rejected exactly once. Approval
//! re-validates the substitute — eligibility may have changed since the
//! request was filed — and commits reassignment, ledger settlement, and
//! the status change as one transaction. A failed revalidation rejects
//! the swap automatically with the resolver's reasons attached.

use crate::engine::Engine;
use crate::error::EngineError;
use rota_adapters::{IdentityAdapter, PresenceAdapter};
use rota_core::{
    Allocation, AllocationId, Clock, DebtEntry, Event, IdGen, IneligibleReason, SwapId,
    SwapRequest, UserId, Verdict,
};
use rota_storage::RosterOp;

/// Outcome of an approval attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapDecision {
    /// The allocation moved to the substitute; `debt` is the obligation
    /// recorded, if any
    Approved {
        allocation: Allocation,
        debt: Option<DebtEntry>,
    },
    /// Final validation failed; the swap was committed as Rejected with
    /// the resolver's reasons
    AutoRejected { verdict: Verdict },
}

impl<P, I, C, G> Engine<P, I, C, G>
where
    P: PresenceAdapter,
    I: IdentityAdapter,
    C: Clock,
    G: IdGen,
{
    /// File a swap request against a published day.
    ///
    /// The requester must own the target allocation; the substitute must
    /// be a different user with no allocation on that date.
    pub async fn request_swap(
        &self,
        requester: &UserId,
        substitute: &UserId,
        allocation_id: &AllocationId,
        reason: impl Into<String>,
    ) -> Result<SwapRequest, EngineError> {
        if requester == substitute {
            return Err(EngineError::SelfSwap);
        }

        let (allocation, day, substitute_known, substitute_busy) = self.read(|state| {
            let allocation = state.allocation(allocation_id).cloned();
            let day = allocation
                .as_ref()
                .and_then(|a| state.day(a.date))
                .cloned();
            let substitute_known = state.user(substitute).is_some();
            let substitute_busy = allocation
                .as_ref()
                .is_some_and(|a| state.allocation_for(substitute, a.date).is_some());
            (allocation, day, substitute_known, substitute_busy)
        });

        let allocation = allocation.ok_or(EngineError::NotFound {
            kind: "allocation",
            id: allocation_id.0.clone(),
        })?;
        if allocation.user_id != *requester {
            return Err(EngineError::NotOwner(allocation_id.clone()));
        }
        if !substitute_known {
            return Err(EngineError::NotFound {
                kind: "user",
                id: substitute.0.clone(),
            });
        }
        let day = day.ok_or(EngineError::NotFound {
            kind: "day",
            id: allocation.date.to_string(),
        })?;
        if !day.is_published() {
            return Err(EngineError::InvalidState(format!(
                "roster day {} is not published",
                day.date
            )));
        }
        if substitute_busy {
            return Err(EngineError::Ineligible {
                verdict: Verdict {
                    reasons: vec![IneligibleReason::AlreadyAssigned],
                },
            });
        }

        let swap = SwapRequest::new(
            self.id_gen().next(),
            requester.clone(),
            substitute.clone(),
            allocation_id.clone(),
            reason,
            self.clock().now(),
        );
        self.commit(vec![RosterOp::SwapCreate { swap: swap.clone() }])
            .await?;

        let event = Event::SwapRequested {
            id: swap.id.0.clone(),
            requester: requester.0.clone(),
            substitute: substitute.0.clone(),
        };
        tracing::info!(event = event.name(), swap = %swap.id, requester = %requester, substitute = %substitute, "swap requested");
        Ok(swap)
    }

    /// Approve a pending swap.
    ///
    /// The approval attempt is the trigger for final validation: if the
    /// substitute is no longer eligible the swap is committed as
    /// Rejected and the verdict is returned. On success the
    /// reassignment, the ledger settlement, and the Approved status
    /// commit as one transaction; a concurrent approver racing for the
    /// same rows receives `Conflict`.
    pub async fn approve_swap(&self, swap_id: &SwapId) -> Result<SwapDecision, EngineError> {
        let responder = self.operator().await?;

        let (swap, allocation, day) = self.read(|state| {
            let swap = state.swap(swap_id).cloned();
            let allocation = swap
                .as_ref()
                .and_then(|s| state.allocation(&s.allocation_id))
                .cloned();
            let day = allocation.as_ref().and_then(|a| state.day(a.date)).cloned();
            (swap, allocation, day)
        });

        let swap = swap.ok_or(EngineError::NotFound {
            kind: "swap",
            id: swap_id.0.clone(),
        })?;
        if !swap.is_pending() {
            return Err(EngineError::InvalidState(format!(
                "swap {} is already {}",
                swap.id,
                swap.status.as_str()
            )));
        }
        let allocation = allocation.ok_or(EngineError::NotFound {
            kind: "allocation",
            id: swap.allocation_id.0.clone(),
        })?;
        let day = day.ok_or(EngineError::NotFound {
            kind: "day",
            id: allocation.date.to_string(),
        })?;

        let verdict = self
            .check_eligibility(
                &swap.substitute,
                &allocation.post_id,
                allocation.date,
                Some(&allocation.id),
            )
            .await?;

        if !verdict.eligible() {
            self.commit(vec![RosterOp::SwapReject {
                id: swap.id.clone(),
                responder: responder.clone(),
                note: Some(verdict.summary()),
                responded_at: self.clock().now(),
                expected_version: swap.version,
            }])
            .await?;

            let event = Event::SwapRejected {
                id: swap.id.0.clone(),
                responder: responder.0.clone(),
                reason: Some(verdict.summary()),
            };
            tracing::warn!(event = event.name(), swap = %swap.id, reasons = %verdict.summary(), "approval failed final validation");
            return Ok(SwapDecision::AutoRejected { verdict });
        }

        let (settlement, debt) = self
            .ledger()
            .swap_settlement(&swap, &allocation, day.routine);

        let mut ops = vec![RosterOp::AllocationReassign {
            id: allocation.id.clone(),
            new_user: swap.substitute.clone(),
            expected_version: allocation.version,
        }];
        ops.extend(settlement);
        ops.push(RosterOp::SwapApprove {
            id: swap.id.clone(),
            responder: responder.clone(),
            responded_at: self.clock().now(),
            expected_version: swap.version,
        });
        self.commit(ops).await?;

        let event = Event::SwapApproved {
            id: swap.id.0.clone(),
            responder: responder.0.clone(),
        };
        tracing::info!(event = event.name(), swap = %swap.id, substitute = %swap.substitute, "swap approved");

        let allocation = self
            .allocation(&allocation.id)
            .ok_or(EngineError::NotFound {
                kind: "allocation",
                id: allocation.id.0.clone(),
            })?;
        Ok(SwapDecision::Approved { allocation, debt })
    }

    /// Reject a pending swap; no allocation or ledger mutation.
    pub async fn reject_swap(
        &self,
        swap_id: &SwapId,
        note: Option<String>,
    ) -> Result<SwapRequest, EngineError> {
        let responder = self.operator().await?;

        let swap = self
            .read(|state| state.swap(swap_id).cloned())
            .ok_or(EngineError::NotFound {
                kind: "swap",
                id: swap_id.0.clone(),
            })?;
        if !swap.is_pending() {
            return Err(EngineError::InvalidState(format!(
                "swap {} is already {}",
                swap.id,
                swap.status.as_str()
            )));
        }

        self.commit(vec![RosterOp::SwapReject {
            id: swap.id.clone(),
            responder: responder.clone(),
            note: note.clone(),
            responded_at: self.clock().now(),
            expected_version: swap.version,
        }])
        .await?;

        let event = Event::SwapRejected {
            id: swap.id.0.clone(),
            responder: responder.0.clone(),
            reason: note,
        };
        tracing::info!(event = event.name(), swap = %swap.id, "swap rejected");

        self.swap(swap_id).ok_or(EngineError::NotFound {
            kind: "swap",
            id: swap_id.0.clone(),
        })
    }
}

#[cfg(test)]
#[path = "exchange_tests.rs"]
mod tests;
