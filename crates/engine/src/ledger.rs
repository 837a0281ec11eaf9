// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fairness ledger
//!
//! The only component that produces counter, punishment-balance, and
//! debt mutations. Other engine modules ask the ledger for the ops to
//! include in their transactions instead of writing counters directly.
//!
//! Swap settlement policy: the routine counter moves with the physical
//! duty (requester loses one, substitute gains one). For a punishment
//! slot no debt is recorded and balances stay untouched — the requester
//! was cleared at assignment time and the duty keeps paying that
//! original punishment wherever it lands.

use rota_core::{
    rank_candidates, Allocation, Clock, DebtEntry, IdGen, RoutineType, SwapRequest, User, UserId,
};
use rota_storage::RosterOp;

/// Builds ledger mutations for confirmed assignments and swaps
#[derive(Debug, Clone)]
pub struct FairnessLedger<C, G> {
    clock: C,
    id_gen: G,
}

impl<C: Clock, G: IdGen> FairnessLedger<C, G> {
    pub fn new(clock: C, id_gen: G) -> Self {
        Self { clock, id_gen }
    }

    /// Rank eligible candidates for a slot of the given routine type
    pub fn rank<'a>(&self, candidates: Vec<&'a User>, routine: RoutineType) -> Vec<&'a User> {
        rank_candidates(candidates, routine)
    }

    /// Op crediting one confirmed assignment to the assignee
    pub fn record_assignment(
        &self,
        user_id: &UserId,
        routine: RoutineType,
        punishment: bool,
    ) -> RosterOp {
        RosterOp::ServiceRecorded {
            user_id: user_id.clone(),
            routine,
            punishment,
        }
    }

    /// Ops settling an approved swap, plus the debt entry if one is owed.
    ///
    /// Returns the transfer of the routine counter and, for
    /// non-punishment slots, a Pending debt with debtor = requester and
    /// creditor = substitute.
    pub fn swap_settlement(
        &self,
        swap: &SwapRequest,
        allocation: &Allocation,
        routine: RoutineType,
    ) -> (Vec<RosterOp>, Option<DebtEntry>) {
        let mut ops = vec![RosterOp::ServiceTransferred {
            from: swap.requester.clone(),
            to: swap.substitute.clone(),
            routine,
        }];

        if allocation.is_punishment {
            return (ops, None);
        }

        let debt = DebtEntry::new(
            self.id_gen.next(),
            swap.requester.clone(),
            swap.substitute.clone(),
            swap.id.clone(),
            self.clock.now(),
        );
        ops.push(RosterOp::DebtCreate { debt: debt.clone() });
        (ops, Some(debt))
    }

    /// Op marking a debt paid now
    pub fn settle_debt(&self, id: &rota_core::DebtId) -> RosterOp {
        RosterOp::DebtSettle {
            id: id.clone(),
            paid_at: self.clock.now(),
        }
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
