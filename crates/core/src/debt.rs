// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Debt entries: service obligations arising from approved swaps
//!
//! A debt records that the debtor owes the creditor a service. Debts are
//! informational — they never block eligibility, only surface as
//! outstanding balances until settled.

use crate::swap::SwapId;
use crate::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a debt entry
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DebtId(pub String);

impl std::fmt::Display for DebtId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settlement status; Paid is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtStatus {
    Pending,
    Paid,
}

/// Attempted settlement of a debt that is already paid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("debt {0} is already settled")]
pub struct AlreadySettled(pub DebtId);

/// A recorded obligation between two users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtEntry {
    pub id: DebtId,
    pub debtor: UserId,
    pub creditor: UserId,
    /// Swap that created the obligation
    pub swap_id: SwapId,
    pub status: DebtStatus,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl DebtEntry {
    /// Create a Pending debt
    pub fn new(
        id: impl Into<String>,
        debtor: impl Into<UserId>,
        creditor: impl Into<UserId>,
        swap_id: impl Into<SwapId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: DebtId(id.into()),
            debtor: debtor.into(),
            creditor: creditor.into(),
            swap_id: swap_id.into(),
            status: DebtStatus::Pending,
            created_at: now,
            paid_at: None,
        }
    }

    pub fn is_outstanding(&self) -> bool {
        self.status == DebtStatus::Pending
    }

    /// Pending → Paid, stamping the payment time
    pub fn settle(&self, now: DateTime<Utc>) -> Result<DebtEntry, AlreadySettled> {
        if !self.is_outstanding() {
            return Err(AlreadySettled(self.id.clone()));
        }
        let mut debt = self.clone();
        debt.status = DebtStatus::Paid;
        debt.paid_at = Some(now);
        Ok(debt)
    }
}
