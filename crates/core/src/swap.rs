// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Swap request state machine
//!
//! A swap request asks a substitute to take over the requester's
//! allocation. The machine starts Pending and resolves exactly once:
//! Approved or Rejected are terminal, and resolving a terminal request is
//! a typed error so duplicate approvals can never repeat ledger effects.

use crate::allocation::AllocationId;
use crate::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a swap request
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SwapId(pub String);

impl std::fmt::Display for SwapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SwapId {
    fn from(s: &str) -> Self {
        SwapId(s.to_string())
    }
}

/// Lifecycle status; Approved and Rejected are terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapStatus {
    Pending,
    Approved,
    Rejected,
}

impl SwapStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SwapStatus::Pending => "pending",
            SwapStatus::Approved => "approved",
            SwapStatus::Rejected => "rejected",
        }
    }
}

/// Attempted resolution of a swap that already left Pending
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("swap {id} is already {status}")]
pub struct AlreadyResolved {
    pub id: SwapId,
    pub status: &'static str,
}

/// A peer-to-peer shift exchange request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub id: SwapId,
    pub requester: UserId,
    pub substitute: UserId,
    pub allocation_id: AllocationId,
    pub status: SwapStatus,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
    /// Operator who resolved the request, from the identity provider
    pub responder: Option<UserId>,
    /// Resolver reasons or free-text note attached at resolution
    pub response_note: Option<String>,
    /// Optimistic concurrency guard, bumped on resolution
    pub version: u64,
}

impl SwapRequest {
    /// Create a new request in Pending
    pub fn new(
        id: impl Into<String>,
        requester: impl Into<UserId>,
        substitute: impl Into<UserId>,
        allocation_id: impl Into<AllocationId>,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SwapId(id.into()),
            requester: requester.into(),
            substitute: substitute.into(),
            allocation_id: allocation_id.into(),
            status: SwapStatus::Pending,
            reason: reason.into(),
            created_at: now,
            responded_at: None,
            responder: None,
            response_note: None,
            version: 0,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == SwapStatus::Pending
    }

    fn guard_pending(&self) -> Result<(), AlreadyResolved> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(AlreadyResolved {
                id: self.id.clone(),
                status: self.status.as_str(),
            })
        }
    }

    /// Pending → Approved, stamping the responder and resolution time
    pub fn approve(
        &self,
        responder: UserId,
        now: DateTime<Utc>,
    ) -> Result<SwapRequest, AlreadyResolved> {
        self.guard_pending()?;
        let mut swap = self.clone();
        swap.status = SwapStatus::Approved;
        swap.responder = Some(responder);
        swap.responded_at = Some(now);
        swap.version += 1;
        Ok(swap)
    }

    /// Pending → Rejected, stamping the responder, resolution time, and
    /// an optional note (resolver reasons for automatic rejections)
    pub fn reject(
        &self,
        responder: UserId,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<SwapRequest, AlreadyResolved> {
        self.guard_pending()?;
        let mut swap = self.clone();
        swap.status = SwapStatus::Rejected;
        swap.responder = Some(responder);
        swap.responded_at = Some(now);
        swap.response_note = note;
        swap.version += 1;
        Ok(swap)
    }
}

impl From<String> for SwapId {
    fn from(s: String) -> Self {
        SwapId(s)
    }
}

#[cfg(test)]
#[path = "swap_tests.rs"]
mod tests;
