// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain events emitted by the engine at commit points

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Events observable by downstream consumers (logging, audit)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    // Calendar events
    DayCreated {
        date: NaiveDate,
        routine: String,
    },
    DayPublished {
        date: NaiveDate,
    },

    // Allocation events
    AllocationAssigned {
        id: String,
        user: String,
        post: String,
        date: NaiveDate,
    },
    AllocationReleased {
        id: String,
    },
    AllocationReassigned {
        id: String,
        from: String,
        to: String,
    },

    // Exchange events
    SwapRequested {
        id: String,
        requester: String,
        substitute: String,
    },
    SwapApproved {
        id: String,
        responder: String,
    },
    SwapRejected {
        id: String,
        responder: String,
        reason: Option<String>,
    },

    // Debt events
    DebtRecorded {
        id: String,
        debtor: String,
        creditor: String,
    },
    DebtSettled {
        id: String,
    },
}

impl Event {
    /// Event name for log keys and pattern matching.
    /// Format: "category:action"
    pub fn name(&self) -> &'static str {
        match self {
            Event::DayCreated { .. } => "day:created",
            Event::DayPublished { .. } => "day:published",
            Event::AllocationAssigned { .. } => "allocation:assigned",
            Event::AllocationReleased { .. } => "allocation:released",
            Event::AllocationReassigned { .. } => "allocation:reassigned",
            Event::SwapRequested { .. } => "swap:requested",
            Event::SwapApproved { .. } => "swap:approved",
            Event::SwapRejected { .. } => "swap:rejected",
            Event::DebtRecorded { .. } => "debt:recorded",
            Event::DebtSettled { .. } => "debt:settled",
        }
    }
}
