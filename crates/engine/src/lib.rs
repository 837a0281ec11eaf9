// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rota-engine: The allocation and exchange engine
//!
//! Drives the duty roster against the storage layer:
//! - Allocation table: assign, unassign, reassign, batch day generation
//! - Roster calendar: day creation and one-way publishing
//! - Exchange workflow: swap request / approve / reject with final
//!   revalidation under the commit guard
//! - Fairness ledger: the sole writer of counters, balances, and debts
//!
//! Every public operation returns either a committed result or a typed
//! [`EngineError`]; multi-row mutations commit as one transaction.

pub mod allocator;
pub mod engine;
pub mod error;
pub mod exchange;
pub mod ledger;
pub mod retry;

pub use engine::Engine;
pub use error::EngineError;
pub use exchange::SwapDecision;
pub use ledger::FairnessLedger;
pub use retry::{is_transient, RetryPolicy};
