// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rota-storage: Durable roster state
//!
//! A write-ahead log of checksummed transaction batches feeds a
//! materialized `RosterState`. The state enforces the storage-level
//! constraints the engine relies on as its last line of defense: the
//! one-allocation-per-user-per-day unique index, expected-version guards
//! on mutated rows, and referential checks. `RosterStore::commit` stages
//! a whole batch against a copy of the state, so either every op in a
//! transaction applies or none do.

pub mod entry;
pub mod op;
pub mod reader;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod writer;

use thiserror::Error;

/// Low-level serialization and IO errors shared by WAL components
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub use entry::WalEntry;
pub use op::RosterOp;
pub use reader::{WalReadError, WalReader};
pub use snapshot::{SnapshotError, SnapshotManager, SnapshotMeta, StorableState};
pub use state::{ApplyError, RosterState};
pub use store::{RosterStore, StoreConfig, StoreError};
pub use writer::WalWriter;
