// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL-backed roster store with crash recovery
//!
//! `RosterStore` materializes state from the latest snapshot plus the WAL
//! tail, and commits whole transactions. A commit stages every op of the
//! batch against a copy of the state first; only a fully valid batch is
//! appended to the log and installed. Constraint violations therefore
//! reject the transaction with nothing applied — the all-or-nothing
//! guarantee the engine's multi-row mutations rely on.

use crate::op::RosterOp;
use crate::reader::{WalReadError, WalReader};
use crate::snapshot::{SnapshotError, SnapshotManager, SnapshotMeta};
use crate::state::{ApplyError, RosterState};
use crate::writer::WalWriter;
use crate::StorageError;
use rota_core::config::StorageSection;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("WAL read error: {0}")]
    WalRead(#[from] WalReadError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("rejected transaction: {0}")]
    Apply(#[from] ApplyError),
}

/// Configuration for the roster store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Committed transactions between automatic snapshots
    pub snapshot_interval: u64,
    /// Old snapshots kept after cleanup
    pub keep_old_snapshots: usize,
    /// Machine ID stamped on WAL entries
    pub machine_id: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            snapshot_interval: 1000,
            keep_old_snapshots: 2,
            machine_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl From<&StorageSection> for StoreConfig {
    fn from(section: &StorageSection) -> Self {
        Self {
            snapshot_interval: section.snapshot_interval,
            keep_old_snapshots: section.keep_old_snapshots,
            ..Self::default()
        }
    }
}

/// WAL-backed storage with automatic recovery and snapshots
pub struct RosterStore {
    config: StoreConfig,
    base_dir: PathBuf,
    writer: WalWriter,
    snapshots: SnapshotManager,
    state: RosterState,
    last_snapshot_sequence: Option<u64>,
    txns_since_snapshot: u64,
}

impl RosterStore {
    /// Open or create a store at the given directory.
    ///
    /// Restores from the latest snapshot if one exists, then replays the
    /// WAL tail. Corruption stops the replay and is logged, not
    /// auto-truncated; call [`RosterStore::repair_wal`] for explicit
    /// crash recovery.
    pub fn open(base_dir: &Path, config: StoreConfig) -> Result<Self, StoreError> {
        std::fs::create_dir_all(base_dir)?;

        let wal_path = base_dir.join("wal.jsonl");
        let snapshots = SnapshotManager::new(&base_dir.join("snapshots"));

        let mut state = RosterState::new();
        let mut last_snapshot_sequence: Option<u64> = None;

        if let Ok(Some(snapshot_meta)) = snapshots.latest_snapshot() {
            if let Ok(storable) = snapshots.load_snapshot(&snapshot_meta.id) {
                state = storable.to_state();
                last_snapshot_sequence = Some(storable.sequence_at_snapshot);
            }
        }

        let reader = WalReader::open_or_empty(&wal_path)?;
        let start_sequence = last_snapshot_sequence.map(|s| s + 1).unwrap_or(0);
        for entry_result in reader.entries_from(start_sequence)? {
            match entry_result {
                Ok(entry) => {
                    for op in &entry.ops {
                        // A committed transaction was validated when it was
                        // written; an apply failure here means the log and
                        // snapshot disagree. Keep what replays cleanly.
                        if let Err(e) = state.apply(op) {
                            tracing::warn!(
                                sequence = entry.sequence,
                                error = %e,
                                "skipping op during WAL replay"
                            );
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stopping WAL replay at corruption; call repair_wal() for recovery");
                    break;
                }
            }
        }

        let writer = WalWriter::open(&wal_path, &config.machine_id)?;

        Ok(Self {
            config,
            base_dir: base_dir.to_path_buf(),
            writer,
            snapshots,
            state,
            last_snapshot_sequence,
            txns_since_snapshot: 0,
        })
    }

    /// Open a store with default configuration
    pub fn open_default(base_dir: &Path) -> Result<Self, StoreError> {
        Self::open(base_dir, StoreConfig::default())
    }

    /// Create a store in a temporary directory (for testing)
    pub fn open_temp() -> Result<Self, StoreError> {
        let temp_dir =
            std::env::temp_dir().join(format!("rota-store-test-{}", uuid::Uuid::new_v4()));
        Self::open_default(&temp_dir)
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the current sequence number (next to be assigned)
    pub fn sequence(&self) -> u64 {
        self.writer.sequence()
    }

    /// Get the materialized state for reads
    pub fn state(&self) -> &RosterState {
        &self.state
    }

    /// Commit a transaction: all ops apply, or none do.
    ///
    /// The batch is staged against a copy of the state; the first
    /// constraint violation rejects the whole transaction before
    /// anything reaches the log. Returns the WAL sequence on success.
    pub fn commit(&mut self, ops: Vec<RosterOp>) -> Result<u64, StoreError> {
        let mut staged = self.state.clone();
        for op in &ops {
            staged.apply(op)?;
        }

        let sequence = self.writer.append(ops)?;
        self.state = staged;
        self.txns_since_snapshot += 1;

        self.maybe_snapshot()?;

        Ok(sequence)
    }

    /// Create a snapshot of the current state
    pub fn create_snapshot(&mut self) -> Result<SnapshotMeta, StoreError> {
        let sequence = self.writer.last_sequence().unwrap_or(0);
        let meta = self.snapshots.create_snapshot(&self.state, sequence)?;

        self.writer.append(vec![RosterOp::SnapshotTaken {
            snapshot_id: meta.id.clone(),
        }])?;

        self.snapshots
            .cleanup_old_snapshots(sequence, self.config.keep_old_snapshots)?;

        self.last_snapshot_sequence = Some(sequence);
        self.txns_since_snapshot = 0;

        Ok(meta)
    }

    /// Create a snapshot if the configured interval has passed
    pub fn maybe_snapshot(&mut self) -> Result<Option<SnapshotMeta>, StoreError> {
        if self.txns_since_snapshot >= self.config.snapshot_interval {
            Ok(Some(self.create_snapshot()?))
        } else {
            Ok(None)
        }
    }

    /// Repair a WAL file by truncating at the first corruption point.
    ///
    /// For explicit crash recovery, not normal operation. Returns the
    /// number of bytes removed, or 0 if no corruption was found.
    pub fn repair_wal(base_dir: &Path) -> Result<u64, StoreError> {
        let wal_path = base_dir.join("wal.jsonl");

        if !wal_path.exists() {
            return Ok(0);
        }

        let reader = WalReader::open_or_empty(&wal_path)?;
        let mut iter = reader.entries()?;
        let mut had_corruption = false;

        for entry_result in iter.by_ref() {
            if entry_result.is_err() {
                had_corruption = true;
                break;
            }
        }
        let last_valid_position = iter.last_valid_position();

        if !had_corruption {
            return Ok(0);
        }

        let old_size = std::fs::metadata(&wal_path).map(|m| m.len()).unwrap_or(0);

        let file = std::fs::OpenOptions::new().write(true).open(&wal_path)?;
        file.set_len(last_valid_position)?;
        file.sync_all()?;

        tracing::info!(position = last_valid_position, "WAL truncated at corruption point");

        Ok(old_size.saturating_sub(last_valid_position))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
