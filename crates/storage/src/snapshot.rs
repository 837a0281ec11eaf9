// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot management for fast recovery
//!
//! Snapshots capture the full roster state at a WAL sequence, so opening
//! a store replays only the log tail. Every domain row serializes
//! directly; the snapshot is a flat listing of tables plus a format
//! version.

use crate::state::RosterState;
use chrono::{DateTime, Utc};
use rota_core::{
    Allocation, DebtEntry, Post, RoleGrant, RosterDay, SwapRequest, UnavailabilityWindow, User,
};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during snapshot operations
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot not found: {0}")]
    NotFound(String),
    #[error("invalid snapshot format: {0}")]
    InvalidFormat(String),
}

/// Serializable capture of the full roster state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorableState {
    pub version: u32,
    pub sequence_at_snapshot: u64,
    pub timestamp: DateTime<Utc>,
    pub users: Vec<User>,
    pub grants: Vec<RoleGrant>,
    pub windows: Vec<UnavailabilityWindow>,
    pub posts: Vec<Post>,
    pub days: Vec<RosterDay>,
    pub allocations: Vec<Allocation>,
    pub swaps: Vec<SwapRequest>,
    pub debts: Vec<DebtEntry>,
}

impl StorableState {
    /// Current version of the snapshot format
    pub const CURRENT_VERSION: u32 = 1;

    /// Capture a materialized state at a sequence number
    pub fn from_state(state: &RosterState, sequence: u64) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            sequence_at_snapshot: sequence,
            timestamp: Utc::now(),
            users: state.users().cloned().collect(),
            grants: state.role_grants().cloned().collect(),
            windows: state.unavailability_windows().cloned().collect(),
            posts: state.posts().cloned().collect(),
            days: state.days().cloned().collect(),
            allocations: state.allocations().cloned().collect(),
            swaps: state.swaps().cloned().collect(),
            debts: state.debts().cloned().collect(),
        }
    }

    /// Rebuild the materialized state (including the unique index)
    pub fn to_state(&self) -> RosterState {
        RosterState::restore(
            self.users.clone(),
            self.grants.clone(),
            self.windows.clone(),
            self.posts.clone(),
            self.days.clone(),
            self.allocations.clone(),
            self.swaps.clone(),
            self.debts.clone(),
        )
    }
}

/// Snapshot metadata (stored in the file name plus fs metadata)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub id: String,
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Manages snapshot creation, discovery, and cleanup
pub struct SnapshotManager {
    snapshots_dir: PathBuf,
}

impl SnapshotManager {
    /// Create a new snapshot manager for the given directory
    pub fn new(snapshots_dir: &Path) -> Self {
        Self {
            snapshots_dir: snapshots_dir.to_path_buf(),
        }
    }

    /// Ensure the snapshots directory exists
    pub fn ensure_dir(&self) -> Result<(), SnapshotError> {
        fs::create_dir_all(&self.snapshots_dir)?;
        Ok(())
    }

    /// Generate a snapshot ID from sequence number and timestamp
    pub fn generate_id(sequence: u64, timestamp: DateTime<Utc>) -> String {
        format!("{:08}-{}", sequence, timestamp.format("%Y%m%d%H%M%S"))
    }

    /// Create a snapshot from the current state
    pub fn create_snapshot(
        &self,
        state: &RosterState,
        sequence: u64,
    ) -> Result<SnapshotMeta, SnapshotError> {
        self.ensure_dir()?;

        let storable = StorableState::from_state(state, sequence);
        let id = Self::generate_id(sequence, storable.timestamp);

        let path = self.snapshot_path(&id);
        let file = File::create(&path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer(writer, &storable)?;

        let size_bytes = fs::metadata(&path)?.len();

        Ok(SnapshotMeta {
            id,
            sequence,
            timestamp: storable.timestamp,
            size_bytes,
        })
    }

    /// Load a snapshot by ID
    pub fn load_snapshot(&self, id: &str) -> Result<StorableState, SnapshotError> {
        let path = self.snapshot_path(id);
        if !path.exists() {
            return Err(SnapshotError::NotFound(id.to_string()));
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let state: StorableState = serde_json::from_reader(reader)?;

        if state.version != StorableState::CURRENT_VERSION {
            return Err(SnapshotError::InvalidFormat(format!(
                "unsupported version: {} (expected {})",
                state.version,
                StorableState::CURRENT_VERSION
            )));
        }

        Ok(state)
    }

    /// List all available snapshots, newest first
    pub fn list_snapshots(&self) -> Result<Vec<SnapshotMeta>, SnapshotError> {
        if !self.snapshots_dir.exists() {
            return Ok(Vec::new());
        }

        let mut snapshots = Vec::new();

        for entry in fs::read_dir(&self.snapshots_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().map(|e| e == "json").unwrap_or(false) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if let Some((seq_str, _)) = stem.split_once('-') {
                        if let Ok(sequence) = seq_str.parse::<u64>() {
                            let metadata = fs::metadata(&path)?;
                            snapshots.push(SnapshotMeta {
                                id: stem.to_string(),
                                sequence,
                                timestamp: DateTime::from(metadata.modified()?),
                                size_bytes: metadata.len(),
                            });
                        }
                    }
                }
            }
        }

        snapshots.sort_by(|a, b| b.sequence.cmp(&a.sequence));

        Ok(snapshots)
    }

    /// Get the latest snapshot
    pub fn latest_snapshot(&self) -> Result<Option<SnapshotMeta>, SnapshotError> {
        Ok(self.list_snapshots()?.into_iter().next())
    }

    /// Delete a snapshot by ID
    pub fn delete_snapshot(&self, id: &str) -> Result<(), SnapshotError> {
        let path = self.snapshot_path(id);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Delete old snapshots, keeping `keep_count` below `keep_sequence`
    pub fn cleanup_old_snapshots(
        &self,
        keep_sequence: u64,
        keep_count: usize,
    ) -> Result<Vec<String>, SnapshotError> {
        let snapshots = self.list_snapshots()?;
        let mut deleted = Vec::new();
        let mut old_kept = 0;

        for snapshot in snapshots.iter() {
            if snapshot.sequence >= keep_sequence {
                continue;
            }
            if old_kept < keep_count {
                old_kept += 1;
                continue;
            }
            self.delete_snapshot(&snapshot.id)?;
            deleted.push(snapshot.id.clone());
        }

        Ok(deleted)
    }

    fn snapshot_path(&self, id: &str) -> PathBuf {
        self.snapshots_dir.join(format!("{}.json", id))
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
