// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL entry structure with checksum verification
//!
//! Each entry records one committed transaction: a sequence number,
//! timestamp, machine ID, the batch of ops that committed together, and a
//! CRC32 checksum for integrity verification. Multi-row mutations (swap
//! approval, batch day generation) are therefore atomic on disk — a torn
//! write loses the whole transaction, never half of it.

use crate::op::RosterOp;
use crate::StorageError;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A single entry in the write-ahead log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalEntry {
    /// Monotonically increasing sequence number
    pub sequence: u64,
    /// Microseconds since Unix epoch
    pub timestamp_micros: u64,
    /// Unique machine identifier (for future multi-machine sync)
    pub machine_id: String,
    /// The transaction being recorded
    pub ops: Vec<RosterOp>,
    /// CRC32 checksum of the serialized ops
    pub checksum: u32,
}

impl WalEntry {
    /// Create a new WAL entry with computed checksum
    pub fn new(sequence: u64, machine_id: &str, ops: Vec<RosterOp>) -> Self {
        let checksum = Self::calculate_checksum(&ops);
        let timestamp_micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0);

        Self {
            sequence,
            timestamp_micros,
            machine_id: machine_id.to_string(),
            ops,
            checksum,
        }
    }

    /// Calculate the CRC32 checksum of the op batch
    fn calculate_checksum(ops: &[RosterOp]) -> u32 {
        // RosterOp only contains serde-friendly types, so serialization
        // cannot fail in practice; an empty string degrades to a stable
        // (wrong) checksum rather than a panic
        let json = serde_json::to_string(ops).unwrap_or_default();
        crc32fast::hash(json.as_bytes())
    }

    /// Verify the checksum matches the ops
    pub fn verify(&self) -> bool {
        self.checksum == Self::calculate_checksum(&self.ops)
    }

    /// Serialize to newline-delimited JSON (one line)
    pub fn to_line(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(StorageError::from)
    }

    /// Parse from a single line of JSON
    pub fn from_line(line: &str) -> Result<Self, StorageError> {
        serde_json::from_str(line).map_err(StorageError::from)
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
