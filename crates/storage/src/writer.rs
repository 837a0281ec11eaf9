// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL writer for durable append operations
//!
//! Appends one entry per committed transaction and fsyncs before
//! returning, so a transaction reported committed survives a crash.

use crate::entry::WalEntry;
use crate::op::RosterOp;
use crate::StorageError;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// WAL writer for durable append operations
pub struct WalWriter {
    path: PathBuf,
    file: File,
    next_sequence: u64,
    machine_id: String,
}

impl WalWriter {
    /// Open or create a WAL file.
    ///
    /// If the file exists, scans to find the next sequence number.
    pub fn open(path: &Path, machine_id: &str) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let next_sequence = if path.exists() {
            Self::scan_last_sequence(path)?.map(|s| s + 1).unwrap_or(0)
        } else {
            0
        };

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            next_sequence,
            machine_id: machine_id.to_string(),
        })
    }

    /// Scan a WAL file to find the last valid sequence number
    fn scan_last_sequence(path: &Path) -> Result<Option<u64>, StorageError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut last_sequence = None;

        for line_result in reader.lines() {
            let line = match line_result {
                Ok(l) => l,
                Err(_) => break, // Stop at read error
            };

            if line.is_empty() {
                continue;
            }

            match WalEntry::from_line(&line) {
                Ok(entry) if entry.verify() => last_sequence = Some(entry.sequence),
                // Checksum mismatch or parse error: truncated write
                _ => break,
            }
        }

        Ok(last_sequence)
    }

    /// Append a transaction to the WAL.
    ///
    /// Returns the assigned sequence number. The entry is durably
    /// persisted (fsync'd) before this method returns.
    pub fn append(&mut self, ops: Vec<RosterOp>) -> Result<u64, StorageError> {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let entry = WalEntry::new(sequence, &self.machine_id, ops);
        let line = entry.to_line()?;

        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.file.sync_all()?;

        Ok(sequence)
    }

    /// Get current sequence number (next to be assigned)
    pub fn sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Get the last assigned sequence number, if any entry was written
    pub fn last_sequence(&self) -> Option<u64> {
        self.next_sequence.checked_sub(1)
    }

    /// Get the path to the WAL file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the machine ID
    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
