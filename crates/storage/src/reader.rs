// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL reader for iterating and validating entries
//!
//! Iteration stops at the first invalid entry (parse error or checksum
//! mismatch); the byte position after the last valid entry marks the
//! truncation point for repair.

use crate::entry::WalEntry;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when reading WAL entries
#[derive(Debug, Error)]
pub enum WalReadError {
    #[error("corrupted entry at line {line}: {reason}")]
    Corrupted { line: u64, reason: String },
    #[error("checksum mismatch at line {line}")]
    ChecksumMismatch { line: u64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// WAL reader for iterating over entries
pub struct WalReader {
    path: PathBuf,
}

impl WalReader {
    /// Create a reader; a non-existent file reads as empty
    pub fn open_or_empty(path: &Path) -> Result<Self, WalReadError> {
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Iterate over all valid entries.
    ///
    /// Stops at the first corrupted entry.
    pub fn entries(&self) -> Result<WalEntryIter, WalReadError> {
        WalEntryIter::new(&self.path, 0)
    }

    /// Read entries with sequence numbers at or after the given value
    pub fn entries_from(&self, sequence: u64) -> Result<WalEntryIter, WalReadError> {
        WalEntryIter::new(&self.path, sequence)
    }

    /// Get the last valid sequence number
    pub fn last_sequence(&self) -> Result<Option<u64>, WalReadError> {
        let mut last = None;
        for entry_result in self.entries()? {
            match entry_result {
                Ok(entry) => last = Some(entry.sequence),
                Err(_) => break,
            }
        }
        Ok(last)
    }

    /// Validate the WAL and report its contents
    pub fn validate(&self) -> Result<WalValidation, WalReadError> {
        let mut valid_entries = 0u64;
        let mut last_valid_sequence = None;
        let mut corruption = None;

        for entry_result in self.entries()? {
            match entry_result {
                Ok(entry) => {
                    valid_entries += 1;
                    last_valid_sequence = Some(entry.sequence);
                }
                Err(WalReadError::Corrupted { line, reason }) => {
                    corruption = Some(WalCorruption { line, reason });
                    break;
                }
                Err(WalReadError::ChecksumMismatch { line }) => {
                    corruption = Some(WalCorruption {
                        line,
                        reason: "checksum mismatch".to_string(),
                    });
                    break;
                }
                Err(WalReadError::Io(e)) => {
                    corruption = Some(WalCorruption {
                        line: valid_entries + 1,
                        reason: format!("IO error: {}", e),
                    });
                    break;
                }
            }
        }

        Ok(WalValidation {
            valid_entries,
            last_valid_sequence,
            corruption,
        })
    }

    /// Get the path to the WAL file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Validation result for a WAL file
#[derive(Debug)]
pub struct WalValidation {
    pub valid_entries: u64,
    pub last_valid_sequence: Option<u64>,
    pub corruption: Option<WalCorruption>,
}

/// Information about corruption found in a WAL file
#[derive(Debug)]
pub struct WalCorruption {
    pub line: u64,
    pub reason: String,
}

/// Iterator over WAL entries with position tracking
pub struct WalEntryIter {
    reader: Option<BufReader<File>>,
    line_number: u64,
    skip_until_sequence: u64,
    /// Position after the last successfully read and validated entry
    last_valid_position: u64,
}

impl WalEntryIter {
    fn new(path: &Path, skip_until_sequence: u64) -> Result<Self, WalReadError> {
        let reader = if path.exists() {
            Some(BufReader::new(File::open(path)?))
        } else {
            None
        };

        Ok(Self {
            reader,
            line_number: 0,
            skip_until_sequence,
            last_valid_position: 0,
        })
    }

    /// Get the byte position after the last successfully read valid entry
    pub fn last_valid_position(&self) -> u64 {
        self.last_valid_position
    }
}

impl Iterator for WalEntryIter {
    type Item = Result<WalEntry, WalReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;

        loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => return None, // EOF
                Ok(_) => {
                    self.line_number += 1;

                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let entry = match WalEntry::from_line(trimmed) {
                        Ok(e) => e,
                        Err(e) => {
                            return Some(Err(WalReadError::Corrupted {
                                line: self.line_number,
                                reason: e.to_string(),
                            }));
                        }
                    };

                    if !entry.verify() {
                        return Some(Err(WalReadError::ChecksumMismatch {
                            line: self.line_number,
                        }));
                    }

                    // Entry is valid; remember where it ends
                    self.last_valid_position =
                        reader.stream_position().unwrap_or(self.last_valid_position);

                    // Skip entries before the requested sequence
                    if entry.sequence < self.skip_until_sequence {
                        continue;
                    }

                    return Some(Ok(entry));
                }
                Err(e) => return Some(Err(WalReadError::Io(e))),
            }
        }
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
