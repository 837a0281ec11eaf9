// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Presence tracker adapter
//!
//! The tracker records in/out transitions elsewhere; the engine only asks
//! for the effective status of a user for a date. A user reported out
//! fails eligibility for every post that day.

use async_trait::async_trait;
use chrono::NaiveDate;
use rota_core::{PresenceStatus, UserId};
use thiserror::Error;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePresenceAdapter, PresenceCall};

/// Errors from presence lookups
#[derive(Debug, Error)]
pub enum PresenceError {
    #[error("presence tracker unavailable: {0}")]
    Unavailable(String),
    #[error("unknown user: {0}")]
    UnknownUser(String),
}

/// Adapter for the external presence tracker
#[async_trait]
pub trait PresenceAdapter: Clone + Send + Sync + 'static {
    /// Effective in/out status of the user for the given date
    async fn status(&self, user: &UserId, date: NaiveDate)
        -> Result<PresenceStatus, PresenceError>;
}

/// Production default when no tracker is wired: everyone is present
#[derive(Clone, Default)]
pub struct AlwaysPresentAdapter;

#[async_trait]
impl PresenceAdapter for AlwaysPresentAdapter {
    async fn status(
        &self,
        _user: &UserId,
        _date: NaiveDate,
    ) -> Result<PresenceStatus, PresenceError> {
        Ok(PresenceStatus::Present)
    }
}
