// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake presence adapter for testing

use super::{PresenceAdapter, PresenceError};
use async_trait::async_trait;
use chrono::NaiveDate;
use rota_core::{PresenceStatus, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Recorded presence lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceCall {
    pub user: UserId,
    pub date: NaiveDate,
}

/// Fake presence adapter serving a programmed map
#[derive(Clone, Default)]
pub struct FakePresenceAdapter {
    statuses: Arc<Mutex<HashMap<UserId, PresenceStatus>>>,
    calls: Arc<Mutex<Vec<PresenceCall>>>,
}

impl FakePresenceAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Program a user's status; unknown users default to Present
    pub fn set_status(&self, user: impl Into<UserId>, status: PresenceStatus) {
        self.statuses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(user.into(), status);
    }

    /// Get all recorded lookups
    pub fn calls(&self) -> Vec<PresenceCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl PresenceAdapter for FakePresenceAdapter {
    async fn status(
        &self,
        user: &UserId,
        date: NaiveDate,
    ) -> Result<PresenceStatus, PresenceError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(PresenceCall {
                user: user.clone(),
                date,
            });

        let status = self
            .statuses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(user)
            .copied()
            .unwrap_or(PresenceStatus::Present);
        Ok(status)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
