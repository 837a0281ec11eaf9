// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake identity adapter for testing

use super::{IdentityAdapter, IdentityError};
use async_trait::async_trait;
use rota_core::UserId;
use std::sync::{Arc, Mutex};

/// Recorded identity lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityCall;

/// Fake identity adapter with a switchable operator
#[derive(Clone)]
pub struct FakeIdentityAdapter {
    operator: Arc<Mutex<Option<UserId>>>,
    calls: Arc<Mutex<Vec<IdentityCall>>>,
}

impl FakeIdentityAdapter {
    /// Start with the given authenticated operator
    pub fn new(operator: impl Into<UserId>) -> Self {
        Self {
            operator: Arc::new(Mutex::new(Some(operator.into()))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Start with no authenticated operator
    pub fn unauthenticated() -> Self {
        Self {
            operator: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Switch the authenticated operator
    pub fn set_operator(&self, operator: impl Into<UserId>) {
        *self.operator.lock().unwrap_or_else(|e| e.into_inner()) = Some(operator.into());
    }

    /// Get all recorded lookups
    pub fn calls(&self) -> Vec<IdentityCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl IdentityAdapter for FakeIdentityAdapter {
    async fn current_operator(&self) -> Result<UserId, IdentityError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(IdentityCall);

        self.operator
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(IdentityError::NotAuthenticated)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
