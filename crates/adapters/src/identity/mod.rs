// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity provider adapter
//!
//! Supplies the currently authenticated operator id, used to stamp who
//! approved or rejected a swap. Authentication itself lives outside the
//! engine.

use async_trait::async_trait;
use rota_core::UserId;
use thiserror::Error;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeIdentityAdapter, IdentityCall};

/// Errors from identity lookups
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("no authenticated operator")]
    NotAuthenticated,
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Adapter for the external identity provider
#[async_trait]
pub trait IdentityAdapter: Clone + Send + Sync + 'static {
    /// Id of the operator performing the current request
    async fn current_operator(&self) -> Result<UserId, IdentityError>;
}

/// Identity fixed at construction, for single-operator deployments
#[derive(Clone)]
pub struct StaticIdentityAdapter {
    operator: UserId,
}

impl StaticIdentityAdapter {
    pub fn new(operator: impl Into<UserId>) -> Self {
        Self {
            operator: operator.into(),
        }
    }
}

#[async_trait]
impl IdentityAdapter for StaticIdentityAdapter {
    async fn current_operator(&self) -> Result<UserId, IdentityError> {
        Ok(self.operator.clone())
    }
}
