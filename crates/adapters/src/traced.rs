// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::presence::{PresenceAdapter, PresenceError};
use async_trait::async_trait;
use chrono::NaiveDate;
use rota_core::{PresenceStatus, UserId};

/// Wrapper that adds tracing to any PresenceAdapter
#[derive(Clone)]
pub struct TracedPresenceAdapter<P> {
    inner: P,
}

impl<P> TracedPresenceAdapter<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: PresenceAdapter> PresenceAdapter for TracedPresenceAdapter<P> {
    async fn status(
        &self,
        user: &UserId,
        date: NaiveDate,
    ) -> Result<PresenceStatus, PresenceError> {
        let span = tracing::debug_span!("presence.status", user = %user, date = %date);
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.status(user, date).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(status) => tracing::debug!(
                status = ?status,
                elapsed_ms = elapsed.as_millis() as u64,
                "resolved"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "lookup failed"
            ),
        }

        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
