// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded retry for transient storage failures
//!
//! Jittered exponential backoff. Only errors the caller marks retryable
//! are retried; constraint violations must surface immediately so the
//! caller can re-fetch fresh state.

use rand::Rng;
use rota_core::config::RetrySection;
use rota_storage::{StorageError, StoreError};
use std::time::Duration;
use tokio::time::sleep;

/// Jittered exponential backoff policy
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter: f64,
}

impl RetryPolicy {
    pub fn new(
        max_attempts: usize,
        base_delay: Duration,
        max_delay: Duration,
        jitter: f64,
    ) -> Self {
        let base_delay = base_delay.max(Duration::from_millis(1));
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: max_delay.max(base_delay),
            jitter: jitter.clamp(0.0, 1.0),
        }
    }

    pub fn from_section(section: &RetrySection) -> Self {
        Self::new(
            section.max_attempts,
            section.base_delay,
            section.max_delay,
            section.jitter,
        )
    }

    fn next_delay(&self, attempt: usize) -> Duration {
        let exp = 2u32.saturating_pow(attempt as u32);
        let delay = self.base_delay.saturating_mul(exp).min(self.max_delay);

        if self.jitter <= 0.0 {
            return delay;
        }
        let millis = delay.as_millis() as f64;
        let spread = millis * self.jitter;
        let delta = if spread > 0.0 {
            rand::thread_rng().gen_range(-spread..=spread)
        } else {
            0.0
        };
        Duration::from_millis((millis + delta).max(0.0) as u64)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or
    /// exhausts the attempt budget.
    pub async fn retry_async<F, T, E>(
        &self,
        mut op: F,
        retryable: impl Fn(&E) -> bool,
    ) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
    {
        let mut attempt = 0;
        loop {
            match op() {
                Ok(val) => return Ok(val),
                Err(err) => {
                    attempt += 1;
                    if attempt >= self.max_attempts || !retryable(&err) {
                        return Err(err);
                    }
                    sleep(self.next_delay(attempt - 1)).await;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_section(&RetrySection::default())
    }
}

/// Whether a storage failure is transient and worth retrying
pub fn is_transient(err: &StoreError) -> bool {
    matches!(
        err,
        StoreError::Io(_) | StoreError::Storage(StorageError::Io(_))
    )
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
