// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use rota_adapters::{IdentityError, PresenceError};
use rota_core::{AllocationId, PostId, Verdict};
use rota_storage::{ApplyError, StoreError};
use thiserror::Error;

/// Errors that can occur in engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// Candidate fails one or more eligibility checks; recoverable by
    /// picking another candidate
    #[error("ineligible: {}", .verdict.summary())]
    Ineligible { verdict: Verdict },

    /// Uniqueness or concurrent-mutation violation; re-fetch and retry
    #[error("conflict: {0}")]
    Conflict(ApplyError),

    /// Requester does not own the allocation targeted by a swap
    #[error("requester does not own allocation {0}")]
    NotOwner(AllocationId),

    /// Requester and substitute are the same user
    #[error("requester and substitute are the same user")]
    SelfSwap,

    /// Workflow-sequencing violation (terminal swap, unpublished day, ...)
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("not found: {kind} {id}")]
    NotFound { kind: &'static str, id: String },

    /// Automatic allocation could not fill a post
    #[error("no eligible candidate for post {0}")]
    NoCandidate(PostId),

    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("presence error: {0}")]
    Presence(#[from] PresenceError),

    /// Persistence failure that survived the bounded retries
    #[error("storage error: {0}")]
    Storage(StoreError),
}

impl EngineError {
    /// Classify a storage failure: constraint violations surface as
    /// conflicts or workflow errors, everything else as storage.
    pub fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::Apply(e) => match e {
                ApplyError::UniqueViolation { .. }
                | ApplyError::VersionMismatch { .. }
                | ApplyError::AlreadyExists { .. } => EngineError::Conflict(e),
                ApplyError::InvalidTransition(msg) => EngineError::InvalidState(msg),
                ApplyError::NotFound { kind, id } => EngineError::NotFound { kind, id },
                ApplyError::MissingDay { date } => EngineError::NotFound {
                    kind: "day",
                    id: date.to_string(),
                },
            },
            other => EngineError::Storage(other),
        }
    }
}
