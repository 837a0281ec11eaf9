// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Presence state consumed from the external presence tracker
//!
//! The tracker records in/out transitions elsewhere; the engine only reads
//! the resulting status. A user who is out with no recorded return is
//! ineligible for that day.

use serde::{Deserialize, Serialize};

/// Current in/out state of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenceStatus {
    Present,
    Out,
}
