// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Duty posts
//!
//! A post is a slot filled once per roster day. Its restrictions (gender,
//! cohort set, required role) feed the eligibility resolver; its weight
//! class is informative for fairness reporting.

use crate::calendar::RoutineType;
use crate::user::Gender;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Unique identifier for a post
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PostId(pub String);

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        PostId(s.to_string())
    }
}

/// Gender restriction declared by a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenderRestriction {
    Any,
    Male,
    Female,
}

impl GenderRestriction {
    pub fn admits(self, gender: Gender) -> bool {
        match self {
            GenderRestriction::Any => true,
            GenderRestriction::Male => gender == Gender::Male,
            GenderRestriction::Female => gender == Gender::Female,
        }
    }
}

/// A duty post filled once per roster day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub name: String,
    pub gender_restriction: GenderRestriction,
    /// Cohorts allowed to stand this post
    pub eligible_cohorts: BTreeSet<String>,
    /// Role a candidate must hold at the duty instant, if any
    pub required_role: Option<String>,
    /// Informative weight class
    pub weight: RoutineType,
}

impl Post {
    /// Create a post open to the given cohorts, with no other restrictions
    pub fn new<I, S>(id: impl Into<PostId>, name: impl Into<String>, cohorts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            gender_restriction: GenderRestriction::Any,
            eligible_cohorts: cohorts.into_iter().map(Into::into).collect(),
            required_role: None,
            weight: RoutineType::Normal,
        }
    }

    pub fn with_gender(mut self, restriction: GenderRestriction) -> Self {
        self.gender_restriction = restriction;
        self
    }

    pub fn with_required_role(mut self, role: impl Into<String>) -> Self {
        self.required_role = Some(role.into());
        self
    }

    pub fn with_weight(mut self, weight: RoutineType) -> Self {
        self.weight = weight;
        self
    }

    pub fn admits_cohort(&self, cohort: &str) -> bool {
        self.eligible_cohorts.contains(cohort)
    }
}

impl From<String> for PostId {
    fn from(s: String) -> Self {
        PostId(s)
    }
}

#[cfg(test)]
#[path = "post_tests.rs"]
mod tests;
