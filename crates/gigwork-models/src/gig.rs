//! Gig models.

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::{GigId, UserId};

/// Gig lifecycle status.
///
/// Exactly one hire may transition a gig from `Open` to `Assigned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum GigStatus {
    /// Gig is accepting bids
    #[default]
    Open,
    /// A bid has been hired
    Assigned,
}

impl GigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GigStatus::Open => "open",
            GigStatus::Assigned => "assigned",
        }
    }
}

impl fmt::Display for GigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unit of work posted by an owner, open for bidding until assigned.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Gig {
    /// Unique gig ID
    pub id: GigId,

    /// User ID of the poster
    pub owner_id: UserId,

    /// Gig title
    pub title: String,

    /// Lifecycle status
    #[serde(default)]
    pub status: GigStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Gig {
    /// Create a new open gig.
    pub fn new(id: GigId, owner_id: impl Into<UserId>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner_id: owner_id.into(),
            title: title.into(),
            status: GigStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    /// True if the gig is still accepting bids.
    pub fn is_open(&self) -> bool {
        self.status == GigStatus::Open
    }

    /// Transition to assigned.
    pub fn assign(mut self) -> Self {
        self.status = GigStatus::Assigned;
        self.updated_at = Utc::now();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_gig_is_open() {
        let gig = Gig::new(GigId::new(), "owner-1", "Build a landing page");
        assert!(gig.is_open());
        assert_eq!(gig.status, GigStatus::Open);
    }

    #[test]
    fn test_assign_transitions_status() {
        let gig = Gig::new(GigId::new(), "owner-1", "Build a landing page").assign();
        assert!(!gig.is_open());
        assert_eq!(gig.status, GigStatus::Assigned);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&GigStatus::Assigned).unwrap();
        assert_eq!(json, "\"assigned\"");
    }
}
