//! Bid models.

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::{BidId, GigId, UserId};

/// Bid lifecycle status.
///
/// For a given gig, at most one bid is ever `Hired`; once any bid is
/// hired, every sibling bid must be `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    /// Awaiting the gig owner's decision
    #[default]
    Pending,
    /// Chosen by the gig owner
    Hired,
    /// A sibling bid was hired
    Rejected,
}

impl BidStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BidStatus::Pending => "pending",
            BidStatus::Hired => "hired",
            BidStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A freelancer's offer against a gig.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Bid {
    /// Unique bid ID
    pub id: BidId,

    /// Gig this bid targets
    pub gig_id: GigId,

    /// User ID of the bidding freelancer
    pub freelancer_id: UserId,

    /// Offered price in minor currency units
    pub price: i64,

    /// Optional pitch message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Lifecycle status
    #[serde(default)]
    pub status: BidStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Bid {
    /// Create a new pending bid.
    pub fn new(
        id: BidId,
        gig_id: GigId,
        freelancer_id: impl Into<UserId>,
        price: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            gig_id,
            freelancer_id: freelancer_id.into(),
            price,
            message: None,
            status: BidStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach a pitch message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Transition to hired.
    pub fn hire(mut self) -> Self {
        self.status = BidStatus::Hired;
        self.updated_at = Utc::now();
        self
    }

    /// Transition to rejected.
    pub fn reject(mut self) -> Self {
        self.status = BidStatus::Rejected;
        self.updated_at = Utc::now();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bid_is_pending() {
        let bid = Bid::new(BidId::new(), GigId::new(), "freelancer-1", 25_000);
        assert_eq!(bid.status, BidStatus::Pending);
        assert!(bid.message.is_none());
    }

    #[test]
    fn test_bid_transitions() {
        let hired = Bid::new(BidId::new(), GigId::new(), "freelancer-1", 25_000).hire();
        assert_eq!(hired.status, BidStatus::Hired);

        let rejected = Bid::new(BidId::new(), GigId::new(), "freelancer-2", 30_000).reject();
        assert_eq!(rejected.status, BidStatus::Rejected);
    }

    #[test]
    fn test_message_skipped_when_absent() {
        let bid = Bid::new(BidId::new(), GigId::new(), "freelancer-1", 100);
        let json = serde_json::to_string(&bid).unwrap();
        assert!(!json.contains("\"message\""));

        let bid = bid.with_message("I can start Monday");
        let json = serde_json::to_string(&bid).unwrap();
        assert!(json.contains("\"message\":\"I can start Monday\""));
    }
}
