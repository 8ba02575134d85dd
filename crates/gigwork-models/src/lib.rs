//! Shared data models for the GigWork backend.
//!
//! This crate provides Serde-serializable types for:
//! - Gigs and their lifecycle status
//! - Bids placed against gigs
//! - String identifier newtypes
//! - WebSocket message schemas

pub mod bid;
pub mod gig;
pub mod ids;
pub mod ws;

// Re-export common types
pub use bid::{Bid, BidStatus};
pub use gig::{Gig, GigStatus};
pub use ids::{BidId, GigId, UserId};
pub use ws::{WsMessage, WsMessageType, WsSubscribeRequest};
