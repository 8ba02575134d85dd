//! Transactional entity store for gigs and bids.
//!
//! This crate provides:
//! - A versioned in-memory document engine with snapshot-validated
//!   multi-document commits
//! - Unit-of-work transactions returned by `begin` and consumed by
//!   `commit`/`abort`
//! - Typed repositories for Gigs and Bids
//!
//! The repository/transaction API is the seam a persistent adapter
//! would implement; everything above it treats the store as an
//! external collaborator.

pub mod engine;
pub mod error;
pub mod repos;

pub use engine::{MemoryStore, Transaction};
pub use error::{StoreError, StoreResult};
pub use repos::{BidRepository, GigRepository};
