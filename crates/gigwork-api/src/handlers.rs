//! Request handlers.

pub mod bids;
pub mod health;

pub use bids::*;
pub use health::*;
