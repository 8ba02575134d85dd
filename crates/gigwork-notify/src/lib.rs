//! Best-effort real-time notification channel.
//!
//! This crate provides:
//! - The [`NotificationChannel`] publish interface addressed by user
//!   identity
//! - An in-process fan-out hub backed by per-recipient broadcast
//!   channels
//!
//! Delivery is at-most-once: messages published while a recipient has
//! no live subscription are dropped, and there is no replay.

pub mod channel;
pub mod error;

pub use channel::{NotificationChannel, NotificationHub};
pub use error::{NotifyError, NotifyResult};
