//! Business logic services.

pub mod hire;

pub use hire::{HireError, HireReceipt, HireService};
