//! Usage
//!
//! Counts promotion redemptions for completed orders.

pub mod data;
mod errors;
pub mod service;

pub use errors::UsageServiceError;
pub use service::*;
