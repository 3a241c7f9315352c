//! Pricing
//!
//! Enriches catalog products with the best promotion currently available.

mod errors;
pub mod models;
pub mod service;

pub use errors::PricingServiceError;
pub use service::*;
