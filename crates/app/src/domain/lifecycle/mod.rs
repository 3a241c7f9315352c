//! Lifecycle
//!
//! Retires promotions whose window ended or whose usage limit was reached.

mod errors;
pub mod service;

pub use errors::LifecycleServiceError;
pub use service::*;
