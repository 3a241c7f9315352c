//! Products
//!
//! Read-mostly catalog lookups the promotion engine depends on.

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::ProductsServiceError;
pub use service::*;
