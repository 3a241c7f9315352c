//! Promotions

pub mod data;
mod errors;
pub mod records;
mod repositories;
pub mod service;
pub mod validation;

pub use errors::PromotionsServiceError;
pub(crate) use repositories::{PgPromotionsRepository, PgRedemptionsRepository};
pub use service::*;
