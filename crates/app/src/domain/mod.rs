//! Rebate Domain Concerns

pub mod lifecycle;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod usage;
