//! Rebate
//!
//! Rebate is the pure promotion engine: eligibility, discount calculation,
//! usage selection and lifecycle rules over in-memory promotions. It performs
//! no I/O; persistence lives in `rebate-app`.

pub mod discounts;
pub mod eligibility;
pub mod prelude;
pub mod pricing;
pub mod promotions;
pub mod slug;
pub mod usage;
