//! Promotion Repositories

mod promotions;
mod redemptions;

pub(crate) use promotions::{PgPromotionsRepository, PromotionWrite};
pub(crate) use redemptions::PgRedemptionsRepository;
