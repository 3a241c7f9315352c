//! Usage Data

use rebate::usage::UsagePolicy;
use rusty_money::iso::{self, Currency};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    products::records::ProductUuid,
    promotions::records::{PromotionRecord, PromotionUuid},
};

/// A purchased line of a completed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_uuid: ProductUuid,
    pub quantity: u32,

    /// Price paid per unit, in minor units.
    pub unit_price: u64,
}

/// An order whose payment was confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedOrder {
    /// Idempotency key: an order is counted at most once per promotion.
    pub order_uuid: Uuid,
    pub items: Vec<LineItem>,
}

/// Why a promotion was not incremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// The order was already counted for this promotion.
    AlreadyRecorded,

    /// The promotion stopped being active or reached its limit.
    NoLongerActive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedPromotion {
    pub promotion_uuid: PromotionUuid,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageFailure {
    pub promotion_uuid: PromotionUuid,
    pub reason: String,
}

/// Outcome of recording an order's usage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    pub updated: Vec<PromotionRecord>,
    pub skipped: Vec<SkippedPromotion>,
    pub failures: Vec<UsageFailure>,
}

/// Usage accounting settings.
#[derive(Debug, Clone, Copy)]
pub struct UsageSettings {
    pub policy: UsagePolicy,

    /// Attempts per promotion when the write loses a serialization race.
    pub max_attempts: u32,
    pub currency: &'static Currency,
}

impl Default for UsageSettings {
    fn default() -> Self {
        Self {
            policy: UsagePolicy::default(),
            max_attempts: 3,
            currency: iso::VND,
        }
    }
}
