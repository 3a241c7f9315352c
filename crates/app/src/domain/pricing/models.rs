//! Priced catalog payloads.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{
    products::records::{CategoryRecord, ProductRecord},
    promotions::{
        data::Banner,
        records::{PromotionRecord, PromotionUuid},
    },
};

/// Customer-facing summary of a promotion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromotionInfo {
    pub id: PromotionUuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: Decimal,
    pub banner: Banner,
}

impl From<&PromotionRecord> for PromotionInfo {
    fn from(record: &PromotionRecord) -> Self {
        Self {
            id: record.uuid,
            name: record.name.clone(),
            kind: record.discount.label(),
            value: record.discount.value(),
            banner: record.banner.clone(),
        }
    }
}

/// The promotion applied to a price.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedPromotion {
    pub final_price: u64,
    pub promotion_info: PromotionInfo,
}

/// A product with its best available promotion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedProduct {
    #[serde(flatten)]
    pub product: ProductRecord,
    pub is_promotion: bool,
    pub promotion: Option<AppliedPromotion>,
}

/// A category flagged with a promotion currently targeting it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedCategory {
    #[serde(flatten)]
    pub category: CategoryRecord,
    pub is_promotion: bool,
    pub promotion: Option<PromotionInfo>,
}
