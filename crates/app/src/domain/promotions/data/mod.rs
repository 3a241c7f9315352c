//! Promotions Data

use jiff::Timestamp;
use rebate::promotions::PromotionStatus;
use serde::{Deserialize, Serialize};

use crate::domain::{
    products::records::{CategoryUuid, ProductUuid},
    promotions::records::{PromotionRecord, PromotionUuid},
};

pub mod discounts;

pub use discounts::SimpleDiscount;

/// Default page size for promotion listings.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a listing will honour.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Promotion banner image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub url: String,
    pub public_id: String,
}

/// New Promotion Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewPromotion {
    pub uuid: PromotionUuid,
    pub name: String,
    pub description: String,
    pub banner: Banner,
    pub discount: SimpleDiscount,
    pub max_discount: Option<u64>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub applicable_products: Vec<ProductUuid>,
    pub applicable_categories: Vec<CategoryUuid>,
    pub status: PromotionStatus,
    pub usage_limit: Option<u64>,
}

/// Promotion Update Data
///
/// Only the listed fields are editable. `None` leaves a field as it is; the
/// nested options of `max_discount` and `usage_limit` clear the value with
/// `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromotionUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub banner: Option<Banner>,
    pub discount: Option<SimpleDiscount>,
    pub max_discount: Option<Option<u64>>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub applicable_products: Option<Vec<ProductUuid>>,
    pub applicable_categories: Option<Vec<CategoryUuid>>,
    pub status: Option<PromotionStatus>,
    pub usage_limit: Option<Option<u64>>,
}

impl PromotionUpdate {
    /// Merge the update over the current record.
    #[must_use]
    pub fn apply(self, current: &PromotionRecord) -> NewPromotion {
        NewPromotion {
            uuid: current.uuid,
            name: self.name.unwrap_or_else(|| current.name.clone()),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            banner: self.banner.unwrap_or_else(|| current.banner.clone()),
            discount: self.discount.unwrap_or(current.discount),
            max_discount: self.max_discount.unwrap_or(current.max_discount),
            starts_at: self.starts_at.unwrap_or(current.starts_at),
            ends_at: self.ends_at.unwrap_or(current.ends_at),
            applicable_products: self
                .applicable_products
                .unwrap_or_else(|| current.applicable_products.clone()),
            applicable_categories: self
                .applicable_categories
                .unwrap_or_else(|| current.applicable_categories.clone()),
            status: self.status.unwrap_or(current.status),
            usage_limit: self.usage_limit.unwrap_or(current.usage_limit),
        }
    }
}

/// Promotion listing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionFilter {
    pub status: Option<PromotionStatus>,

    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

impl Default for PromotionFilter {
    fn default() -> Self {
        Self {
            status: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PromotionFilter {
    /// `LIMIT` and `OFFSET` for the requested page.
    #[must_use]
    pub fn limit_offset(&self) -> (i64, i64) {
        let page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        let page = self.page.max(1);

        (
            i64::from(page_size),
            i64::from(page - 1) * i64::from(page_size),
        )
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_offset_starts_at_first_page() {
        let filter = PromotionFilter::default();

        assert_eq!(filter.limit_offset(), (20, 0));
    }

    #[test]
    fn limit_offset_clamps_page_and_size() {
        let filter = PromotionFilter {
            status: None,
            page: 0,
            page_size: 1_000,
        };

        assert_eq!(filter.limit_offset(), (100, 0));

        let third = PromotionFilter {
            status: None,
            page: 3,
            page_size: 10,
        };

        assert_eq!(third.limit_offset(), (10, 20));
    }
}
