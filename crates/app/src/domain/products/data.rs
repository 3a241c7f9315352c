//! Products Data

use crate::domain::products::records::{CategoryUuid, ProductUuid};

/// New Category Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub uuid: CategoryUuid,
    pub name: String,
}

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub category_uuid: Option<CategoryUuid>,
    pub price: u64,
}
