//! Product Records

use jiff::Timestamp;
use serde::Serialize;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Category UUID
pub type CategoryUuid = TypedUuid<CategoryRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub category_uuid: Option<CategoryUuid>,
    /// Price in minor units of the catalog currency.
    pub price: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Category Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub uuid: CategoryUuid,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
