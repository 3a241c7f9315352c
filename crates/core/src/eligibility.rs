//! Eligibility
//!
//! Picks the promotions that may apply to a product at an instant. Storage
//! pre-filters on status and dates; this pass re-checks both, plus the usage
//! limit, so a lagging lifecycle sweep never causes over-application.

use jiff::Timestamp;
use rustc_hash::FxHashSet;
use uuid::Uuid;

use crate::promotions::Promotion;

/// Promotions applicable to `product` (in `category`) at `as_of`.
///
/// A promotion targeting both the product and its category is returned once.
/// Order follows the input, first occurrence wins.
pub fn find_applicable<'p, 'a>(
    promotions: impl IntoIterator<Item = &'p Promotion<'a>>,
    product: Uuid,
    category: Option<Uuid>,
    as_of: Timestamp,
) -> Vec<&'p Promotion<'a>>
where
    'a: 'p,
{
    let mut seen = FxHashSet::default();

    promotions
        .into_iter()
        .filter(|promotion| promotion.is_effectively_active(as_of))
        .filter(|promotion| promotion.applies_to(product, category))
        .filter(|promotion| seen.insert(promotion.uuid))
        .collect()
}

/// Whether any promotion targets `category` at `as_of`.
pub fn category_promotion<'p, 'a>(
    promotions: impl IntoIterator<Item = &'p Promotion<'a>>,
    category: Uuid,
    as_of: Timestamp,
) -> Option<&'p Promotion<'a>>
where
    'a: 'p,
{
    promotions.into_iter().find(|promotion| {
        promotion.is_effectively_active(as_of) && promotion.targets.categories.contains(&category)
    })
}
