//! Promotion targeting
//!
//! A promotion targets products directly by id, or indirectly through the
//! category a product belongs to. Either basis is enough to match.

use rustc_hash::FxHashSet;
use uuid::Uuid;

/// Products and categories a promotion applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromotionTargets {
    /// Directly targeted product ids.
    pub products: FxHashSet<Uuid>,

    /// Targeted category ids; every product in these categories matches.
    pub categories: FxHashSet<Uuid>,
}

impl PromotionTargets {
    /// Create targets from product and category ids.
    pub fn new(
        products: impl IntoIterator<Item = Uuid>,
        categories: impl IntoIterator<Item = Uuid>,
    ) -> Self {
        Self {
            products: products.into_iter().collect(),
            categories: categories.into_iter().collect(),
        }
    }

    /// Target only the given products.
    pub fn products(products: impl IntoIterator<Item = Uuid>) -> Self {
        Self::new(products, [])
    }

    /// Target only the given categories.
    pub fn categories(categories: impl IntoIterator<Item = Uuid>) -> Self {
        Self::new([], categories)
    }

    /// Whether a product (in an optional category) is targeted.
    pub fn matches(&self, product: Uuid, category: Option<Uuid>) -> bool {
        self.products.contains(&product)
            || category.is_some_and(|category| self.categories.contains(&category))
    }

    /// Whether nothing is targeted.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.categories.is_empty()
    }
}
