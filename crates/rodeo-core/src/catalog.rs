//! # Catalog
//!
//! Pure helpers over the product list: category set, low-stock rule,
//! and the inventory page filters.
//!
//! ## Low-Stock Thresholds
//! ```text
//! ┌──────────────────────┬───────────────────────┐
//! │ Category             │ Low stock when qty ≤  │
//! ├──────────────────────┼───────────────────────┤
//! │ 코일팟               │ 10                    │
//! │ anything else        │ 5                     │
//! └──────────────────────┴───────────────────────┘
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Product;

/// Category whose replenishment threshold is higher than the rest.
pub const COIL_POD_CATEGORY: &str = "코일팟";

const COIL_POD_LOW_STOCK: i64 = 10;
const DEFAULT_LOW_STOCK: i64 = 5;

/// Categories the shop stocks, in menu order.
pub const KNOWN_CATEGORIES: [&str; 6] = [
    "입호흡액상",
    "폐호흡액상",
    "폐호흡기기",
    "입호흡기기",
    "코일팟",
    "기타",
];

/// Distinct categories of `products`, sorted.
///
/// Input order and duplicates do not affect the result.
pub fn categories_of(products: &[Product]) -> BTreeSet<String> {
    products.iter().map(|p| p.category.clone()).collect()
}

/// Whether a product should be flagged for replenishment.
pub fn is_low_stock(product: &Product) -> bool {
    product.quantity <= low_stock_threshold(&product.category)
}

/// The low-stock threshold for a category.
pub fn low_stock_threshold(category: &str) -> i64 {
    if category == COIL_POD_CATEGORY {
        COIL_POD_LOW_STOCK
    } else {
        DEFAULT_LOW_STOCK
    }
}

// =============================================================================
// Inventory Filter
// =============================================================================

/// Filter chips on the inventory page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InventoryFilter {
    #[default]
    All,
    LowStock,
    Category(String),
}

impl InventoryFilter {
    /// Parses a filter key: `all`, `low-stock`, or a category name.
    pub fn from_key(key: &str) -> Self {
        match key {
            "all" | "" => InventoryFilter::All,
            "low-stock" => InventoryFilter::LowStock,
            category => InventoryFilter::Category(category.to_string()),
        }
    }

    /// Label shown on the filter chip.
    pub fn display_name(&self) -> &str {
        match self {
            InventoryFilter::All => "전체",
            InventoryFilter::LowStock => "재고부족",
            InventoryFilter::Category(category) => category,
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            InventoryFilter::All => true,
            InventoryFilter::LowStock => is_low_stock(product),
            InventoryFilter::Category(category) => &product.category == category,
        }
    }
}

/// Applies a filter and an optional case-insensitive name search.
pub fn filter_products<'a>(
    products: &'a [Product],
    filter: &InventoryFilter,
    search: Option<&str>,
) -> Vec<&'a Product> {
    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    products
        .iter()
        .filter(|p| filter.matches(p))
        .filter(|p| match &needle {
            Some(needle) => p.name.to_lowercase().contains(needle),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn product(id: i64, name: &str, category: &str, quantity: i64) -> Product {
        Product::new(id, name, category, Money::from_won(10_000), quantity)
    }

    #[test]
    fn test_categories_are_deduplicated() {
        let products = vec![
            product(1, "A", "코일팟", 1),
            product(2, "B", "기타", 1),
            product(3, "C", "코일팟", 1),
        ];
        let categories = categories_of(&products);
        assert_eq!(categories.len(), 2);
        assert!(categories.contains("코일팟"));
        assert!(categories.contains("기타"));

        let mut reversed = products.clone();
        reversed.reverse();
        assert_eq!(categories_of(&reversed), categories);
    }

    #[test]
    fn test_low_stock_coil_pods() {
        assert!(is_low_stock(&product(1, "Pod", "코일팟", 10)));
        assert!(is_low_stock(&product(1, "Pod", "코일팟", 0)));
        assert!(!is_low_stock(&product(1, "Pod", "코일팟", 11)));
    }

    #[test]
    fn test_low_stock_other_categories() {
        assert!(is_low_stock(&product(1, "Liquid", "입호흡액상", 5)));
        assert!(!is_low_stock(&product(1, "Liquid", "입호흡액상", 6)));
        assert!(!is_low_stock(&product(1, "Device", "기타", 10)));
    }

    #[test]
    fn test_filter_products() {
        let products = vec![
            product(1, "Blue Pod", "코일팟", 3),
            product(2, "Mint Liquid", "입호흡액상", 30),
            product(3, "Red Pod", "코일팟", 40),
        ];

        assert_eq!(filter_products(&products, &InventoryFilter::All, None).len(), 3);

        let low = filter_products(&products, &InventoryFilter::LowStock, None);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].id, 1);

        let pods = filter_products(&products, &InventoryFilter::from_key("코일팟"), Some("RED"));
        assert_eq!(pods.len(), 1);
        assert_eq!(pods[0].id, 3);

        assert_eq!(filter_products(&products, &InventoryFilter::All, Some("  ")).len(), 3);
    }

    #[test]
    fn test_filter_keys_and_labels() {
        assert_eq!(InventoryFilter::from_key("all"), InventoryFilter::All);
        assert_eq!(InventoryFilter::from_key("low-stock").display_name(), "재고부족");
        assert_eq!(InventoryFilter::All.display_name(), "전체");
        assert_eq!(InventoryFilter::from_key("기타").display_name(), "기타");
    }
}
