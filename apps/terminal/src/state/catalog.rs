//! # Catalog State
//!
//! The last product list fetched from the shop API. The composer and the
//! settlement stock check both read this snapshot.

use std::sync::{Arc, Mutex};

use rodeo_core::catalog::categories_of;
use rodeo_core::Product;

use super::lock;

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    products: Arc<Mutex<Vec<Product>>>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, products: Vec<Product>) {
        *lock(&self.products) = products;
    }

    pub fn products(&self) -> Vec<Product> {
        lock(&self.products).clone()
    }

    pub fn categories(&self) -> Vec<String> {
        categories_of(&lock(&self.products)).into_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.products).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rodeo_core::Money;

    #[test]
    fn test_replace_and_categories() {
        let state = CatalogState::new();
        assert!(state.is_empty());

        state.replace(vec![
            Product::new(1, "Mango", "입호흡액상", Money::from_won(20_000), 3),
            Product::new(2, "Pod A", "코일팟", Money::from_won(12_000), 9),
            Product::new(3, "Pod B", "코일팟", Money::from_won(12_000), 4),
        ]);

        assert_eq!(state.products().len(), 3);
        assert_eq!(state.categories(), vec!["입호흡액상", "코일팟"]);
    }
}
