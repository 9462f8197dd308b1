//! # Inventory Commands
//!
//! Catalog refresh for the counter, filtered listing, and product edits.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use rodeo_client::ApiClient;
use rodeo_core::catalog::{filter_products, InventoryFilter, KNOWN_CATEGORIES};
use rodeo_core::{CoreError, Money, Product, ProductInput};

use crate::error::ApiError;
use crate::state::CatalogState;

pub const PRODUCT_ADDED: &str = "새 상품이 추가되었습니다.";
pub const PRODUCT_UPDATED: &str = "상품 정보가 수정되었습니다.";
pub const PRODUCT_DELETED: &str = "상품이 삭제되었습니다.";

/// Fields to change on an existing product; `None` keeps the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductChanges {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Money>,
    pub quantity: Option<i64>,
}

impl ProductChanges {
    fn apply_to(self, product: &Product) -> ProductInput {
        let mut input = ProductInput::from(product);
        if let Some(name) = self.name {
            input.name = name;
        }
        if let Some(category) = self.category {
            input.category = category;
        }
        if let Some(price) = self.price {
            input.price = price;
        }
        if let Some(quantity) = self.quantity {
            input.quantity = quantity;
        }
        input
    }
}

/// Fetches the product list into the catalog snapshot.
pub async fn refresh_catalog(
    client: &ApiClient,
    catalog: &CatalogState,
) -> Result<Vec<Product>, ApiError> {
    let products = client.inventory().list().await?;
    catalog.replace(products.clone());
    debug!(count = products.len(), "Catalog refreshed");
    Ok(products)
}

/// Refreshes the catalog, then applies the filter and the name search.
pub async fn list_inventory(
    client: &ApiClient,
    catalog: &CatalogState,
    filter: &InventoryFilter,
    search: Option<&str>,
) -> Result<Vec<Product>, ApiError> {
    debug!(filter = %filter.display_name(), ?search, "list_inventory command");
    let products = refresh_catalog(client, catalog).await?;
    Ok(filter_products(&products, filter, search)
        .into_iter()
        .cloned()
        .collect())
}

pub async fn add_product(
    client: &ApiClient,
    catalog: &CatalogState,
    input: &ProductInput,
) -> Result<&'static str, ApiError> {
    debug!(name = %input.name, "add_product command");
    if !KNOWN_CATEGORIES.contains(&input.category.as_str()) {
        warn!(category = %input.category, "Category not in the shop menu");
    }
    client.inventory().create(input).await?;
    refresh_catalog(client, catalog).await?;
    Ok(PRODUCT_ADDED)
}

/// Merges `changes` into the current row and saves it.
pub async fn update_product(
    client: &ApiClient,
    catalog: &CatalogState,
    id: i64,
    changes: ProductChanges,
) -> Result<&'static str, ApiError> {
    debug!(id, "update_product command");
    let products = refresh_catalog(client, catalog).await?;
    let current = products
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;

    let input = changes.apply_to(current);
    client.inventory().update(id, &input).await?;
    info!(id, "Product saved");
    refresh_catalog(client, catalog).await?;
    Ok(PRODUCT_UPDATED)
}

pub async fn delete_product(
    client: &ApiClient,
    catalog: &CatalogState,
    id: i64,
) -> Result<&'static str, ApiError> {
    debug!(id, "delete_product command");
    client.inventory().delete(id).await?;
    refresh_catalog(client, catalog).await?;
    Ok(PRODUCT_DELETED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use rodeo_client::testing::{MockApi, MockState};

    fn catalog_rows() -> Vec<Product> {
        vec![
            Product::new(1, "Pod A", "코일팟", Money::from_won(12_000), 8),
            Product::new(2, "Pod B", "코일팟", Money::from_won(12_000), 30),
            Product::new(3, "Mango", "입호흡액상", Money::from_won(20_000), 4),
        ]
    }

    #[tokio::test]
    async fn test_low_stock_filter() {
        let mock = MockApi::start_with(MockState::new().with_products(catalog_rows())).await;
        let client = mock.signed_in_client();
        let catalog = CatalogState::new();

        let low = list_inventory(&client, &catalog, &InventoryFilter::LowStock, None)
            .await
            .unwrap();

        let names: Vec<&str> = low.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Pod A", "Mango"]);
        assert_eq!(catalog.products().len(), 3);
    }

    #[tokio::test]
    async fn test_category_and_search() {
        let mock = MockApi::start_with(MockState::new().with_products(catalog_rows())).await;
        let client = mock.signed_in_client();
        let catalog = CatalogState::new();

        let found = list_inventory(
            &client,
            &catalog,
            &InventoryFilter::from_key("코일팟"),
            Some("pod b"),
        )
        .await
        .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 2);
    }

    #[tokio::test]
    async fn test_update_merges_changes() {
        let mock = MockApi::start_with(MockState::new().with_products(catalog_rows())).await;
        let client = mock.signed_in_client();
        let catalog = CatalogState::new();

        let changes = ProductChanges {
            quantity: Some(50),
            ..Default::default()
        };
        let message = update_product(&client, &catalog, 3, changes).await.unwrap();

        assert_eq!(message, PRODUCT_UPDATED);
        let mango = mock.products().await.into_iter().find(|p| p.id == 3).unwrap();
        assert_eq!(mango.quantity, 50);
        assert_eq!(mango.price, Money::from_won(20_000));
    }

    #[tokio::test]
    async fn test_update_unknown_product() {
        let mock = MockApi::start_with(MockState::new().with_products(catalog_rows())).await;
        let client = mock.signed_in_client();

        let err = update_product(&client, &CatalogState::new(), 99, ProductChanges::default())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_add_failure_uses_fallback_message() {
        let mock = MockApi::start().await;
        let client = mock.signed_in_client();
        mock.fail_with(500, None).await;
        let input = ProductInput {
            name: "Pod C".into(),
            category: "코일팟".into(),
            price: Money::from_won(9_000),
            quantity: 1,
        };

        let err = add_product(&client, &CatalogState::new(), &input)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::PersistenceFailed);
        assert_eq!(err.message, "상품 추가에 실패했습니다.");
    }
}
