//! # Inventory Repository
//!
//! The catalog source for the sales screen and the inventory editor.
//!
//! ## Endpoints
//! ```text
//! GET    /api/inventory                  ──► Product[]
//! POST   /api/inventory-manage/item      ◄── ProductInput
//! PUT    /api/inventory-manage/item/{id} ◄── ProductInput
//! DELETE /api/inventory-manage/item/{id}
//! ```

use reqwest::Method;
use tracing::{debug, info};

use rodeo_core::validation::validate_product_input;
use rodeo_core::{Product, ProductInput};

use crate::client::ApiClient;
use crate::error::ClientResult;
use crate::wire::{convert_all, RawProduct};

/// Repository for inventory operations.
///
/// ## Usage
/// ```rust,ignore
/// let products = client.inventory().list().await?;
/// let categories = rodeo_core::catalog::categories_of(&products);
/// ```
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    client: ApiClient,
}

impl InventoryRepository {
    pub fn new(client: ApiClient) -> Self {
        InventoryRepository { client }
    }

    /// Lists every product with its current stock.
    ///
    /// ## Errors
    /// - `AuthRequired` when signed out or the token was rejected
    /// - `FetchFailed` on network or server errors
    /// - `MalformedResponse` when a row fails the schema check
    pub async fn list(&self) -> ClientResult<Vec<Product>> {
        debug!("Listing inventory");
        let raw: Vec<RawProduct> = self
            .client
            .get_json("api/inventory", "재고 정보를 불러오는데 실패했습니다.")
            .await?;
        let products: Vec<Product> = convert_all(raw)?;
        debug!(count = products.len(), "Inventory loaded");
        Ok(products)
    }

    /// Adds a product. The input is validated before sending.
    pub async fn create(&self, input: &ProductInput) -> ClientResult<()> {
        validate_product_input(input)?;
        self.client
            .send_json(
                Method::POST,
                "api/inventory-manage/item",
                input,
                "상품 추가에 실패했습니다.",
            )
            .await?;
        info!(name = %input.name, category = %input.category, "Product added");
        Ok(())
    }

    /// Replaces a product's fields. The input is validated before sending.
    pub async fn update(&self, id: i64, input: &ProductInput) -> ClientResult<()> {
        validate_product_input(input)?;
        self.client
            .send_json(
                Method::PUT,
                &format!("api/inventory-manage/item/{}", id),
                input,
                "상품 수정에 실패했습니다.",
            )
            .await?;
        info!(id, name = %input.name, "Product updated");
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client
            .delete(
                &format!("api/inventory-manage/item/{}", id),
                "상품 삭제에 실패했습니다.",
            )
            .await?;
        info!(id, "Product deleted");
        Ok(())
    }
}
