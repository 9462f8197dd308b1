//! # Line-Item Composer
//!
//! Turns category → product → quantity selections into line items.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Composer State Machine                           │
//! │                                                                         │
//! │   Empty ──select_category──► CategorySelected                           │
//! │                                   │                                     │
//! │                              type_product                               │
//! │                                   ▼                                     │
//! │                              ProductTyped ──(single exact match)──┐     │
//! │                                   │                               │     │
//! │                            confirm_product                        │     │
//! │                                   ▼                               │     │
//! │                            ProductConfirmed ◄─────────────────────┘     │
//! │                                   │                                     │
//! │                        add_item (stock check)                           │
//! │                                   ▼                                     │
//! │                        LineItem prepended, back to Empty                │
//! │                                                                         │
//! │  select_category from any state clears the typed product.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::draft::{LineItem, TransactionDraft};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::Product;
use crate::validation::validate_quantity;

// =============================================================================
// Pending Item
// =============================================================================

/// The line the cashier is filling in, before it joins the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PendingItem {
    /// Bound only once a product is confirmed.
    pub inventory_id: Option<i64>,
    pub category: String,
    pub product_name: String,
    pub quantity: i64,
}

impl Default for PendingItem {
    fn default() -> Self {
        PendingItem {
            inventory_id: None,
            category: String::new(),
            product_name: String::new(),
            quantity: 1,
        }
    }
}

impl PendingItem {
    /// A pending line already bound to `product`.
    pub fn for_product(product: &Product, quantity: i64) -> Self {
        PendingItem {
            inventory_id: Some(product.id),
            category: product.category.clone(),
            product_name: product.name.clone(),
            quantity,
        }
    }

    fn is_complete(&self) -> bool {
        self.inventory_id.is_some() && !self.product_name.is_empty() && self.quantity != 0
    }
}

/// Where the composer is in the selection flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ComposerStage {
    Empty,
    CategorySelected,
    ProductTyped,
    ProductConfirmed,
}

// =============================================================================
// Operations
// =============================================================================

/// Adds the pending line to the draft.
///
/// ## Checks
/// 1. Product and quantity present → else `Validation(IncompleteItem)`
/// 2. Quantity positive
/// 3. Product exists in `products` → else `ProductNotFound`
/// 4. Already-added + requested ≤ stock → else `StockInsufficient`
///
/// On success the line is prepended and `pending` is reset.
pub fn add_item(
    draft: &mut TransactionDraft,
    pending: &mut PendingItem,
    products: &[Product],
) -> CoreResult<()> {
    let inventory_id = match pending.inventory_id {
        Some(id) if pending.is_complete() => id,
        _ => return Err(ValidationError::IncompleteItem.into()),
    };
    validate_quantity(pending.quantity)?;

    let product = products
        .iter()
        .find(|p| p.id == inventory_id)
        .ok_or_else(|| CoreError::ProductNotFound(pending.product_name.clone()))?;

    let already_added = draft.quantity_for(inventory_id);
    if !product.has_stock_for(already_added, pending.quantity) {
        return Err(CoreError::StockInsufficient {
            product: product.name.clone(),
            available: product.quantity,
            already_added,
            requested: pending.quantity,
        });
    }

    draft.push_front(LineItem::new(product, pending.quantity));
    *pending = PendingItem::default();

    Ok(())
}

/// Removes a line by local id. Unknown ids leave the draft unchanged.
pub fn remove_item(draft: &mut TransactionDraft, local_id: &str) {
    draft.remove_item(local_id);
}

// =============================================================================
// Composer
// =============================================================================

/// Selection state for one pending line plus its product candidates.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    pending: PendingItem,
    candidates: Vec<Product>,
    typed: bool,
}

impl Composer {
    pub fn new() -> Self {
        Composer::default()
    }

    pub fn pending(&self) -> &PendingItem {
        &self.pending
    }

    /// Products matching the current category and typed text.
    pub fn candidates(&self) -> &[Product] {
        &self.candidates
    }

    pub fn stage(&self) -> ComposerStage {
        if self.pending.inventory_id.is_some() {
            ComposerStage::ProductConfirmed
        } else if self.typed {
            ComposerStage::ProductTyped
        } else if !self.pending.category.is_empty() {
            ComposerStage::CategorySelected
        } else {
            ComposerStage::Empty
        }
    }

    /// Selects a category, clearing the product and re-scoping candidates.
    pub fn select_category(&mut self, category: &str, products: &[Product]) {
        self.pending.category = category.to_string();
        self.pending.product_name.clear();
        self.pending.inventory_id = None;
        self.typed = false;
        self.candidates = products
            .iter()
            .filter(|p| !category.is_empty() && p.category == category)
            .cloned()
            .collect();
    }

    /// Updates the typed product name and filters candidates.
    ///
    /// A single candidate whose name equals `input` (ignoring case) is
    /// confirmed automatically.
    pub fn type_product(&mut self, input: &str, products: &[Product]) {
        self.pending.product_name = input.to_string();
        self.pending.inventory_id = None;
        self.typed = true;

        let needle = input.to_lowercase();
        self.candidates = products
            .iter()
            .filter(|p| p.category == self.pending.category)
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        if let [only] = self.candidates.as_slice() {
            if only.name.to_lowercase() == needle {
                let only = only.clone();
                self.confirm_product(&only);
            }
        }
    }

    /// Binds the pending line to `product`. The entered quantity is kept.
    pub fn confirm_product(&mut self, product: &Product) {
        self.pending.inventory_id = Some(product.id);
        self.pending.category = product.category.clone();
        self.pending.product_name = product.name.clone();
    }

    pub fn set_quantity(&mut self, quantity: i64) {
        self.pending.quantity = quantity;
    }

    /// Adds the pending line to `draft`, then starts over.
    pub fn add_to(&mut self, draft: &mut TransactionDraft, products: &[Product]) -> CoreResult<()> {
        add_item(draft, &mut self.pending, products)?;
        self.candidates.clear();
        self.typed = false;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
