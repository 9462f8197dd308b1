//! # Transaction Draft
//!
//! The in-progress, uncommitted transaction.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Draft Lifecycle                                   │
//! │                                                                         │
//! │   new(method) ──► add_item ──► add_item ──► set_total_amount            │
//! │                      │                          │                       │
//! │                      ▼                          ▼                       │
//! │                 remove_item                  settle ──► POST /api/sales │
//! │                                                            │            │
//! │                                          ┌─────────────────┘            │
//! │                                          ▼                              │
//! │                               reset_after_commit()                      │
//! │                     (items empty, total 0, SAME payment method)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are ordered most-recently-added first
//! - Quantity per inventory id never exceeds stock (enforced by the composer)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::types::{PaymentMethod, Product};

// =============================================================================
// Line Item
// =============================================================================

/// One product/quantity pairing within a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Local id (UUID v4), used only to remove the line again.
    pub local_id: String,
    pub inventory_id: i64,
    pub category: String,
    pub product_name: String,
    /// Always ≥ 1.
    pub quantity: i64,
}

impl LineItem {
    /// Creates a line item with a fresh local id.
    pub fn new(product: &Product, quantity: i64) -> Self {
        LineItem {
            local_id: Uuid::new_v4().to_string(),
            inventory_id: product.id,
            category: product.category.clone(),
            product_name: product.name.clone(),
            quantity,
        }
    }
}

// =============================================================================
// Transaction Draft
// =============================================================================

/// A transaction being assembled at the counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionDraft {
    /// Temporary local id; the server assigns the real one on commit.
    pub id: String,

    /// Most recently added first.
    pub items: Vec<LineItem>,

    /// The single amount the cashier typed for the whole transaction.
    pub total_amount: Money,

    pub payment_method: PaymentMethod,

    /// Card issuer; empty unless paying by card.
    pub card_company: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl TransactionDraft {
    pub fn new(payment_method: PaymentMethod) -> Self {
        TransactionDraft {
            id: Uuid::new_v4().to_string(),
            items: Vec::new(),
            total_amount: Money::zero(),
            payment_method,
            card_company: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Switches the payment method. Leaving card clears the issuer.
    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
        if method != PaymentMethod::Card {
            self.card_company.clear();
        }
    }

    pub fn set_card_company(&mut self, company: impl Into<String>) {
        self.card_company = company.into();
    }

    pub fn set_total_amount(&mut self, amount: Money) {
        self.total_amount = amount;
    }

    /// Quantity already in the draft for one inventory id.
    pub fn quantity_for(&self, inventory_id: i64) -> i64 {
        self.items
            .iter()
            .filter(|item| item.inventory_id == inventory_id)
            .map(|item| item.quantity)
            .sum()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Prepends a line item.
    pub(crate) fn push_front(&mut self, item: LineItem) {
        self.items.insert(0, item);
    }

    /// Removes the line with `local_id`. Unknown ids are ignored.
    ///
    /// Returns whether a line was removed.
    pub fn remove_item(&mut self, local_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.local_id != local_id);
        self.items.len() != before
    }

    /// Empties the draft after a successful commit.
    ///
    /// Only the payment method carries over. The issuer is cleared so the
    /// next card sale asks again.
    pub fn reset_after_commit(&mut self) {
        *self = TransactionDraft::new(self.payment_method);
    }
}

impl Default for TransactionDraft {
    fn default() -> Self {
        TransactionDraft::new(PaymentMethod::default())
    }
}
