//! # Domain Types
//!
//! Core domain types shared by the client and the terminal app.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌─────────────────┐  │
//! │  │    Product      │   │ CommittedTransaction │   │ PaymentMethod   │  │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ─────────────  │  │
//! │  │  id (i64)       │   │  id (server)         │   │  Cash           │  │
//! │  │  name           │   │  items[]             │   │  Card           │  │
//! │  │  category       │   │  total_amount        │   │  Transfer       │  │
//! │  │  price          │   │  payment_method      │   └─────────────────┘  │
//! │  │  quantity       │   │  display_time        │                        │
//! │  └─────────────────┘   └──────────────────────┘                        │
//! │                                                                         │
//! │  Owned by the server. Read-only here apart from the UI-only             │
//! │  `expanded` flag on committed transactions.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Draft-side types (`TransactionDraft`, `LineItem`) live in [`crate::draft`].

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product row from the shop inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Server-assigned inventory id.
    pub id: i64,

    /// Display name shown to the cashier.
    pub name: String,

    /// Category, e.g. "코일팟" or "입호흡액상".
    pub category: String,

    /// Shelf price in won.
    pub price: Money,

    /// Units in stock (never negative).
    pub quantity: i64,
}

impl Product {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        category: impl Into<String>,
        price: Money,
        quantity: i64,
    ) -> Self {
        Product {
            id,
            name: name.into(),
            category: category.into(),
            price,
            quantity,
        }
    }

    /// Checks whether `quantity` more units can be sold on top of `already_taken`.
    pub fn has_stock_for(&self, already_taken: i64, quantity: i64) -> bool {
        already_taken + quantity <= self.quantity
    }
}

// =============================================================================
// Product Input
// =============================================================================

/// Body for creating or updating an inventory row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductInput {
    pub name: String,
    pub category: String,
    pub price: Money,
    pub quantity: i64,
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        ProductInput {
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            quantity: product.quantity,
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid. Recorded only; no payment is processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash.
    #[default]
    Cash,
    /// Card on an external terminal. Requires a card issuer.
    Card,
    /// Bank transfer.
    Transfer,
}

impl PaymentMethod {
    /// Wire representation (`cash`, `card`, `transfer`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
        }
    }

    /// Label shown in transaction lists, e.g. `카드(삼성)`.
    pub fn display_label(&self, card_company: &str) -> String {
        match self {
            PaymentMethod::Card => format!("카드({})", card_company),
            PaymentMethod::Transfer => "계좌이체".to_string(),
            PaymentMethod::Cash => "현금".to_string(),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    /// Accepts the wire names and the Korean labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "현금" => Ok(PaymentMethod::Cash),
            "card" | "카드" => Ok(PaymentMethod::Card),
            "transfer" | "계좌이체" => Ok(PaymentMethod::Transfer),
            other => Err(ValidationError::invalid_format(
                "결제 방식",
                format!("알 수 없는 값 '{}'", other),
            )),
        }
    }
}

// =============================================================================
// Committed Transaction
// =============================================================================

/// A line of a transaction already stored on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommittedItem {
    /// Server row id, when the server sends one.
    pub id: Option<i64>,
    pub inventory_id: i64,
    /// Product name joined in by the server.
    pub product_name: Option<String>,
    /// Product category joined in by the server.
    pub category: Option<String>,
    pub quantity: i64,
    pub price_per_unit: Option<Money>,
    pub item_total: Option<Money>,
}

/// A stored sale as shown in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommittedTransaction {
    pub id: i64,
    pub items: Vec<CommittedItem>,
    pub total_amount: Money,
    pub payment_method: PaymentMethod,
    /// Card issuer; the server keeps it in `note` for card payments.
    pub card_company: String,
    pub note: String,
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    #[ts(as = "Option<String>")]
    pub sale_time: Option<NaiveTime>,
    /// `HH:MM`, or a placeholder when the server sent no time.
    pub display_time: String,
    /// UI-only: whether the item table is unfolded.
    pub expanded: bool,
}

impl CommittedTransaction {
    /// Label for the payment column, e.g. `카드(신한)`.
    pub fn payment_display(&self) -> String {
        self.payment_method.display_label(&self.card_company)
    }

    /// One-line summary: first item, its quantity, and how many more follow.
    ///
    /// ```text
    /// Pod A (2개) 외 2개 상품
    /// ```
    pub fn summary_line(&self) -> String {
        let Some(first) = self.items.first() else {
            return String::new();
        };
        let name = first.product_name.as_deref().unwrap_or("");
        let mut line = format!("{} ({}개)", name, first.quantity);
        if self.items.len() > 1 {
            line.push_str(&format!(" 외 {}개 상품", self.items.len() - 1));
        }
        line
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn committed(items: Vec<CommittedItem>) -> CommittedTransaction {
        CommittedTransaction {
            id: 7,
            items,
            total_amount: Money::from_won(12_000),
            payment_method: PaymentMethod::Card,
            card_company: "삼성".to_string(),
            note: "삼성".to_string(),
            sale_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            sale_time: NaiveTime::from_hms_opt(14, 5, 9),
            display_time: "14:05".to_string(),
            expanded: false,
        }
    }

    fn item(name: &str, quantity: i64) -> CommittedItem {
        CommittedItem {
            id: None,
            inventory_id: 1,
            product_name: Some(name.to_string()),
            category: Some("코일팟".to_string()),
            quantity,
            price_per_unit: None,
            item_total: None,
        }
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("CARD".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!("계좌이체".parse::<PaymentMethod>().unwrap(), PaymentMethod::Transfer);
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_payment_method_wire_format() {
        let json = serde_json::to_string(&PaymentMethod::Transfer).unwrap();
        assert_eq!(json, "\"transfer\"");
        let parsed: PaymentMethod = serde_json::from_str("\"card\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Card);
    }

    #[test]
    fn test_payment_display_labels() {
        assert_eq!(PaymentMethod::Card.display_label("신한"), "카드(신한)");
        assert_eq!(PaymentMethod::Transfer.display_label(""), "계좌이체");
        assert_eq!(PaymentMethod::Cash.display_label("ignored"), "현금");
    }

    #[test]
    fn test_summary_line() {
        let single = committed(vec![item("Pod A", 2)]);
        assert_eq!(single.summary_line(), "Pod A (2개)");

        let many = committed(vec![item("Pod A", 2), item("Pod B", 1), item("Pod C", 1)]);
        assert_eq!(many.summary_line(), "Pod A (2개) 외 2개 상품");
        assert_eq!(many.payment_display(), "카드(삼성)");

        assert_eq!(committed(vec![]).summary_line(), "");
    }

    #[test]
    fn test_has_stock_for() {
        let product = Product::new(1, "Pod A", "코일팟", Money::from_won(5_000), 10);
        assert!(product.has_stock_for(6, 4));
        assert!(!product.has_stock_for(6, 5));
    }
}
