//! # rodeo-core: Pure Business Logic for Rodeo Ledger
//!
//! This crate holds the sales-entry rules of the shop ledger as pure
//! functions and plain data. Nothing in here talks to the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Rodeo Ledger Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/terminal (rodeo CLI)                    │   │
//! │  │    login ──► inventory ──► sales record ──► sales list          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rodeo-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌────────────┐        │   │
//! │  │   │ catalog  │ │ composer │ │  draft   │ │ settlement │        │   │
//! │  │   │ Product  │ │ Pending  │ │ LineItem │ │ SalePayload│        │   │
//! │  │   │ LowStock │ │ addItem  │ │ Payment  │ │ Allocation │        │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └────────────┘        │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO HTTP • NO TOKENS • PURE FUNCTIONS                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              rodeo-client (HTTP collaborator)                   │   │
//! │  │        /api/inventory, /api/sales, /api/monthly, /api/memos     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Won amounts and half-up proportional rounding
//! - [`types`] - Domain types (Product, PaymentMethod, CommittedTransaction, ...)
//! - [`catalog`] - Category set, low-stock rule, inventory filters
//! - [`draft`] - The transaction being assembled
//! - [`composer`] - Category → product → quantity selection and `add_item`
//! - [`settlement`] - Validation and amount allocation on commit
//! - [`ledger`] - Committed transactions for one date
//! - [`memo`], [`monthly`] - Note and monthly summary view helpers
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use rodeo_core::composer::{add_item, PendingItem};
//! use rodeo_core::draft::TransactionDraft;
//! use rodeo_core::{Money, PaymentMethod, Product};
//!
//! let products = vec![Product::new(1, "Pod A", "코일팟", Money::from_won(5_000), 10)];
//! let mut draft = TransactionDraft::new(PaymentMethod::Cash);
//!
//! let mut pending = PendingItem::for_product(&products[0], 6);
//! add_item(&mut draft, &mut pending, &products).unwrap();
//!
//! let mut pending = PendingItem::for_product(&products[0], 5);
//! let err = add_item(&mut draft, &mut pending, &products).unwrap_err();
//! assert_eq!(err.max_addable(), Some(4));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod composer;
pub mod draft;
pub mod error;
pub mod ledger;
pub mod memo;
pub mod money;
pub mod monthly;
pub mod settlement;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Card issuers offered when the payment method is card.
pub const CARD_COMPANIES: [&str; 10] = [
    "KB국민", "삼성", "신한", "현대", "롯데", "우리", "하나", "농협", "BC", "기타",
];
