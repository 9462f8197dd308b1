//! # Settlement Engine
//!
//! Converts a draft into the sale payload sent to `POST /api/sales`.
//!
//! ## Commit Checks (in order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. items empty?                     ──► EmptyTransaction               │
//! │  2. total_amount ≤ 0?                ──► InvalidAmount                  │
//! │  3. card without issuer?             ──► MissingCardCompany             │
//! │  4. per inventory id: Σqty > stock?  ──► StockInsufficient              │
//! │     (product gone from catalog       ──► ProductNotFound)               │
//! │  5. allocate total_amount over items by quantity                        │
//! │  6. build { sale_data, sale_items }                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Allocation
//! The cashier enters ONE total. Each line gets a share proportional to its
//! quantity:
//!
//! ```text
//! items [2, 3], total 1000 ──► 1000×2/5 = 400, 1000×3/5 = 600
//! items [1, 1, 1], total 1000:
//!   Independent: 333, 333, 333          (sum 999)
//!   Reconciled:  333, 333, 334          (sum 1000)
//! ```
//!
//! `Reconciled` gives every line but the last its own rounded share; the
//! last line gets whatever is left, so it absorbs the residual. When the
//! rounded shares would already overrun the total (six lines for 3 won),
//! each earlier line is capped at what remains and later lines get 0.
//! `Independent` rounds every line on its own; the sum may drift from the
//! total by up to `items - 1` won.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::draft::TransactionDraft;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{PaymentMethod, Product};

// =============================================================================
// Allocation Policy
// =============================================================================

/// How the entered total is split across line items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum AllocationPolicy {
    /// Line totals always sum to the entered total.
    #[default]
    Reconciled,
    /// Each line rounded on its own.
    Independent,
}

impl fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationPolicy::Reconciled => f.write_str("reconciled"),
            AllocationPolicy::Independent => f.write_str("independent"),
        }
    }
}

impl FromStr for AllocationPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reconciled" => Ok(AllocationPolicy::Reconciled),
            "independent" => Ok(AllocationPolicy::Independent),
            other => Err(ValidationError::invalid_format(
                "allocation",
                format!("expected 'reconciled' or 'independent', got '{}'", other),
            )),
        }
    }
}

/// Splits `total` across `quantities` proportionally, half-up rounded.
///
/// Returns one amount per quantity, in the same order. A zero total
/// quantity yields all zeros.
pub fn allocate(total: Money, quantities: &[i64], policy: AllocationPolicy) -> Vec<Money> {
    let total_quantity: i64 = quantities.iter().sum();

    match policy {
        AllocationPolicy::Independent => quantities
            .iter()
            .map(|&qty| total.share_of(qty, total_quantity))
            .collect(),
        AllocationPolicy::Reconciled => {
            let Some((_, earlier)) = quantities.split_last() else {
                return Vec::new();
            };
            let mut remaining = total;
            let mut shares: Vec<Money> = earlier
                .iter()
                .map(|&qty| {
                    let share = total
                        .share_of(qty, total_quantity)
                        .min(remaining)
                        .max(Money::zero());
                    remaining = remaining - share;
                    share
                })
                .collect();
            shares.push(remaining);
            shares
        }
    }
}

// =============================================================================
// Sale Payload
// =============================================================================

/// Header row of a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleData {
    /// `YYYY-MM-DD`
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    /// `HH:MM:SS`
    #[ts(as = "String")]
    pub sale_time: NaiveTime,
    pub total_amount: Money,
    pub payment_method: PaymentMethod,
    /// Card issuer for card payments, empty otherwise.
    pub note: String,
}

/// One settled line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleItemPayload {
    pub inventory_id: i64,
    pub quantity: i64,
    pub price_per_unit: Money,
    pub item_total: Money,
}

/// Body of `POST /api/sales`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalePayload {
    pub sale_data: SaleData,
    pub sale_items: Vec<SaleItemPayload>,
}

impl SalePayload {
    /// Sum of the settled line totals.
    pub fn items_total(&self) -> Money {
        self.sale_items.iter().map(|item| item.item_total).sum()
    }
}

// =============================================================================
// Settle
// =============================================================================

/// Validates `draft` against `products` and builds the sale payload.
///
/// Nothing here touches the network: any error means no request is sent.
///
/// ## Example
/// ```rust
/// use chrono::{NaiveDate, NaiveTime};
/// use rodeo_core::composer::{add_item, PendingItem};
/// use rodeo_core::draft::TransactionDraft;
/// use rodeo_core::settlement::{settle, AllocationPolicy};
/// use rodeo_core::{Money, PaymentMethod, Product};
///
/// let products = vec![
///     Product::new(1, "Pod A", "코일팟", Money::from_won(5_000), 10),
///     Product::new(2, "Pod B", "코일팟", Money::from_won(5_000), 10),
/// ];
/// let mut draft = TransactionDraft::new(PaymentMethod::Cash);
/// add_item(&mut draft, &mut PendingItem::for_product(&products[0], 2), &products).unwrap();
/// add_item(&mut draft, &mut PendingItem::for_product(&products[1], 3), &products).unwrap();
/// draft.set_total_amount(Money::from_won(1_000));
///
/// let payload = settle(
///     &draft,
///     &products,
///     NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
///     NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
///     AllocationPolicy::default(),
/// )
/// .unwrap();
///
/// assert_eq!(payload.items_total(), Money::from_won(1_000));
/// ```
pub fn settle(
    draft: &TransactionDraft,
    products: &[Product],
    sale_date: NaiveDate,
    sale_time: NaiveTime,
    policy: AllocationPolicy,
) -> CoreResult<SalePayload> {
    if draft.items.is_empty() {
        return Err(CoreError::EmptyTransaction);
    }

    if !draft.total_amount.is_positive() {
        return Err(CoreError::InvalidAmount);
    }

    let card_company = draft.card_company.trim();
    if draft.payment_method == PaymentMethod::Card && card_company.is_empty() {
        return Err(CoreError::MissingCardCompany);
    }

    check_stock(draft, products)?;

    let quantities: Vec<i64> = draft.items.iter().map(|item| item.quantity).collect();
    let totals = allocate(draft.total_amount, &quantities, policy);

    let sale_items = draft
        .items
        .iter()
        .zip(totals)
        .map(|(item, item_total)| SaleItemPayload {
            inventory_id: item.inventory_id,
            quantity: item.quantity,
            price_per_unit: item_total.per_unit(item.quantity),
            item_total,
        })
        .collect();

    let note = match draft.payment_method {
        PaymentMethod::Card => card_company.to_string(),
        _ => String::new(),
    };

    Ok(SalePayload {
        sale_data: SaleData {
            sale_date,
            sale_time: sale_time.with_nanosecond(0).unwrap_or(sale_time),
            total_amount: draft.total_amount,
            payment_method: draft.payment_method,
            note,
        },
        sale_items,
    })
}

/// Re-checks stock per distinct inventory id; the catalog may have moved
/// since the lines were added.
fn check_stock(draft: &TransactionDraft, products: &[Product]) -> CoreResult<()> {
    let mut seen = HashSet::new();

    for item in &draft.items {
        if !seen.insert(item.inventory_id) {
            continue;
        }

        let product = products
            .iter()
            .find(|p| p.id == item.inventory_id)
            .ok_or_else(|| CoreError::ProductNotFound(item.product_name.clone()))?;

        let requested = draft.quantity_for(item.inventory_id);
        if requested > product.quantity {
            return Err(CoreError::StockInsufficient {
                product: product.name.clone(),
                available: product.quantity,
                already_added: 0,
                requested,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
