//! # Sale Commands
//!
//! Composing a transaction at the counter and committing it.
//!
//! ## Commit Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        commit_sale                                      │
//! │                                                                         │
//! │  BusyFlag ── already held ──► Busy (nothing sent)                       │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  settle(draft, catalog) ── rule broken ──► ValidationError /            │
//! │     │                                      InsufficientStock            │
//! │     │                                      (nothing sent, draft kept)   │
//! │     ▼                                                                   │
//! │  POST /api/sales ── refused ──► PersistenceFailed (draft kept)          │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  draft.reset_after_commit()                                             │
//! │  reload ledger for the sale date, refresh catalog                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use rodeo_client::ApiClient;
use rodeo_core::composer::{Composer, ComposerStage};
use rodeo_core::draft::TransactionDraft;
use rodeo_core::settlement::{settle, AllocationPolicy};
use rodeo_core::validation::validate_quantity;
use rodeo_core::{CoreError, Money, PaymentMethod, ValidationError, CARD_COMPANIES};

use crate::error::ApiError;
use crate::state::{CatalogState, DraftState, LedgerState};

pub const SALE_SAVED: &str = "거래가 성공적으로 저장되었습니다.";

// =============================================================================
// Item Spec
// =============================================================================

/// One `카테고리/상품명:수량` entry from the command line.
///
/// The quantity defaults to 1 when `:수량` is left off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub category: String,
    pub product: String,
    pub quantity: i64,
}

impl FromStr for ItemSpec {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (category, rest) = s.split_once('/').ok_or(ValidationError::IncompleteItem)?;

        let (product, quantity) = match rest.rsplit_once(':') {
            Some((product, qty)) => {
                let qty = qty
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ValidationError::invalid_format("수량", qty.trim()))?;
                (product, qty)
            }
            None => (rest, 1),
        };

        let category = category.trim();
        let product = product.trim();
        if category.is_empty() || product.is_empty() {
            return Err(ValidationError::IncompleteItem);
        }

        Ok(ItemSpec {
            category: category.to_string(),
            product: product.to_string(),
            quantity,
        })
    }
}

// =============================================================================
// Composing
// =============================================================================

/// Adds every spec to the draft through the composer.
///
/// All or nothing: when one spec fails, the draft is left as it was.
pub fn compose_items(
    draft: &DraftState,
    catalog: &CatalogState,
    specs: &[ItemSpec],
) -> Result<(), ApiError> {
    let products = catalog.products();
    let mut working = draft.snapshot();

    for spec in specs {
        validate_quantity(spec.quantity).map_err(CoreError::from)?;

        let mut composer = Composer::new();
        composer.select_category(&spec.category, &products);
        composer.type_product(&spec.product, &products);

        if composer.stage() != ComposerStage::ProductConfirmed {
            let needle = spec.product.to_lowercase();
            let exact = composer
                .candidates()
                .iter()
                .find(|p| p.name.to_lowercase() == needle)
                .cloned();
            match exact {
                Some(product) => composer.confirm_product(&product),
                None => {
                    return Err(CoreError::ProductNotFound(format!(
                        "{}/{}",
                        spec.category, spec.product
                    ))
                    .into())
                }
            }
        }

        composer.set_quantity(spec.quantity);
        composer.add_to(&mut working, &products)?;
        debug!(category = %spec.category, product = %spec.product, quantity = spec.quantity, "Line added");
    }

    draft.with_draft_mut(|d| *d = working);
    Ok(())
}

/// Sets the payment method, the card issuer and the entered total.
///
/// A card issuer given for a non-card payment is ignored.
pub fn set_payment(
    draft: &DraftState,
    method: PaymentMethod,
    card_company: Option<&str>,
    total: Money,
) {
    draft.with_draft_mut(|d| {
        d.set_payment_method(method);
        match (method, card_company) {
            (PaymentMethod::Card, Some(company)) => {
                let company = company.trim();
                if !CARD_COMPANIES.contains(&company) {
                    warn!(company, "Card issuer not in the usual list");
                }
                d.set_card_company(company);
            }
            (_, Some(company)) => debug!(company, "Card issuer ignored for non-card payment"),
            _ => {}
        }
        d.set_total_amount(total);
    });
}

// =============================================================================
// Commit
// =============================================================================

/// What the cashier sees after a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitReceipt {
    pub sale_date: NaiveDate,
    pub total_amount: Money,
    pub payment: String,
    pub item_count: usize,
    pub total_quantity: i64,
    pub message: String,
}

/// Settles the draft and records it.
///
/// On any failure the draft is unchanged. After success the draft is reset
/// (payment method kept) and the ledger for `sale_date` is reloaded; a failed
/// reload is logged, not returned, since the sale is already stored.
pub async fn commit_sale(
    client: &ApiClient,
    catalog: &CatalogState,
    draft: &DraftState,
    ledger: &LedgerState,
    policy: AllocationPolicy,
    sale_date: NaiveDate,
    sale_time: NaiveTime,
) -> Result<CommitReceipt, ApiError> {
    let _busy = draft.busy().try_acquire()?;

    let snapshot: TransactionDraft = draft.snapshot();
    debug!(
        draft_id = %snapshot.id,
        items = snapshot.items.len(),
        total = snapshot.total_amount.won(),
        "commit_sale command"
    );

    let payload = settle(&snapshot, &catalog.products(), sale_date, sale_time, policy)?;

    client.sales().create(&payload).await.map_err(|e| {
        warn!(
            draft_id = %snapshot.id,
            error = %e,
            retryable = e.is_retryable(),
            "Sale not recorded, draft kept"
        );
        ApiError::from(e)
    })?;

    draft.with_draft_mut(TransactionDraft::reset_after_commit);
    info!(
        draft_id = %snapshot.id,
        %sale_date,
        total = payload.sale_data.total_amount.won(),
        "Sale committed"
    );

    if let Err(e) = super::ledger::load_ledger(client, ledger, sale_date).await {
        warn!(error = %e, "Ledger reload after commit failed");
    }
    if let Err(e) = super::inventory::refresh_catalog(client, catalog).await {
        warn!(error = %e, "Catalog refresh after commit failed");
    }

    Ok(CommitReceipt {
        sale_date,
        total_amount: snapshot.total_amount,
        payment: snapshot.payment_method.display_label(&snapshot.card_company),
        item_count: snapshot.items.len(),
        total_quantity: snapshot.total_quantity(),
        message: SALE_SAVED.to_string(),
    })
}
