//! # Ledger View
//!
//! Committed transactions for one sale date.
//!
//! ## Out-of-Order Responses
//! ```text
//! begin_load(5/1) ──► ticket #1 ─────────────────────────┐
//! begin_load(5/2) ──► ticket #2 ──────┐                  │
//!                                     ▼                  ▼
//!                              apply(#2, …) ✓      apply(#1, …) ✗ discarded
//! ```
//!
//! Every load takes a [`LoadTicket`]. Only the ticket of the most recent
//! load may replace the list, so a slow response for a date the cashier
//! has already left never overwrites the current one.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::CommittedTransaction;

/// Shown when the server sent no sale time.
pub const MISSING_TIME_LABEL: &str = "시간 정보 없음";

/// Identifies one ledger load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoadTicket {
    pub generation: u64,
    #[ts(as = "String")]
    pub date: NaiveDate,
}

/// The list of committed transactions shown for a date.
#[derive(Debug, Clone, Default)]
pub struct LedgerView {
    date: Option<NaiveDate>,
    transactions: Vec<CommittedTransaction>,
    generation: u64,
}

impl LedgerView {
    pub fn new() -> Self {
        LedgerView::default()
    }

    /// Starts a load for `date`. Earlier tickets become stale.
    ///
    /// The shown date changes only when the load is applied, so a failed
    /// load leaves date, list and total describing the same day.
    pub fn begin_load(&mut self, date: NaiveDate) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            generation: self.generation,
            date,
        }
    }

    /// Whether `ticket` belongs to the most recent load.
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Replaces the list with a load result.
    ///
    /// Each transaction is normalized: `display_time` is `HH:MM` (or the
    /// missing-time label) and `expanded` starts false.
    ///
    /// Returns `false` and changes nothing when the ticket is stale.
    pub fn apply(&mut self, ticket: LoadTicket, transactions: Vec<CommittedTransaction>) -> bool {
        if !self.is_current(&ticket) {
            return false;
        }

        self.date = Some(ticket.date);
        self.transactions = transactions
            .into_iter()
            .map(|mut tx| {
                tx.display_time = display_time(tx.sale_time);
                tx.expanded = false;
                tx
            })
            .collect();
        true
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn transactions(&self) -> &[CommittedTransaction] {
        &self.transactions
    }

    pub fn get(&self, id: i64) -> Option<&CommittedTransaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    /// Flips `expanded` on the matching transaction only.
    ///
    /// Returns the new state, or `None` when no transaction has that id.
    pub fn toggle_expand(&mut self, id: i64) -> Option<bool> {
        let tx = self.transactions.iter_mut().find(|tx| tx.id == id)?;
        tx.expanded = !tx.expanded;
        Some(tx.expanded)
    }

    /// Sum of `total_amount` over the loaded transactions.
    pub fn total_sales(&self) -> Money {
        self.transactions.iter().map(|tx| tx.total_amount).sum()
    }
}

/// `HH:MM` for a sale time, or [`MISSING_TIME_LABEL`].
pub fn display_time(time: Option<NaiveTime>) -> String {
    match time {
        Some(time) => time.format("%H:%M").to_string(),
        None => MISSING_TIME_LABEL.to_string(),
    }
}
