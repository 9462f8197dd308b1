//! # Ledger State
//!
//! Wraps the core `LedgerView` for the commands. Loads are ticketed:
//! `begin_load` before the request, `apply` with the response; a response
//! whose ticket was superseded is dropped.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use rodeo_core::ledger::{LedgerView, LoadTicket};
use rodeo_core::CommittedTransaction;

use super::lock;

#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    view: Arc<Mutex<LedgerView>>,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&self, date: NaiveDate) -> LoadTicket {
        lock(&self.view).begin_load(date)
    }

    /// Returns `false` when the ticket is stale and nothing changed.
    pub fn apply(&self, ticket: LoadTicket, transactions: Vec<CommittedTransaction>) -> bool {
        lock(&self.view).apply(ticket, transactions)
    }

    /// Executes a function with read access to the view.
    pub fn with_view<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&LedgerView) -> R,
    {
        let view = lock(&self.view);
        f(&view)
    }

    pub fn toggle_expand(&self, id: i64) -> Option<bool> {
        lock(&self.view).toggle_expand(id)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        lock(&self.view).date()
    }
}
