//! # State Module
//!
//! Application state for the terminal app.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌────────────┐  │
//! │  │ CatalogState │  │  DraftState  │  │ LedgerState  │  │ AppConfig  │  │
//! │  │              │  │              │  │              │  │            │  │
//! │  │  products    │  │  Arc<Mutex<  │  │  Arc<Mutex<  │  │  api       │  │
//! │  │  snapshot    │  │   Draft>>    │  │  LedgerView  │  │  session   │  │
//! │  │              │  │  BusyFlag    │  │  >>          │  │  store     │  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CatalogState, DraftState, LedgerState: Arc<Mutex<T>>                │
//! │  • BusyFlag: AtomicBool, one commit or delete at a time                │
//! │  • AppConfig: Read-only after loading                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod catalog;
mod config;
mod draft;
mod ledger;

pub use catalog::CatalogState;
pub use config::{ApiSection, AppConfig, ConfigError, SessionSection, SettlementSection, StoreSection};
pub use draft::{BusyFlag, BusyGuard, DraftState};
pub use ledger::LedgerState;

use std::sync::{Mutex, MutexGuard};

/// Locks a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
