//! # Draft State
//!
//! The transaction being composed at the counter.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft State Operations                               │
//! │                                                                         │
//! │  Cashier Action           Command                 Draft Change          │
//! │  ──────────────           ───────                 ────────────          │
//! │                                                                         │
//! │  --item 코일팟/Pod A:2 ──► compose_items() ──────► items.push_front()   │
//! │                                                                         │
//! │  --payment card ─────────► set_payment() ────────► method, card company │
//! │                                                                         │
//! │  --total 30000 ──────────► set_payment() ────────► total_amount         │
//! │                                                                         │
//! │  (confirm) ──────────────► commit_sale() ────────► reset_after_commit() │
//! │                                                                         │
//! │  NOTE: commit_sale() holds the BusyFlag so a second commit cannot      │
//! │        start while the first one is waiting on the shop API.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rodeo_core::draft::TransactionDraft;

use super::lock;
use crate::error::{ApiError, ErrorCode};

/// Shared draft state.
#[derive(Debug, Default)]
pub struct DraftState {
    draft: Arc<Mutex<TransactionDraft>>,
    busy: BusyFlag,
}

impl DraftState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the draft.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let count = draft_state.with_draft(|d| d.items.len());
    /// ```
    pub fn with_draft<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&TransactionDraft) -> R,
    {
        let draft = lock(&self.draft);
        f(&draft)
    }

    /// Executes a function with write access to the draft.
    pub fn with_draft_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut TransactionDraft) -> R,
    {
        let mut draft = lock(&self.draft);
        f(&mut draft)
    }

    pub fn snapshot(&self) -> TransactionDraft {
        self.with_draft(TransactionDraft::clone)
    }

    pub fn busy(&self) -> &BusyFlag {
        &self.busy
    }
}

/// In-flight marker for commits and deletes.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    /// Claims the flag; released when the guard drops.
    pub fn try_acquire(&self) -> Result<BusyGuard, ApiError> {
        if self.0.swap(true, Ordering::AcqRel) {
            return Err(ApiError::new(
                ErrorCode::Busy,
                "이전 요청을 처리하는 중입니다. 잠시 후 다시 시도해주세요.",
            ));
        }
        Ok(BusyGuard(self.0.clone()))
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rodeo_core::{Money, PaymentMethod};

    #[test]
    fn test_busy_flag_is_exclusive() {
        let flag = BusyFlag::default();

        let guard = flag.try_acquire().unwrap();
        assert!(flag.is_busy());
        assert_eq!(flag.try_acquire().unwrap_err().code, ErrorCode::Busy);

        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_acquire().is_ok());
    }

    #[test]
    fn test_clones_share_the_flag() {
        let flag = BusyFlag::default();
        let other = flag.clone();
        let _guard = flag.try_acquire().unwrap();
        assert!(other.is_busy());
    }

    #[test]
    fn test_with_draft_mut() {
        let state = DraftState::new();
        state.with_draft_mut(|d| {
            d.set_payment_method(PaymentMethod::Transfer);
            d.set_total_amount(Money::from_won(5_000));
        });

        let snapshot = state.snapshot();
        assert_eq!(snapshot.payment_method, PaymentMethod::Transfer);
        assert_eq!(snapshot.total_amount, Money::from_won(5_000));
    }
}
