//! # Ledger Commands
//!
//! The daily list of committed transactions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use rodeo_client::ApiClient;
use rodeo_core::{CommittedTransaction, Money};

use crate::error::{ApiError, ErrorCode};
use crate::state::{BusyFlag, LedgerState};

pub const DELETE_CONFIRMATION: &str =
    "정말로 이 거래를 삭제하시겠습니까? 이 작업은 되돌릴 수 없습니다.";
pub const TRANSACTION_DELETED: &str = "거래가 삭제되었습니다.";
const TRANSACTION_NOT_FOUND: &str = "거래 내역을 찾을 수 없습니다.";

/// Ledger contents for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub date: Option<NaiveDate>,
    pub transactions: Vec<CommittedTransaction>,
    pub total_sales: Money,
}

/// Loads the transactions for `date`.
///
/// Returns `false` when a newer load started meanwhile; its result wins and
/// this one is dropped.
pub async fn load_ledger(
    client: &ApiClient,
    ledger: &LedgerState,
    date: NaiveDate,
) -> Result<bool, ApiError> {
    let ticket = ledger.begin_load(date);
    debug!(%date, generation = ticket.generation, "load_ledger command");

    let transactions = client.sales().list_by_date(date).await?;
    let applied = ledger.apply(ticket, transactions);
    if !applied {
        debug!(%date, generation = ticket.generation, "Superseded ledger load dropped");
    }
    Ok(applied)
}

pub fn ledger_summary(ledger: &LedgerState) -> LedgerSummary {
    ledger.with_view(|view| LedgerSummary {
        date: view.date(),
        transactions: view.transactions().to_vec(),
        total_sales: view.total_sales(),
    })
}

/// Flips the detail view of one transaction.
pub fn toggle_expand(ledger: &LedgerState, id: i64) -> Result<bool, ApiError> {
    ledger
        .toggle_expand(id)
        .ok_or_else(|| ApiError::new(ErrorCode::NotFound, TRANSACTION_NOT_FOUND))
}

/// Deletes a committed transaction, then reloads the ledger's date.
///
/// Requires `confirmed`; the caller asks the cashier first. When the delete
/// fails the loaded list stays as it was. A failed reload after a successful
/// delete is logged, not returned, since the row is already gone.
pub async fn delete_transaction(
    client: &ApiClient,
    ledger: &LedgerState,
    busy: &BusyFlag,
    id: i64,
    confirmed: bool,
) -> Result<&'static str, ApiError> {
    if !confirmed {
        return Err(ApiError::new(
            ErrorCode::ConfirmationRequired,
            DELETE_CONFIRMATION,
        ));
    }
    let _busy = busy.try_acquire()?;

    debug!(id, "delete_transaction command");
    client.sales().delete(id).await?;
    info!(id, "Transaction deleted");

    if let Some(date) = ledger.date() {
        if let Err(e) = load_ledger(client, ledger, date).await {
            warn!(id, %date, error = %e, "Ledger reload after delete failed");
        }
    }
    Ok(TRANSACTION_DELETED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rodeo_client::testing::MockApi;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn row(id: i64, total: i64, time: Option<&str>) -> serde_json::Value {
        json!({
            "id": id,
            "items": [{ "inventory_id": 1, "name": "Pod A", "quantity": 1, "item_total": total }],
            "total_amount": total,
            "payment_method": "transfer",
            "note": "",
            "sale_date": "2024-05-01",
            "sale_time": time,
        })
    }

    #[tokio::test]
    async fn test_load_and_summary() {
        let mock = MockApi::start().await;
        mock.push_sale_row(row(1, 12_000, Some("09:15:00"))).await;
        mock.push_sale_row(row(2, 8_000, None)).await;
        let client = mock.signed_in_client();
        let ledger = LedgerState::new();

        assert!(load_ledger(&client, &ledger, date()).await.unwrap());

        let summary = ledger_summary(&ledger);
        assert_eq!(summary.date, Some(date()));
        assert_eq!(summary.total_sales, Money::from_won(20_000));
        assert_eq!(summary.transactions[0].display_time, "09:15");
        assert_eq!(summary.transactions[1].display_time, "시간 정보 없음");
        assert!(summary.transactions.iter().all(|tx| !tx.expanded));
    }

    #[tokio::test]
    async fn test_superseded_load_is_dropped() {
        let mock = MockApi::start().await;
        mock.push_sale_row(row(1, 12_000, Some("09:15:00"))).await;
        let client = mock.signed_in_client();
        let ledger = LedgerState::new();

        // A later load for another date starts before the first one lands.
        let stale = ledger.begin_load(date());
        let later = date().succ_opt().unwrap();
        assert!(load_ledger(&client, &ledger, later).await.unwrap());

        let transactions = client.sales().list_by_date(date()).await.unwrap();
        assert!(!ledger.apply(stale, transactions));

        let summary = ledger_summary(&ledger);
        assert_eq!(summary.date, Some(later));
        assert!(summary.transactions.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_expand() {
        let mock = MockApi::start().await;
        mock.push_sale_row(row(1, 12_000, None)).await;
        mock.push_sale_row(row(2, 8_000, None)).await;
        let client = mock.signed_in_client();
        let ledger = LedgerState::new();
        load_ledger(&client, &ledger, date()).await.unwrap();

        assert!(toggle_expand(&ledger, 2).unwrap());
        let summary = ledger_summary(&ledger);
        assert!(!summary.transactions[0].expanded);
        assert!(summary.transactions[1].expanded);

        assert!(!toggle_expand(&ledger, 2).unwrap());
        assert_eq!(toggle_expand(&ledger, 9).unwrap_err().code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let mock = MockApi::start().await;
        let client = mock.signed_in_client();

        let err = delete_transaction(&client, &LedgerState::new(), &BusyFlag::default(), 1, false)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ConfirmationRequired);
        assert_eq!(err.message, DELETE_CONFIRMATION);
        assert!(mock.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_reloads() {
        let mock = MockApi::start().await;
        mock.push_sale_row(row(1, 12_000, None)).await;
        mock.push_sale_row(row(2, 8_000, None)).await;
        let client = mock.signed_in_client();
        let ledger = LedgerState::new();
        load_ledger(&client, &ledger, date()).await.unwrap();

        delete_transaction(&client, &ledger, &BusyFlag::default(), 1, true)
            .await
            .unwrap();

        let summary = ledger_summary(&ledger);
        assert_eq!(summary.transactions.len(), 1);
        assert_eq!(summary.total_sales, Money::from_won(8_000));
    }

    #[tokio::test]
    async fn test_delete_succeeds_when_reload_fails() {
        let mock = MockApi::start().await;
        mock.push_sale_row(row(1, 12_000, None)).await;
        mock.push_sale_row(row(2, 8_000, None)).await;
        let client = mock.signed_in_client();
        let ledger = LedgerState::new();
        load_ledger(&client, &ledger, date()).await.unwrap();
        mock.fail_method_with("GET", 500, None).await;

        let done = delete_transaction(&client, &ledger, &BusyFlag::default(), 1, true)
            .await
            .unwrap();

        assert_eq!(done, TRANSACTION_DELETED);
        let deletes = mock
            .requests()
            .await
            .into_iter()
            .filter(|r| r.method == "DELETE" && r.path == "/api/sales/1")
            .count();
        assert_eq!(deletes, 1);

        // The reload failed, so the view still shows the last loaded day.
        let summary = ledger_summary(&ledger);
        assert_eq!(summary.date, Some(date()));
        assert_eq!(summary.transactions.len(), 2);
        assert_eq!(summary.total_sales, Money::from_won(20_000));
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_list() {
        let mock = MockApi::start().await;
        mock.push_sale_row(row(1, 12_000, None)).await;
        let client = mock.signed_in_client();
        let ledger = LedgerState::new();
        load_ledger(&client, &ledger, date()).await.unwrap();
        mock.fail_with(500, None).await;

        let err = delete_transaction(&client, &ledger, &BusyFlag::default(), 1, true)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::PersistenceFailed);
        assert_eq!(err.message, "판매 기록 삭제 중 오류가 발생했습니다.");
        assert_eq!(ledger_summary(&ledger).transactions.len(), 1);
    }
}
