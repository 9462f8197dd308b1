//! # Sales Repository
//!
//! Committed transactions: list by date, create from a settled payload,
//! delete.

use chrono::NaiveDate;
use reqwest::Method;
use tracing::{debug, info};

use rodeo_core::settlement::SalePayload;
use rodeo_core::CommittedTransaction;

use crate::client::ApiClient;
use crate::error::ClientResult;
use crate::wire::{convert_all, RawSale};

#[derive(Debug, Clone)]
pub struct SalesRepository {
    client: ApiClient,
}

impl SalesRepository {
    pub fn new(client: ApiClient) -> Self {
        SalesRepository { client }
    }

    /// Transactions recorded on `date`, with their nested items.
    pub async fn list_by_date(&self, date: NaiveDate) -> ClientResult<Vec<CommittedTransaction>> {
        let path = format!("api/sales/date/{}", date.format("%Y-%m-%d"));
        let raw: Vec<RawSale> = self
            .client
            .get_json(&path, "판매 내역을 불러오는 중 오류가 발생했습니다.")
            .await?;
        let transactions: Vec<CommittedTransaction> = convert_all(raw)?;
        debug!(%date, count = transactions.len(), "Sales loaded");
        Ok(transactions)
    }

    /// Stores a settled sale.
    ///
    /// ## Errors
    /// - `PersistenceFailed` with the server's message when it refuses
    /// - `AuthRequired` when signed out or the token was rejected
    pub async fn create(&self, payload: &SalePayload) -> ClientResult<()> {
        self.client
            .send_json(
                Method::POST,
                "api/sales",
                payload,
                "판매 기록 저장 중 오류가 발생했습니다.",
            )
            .await?;
        info!(
            sale_date = %payload.sale_data.sale_date,
            total = payload.sale_data.total_amount.won(),
            items = payload.sale_items.len(),
            "Sale recorded"
        );
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client
            .delete(
                &format!("api/sales/{}", id),
                "판매 기록 삭제 중 오류가 발생했습니다.",
            )
            .await?;
        info!(id, "Sale deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use serde_json::json;

    use crate::error::ClientError;
    use crate::testing::{MockApi, MockState, STOCK_REJECTED};
    use rodeo_core::composer::{add_item, PendingItem};
    use rodeo_core::draft::TransactionDraft;
    use rodeo_core::ledger::MISSING_TIME_LABEL;
    use rodeo_core::settlement::{settle, AllocationPolicy};
    use rodeo_core::{Money, PaymentMethod, Product};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn catalog() -> Vec<Product> {
        vec![
            Product::new(1, "Pod A", "코일팟", Money::from_won(12_000), 5),
            Product::new(2, "Mango", "입호흡액상", Money::from_won(20_000), 2),
        ]
    }

    fn card_payload(products: &[Product], pod_qty: i64) -> SalePayload {
        let mut draft = TransactionDraft::new(PaymentMethod::Card);
        add_item(&mut draft, &mut PendingItem::for_product(&products[0], pod_qty), products).unwrap();
        add_item(&mut draft, &mut PendingItem::for_product(&products[1], 1), products).unwrap();
        draft.set_card_company("신한카드");
        draft.set_total_amount(Money::from_won(30_000));
        settle(
            &draft,
            products,
            date(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            AllocationPolicy::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_then_list_by_date() {
        let mock = MockApi::start_with(MockState::new().with_products(catalog())).await;
        let client = mock.signed_in_client();
        let payload = card_payload(&catalog(), 2);

        client.sales().create(&payload).await.unwrap();
        let sales = client.sales().list_by_date(date()).await.unwrap();

        assert_eq!(mock.posted_sales().await, vec![payload]);
        assert_eq!(sales.len(), 1);
        let sale = &sales[0];
        assert_eq!(sale.total_amount, Money::from_won(30_000));
        assert_eq!(sale.payment_method, PaymentMethod::Card);
        assert_eq!(sale.card_company, "신한카드");
        assert_eq!(sale.display_time, "14:30");
        assert_eq!(sale.items.len(), 2);
        assert_eq!(mock.products().await[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_other_dates_are_not_listed() {
        let mock = MockApi::start_with(MockState::new().with_products(catalog())).await;
        let client = mock.signed_in_client();
        client.sales().create(&card_payload(&catalog(), 1)).await.unwrap();

        let next_day = date().succ_opt().unwrap();
        assert!(client.sales().list_by_date(next_day).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_stock_rejection() {
        let mock = MockApi::start_with(MockState::new().with_products(catalog())).await;
        let client = mock.signed_in_client();
        let payload = card_payload(&catalog(), 5);

        // Someone else sold two pods in the meantime.
        let mut moved = catalog();
        moved[0].quantity = 3;
        mock.set_products(moved).await;

        let err = client.sales().create(&payload).await.unwrap_err();

        assert_eq!(err, ClientError::PersistenceFailed(STOCK_REJECTED.into()));
        assert!(mock.posted_sales().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_tolerates_missing_time_and_text_amounts() {
        let mock = MockApi::start().await;
        mock.push_sale_row(json!({
            "id": 7,
            "items": [{ "inventory_id": 1, "quantity": 1 }],
            "total_amount": "15000.00",
            "payment_method": "cash",
            "sale_date": "2024-05-01T00:00:00.000Z",
            "sale_time": null
        }))
        .await;
        let client = mock.signed_in_client();

        let sales = client.sales().list_by_date(date()).await.unwrap();

        assert_eq!(sales[0].total_amount, Money::from_won(15_000));
        assert_eq!(sales[0].display_time, MISSING_TIME_LABEL);
        assert_eq!(sales[0].items[0].product_name, None);
    }

    #[tokio::test]
    async fn test_unknown_payment_method_is_malformed() {
        let mock = MockApi::start().await;
        mock.push_sale_row(json!({
            "id": 8,
            "items": [],
            "total_amount": 1000,
            "payment_method": "bitcoin",
            "sale_date": "2024-05-01",
        }))
        .await;
        let client = mock.signed_in_client();

        let err = client.sales().list_by_date(date()).await.unwrap_err();

        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let mock = MockApi::start_with(MockState::new().with_products(catalog())).await;
        let client = mock.signed_in_client();
        client.sales().create(&card_payload(&catalog(), 1)).await.unwrap();
        let id = client.sales().list_by_date(date()).await.unwrap()[0].id;

        client.sales().delete(id).await.unwrap();

        assert!(client.sales().list_by_date(date()).await.unwrap().is_empty());
        assert_eq!(
            client.sales().delete(id).await.unwrap_err(),
            ClientError::PersistenceFailed("판매 기록을 찾을 수 없습니다.".into())
        );
    }
}
