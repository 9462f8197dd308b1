//! # Wire Types
//!
//! Raw JSON shapes of the shop API and their checked conversion into
//! rodeo-core types.
//!
//! ## Schema Check
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  response body ──serde──► Raw* struct ──TryFrom──► core type            │
//! │        │                      │                        │                │
//! │        ▼                      ▼                        ▼                │
//! │  not JSON / wrong       negative stock,           Product,              │
//! │  field types            unknown payment,          CommittedTransaction, │
//! │                         bad date, bad amount      MonthlyReport, Memo   │
//! │        │                      │                                         │
//! │        └──────────┬───────────┘                                         │
//! │                   ▼                                                     │
//! │        ClientError::MalformedResponse                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The server sends numeric columns either as JSON numbers or as strings
//! (`"15000.00"`); [`WireAmount`] accepts both.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use rodeo_core::ledger::display_time;
use rodeo_core::memo::Memo;
use rodeo_core::monthly::{MonthlyReport, MonthlySales, MonthlySummary, TopMonth};
use rodeo_core::{CommittedItem, CommittedTransaction, Money, PaymentMethod, Product};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Amounts
// =============================================================================

/// A won amount as the server sends it: number or numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireAmount {
    Number(serde_json::Number),
    Text(String),
}

impl WireAmount {
    /// Converts to whole won, rounding any fraction half away from zero.
    pub fn to_money(&self, field: &str) -> ClientResult<Money> {
        let value = match self {
            WireAmount::Number(n) => match n.as_i64() {
                Some(won) => return Ok(Money::from_won(won)),
                None => n.as_f64(),
            },
            WireAmount::Text(s) => s.trim().parse::<f64>().ok(),
        };

        match value {
            Some(v) if v.is_finite() && v.abs() < i64::MAX as f64 => {
                Ok(Money::from_won(v.round() as i64))
            }
            _ => Err(ClientError::malformed(format!(
                "{}: not an amount ({:?})",
                field, self
            ))),
        }
    }
}

fn optional_money(amount: Option<WireAmount>, field: &str) -> ClientResult<Option<Money>> {
    amount.map(|a| a.to_money(field)).transpose()
}

// =============================================================================
// Dates and Times
// =============================================================================

/// Parses `YYYY-MM-DD`, also accepting a full timestamp (`2024-05-01T00:00:00Z`).
pub(crate) fn parse_wire_date(raw: &str, field: &str) -> ClientResult<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| ClientError::malformed(format!("{}: {} ({})", field, e, raw)))
}

/// Parses `HH:MM:SS[.fff]` or `HH:MM`. Empty means no time.
pub(crate) fn parse_wire_time(raw: Option<&str>) -> ClientResult<Option<NaiveTime>> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(raw) => raw,
    };

    NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map(Some)
        .map_err(|e| ClientError::malformed(format!("sale_time: {} ({})", e, raw)))
}

/// Parses an RFC 3339 timestamp, or a naive `YYYY-MM-DD HH:MM:SS` taken as UTC.
pub(crate) fn parse_wire_timestamp(raw: &str, field: &str) -> ClientResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| ClientError::malformed(format!("{}: {} ({})", field, e, raw)))
}

// =============================================================================
// Inventory
// =============================================================================

/// `GET /api/inventory` row.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProduct {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: WireAmount,
    pub quantity: i64,
}

impl TryFrom<RawProduct> for Product {
    type Error = ClientError;

    fn try_from(raw: RawProduct) -> ClientResult<Self> {
        if raw.quantity < 0 {
            return Err(ClientError::malformed(format!(
                "product {}: negative quantity {}",
                raw.id, raw.quantity
            )));
        }
        let price = raw.price.to_money("price")?;
        Ok(Product::new(raw.id, raw.name, raw.category, price, raw.quantity))
    }
}

// =============================================================================
// Sales
// =============================================================================

/// Nested item of a `GET /api/sales/date/{date}` row.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSaleItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub inventory_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub quantity: i64,
    #[serde(default)]
    pub price_per_unit: Option<WireAmount>,
    #[serde(default)]
    pub item_total: Option<WireAmount>,
}

impl TryFrom<RawSaleItem> for CommittedItem {
    type Error = ClientError;

    fn try_from(raw: RawSaleItem) -> ClientResult<Self> {
        if raw.quantity <= 0 {
            return Err(ClientError::malformed(format!(
                "sale item for inventory {}: quantity {}",
                raw.inventory_id, raw.quantity
            )));
        }
        Ok(CommittedItem {
            id: raw.id,
            inventory_id: raw.inventory_id,
            product_name: raw.name,
            category: raw.category,
            quantity: raw.quantity,
            price_per_unit: optional_money(raw.price_per_unit, "price_per_unit")?,
            item_total: optional_money(raw.item_total, "item_total")?,
        })
    }
}

/// `GET /api/sales/date/{date}` row.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSale {
    pub id: i64,
    #[serde(default)]
    pub items: Vec<RawSaleItem>,
    pub total_amount: WireAmount,
    pub payment_method: String,
    #[serde(default)]
    pub note: Option<String>,
    pub sale_date: String,
    #[serde(default)]
    pub sale_time: Option<String>,
}

impl TryFrom<RawSale> for CommittedTransaction {
    type Error = ClientError;

    fn try_from(raw: RawSale) -> ClientResult<Self> {
        let payment_method: PaymentMethod = raw
            .payment_method
            .parse()
            .map_err(|e| ClientError::malformed(format!("sale {}: {}", raw.id, e)))?;
        let note = raw.note.unwrap_or_default();
        let card_company = match payment_method {
            PaymentMethod::Card => note.clone(),
            _ => String::new(),
        };
        let sale_time = parse_wire_time(raw.sale_time.as_deref())?;

        Ok(CommittedTransaction {
            id: raw.id,
            items: convert_all(raw.items)?,
            total_amount: raw.total_amount.to_money("total_amount")?,
            payment_method,
            card_company,
            note,
            sale_date: parse_wire_date(&raw.sale_date, "sale_date")?,
            sale_time,
            display_time: display_time(sale_time),
            expanded: false,
        })
    }
}

// =============================================================================
// Monthly
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMonthlyResponse {
    pub monthly_data: Vec<RawMonth>,
    pub summary: RawMonthlySummary,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMonth {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub month_name: Option<String>,
    #[serde(default)]
    pub year_month: Option<String>,
    #[serde(rename = "total_sales")]
    pub total_sales: WireAmount,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMonthlySummary {
    pub annual_total: WireAmount,
    pub current_month_sales: WireAmount,
    #[serde(default)]
    pub top_month: Option<RawTopMonth>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTopMonth {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub year_month: Option<String>,
    pub sales: WireAmount,
}

fn check_month(month: u32) -> ClientResult<u32> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(ClientError::malformed(format!("month out of range: {}", month)))
    }
}

fn year_month(year: i32, month: u32, given: Option<String>) -> String {
    given
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("{}-{:02}", year, month))
}

impl TryFrom<RawMonth> for MonthlySales {
    type Error = ClientError;

    fn try_from(raw: RawMonth) -> ClientResult<Self> {
        let month = check_month(raw.month)?;
        Ok(MonthlySales {
            year: raw.year,
            month,
            month_name: raw.month_name.unwrap_or_default(),
            year_month: year_month(raw.year, month, raw.year_month),
            total_sales: raw.total_sales.to_money("total_sales")?,
        })
    }
}

impl TryFrom<RawMonthlyResponse> for MonthlyReport {
    type Error = ClientError;

    fn try_from(raw: RawMonthlyResponse) -> ClientResult<Self> {
        let top_month = match raw.summary.top_month {
            Some(top) => {
                let month = check_month(top.month)?;
                Some(TopMonth {
                    year: top.year,
                    month,
                    year_month: year_month(top.year, month, top.year_month),
                    sales: top.sales.to_money("topMonth.sales")?,
                })
            }
            None => None,
        };

        let summary = MonthlySummary {
            annual_total: raw.summary.annual_total.to_money("annualTotal")?,
            current_month_sales: raw.summary.current_month_sales.to_money("currentMonthSales")?,
            top_month,
        };

        Ok(MonthlyReport::new(convert_all(raw.monthly_data)?, summary))
    }
}

// =============================================================================
// Memos
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RawMemo {
    pub id: i64,
    pub content: String,
    pub created_at: String,
}

impl TryFrom<RawMemo> for Memo {
    type Error = ClientError;

    fn try_from(raw: RawMemo) -> ClientResult<Self> {
        Ok(Memo {
            id: raw.id,
            created_at: parse_wire_timestamp(&raw.created_at, "created_at")?,
            content: raw.content,
        })
    }
}

/// `POST /api/memos` body.
#[derive(Debug, Clone, Serialize)]
pub struct NewMemoBody<'a> {
    pub content: &'a str,
}

// =============================================================================
// Auth
// =============================================================================

/// `POST /api/auth/login` body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginBody<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Error body the server sends with non-2xx statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// The server's message, if the body carried one.
    pub fn into_message(self) -> Option<String> {
        self.error
            .or(self.message)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}

/// Converts every raw row, failing on the first malformed one.
pub fn convert_all<R, T>(raw: Vec<R>) -> ClientResult<Vec<T>>
where
    T: TryFrom<R, Error = ClientError>,
{
    raw.into_iter().map(T::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_amount_accepts_numbers_and_strings() {
        let a: WireAmount = parse(json!(15000));
        assert_eq!(a.to_money("x").unwrap(), Money::from_won(15_000));

        let b: WireAmount = parse(json!("15000.00"));
        assert_eq!(b.to_money("x").unwrap(), Money::from_won(15_000));

        let c: WireAmount = parse(json!(333.5));
        assert_eq!(c.to_money("x").unwrap(), Money::from_won(334));

        let bad: WireAmount = parse(json!("free"));
        assert!(matches!(bad.to_money("x"), Err(ClientError::MalformedResponse(_))));
    }

    #[test]
    fn test_product_conversion() {
        let raw: RawProduct = parse(json!({
            "id": 3, "name": "Pod A", "category": "코일팟", "price": "5000.00", "quantity": 7
        }));
        let product = Product::try_from(raw).unwrap();
        assert_eq!(product.price, Money::from_won(5_000));
        assert_eq!(product.quantity, 7);

        let negative: RawProduct = parse(json!({
            "id": 3, "name": "Pod A", "category": "코일팟", "price": 5000, "quantity": -1
        }));
        assert!(matches!(
            Product::try_from(negative),
            Err(ClientError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_missing_field_is_a_serde_error() {
        let result: Result<RawProduct, _> =
            serde_json::from_value(json!({"id": 1, "name": "Pod"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_sale_conversion() {
        let raw: RawSale = parse(json!({
            "id": 12,
            "items": [
                {"id": 1, "inventory_id": 3, "name": "Pod A", "category": "코일팟",
                 "quantity": 2, "item_total": "4000"}
            ],
            "total_amount": "4000",
            "payment_method": "card",
            "note": "삼성",
            "sale_date": "2024-05-01T00:00:00.000Z",
            "sale_time": "14:05:09"
        }));
        let tx = CommittedTransaction::try_from(raw).unwrap();

        assert_eq!(tx.card_company, "삼성");
        assert_eq!(tx.sale_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(tx.display_time, "14:05");
        assert_eq!(tx.items[0].product_name.as_deref(), Some("Pod A"));
        assert_eq!(tx.items[0].item_total, Some(Money::from_won(4_000)));
        assert!(!tx.expanded);
    }

    #[test]
    fn test_sale_without_time_and_unknown_method() {
        let raw: RawSale = parse(json!({
            "id": 1, "total_amount": 100, "payment_method": "cash",
            "sale_date": "2024-05-01", "sale_time": null
        }));
        let tx = CommittedTransaction::try_from(raw).unwrap();
        assert_eq!(tx.display_time, "시간 정보 없음");
        assert!(tx.items.is_empty());
        assert_eq!(tx.card_company, "");

        let raw: RawSale = parse(json!({
            "id": 1, "total_amount": 100, "payment_method": "bitcoin", "sale_date": "2024-05-01"
        }));
        assert!(matches!(
            CommittedTransaction::try_from(raw),
            Err(ClientError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_monthly_conversion() {
        let raw: RawMonthlyResponse = parse(json!({
            "monthlyData": [
                {"year": 2024, "month": 4, "monthName": "4월", "yearMonth": "2024-04", "total_sales": "980000"},
                {"year": 2024, "month": 5, "monthName": "5월", "yearMonth": "2024-05", "total_sales": 1200000}
            ],
            "summary": {
                "annualTotal": 2180000,
                "currentMonthSales": "1200000",
                "topMonth": {"year": 2024, "month": 5, "yearMonth": "2024-05", "sales": 1200000}
            }
        }));
        let report = MonthlyReport::try_from(raw).unwrap();
        assert_eq!(report.months[0].year_month, "2024-05");
        assert_eq!(report.summary.annual_total, Money::from_won(2_180_000));
        assert_eq!(report.summary.top_month.unwrap().month, 5);
    }

    #[test]
    fn test_month_out_of_range() {
        let raw: RawMonth = parse(json!({"year": 2024, "month": 13, "total_sales": 0}));
        assert!(MonthlySales::try_from(raw).is_err());
    }

    #[test]
    fn test_memo_timestamps() {
        let raw: RawMemo = parse(json!({
            "id": 1, "content": "발주", "created_at": "2024-04-30T00:05:00.000Z"
        }));
        let memo = Memo::try_from(raw).unwrap();
        assert_eq!(memo.display_date(), "2024년 4월 30일 9:05");

        let naive: RawMemo = parse(json!({
            "id": 2, "content": "x", "created_at": "2024-04-30 00:05:00"
        }));
        assert!(Memo::try_from(naive).is_ok());

        let bad: RawMemo = parse(json!({"id": 3, "content": "x", "created_at": "yesterday"}));
        assert!(Memo::try_from(bad).is_err());
    }

    #[test]
    fn test_error_body_message() {
        let body: ErrorBody = parse(json!({"error": "재고가 부족합니다"}));
        assert_eq!(body.into_message().as_deref(), Some("재고가 부족합니다"));

        let body: ErrorBody = parse(json!({"message": "  "}));
        assert_eq!(body.into_message(), None);
    }
}
