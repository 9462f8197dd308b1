//! # Monthly Summary
//!
//! Aggregated sales per month, as computed by the server.
//!
//! ```text
//! MonthlyReport
//! ├── months[]   newest first (year, month, total_sales)
//! └── summary
//!     ├── annual_total
//!     ├── current_month_sales
//!     └── top_month
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Sales total for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlySales {
    pub year: i32,
    pub month: u32,
    /// Server-provided label such as `5월`; may be empty.
    pub month_name: String,
    /// `YYYY-MM`
    pub year_month: String,
    pub total_sales: Money,
}

impl MonthlySales {
    /// Month label, falling back to `{month}월`.
    pub fn label(&self) -> String {
        if self.month_name.is_empty() {
            format!("{}월", self.month)
        } else {
            self.month_name.clone()
        }
    }
}

/// The best-selling month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopMonth {
    pub year: i32,
    pub month: u32,
    pub year_month: String,
    pub sales: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlySummary {
    pub annual_total: Money,
    pub current_month_sales: Money,
    pub top_month: Option<TopMonth>,
}

/// `GET /api/monthly`, newest month first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyReport {
    pub months: Vec<MonthlySales>,
    pub summary: MonthlySummary,
}

impl MonthlyReport {
    /// Builds a report, ordering months newest first.
    pub fn new(mut months: Vec<MonthlySales>, summary: MonthlySummary) -> Self {
        months.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
        MonthlyReport { months, summary }
    }

    /// Largest month total, at least 1 won; the scale for bar charts.
    pub fn max_sales(&self) -> Money {
        self.months
            .iter()
            .map(|m| m.total_sales)
            .max()
            .unwrap_or_default()
            .max(Money::from_won(1))
    }

    /// Bar length out of `width` cells for one month.
    pub fn bar_width(&self, month: &MonthlySales, width: i64) -> i64 {
        Money::from_won(width)
            .share_of(month.total_sales.won().max(0), self.max_sales().won())
            .won()
    }
}
