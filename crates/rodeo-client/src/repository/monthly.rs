//! Monthly sales totals.

use tracing::debug;

use rodeo_core::monthly::MonthlyReport;

use crate::client::ApiClient;
use crate::error::ClientResult;
use crate::wire::RawMonthlyResponse;

#[derive(Debug, Clone)]
pub struct MonthlyRepository {
    client: ApiClient,
}

impl MonthlyRepository {
    pub fn new(client: ApiClient) -> Self {
        MonthlyRepository { client }
    }

    /// Monthly totals and the yearly summary, newest month first.
    pub async fn report(&self) -> ClientResult<MonthlyReport> {
        let raw: RawMonthlyResponse = self
            .client
            .get_json(
                "api/monthly",
                "월별 매출 데이터를 불러오는 중 오류가 발생했습니다.",
            )
            .await?;
        let report = MonthlyReport::try_from(raw)?;
        debug!(months = report.months.len(), "Monthly report loaded");
        Ok(report)
    }
}
