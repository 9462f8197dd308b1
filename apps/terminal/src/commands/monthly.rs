//! # Monthly Commands

use tracing::debug;

use rodeo_client::ApiClient;
use rodeo_core::monthly::MonthlyReport;

use crate::error::ApiError;

pub async fn monthly_report(client: &ApiClient) -> Result<MonthlyReport, ApiError> {
    debug!("monthly_report command");
    Ok(client.monthly().report().await?)
}
