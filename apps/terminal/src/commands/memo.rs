//! # Memo Commands

use tracing::debug;

use rodeo_client::ApiClient;
use rodeo_core::memo::Memo;

use crate::error::ApiError;

pub async fn list_memos(client: &ApiClient) -> Result<Vec<Memo>, ApiError> {
    debug!("list_memos command");
    Ok(client.memos().list().await?)
}

pub async fn add_memo(client: &ApiClient, content: &str) -> Result<Memo, ApiError> {
    debug!("add_memo command");
    Ok(client.memos().create(content).await?)
}

pub async fn delete_memo(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    debug!(id, "delete_memo command");
    client.memos().delete(id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use rodeo_client::testing::MockApi;

    #[tokio::test]
    async fn test_add_then_list() {
        let mock = MockApi::start().await;
        let client = mock.signed_in_client();

        let memo = add_memo(&client, "배송 확인").await.unwrap();
        let memos = list_memos(&client).await.unwrap();

        assert_eq!(memos, vec![memo]);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_inline() {
        let mock = MockApi::start().await;
        let client = mock.signed_in_client();
        mock.fail_with(500, None).await;

        let err = list_memos(&client).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::FetchFailed);
        assert_eq!(err.message, "메모를 불러오는 중 오류가 발생했습니다.");
        assert!(!err.is_blocking());
    }
}
