//! Dashboard memos.

use reqwest::Method;
use tracing::info;

use rodeo_core::memo::{sort_memos, Memo};
use rodeo_core::validation::validate_memo_content;

use crate::client::{decode, ApiClient};
use crate::error::ClientResult;
use crate::wire::{convert_all, NewMemoBody, RawMemo};

#[derive(Debug, Clone)]
pub struct MemoRepository {
    client: ApiClient,
}

impl MemoRepository {
    pub fn new(client: ApiClient) -> Self {
        MemoRepository { client }
    }

    /// All memos, newest first.
    pub async fn list(&self) -> ClientResult<Vec<Memo>> {
        let raw: Vec<RawMemo> = self
            .client
            .get_json("api/memos", "메모를 불러오는 중 오류가 발생했습니다.")
            .await?;
        let mut memos: Vec<Memo> = convert_all(raw)?;
        sort_memos(&mut memos);
        Ok(memos)
    }

    /// Creates a memo and returns it as stored by the server.
    pub async fn create(&self, content: &str) -> ClientResult<Memo> {
        let content = validate_memo_content(content)?;
        let response = self
            .client
            .send_json(
                Method::POST,
                "api/memos",
                &NewMemoBody { content: &content },
                "메모를 추가하는 중 오류가 발생했습니다.",
            )
            .await?;
        let raw: RawMemo = decode(response).await?;
        let memo = Memo::try_from(raw)?;
        info!(id = memo.id, "Memo added");
        Ok(memo)
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client
            .delete(
                &format!("api/memos/{}", id),
                "메모를 삭제하는 중 오류가 발생했습니다.",
            )
            .await?;
        info!(id, "Memo deleted");
        Ok(())
    }
}
