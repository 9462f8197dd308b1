//! Memo notes kept on the shop dashboard.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Korea Standard Time offset, in hours.
const KST_OFFSET_HOURS: i64 = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Memo {
    pub id: i64,
    pub content: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Memo {
    /// Creation time in KST, e.g. `2024년 5월 1일 9:05`.
    pub fn display_date(&self) -> String {
        let kst = self.created_at + Duration::hours(KST_OFFSET_HOURS);
        kst.format("%Y년 %-m월 %-d일 %-H:%M").to_string()
    }
}

/// Newest memo first (highest id).
pub fn sort_memos(memos: &mut [Memo]) {
    memos.sort_by(|a, b| b.id.cmp(&a.id));
}
