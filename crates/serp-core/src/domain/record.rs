//! 정규화된 순위 레코드.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 특정 날짜의 키워드 순위 한 건.
///
/// wide/long 어떤 입력 형식에서 왔든 같은 모양으로 정규화됩니다.
/// 순위는 작을수록 좋습니다 (1 = 최상위).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    /// 키워드 (대소문자 구분)
    pub keyword: String,
    /// 순위 날짜
    pub date: NaiveDate,
    /// 검색 순위 (1 이상)
    pub position: u32,
    /// 월간 검색량
    pub search_volume: u64,
    /// 순위에 잡힌 랜딩 URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl PositionRecord {
    pub fn new(
        keyword: impl Into<String>,
        date: NaiveDate,
        position: u32,
        search_volume: u64,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            date,
            position,
            search_volume,
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}
