//! 키워드별 순위 시계열.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::PositionRecord;

/// 변동성/패턴/예측 분석에 필요한 최소 포인트 수.
pub const MIN_ANALYZABLE_POINTS: usize = 2;

/// 시계열의 한 지점.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// 한 키워드의 날짜 오름차순 순위 시계열.
///
/// 항상 한 개 이상의 포인트를 가집니다. 날짜 간격은 일정하지 않을 수 있고,
/// 같은 날짜의 포인트는 입력 순서를 유지합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSeries {
    pub keyword: String,
    /// 입력 순서상 첫 레코드의 검색량
    pub search_volume: u64,
    pub points: Vec<SeriesPoint>,
}

impl KeywordSeries {
    /// 포인트 수.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 포인트가 없는지 확인합니다. 시리즈 빌더가 만든 값은 항상 false입니다.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 분석(변동성/패턴/예측) 가능한 길이인지 확인합니다.
    pub fn is_analyzable(&self) -> bool {
        self.points.len() >= MIN_ANALYZABLE_POINTS
    }

    /// 순위 값만 순서대로 추출합니다.
    pub fn positions(&self) -> Vec<u32> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// 가장 최근 순위.
    pub fn current_position(&self) -> Option<u32> {
        self.points.last().map(|p| p.position)
    }

    /// 직전 순위.
    pub fn previous_position(&self) -> Option<u32> {
        let n = self.points.len();
        if n < 2 {
            return None;
        }
        Some(self.points[n - 2].position)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// 날짜 오름차순인지 확인합니다.
    pub fn is_chronological(&self) -> bool {
        self.points.windows(2).all(|w| w[0].date <= w[1].date)
    }

    /// 레코드 목록으로 펼칩니다 (재그룹핑 시 원래 시리즈가 복원됩니다).
    pub fn to_records(&self) -> Vec<PositionRecord> {
        self.points
            .iter()
            .map(|p| PositionRecord {
                keyword: self.keyword.clone(),
                date: p.date,
                position: p.position,
                search_volume: self.search_volume,
                url: p.url.clone(),
            })
            .collect()
    }
}
