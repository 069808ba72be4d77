//! 시리즈 빌더 (Series Builder).
//!
//! 레코드를 키워드(대소문자 구분, 추가 공백 정리 없음)로 묶고
//! 각 묶음을 날짜 오름차순으로 안정 정렬합니다.
//!
//! 검색량은 입력 순서상 **첫 레코드**의 값을 씁니다 (날짜상 첫 레코드가 아님).
//! 같은 키워드의 행마다 검색량이 다르면 나머지 값은 무시됩니다.

use std::collections::HashMap;

use serp_core::{KeywordSeries, PositionRecord, SeriesPoint};
use tracing::debug;

/// 키워드 → 시계열 매핑.
///
/// 키워드가 입력에 처음 등장한 순서를 보존하므로, 이후 정렬의 동점 처리에
/// 그대로 쓸 수 있습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesSet {
    series: Vec<KeywordSeries>,
    index: HashMap<String, usize>,
}

impl SeriesSet {
    /// 키워드 시계열 조회.
    pub fn get(&self, keyword: &str) -> Option<&KeywordSeries> {
        self.index.get(keyword).map(|&i| &self.series[i])
    }

    /// 처음 등장한 순서대로 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = &KeywordSeries> {
        self.series.iter()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.keyword.as_str())
    }

    /// 키워드 수.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// 전체 포인트 수.
    pub fn total_points(&self) -> usize {
        self.series.iter().map(KeywordSeries::len).sum()
    }

    /// 레코드 목록으로 펼칩니다. 다시 [`SeriesBuilder::build`]하면 같은 집합이 됩니다.
    pub fn to_records(&self) -> Vec<PositionRecord> {
        self.series.iter().flat_map(KeywordSeries::to_records).collect()
    }

    pub fn into_vec(self) -> Vec<KeywordSeries> {
        self.series
    }
}

impl<'a> IntoIterator for &'a SeriesSet {
    type Item = &'a KeywordSeries;
    type IntoIter = std::slice::Iter<'a, KeywordSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}

/// 시리즈 빌더.
pub struct SeriesBuilder;

impl SeriesBuilder {
    /// 레코드를 키워드별 시계열로 묶습니다.
    pub fn build<I>(records: I) -> SeriesSet
    where
        I: IntoIterator<Item = PositionRecord>,
    {
        let mut set = SeriesSet::default();

        for record in records {
            let point = SeriesPoint {
                date: record.date,
                position: record.position,
                url: record.url,
            };

            match set.index.get(&record.keyword) {
                Some(&i) => set.series[i].points.push(point),
                None => {
                    set.index.insert(record.keyword.clone(), set.series.len());
                    set.series.push(KeywordSeries {
                        keyword: record.keyword,
                        search_volume: record.search_volume,
                        points: vec![point],
                    });
                }
            }
        }

        for series in &mut set.series {
            // sort_by_key는 안정 정렬: 같은 날짜는 입력 순서 유지
            series.points.sort_by_key(|p| p.date);
        }

        debug!(
            keywords = set.len(),
            points = set.total_points(),
            "Series built"
        );

        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(keyword: &str, day: u32, position: u32, volume: u64) -> PositionRecord {
        PositionRecord::new(
            keyword,
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            position,
            volume,
        )
    }

    #[test]
    fn test_groups_and_sorts() {
        let set = SeriesBuilder::build(vec![
            record("shoes", 3, 8, 1000),
            record("boots", 1, 2, 50),
            record("shoes", 1, 10, 1000),
            record("shoes", 2, 5, 1000),
        ]);

        assert_eq!(set.len(), 2);
        assert_eq!(set.keywords().collect::<Vec<_>>(), vec!["shoes", "boots"]);

        let shoes = set.get("shoes").unwrap();
        assert_eq!(shoes.positions(), vec![10, 5, 8]);
        assert!(shoes.is_chronological());
    }

    #[test]
    fn test_first_input_volume_wins() {
        // 날짜상 첫 레코드가 아니라 입력상 첫 레코드의 검색량
        let set = SeriesBuilder::build(vec![
            record("shoes", 5, 8, 900),
            record("shoes", 1, 10, 1200),
        ]);

        assert_eq!(set.get("shoes").unwrap().search_volume, 900);
    }

    #[test]
    fn test_same_date_keeps_input_order() {
        let set = SeriesBuilder::build(vec![
            record("shoes", 2, 7, 1),
            record("shoes", 1, 3, 1),
            record("shoes", 2, 4, 1),
        ]);

        assert_eq!(set.get("shoes").unwrap().positions(), vec![3, 7, 4]);
    }

    #[test]
    fn test_keyword_is_case_sensitive() {
        let set = SeriesBuilder::build(vec![record("Shoes", 1, 1, 1), record("shoes", 1, 2, 1)]);
        assert_eq!(set.len(), 2);
        assert!(set.get("SHOES").is_none());
    }

    #[test]
    fn test_regrouping_is_idempotent() {
        let set = SeriesBuilder::build(vec![
            record("shoes", 3, 8, 1000),
            record("boots", 2, 2, 50),
            record("shoes", 1, 10, 700),
            record("boots", 1, 4, 60),
        ]);

        let regrouped = SeriesBuilder::build(set.to_records());
        assert_eq!(regrouped, set);
    }
}
