//! 행 정규화 (Row Normalizer).
//!
//! 두 가지 내보내기 형식을 컬럼 이름으로 자동 판별하여
//! [`PositionRecord`] 목록으로 변환합니다.
//!
//! # long 형식
//!
//! ```text
//! Keyword,Date,Position,Search Volume,URL
//! shoes,2024-01-01,5,1000,https://site.com/x
//! ```
//!
//! # wide 형식
//!
//! ```text
//! Keyword,Search Volume,site.com/x_20240101,site.com/x_20240101_landing,site.com/x_20240201
//! shoes,1000,5,https://site.com/x,-
//! ```
//!
//! 잘못된 행/셀은 경고로 기록하고 버립니다. 구조적 문제(행 없음, 필수 컬럼 없음)만
//! 에러로 반환합니다.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serp_core::{NormalizerConfig, PositionRecord, RankError, RankResult, RowIssue, RowWarning};
use tracing::{debug, info, warn};

use crate::date::{extract_date_token, parse_date};
use crate::raw::{Header, RawRow};

pub const KEYWORD_COLUMN: &str = "Keyword";
pub const DATE_COLUMN: &str = "Date";
pub const POSITION_COLUMN: &str = "Position";
pub const VOLUME_COLUMN: &str = "Search Volume";
pub const URL_COLUMN: &str = "URL";

const LANDING_SUFFIX: &str = "_landing";
const TYPE_SUFFIX: &str = "_type";

/// 판별된 입력 형식.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputFormat {
    /// 키워드/날짜당 한 행
    Long,
    /// 날짜 컬럼이 반복되는 키워드당 한 행
    Wide { date_columns: Vec<DateColumn> },
}

/// wide 형식의 날짜 컬럼.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateColumn {
    /// 원래 컬럼 이름
    pub name: String,
    /// 헤더에서의 위치
    pub index: usize,
    /// 컬럼 이름의 8자리 토큰에서 얻은 날짜
    pub date: NaiveDate,
    /// 같은 날짜의 랜딩 URL 컬럼 (`<name>_landing`)
    pub landing: Option<String>,
    /// 랜딩 컬럼의 헤더 위치
    pub landing_index: Option<usize>,
}

impl InputFormat {
    /// 컬럼 이름 집합으로 형식을 판별합니다.
    ///
    /// `Date`와 `Position` 컬럼이 있으면 long, 날짜 토큰 컬럼이 하나라도 있으면 wide입니다.
    /// 두 형식 모두 `Keyword` 컬럼이 필요하고, wide 형식은 `Search Volume`도 필요합니다.
    /// wide 날짜 컬럼의 위치는 `columns` 기준입니다.
    pub fn detect(columns: &[String]) -> RankResult<Self> {
        Self::detect_header(&Header::new(columns.iter().cloned()))
    }

    fn detect_header(header: &Header) -> RankResult<Self> {
        let has = |name: &str| header.contains(name);

        if has(DATE_COLUMN) && has(POSITION_COLUMN) {
            if !has(KEYWORD_COLUMN) {
                return Err(missing("long", &[KEYWORD_COLUMN]));
            }
            return Ok(InputFormat::Long);
        }

        let date_columns = wide_date_columns(header);
        if !date_columns.is_empty() {
            let missing_wide: Vec<&str> = [KEYWORD_COLUMN, VOLUME_COLUMN]
                .into_iter()
                .filter(|c| !has(c))
                .collect();
            if !missing_wide.is_empty() {
                return Err(missing("wide", &missing_wide));
            }
            return Ok(InputFormat::Wide { date_columns });
        }

        // 어느 형식에도 맞지 않으면 long 형식 기준으로 누락 컬럼을 보고
        let missing_long: Vec<&str> = [KEYWORD_COLUMN, DATE_COLUMN, POSITION_COLUMN]
            .into_iter()
            .filter(|c| !has(c))
            .collect();
        Err(missing("long", &missing_long))
    }

    pub fn name(&self) -> &'static str {
        match self {
            InputFormat::Long => "long",
            InputFormat::Wide { .. } => "wide",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Long => write!(f, "long"),
            InputFormat::Wide { date_columns } => write!(f, "wide ({} dates)", date_columns.len()),
        }
    }
}

fn missing(format: &str, columns: &[&str]) -> RankError {
    RankError::MissingColumns {
        format: format.to_string(),
        missing: columns.iter().map(|c| c.to_string()).collect(),
    }
}

fn wide_date_columns(header: &Header) -> Vec<DateColumn> {
    header
        .names()
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.ends_with(LANDING_SUFFIX) && !c.ends_with(TYPE_SUFFIX))
        .filter_map(|(index, c)| {
            let date = extract_date_token(c)?;
            let landing_name = format!("{}{}", c, LANDING_SUFFIX);
            let landing_index = header.position(&landing_name);
            Some(DateColumn {
                name: c.clone(),
                index,
                date,
                landing: landing_index.map(|_| landing_name),
                landing_index,
            })
        })
        .collect()
}

/// 정규화 결과.
#[derive(Debug, Clone)]
pub struct Normalized {
    /// 판별된 입력 형식
    pub format: InputFormat,
    /// 입력 순서대로의 레코드
    pub records: Vec<PositionRecord>,
    /// 버려진 행/셀 경고
    pub warnings: Vec<RowWarning>,
    /// 조용히 건너뛴 wide 셀 수 (비어 있거나 숫자가 아닌 "순위 없음" 값)
    pub skipped_cells: usize,
    /// 읽은 원시 행 수
    pub rows_read: usize,
}

/// 행 정규화기.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowNormalizer {
    config: NormalizerConfig,
}

impl RowNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// 원시 행을 정규화합니다.
    ///
    /// # 에러
    ///
    /// - [`RankError::EmptyInput`]: 행이 없거나, 컬럼이 없거나, 유효한 레코드가 하나도 없는 경우
    /// - [`RankError::MissingColumns`]: 필수 컬럼이 전혀 없는 경우 (행 처리 전에 판정)
    pub fn normalize(&self, rows: &[RawRow]) -> RankResult<Normalized> {
        if rows.is_empty() || rows.iter().all(RawRow::is_empty) {
            return Err(RankError::EmptyInput);
        }

        let header = merged_header(rows);
        let format = InputFormat::detect_header(&header)?;
        debug!(format = %format, columns = header.len(), "Input format detected");

        let mut out = Normalized {
            format: format.clone(),
            records: Vec::new(),
            warnings: Vec::new(),
            skipped_cells: 0,
            rows_read: rows.len(),
        };

        match &format {
            InputFormat::Long => {
                for row in rows {
                    match self.normalize_long_row(row) {
                        Ok(record) => out.records.push(record),
                        Err(issue) => {
                            warn!(row = row.index, %issue, "Dropping row");
                            out.warnings.push(RowWarning::new(row.index, issue));
                        }
                    }
                }
            }
            InputFormat::Wide { date_columns } => {
                for row in rows {
                    self.normalize_wide_row(row, &header, date_columns, &mut out);
                }
            }
        }

        if out.records.is_empty() {
            warn!(
                rows = out.rows_read,
                warnings = out.warnings.len(),
                "No valid rank records in input"
            );
            return Err(RankError::EmptyInput);
        }

        info!(
            format = format.name(),
            rows = out.rows_read,
            records = out.records.len(),
            warnings = out.warnings.len(),
            skipped_cells = out.skipped_cells,
            "Rows normalized"
        );

        Ok(out)
    }

    fn normalize_long_row(&self, row: &RawRow) -> Result<PositionRecord, RowIssue> {
        let keyword = row.get(KEYWORD_COLUMN).ok_or_else(|| missing_field(KEYWORD_COLUMN))?;
        let date_raw = row.get(DATE_COLUMN).ok_or_else(|| missing_field(DATE_COLUMN))?;
        let date = parse_date(date_raw)?;
        let position_raw = row
            .get(POSITION_COLUMN)
            .ok_or_else(|| missing_field(POSITION_COLUMN))?;
        let position = self.accept_position(parse_position(position_raw)?)?;

        Ok(PositionRecord {
            keyword: keyword.to_string(),
            date,
            position,
            search_volume: parse_volume(row.get(VOLUME_COLUMN)),
            url: row.get(URL_COLUMN).map(str::to_string),
        })
    }

    fn normalize_wide_row(
        &self,
        row: &RawRow,
        header: &Arc<Header>,
        date_columns: &[DateColumn],
        out: &mut Normalized,
    ) {
        let Some(keyword) = row.get(KEYWORD_COLUMN) else {
            warn!(row = row.index, "Dropping row without keyword");
            out.warnings
                .push(RowWarning::new(row.index, missing_field(KEYWORD_COLUMN)));
            return;
        };
        let search_volume = parse_volume(row.get(VOLUME_COLUMN));
        // CSV에서 읽은 행은 병합 헤더와 같은 헤더를 공유하므로 위치로 바로 읽음
        let shared = Arc::ptr_eq(row.header(), header);
        let cell = |index: usize, name: &str| {
            if shared {
                row.value_at(index)
            } else {
                row.get(name)
            }
        };

        for column in date_columns {
            // 빈 셀과 숫자가 아닌 값("-", "n/a" 등)은 순위 없음으로 조용히 건너뜀
            let Some(raw) = cell(column.index, &column.name) else {
                out.skipped_cells += 1;
                continue;
            };
            let Ok(parsed) = parse_position(raw) else {
                out.skipped_cells += 1;
                continue;
            };

            match self.accept_position(parsed) {
                Ok(position) => {
                    let url = column
                        .landing_index
                        .zip(column.landing.as_deref())
                        .and_then(|(index, name)| cell(index, name))
                        .map(str::to_string);
                    out.records.push(PositionRecord {
                        keyword: keyword.to_string(),
                        date: column.date,
                        position,
                        search_volume,
                        url,
                    });
                }
                Err(issue) => {
                    debug!(row = row.index, column = %column.name, %issue, "Dropping cell");
                    out.warnings
                        .push(RowWarning::new(row.index, issue).in_column(column.name.clone()));
                }
            }
        }
    }

    fn accept_position(&self, position: i64) -> Result<u32, RowIssue> {
        let out_of_range = || RowIssue::PositionOutOfRange {
            position,
            min: self.config.min_position,
            max: self.config.max_position,
        };
        if !self.config.accepts(position) {
            return Err(out_of_range());
        }
        u32::try_from(position).map_err(|_| out_of_range())
    }
}

/// 모든 행의 컬럼 이름을 처음 등장한 순서대로 모읍니다.
///
/// 모든 행이 같은 헤더를 공유하면(CSV 입력) 그 헤더를 그대로 반환합니다.
/// 직전 행과 같은 헤더는 다시 훑지 않습니다.
fn merged_header(rows: &[RawRow]) -> Arc<Header> {
    let Some(first) = rows.first().map(RawRow::header) else {
        return Arc::default();
    };
    if rows.iter().all(|r| Arc::ptr_eq(r.header(), first)) {
        return Arc::clone(first);
    }

    let mut merged = Header::default();
    let mut previous: Option<&Arc<Header>> = None;
    for row in rows {
        let header = row.header();
        if previous.is_some_and(|p| Arc::ptr_eq(p, header)) {
            continue;
        }
        for column in header.names() {
            merged.push_unique(column);
        }
        previous = Some(header);
    }
    Arc::new(merged)
}

fn missing_field(column: &str) -> RowIssue {
    RowIssue::MissingField {
        column: column.to_string(),
    }
}

/// 순위 셀을 정수로 파싱합니다. `"5"`, `"5.0"`은 허용하고 `"5.5"`는 거부합니다.
fn parse_position(raw: &str) -> Result<i64, RowIssue> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return Ok(value);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Ok(value as i64),
        _ => Err(RowIssue::InvalidPosition {
            value: raw.to_string(),
        }),
    }
}

/// 검색량 셀을 파싱합니다. 천 단위 구분자를 허용하고, 없거나 잘못된 값은 0입니다.
fn parse_volume(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };
    let cleaned: String = raw.chars().filter(|c| !matches!(c, ',' | '_' | ' ')).collect();
    if let Ok(value) = cleaned.parse::<u64>() {
        return value;
    }
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value.round() as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn long_row(index: usize, keyword: &str, date: &str, position: &str) -> RawRow {
        RawRow::from_pairs(
            index,
            [
                ("Keyword", keyword),
                ("Date", date),
                ("Position", position),
                ("Search Volume", "1,200"),
            ],
        )
    }

    #[test]
    fn test_wide_row_example() {
        let row = RawRow::from_pairs(
            1,
            [
                ("Keyword", "shoes"),
                ("Search Volume", "1000"),
                ("site.com/x_20240101", "5"),
                ("site.com/x_20240201", "-"),
            ],
        );

        let normalized = RowNormalizer::default().normalize(&[row]).unwrap();

        assert_eq!(normalized.records.len(), 1);
        let record = &normalized.records[0];
        assert_eq!(record.keyword, "shoes");
        assert_eq!(record.date, ymd(2024, 1, 1));
        assert_eq!(record.position, 5);
        assert_eq!(record.search_volume, 1000);
        assert_eq!(record.url, None);
        assert_eq!(normalized.skipped_cells, 1);
        assert!(normalized.warnings.is_empty());
    }

    #[test]
    fn test_wide_landing_and_type_columns() {
        let row = RawRow::from_pairs(
            1,
            [
                ("Keyword", "boots"),
                ("Search Volume", "50"),
                ("pos_20240101", "3"),
                ("pos_20240101_landing", "https://site.com/boots"),
                ("pos_20240101_type", "organic"),
                ("pos_20240102", "4"),
            ],
        );

        let normalized = RowNormalizer::default().normalize(&[row]).unwrap();
        match &normalized.format {
            InputFormat::Wide { date_columns } => assert_eq!(date_columns.len(), 2),
            other => panic!("unexpected format: {other:?}"),
        }

        assert_eq!(normalized.records.len(), 2);
        assert_eq!(
            normalized.records[0].url.as_deref(),
            Some("https://site.com/boots")
        );
        assert_eq!(normalized.records[1].url, None);
        assert_eq!(normalized.records[1].date, ymd(2024, 1, 2));
    }

    #[test]
    fn test_long_rows_with_bad_rows_dropped() {
        let rows = vec![
            long_row(1, "shoes", "2024-01-01", "5"),
            long_row(2, "shoes", "not a date", "6"),
            long_row(3, "", "2024-01-03", "7"),
            long_row(4, "shoes", "2024-01-04", "abc"),
            long_row(5, "shoes", "2024-01-05", "101"),
            long_row(6, "shoes", "2024-01-06", "0"),
            long_row(7, "shoes", "20240107", "9"),
        ];

        let normalized = RowNormalizer::default().normalize(&rows).unwrap();

        assert_eq!(normalized.format, InputFormat::Long);
        assert_eq!(normalized.records.len(), 2);
        assert_eq!(normalized.records[0].search_volume, 1200);
        assert_eq!(normalized.records[1].date, ymd(2024, 1, 7));
        assert_eq!(normalized.warnings.len(), 5);
        assert!(matches!(
            normalized.warnings[0].issue,
            RowIssue::MalformedDate { .. }
        ));
        assert_eq!(normalized.warnings[0].row, 2);
        assert!(matches!(
            normalized.warnings[1].issue,
            RowIssue::MissingField { .. }
        ));
        assert!(matches!(
            normalized.warnings[2].issue,
            RowIssue::InvalidPosition { .. }
        ));
        assert!(matches!(
            normalized.warnings[3].issue,
            RowIssue::PositionOutOfRange { position: 101, .. }
        ));
    }

    #[test]
    fn test_custom_position_window() {
        let normalizer = RowNormalizer::new(NormalizerConfig {
            min_position: 1,
            max_position: 200,
        });
        let rows = vec![long_row(1, "shoes", "2024-01-01", "150")];

        let normalized = normalizer.normalize(&rows).unwrap();
        assert_eq!(normalized.records[0].position, 150);
    }

    #[test]
    fn test_empty_input() {
        let err = RowNormalizer::default().normalize(&[]).unwrap_err();
        assert!(matches!(err, RankError::EmptyInput));

        let err = RowNormalizer::default()
            .normalize(&[RawRow::new(1)])
            .unwrap_err();
        assert!(matches!(err, RankError::EmptyInput));
    }

    #[test]
    fn test_all_rows_invalid_is_empty_input() {
        let rows = vec![long_row(1, "shoes", "garbage", "5")];
        let err = RowNormalizer::default().normalize(&rows).unwrap_err();
        assert!(matches!(err, RankError::EmptyInput));
    }

    #[test]
    fn test_missing_columns() {
        let row = RawRow::from_pairs(1, [("Keyword", "shoes"), ("Rank", "5")]);
        let err = RowNormalizer::default().normalize(&[row]).unwrap_err();

        match err {
            RankError::MissingColumns { format, missing } => {
                assert_eq!(format, "long");
                assert_eq!(missing, vec!["Date".to_string(), "Position".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wide_without_keyword_column() {
        let row = RawRow::from_pairs(1, [("Term", "shoes"), ("x_20240101", "5")]);
        let err = RowNormalizer::default().normalize(&[row]).unwrap_err();
        assert!(matches!(err, RankError::MissingColumns { ref format, .. } if format == "wide"));
    }

    #[test]
    fn test_wide_requires_search_volume() {
        let row = RawRow::from_pairs(1, [("Keyword", "shoes"), ("x_20240101", "5")]);
        let err = RowNormalizer::default().normalize(&[row]).unwrap_err();

        match err {
            RankError::MissingColumns { format, missing } => {
                assert_eq!(format, "wide");
                assert_eq!(missing, vec!["Search Volume".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wide_out_of_window_cell_warns_with_column() {
        let row = RawRow::from_pairs(
            4,
            [
                ("Keyword", "shoes"),
                ("Search Volume", "1000"),
                ("site.com/x_20240101", "150"),
                ("site.com/x_20240201", "8"),
            ],
        );

        let normalized = RowNormalizer::default().normalize(&[row]).unwrap();

        assert_eq!(normalized.records.len(), 1);
        assert_eq!(normalized.records[0].position, 8);
        assert_eq!(normalized.skipped_cells, 0);
        assert_eq!(normalized.warnings.len(), 1);
        let warning = &normalized.warnings[0];
        assert_eq!(warning.row, 4);
        assert_eq!(warning.column, Some("site.com/x_20240101".to_string()));
        assert!(matches!(
            warning.issue,
            RowIssue::PositionOutOfRange { position: 150, max: 100, .. }
        ));
    }

    #[test]
    fn test_wide_shared_header_reads_by_index() {
        let header = Arc::new(Header::new([
            "Keyword",
            "Search Volume",
            "pos_20240101",
            "pos_20240101_landing",
            "pos_20240102",
        ]));
        let rows = vec![
            RawRow::with_header(
                1,
                Arc::clone(&header),
                vec![
                    "shoes".into(),
                    "10".into(),
                    "3".into(),
                    "https://site.com/shoes".into(),
                    "".into(),
                ],
            ),
            RawRow::with_header(2, Arc::clone(&header), vec!["boots".into(), "20".into()]),
        ];

        let normalized = RowNormalizer::default().normalize(&rows).unwrap();
        match &normalized.format {
            InputFormat::Wide { date_columns } => {
                assert_eq!(date_columns[0].index, 2);
                assert_eq!(date_columns[0].landing_index, Some(3));
                assert_eq!(date_columns[1].index, 4);
                assert_eq!(date_columns[1].landing_index, None);
            }
            other => panic!("unexpected format: {other:?}"),
        }

        assert_eq!(normalized.records.len(), 1);
        assert_eq!(normalized.records[0].keyword, "shoes");
        assert_eq!(
            normalized.records[0].url.as_deref(),
            Some("https://site.com/shoes")
        );
        assert_eq!(normalized.skipped_cells, 3);
    }

    #[test]
    fn test_rows_with_different_headers_are_merged() {
        let rows = vec![
            RawRow::from_pairs(
                1,
                [("Keyword", "shoes"), ("Search Volume", "1"), ("a_20240101", "2")],
            ),
            RawRow::from_pairs(
                2,
                [("a_20240102", "4"), ("Keyword", "boots"), ("Search Volume", "1")],
            ),
        ];

        let normalized = RowNormalizer::default().normalize(&rows).unwrap();

        assert_eq!(normalized.records.len(), 2);
        assert_eq!(normalized.records[1].keyword, "boots");
        assert_eq!(normalized.records[1].date, ymd(2024, 1, 2));
        assert_eq!(normalized.skipped_cells, 2);
    }

    #[test]
    fn test_parse_position_variants() {
        assert_eq!(parse_position("7"), Ok(7));
        assert_eq!(parse_position(" 7.0 "), Ok(7));
        assert!(parse_position("7.5").is_err());
        assert!(parse_position("-").is_err());
    }

    #[test]
    fn test_parse_volume_variants() {
        assert_eq!(parse_volume(Some("1,000")), 1000);
        assert_eq!(parse_volume(Some("12.6")), 13);
        assert_eq!(parse_volume(Some("n/a")), 0);
        assert_eq!(parse_volume(None), 0);
    }
}
