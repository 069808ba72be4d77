//! 날짜 파싱.
//!
//! - 8자리 토큰(`YYYYMMDD`)은 `YYYY-MM-DD`로 해석합니다.
//! - 그 밖의 문자열은 흔한 내보내기 형식을 차례로 시도합니다 (long 형식 전용).

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serp_core::RowIssue;

/// 일반 날짜 형식 (시도 순서대로).
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// 정확히 8자리 숫자 토큰을 날짜로 해석합니다.
pub fn parse_compact_date(token: &str) -> Option<NaiveDate> {
    if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(token, "%Y%m%d").ok()
}

/// 컬럼 이름에 포함된 8자리 날짜 토큰을 찾습니다.
///
/// 정확히 8자리인 숫자 연속 구간만 후보가 되며, 여러 개면 마지막 유효 토큰을 씁니다.
/// 예: `site.com/x_20240101` → 2024-01-01
pub fn extract_date_token(column: &str) -> Option<NaiveDate> {
    let bytes = column.as_bytes();
    let mut found = None;
    let mut start = None;

    for (i, b) in bytes.iter().enumerate() {
        match (b.is_ascii_digit(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if let Some(date) = parse_compact_date(&column[s..i]) {
                    found = Some(date);
                }
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        if let Some(date) = parse_compact_date(&column[s..]) {
            found = Some(date);
        }
    }

    found
}

/// long 형식 `Date` 셀을 파싱합니다.
pub fn parse_date(value: &str) -> Result<NaiveDate, RowIssue> {
    let value = value.trim();

    if let Some(date) = parse_compact_date(value) {
        return Ok(date);
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime.date());
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.date_naive());
    }

    Err(RowIssue::MalformedDate {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_extract_token_from_column() {
        assert_eq!(extract_date_token("site.com/x_20240101"), Some(ymd(2024, 1, 1)));
        assert_eq!(extract_date_token("20231231_rank"), Some(ymd(2023, 12, 31)));
        assert_eq!(extract_date_token("Search Volume"), None);
    }

    #[test]
    fn test_extract_token_requires_exactly_eight_digits() {
        assert_eq!(extract_date_token("id_202401011"), None);
        assert_eq!(extract_date_token("x_2024011"), None);
        // 형식은 맞지만 존재하지 않는 날짜
        assert_eq!(extract_date_token("x_20241340"), None);
    }

    #[test]
    fn test_extract_token_prefers_last_valid() {
        assert_eq!(
            extract_date_token("run20230101_pos_20240215"),
            Some(ymd(2024, 2, 15))
        );
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-01-05"), Ok(ymd(2024, 1, 5)));
        assert_eq!(parse_date("20240105"), Ok(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024/01/05"), Ok(ymd(2024, 1, 5)));
        assert_eq!(parse_date("01/05/2024"), Ok(ymd(2024, 1, 5)));
        assert_eq!(parse_date("Jan 05, 2024"), Ok(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T10:30:00"), Ok(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T10:30:00+09:00"), Ok(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_parse_date_malformed() {
        assert_eq!(
            parse_date("last tuesday"),
            Err(RowIssue::MalformedDate {
                value: "last tuesday".to_string()
            })
        );
    }
}
