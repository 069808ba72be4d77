//! CSV → 원시 행 변환.
//!
//! 토큰화는 `csv` 크레이트에 맡기고, 여기서는 헤더 정리와 행 번호 부여만 합니다.
//! 파일 읽기(`read_rows_from_path`)가 파이프라인의 유일한 비동기 경계입니다.

use std::borrow::Cow;
use std::io;
use std::path::Path;
use std::sync::Arc;

use serp_core::{RankError, RankResult};
use tracing::{debug, warn};

use crate::raw::{Header, RawRow};

const UTF8_BOM: char = '\u{feff}';

/// 읽기 소스에서 CSV 행을 읽습니다.
///
/// 헤더 앞뒤 공백과 UTF-8 BOM을 제거하며, 헤더보다 짧은 행은 빈 셀로 채웁니다.
/// UTF-8이 아닌 바이트는 셀 단위로 U+FFFD로 치환하고 행은 그대로 유지합니다.
/// 모든 행은 하나의 [`Header`]를 공유합니다.
pub fn read_rows<R: io::Read>(reader: R) -> RankResult<Vec<RawRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let raw_headers: Vec<String> = csv_reader
        .byte_headers()
        .map_err(|e| RankError::Csv(e.to_string()))?
        .iter()
        .map(|h| decode_field(h).trim_start_matches(UTF8_BOM).trim().to_string())
        .collect();

    // 이름 없는 컬럼은 버림
    let kept: Vec<usize> = raw_headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.is_empty())
        .map(|(i, _)| i)
        .collect();
    let header = Arc::new(Header::new(kept.iter().map(|&i| raw_headers[i].clone())));

    let mut rows = Vec::new();
    let mut lossy_rows = 0usize;
    for (i, result) in csv_reader.byte_records().enumerate() {
        let record = result.map_err(|e| RankError::Csv(format!("행 {}: {}", i + 1, e)))?;

        let mut lossy = false;
        let values: Vec<String> = kept
            .iter()
            .map(|&idx| {
                let bytes = record.get(idx).unwrap_or_default();
                let value = decode_field(bytes);
                lossy |= matches!(value, Cow::Owned(_));
                value.into_owned()
            })
            .collect();

        if lossy {
            lossy_rows += 1;
            warn!(row = i + 1, "Invalid UTF-8 replaced in row");
        }

        rows.push(RawRow::with_header(i + 1, Arc::clone(&header), values));
    }

    debug!(
        columns = header.len(),
        rows = rows.len(),
        lossy_rows,
        "CSV parsed"
    );

    Ok(rows)
}

/// 셀 바이트를 문자열로 바꿉니다. 잘못된 UTF-8 시퀀스만 치환됩니다.
fn decode_field(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// 메모리의 CSV 텍스트를 파싱합니다.
pub fn parse_rows(text: &str) -> RankResult<Vec<RawRow>> {
    read_rows(text.as_bytes())
}

/// 파일 전체를 읽은 뒤 파싱합니다.
///
/// 부분 결과는 없습니다. 전부 읽히거나 에러가 납니다.
pub async fn read_rows_from_path(path: impl AsRef<Path>) -> RankResult<Vec<RawRow>> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| RankError::Io(format!("{}: {}", path.display(), e)))?;

    debug!(path = %path.display(), bytes = bytes.len(), "Input file loaded");

    read_rows(bytes.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_csv() {
        let text = "Keyword,Date,Position,Search Volume\nshoes,2024-01-01,5,1000\nshoes,2024-01-02,7,1000\n";
        let rows = parse_rows(text).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[1].get("Position"), Some("7"));
        assert_eq!(rows[0].get("Search Volume"), Some("1000"));
    }

    #[test]
    fn test_bom_and_header_whitespace() {
        let text = "\u{feff}Keyword , Date,Position\nboots,2024-02-01,3\n";
        let rows = parse_rows(text).unwrap();

        assert_eq!(rows[0].get("Keyword"), Some("boots"));
        assert_eq!(rows[0].get("Date"), Some("2024-02-01"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let text = "Keyword,Date,Position,URL\nboots,2024-02-01,3\n";
        let rows = parse_rows(text).unwrap();

        assert!(rows[0].has_column("URL"));
        assert_eq!(rows[0].get("URL"), None);
    }

    #[test]
    fn test_invalid_utf8_row_is_kept() {
        let mut bytes = b"Keyword,Date,Position\nshoes,2024-01-01,5\nshoes,2024-01-02,6\n".to_vec();
        bytes.extend_from_slice(b"caf\xe9,2024-01-03,7\n");

        let rows = read_rows(bytes.as_slice()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("Keyword"), Some("shoes"));
        assert_eq!(rows[2].get("Keyword"), Some("caf\u{fffd}"));
        assert_eq!(rows[2].get("Position"), Some("7"));
    }

    #[test]
    fn test_rows_share_one_header() {
        let rows = parse_rows("Keyword,,Position\nshoes,x,5\nboots,y,6\n").unwrap();

        assert!(Arc::ptr_eq(rows[0].header(), rows[1].header()));
        // 이름 없는 컬럼은 제외
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1].get("Position"), Some("6"));
    }

    #[test]
    fn test_header_only_yields_no_rows() {
        let rows = parse_rows("Keyword,Date,Position\n").unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let err = read_rows_from_path("/nonexistent/serp/input.csv").await.unwrap_err();
        assert!(matches!(err, RankError::Io(_)));
    }
}
