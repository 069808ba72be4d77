//! 순위 내보내기 데이터 수집 모듈.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - CSV 텍스트/파일 → [`RawRow`] 변환
//! - wide/long 형식 자동 판별 및 [`PositionRecord`](serp_core::PositionRecord) 정규화
//! - 키워드별 시계열 구성 ([`SeriesSet`])
//!
//! # 사용 예시
//!
//! ```ignore
//! use serp_data::{parse_rows, RowNormalizer, SeriesBuilder};
//!
//! let rows = parse_rows(csv_text)?;
//! let normalized = RowNormalizer::default().normalize(&rows)?;
//! let series = SeriesBuilder::build(normalized.records);
//! ```

pub mod csv_reader;
pub mod date;
pub mod normalizer;
pub mod raw;
pub mod series;

pub use csv_reader::{parse_rows, read_rows, read_rows_from_path};
pub use normalizer::{
    InputFormat, Normalized, RowNormalizer, DATE_COLUMN, KEYWORD_COLUMN, POSITION_COLUMN,
    URL_COLUMN, VOLUME_COLUMN,
};
pub use raw::{Header, RawRow};
pub use series::{SeriesBuilder, SeriesSet};
