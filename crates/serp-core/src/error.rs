//! 순위 분석 시스템의 에러 타입.
//!
//! 두 계층으로 나뉩니다:
//! - [`RankError`]: 현재 실행 전체를 중단시키는 구조적 에러 (호출자에게 전달)
//! - [`RowIssue`]: 행/셀 단위 문제. 해당 행만 버리고 [`RowWarning`]으로 기록

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// 핵심 분석 에러.
#[derive(Debug, Error)]
pub enum RankError {
    /// 파싱 후 데이터 행이 하나도 없음
    #[error("입력 데이터가 비어 있습니다: 분석할 행이 없습니다")]
    EmptyInput,

    /// 필수 컬럼 누락 (행 단위 처리 이전에 감지)
    #[error("필수 컬럼 누락 ({format}): {}", .missing.join(", "))]
    MissingColumns {
        /// 감지된(또는 시도한) 입력 형식
        format: String,
        /// 누락된 컬럼 이름
        missing: Vec<String>,
    },

    /// CSV 파싱 에러
    #[error("CSV 에러: {0}")]
    Csv(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 파일 입출력 에러
    #[error("입출력 에러: {0}")]
    Io(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 분석 작업을 위한 Result 타입.
pub type RankResult<T> = Result<T, RankError>;

impl RankError {
    /// 입력 구조 자체의 문제인지 확인합니다 (행이 없거나 필수 컬럼 부재).
    pub fn is_structural(&self) -> bool {
        matches!(self, RankError::EmptyInput | RankError::MissingColumns { .. })
    }

    /// 입력 파일 자체의 문제인지 확인합니다 (설정을 바꿔도 해결되지 않음).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RankError::EmptyInput | RankError::MissingColumns { .. } | RankError::Csv(_)
        )
    }
}

impl From<serde_json::Error> for RankError {
    fn from(err: serde_json::Error) -> Self {
        RankError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for RankError {
    fn from(err: std::io::Error) -> Self {
        RankError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for RankError {
    fn from(err: config::ConfigError) -> Self {
        RankError::Config(err.to_string())
    }
}

/// 행/셀 단위의 비치명적 문제.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowIssue {
    /// 날짜 파싱 실패 (long 형식 전용)
    #[error("날짜 형식 오류: {value:?}")]
    MalformedDate { value: String },

    /// 필수 값이 비어 있음
    #[error("값 없음: {column:?} 컬럼")]
    MissingField { column: String },

    /// 순위가 정수로 파싱되지 않음
    #[error("순위가 정수가 아닙니다: {value:?}")]
    InvalidPosition { value: String },

    /// 허용 순위 범위 밖 ("not ranked"로 간주)
    #[error("순위 {position}이(가) 허용 범위 {min}..={max} 밖입니다")]
    PositionOutOfRange { position: i64, min: u32, max: u32 },
}

/// 행 번호와 함께 기록되는 경고.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowWarning {
    /// 1부터 시작하는 데이터 행 번호 (헤더 제외)
    pub row: usize,
    /// 문제가 된 컬럼 (wide 형식의 셀 단위 문제)
    pub column: Option<String>,
    /// 문제 내용
    pub issue: RowIssue,
}

impl RowWarning {
    pub fn new(row: usize, issue: RowIssue) -> Self {
        Self {
            row,
            column: None,
            issue,
        }
    }

    pub fn in_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

impl fmt::Display for RowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(f, "행 {} [{}]: {}", self.row, column, self.issue),
            None => write!(f, "행 {}: {}", self.row, self.issue),
        }
    }
}
