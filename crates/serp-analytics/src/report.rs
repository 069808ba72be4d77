//! 분석 보고서와 출력 페이로드.
//!
//! 표시 계층(테이블, 차트)에 넘기는 값들은 모두 `Serialize` 구조체이며,
//! 필드 이름은 camelCase로 직렬화됩니다.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use serp_core::{
    BouncePattern, KeywordSeries, Prediction, RetracementLevels, RowWarning, VolatilityResult,
};

use crate::retracement::RetracementAnalysis;

/// 한 키워드의 전체 분석 결과.
///
/// 포인트가 2개 이상인 시리즈에 대해서만 만들어집니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordAnalysis {
    pub series: KeywordSeries,
    pub volatility: VolatilityResult,
    pub retracement: RetracementAnalysis,
    pub prediction: Option<Prediction>,
}

impl KeywordAnalysis {
    pub fn keyword(&self) -> &str {
        &self.series.keyword
    }

    /// 차트용 페이로드로 변환합니다.
    pub fn chart_payload(&self) -> ChartPayload {
        ChartPayload {
            keyword: self.series.keyword.clone(),
            series: self
                .series
                .points
                .iter()
                .map(|p| SeriesPointPayload {
                    date: p.date,
                    position: p.position,
                })
                .collect(),
            levels: self.retracement.levels,
            patterns: self.retracement.patterns.clone(),
            prediction: self.prediction.clone(),
            reliability: self.retracement.reliability,
        }
    }
}

/// 변동성 키워드 목록의 한 행.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolatileKeyword {
    pub keyword: String,
    pub volatility_score: f64,
    pub search_volume: u64,
    pub current_position: u32,
}

/// 차트 시리즈의 한 점.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPointPayload {
    pub date: NaiveDate,
    pub position: u32,
}

/// 키워드 차트 페이로드.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub keyword: String,
    pub series: Vec<SeriesPointPayload>,
    /// 비율 키("0", "0.236", ...) → 순위 값
    pub levels: RetracementLevels,
    pub patterns: Vec<BouncePattern>,
    /// 예측이 없으면 `null`
    pub prediction: Option<Prediction>,
    pub reliability: f64,
}

/// 실행 요약 카운트.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// 전체 키워드 수 (데이터 부족 키워드 포함)
    pub keywords: usize,
    /// 포인트가 2개 미만이라 분석에서 제외된 키워드 수
    pub insufficient: usize,
    /// 변동성 키워드 수
    pub volatile: usize,
    /// 정규화된 레코드 수
    pub records: usize,
    /// 버려진 행/셀 경고 수
    pub warnings: usize,
}

/// 한 번의 분석 실행 결과.
///
/// 실행마다 새로 만들어지며 이전 보고서와 병합되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// 판별된 입력 형식 ("long" / "wide")
    pub format: String,
    pub summary: AnalysisSummary,
    /// 점수 내림차순 변동성 결과 (분석 가능한 키워드만)
    pub volatility: Vec<VolatilityResult>,
    /// 입력 등장 순서의 키워드 분석 (분석 가능한 키워드만)
    pub keywords: Vec<KeywordAnalysis>,
    /// 행/셀 단위 경고
    pub warnings: Vec<RowWarning>,
}

impl AnalysisReport {
    /// 키워드 분석 조회.
    pub fn get(&self, keyword: &str) -> Option<&KeywordAnalysis> {
        self.keywords.iter().find(|k| k.keyword() == keyword)
    }

    /// 점수 내림차순의 변동성 키워드 목록.
    pub fn volatile_keywords(&self) -> Vec<VolatileKeyword> {
        self.ranked(true)
    }

    /// 점수 내림차순의 전체 키워드 목록 (변동성 여부 무관).
    pub fn ranked_keywords(&self) -> Vec<VolatileKeyword> {
        self.ranked(false)
    }

    fn ranked(&self, volatile_only: bool) -> Vec<VolatileKeyword> {
        let by_keyword: HashMap<&str, &KeywordAnalysis> =
            self.keywords.iter().map(|k| (k.keyword(), k)).collect();

        self.volatility
            .iter()
            .filter(|v| !volatile_only || v.is_volatile)
            .filter_map(|v| {
                let analysis = by_keyword.get(v.keyword.as_str())?;
                Some(VolatileKeyword {
                    keyword: v.keyword.clone(),
                    volatility_score: v.score,
                    search_volume: analysis.series.search_volume,
                    current_position: analysis.series.current_position()?,
                })
            })
            .collect()
    }

    /// 모든 분석 가능한 키워드의 차트 페이로드 (입력 등장 순서).
    pub fn chart_payloads(&self) -> Vec<ChartPayload> {
        self.keywords.iter().map(KeywordAnalysis::chart_payload).collect()
    }

    /// 한 키워드의 차트 페이로드. 없거나 데이터가 부족하면 `None`.
    pub fn chart_for(&self, keyword: &str) -> Option<ChartPayload> {
        self.get(keyword).map(KeywordAnalysis::chart_payload)
    }

    pub fn status(&self) -> RunStatus {
        RunStatus::Success(self.summary)
    }
}

/// 실행당 하나의 사용자 표시 상태.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Success(AnalysisSummary),
    Failed(String),
}

impl RunStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Success(_))
    }
}

impl<E: fmt::Display> From<&Result<AnalysisReport, E>> for RunStatus {
    fn from(result: &Result<AnalysisReport, E>) -> Self {
        match result {
            Ok(report) => report.status(),
            Err(err) => RunStatus::Failed(err.to_string()),
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Success(summary) => {
                write!(
                    f,
                    "분석 완료: 키워드 {}개 (변동성 {}개",
                    summary.keywords, summary.volatile
                )?;
                if summary.insufficient > 0 {
                    write!(f, ", 데이터 부족 {}개", summary.insufficient)?;
                }
                write!(f, "), 레코드 {}개", summary.records)?;
                if summary.warnings > 0 {
                    write!(f, ", 경고 {}건", summary.warnings)?;
                }
                Ok(())
            }
            RunStatus::Failed(message) => write!(f, "분석 실패: {}", message),
        }
    }
}
