//! 순위 시계열 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 변동성 점수 계산
//! - 피보나치 되돌림 레벨과 지지/저항 반등 탐지
//! - 다음 레벨 예측
//! - 정규화 → 시리즈 → 분석을 잇는 파이프라인과 출력 페이로드
//!
//! # Re-exports
//!
//! - [`pipeline`]: 전체 분석 실행 (AnalysisPipeline)
//! - [`report`]: 보고서와 표시 계층용 페이로드 (AnalysisReport, ChartPayload 등)

pub mod pipeline;
pub mod predictor;
pub mod report;
pub mod retracement;
pub mod volatility;

pub use pipeline::AnalysisPipeline;
pub use predictor::{next_level, Predictor};
pub use report::{
    AnalysisReport, AnalysisSummary, ChartPayload, KeywordAnalysis, RunStatus, SeriesPointPayload,
    VolatileKeyword,
};
pub use retracement::{reliability, RetracementAnalysis, RetracementEngine};
pub use volatility::{ChurnStats, VolatilityScorer};
