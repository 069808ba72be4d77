//! 분석 파이프라인.
//!
//! ```text
//! RawRow[] → RowNormalizer → SeriesBuilder → { VolatilityScorer, RetracementEngine → Predictor }
//! ```
//!
//! 각 단계는 앞 단계의 결과를 읽기만 하고 새 값을 반환합니다. 파이프라인 자체는
//! 설정 외의 상태를 갖지 않으므로 같은 입력은 항상 같은 보고서를 만듭니다.

use serp_core::{keyword_span, AppConfig, KeywordSeries, RankResult};
use serp_data::{Normalized, RawRow, RowNormalizer, SeriesBuilder, SeriesSet};
use tracing::{debug, info};

use crate::predictor::Predictor;
use crate::report::{AnalysisReport, AnalysisSummary, KeywordAnalysis};
use crate::retracement::RetracementEngine;
use crate::volatility::VolatilityScorer;

/// 분석 파이프라인.
#[derive(Debug, Clone, Default)]
pub struct AnalysisPipeline {
    config: AppConfig,
}

impl AnalysisPipeline {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn scorer(&self) -> VolatilityScorer {
        VolatilityScorer::new(self.config.volatility)
    }

    pub fn engine(&self) -> RetracementEngine {
        RetracementEngine::new(self.config.retracement)
    }

    /// 원시 행부터 보고서까지 전체 분석을 실행합니다.
    ///
    /// # 에러
    ///
    /// 입력에 행이 없거나 필수 컬럼이 없으면 부분 결과 없이 실패합니다.
    /// 개별 행/셀 문제는 보고서의 `warnings`에 기록됩니다.
    pub fn run(&self, rows: &[RawRow]) -> RankResult<AnalysisReport> {
        let normalized = RowNormalizer::new(self.config.normalizer).normalize(rows)?;
        Ok(self.analyze(normalized))
    }

    /// 정규화 결과를 분석합니다.
    pub fn analyze(&self, normalized: Normalized) -> AnalysisReport {
        let Normalized {
            format,
            records,
            warnings,
            ..
        } = normalized;
        let record_count = records.len();

        let set = SeriesBuilder::build(records);
        let keywords = self.analyze_series(&set);

        let mut volatility: Vec<_> = keywords.iter().map(|k| k.volatility.clone()).collect();
        // 입력 등장 순서에서 안정 정렬 → 동점은 키워드 순서 유지
        volatility.sort_by(|a, b| b.score.total_cmp(&a.score));

        let summary = AnalysisSummary {
            keywords: set.len(),
            insufficient: set.len() - keywords.len(),
            volatile: volatility.iter().filter(|v| v.is_volatile).count(),
            records: record_count,
            warnings: warnings.len(),
        };

        info!(
            keywords = summary.keywords,
            analyzed = keywords.len(),
            insufficient = summary.insufficient,
            volatile = summary.volatile,
            "Analysis complete"
        );

        AnalysisReport {
            format: format.name().to_string(),
            summary,
            volatility,
            keywords,
            warnings,
        }
    }

    /// 분석 가능한 시리즈만 입력 등장 순서대로 분석합니다.
    pub fn analyze_series(&self, set: &SeriesSet) -> Vec<KeywordAnalysis> {
        let scorer = self.scorer();
        let engine = self.engine();
        let predictor = Predictor::new(engine);

        set.iter()
            .filter_map(|series| analyze_keyword(series, &scorer, &engine, &predictor))
            .collect()
    }

    /// 한 키워드를 분석합니다. 포인트가 2개 미만이면 `None`.
    pub fn analyze_keyword(&self, series: &KeywordSeries) -> Option<KeywordAnalysis> {
        let engine = self.engine();
        analyze_keyword(series, &self.scorer(), &engine, &Predictor::new(engine))
    }
}

fn analyze_keyword(
    series: &KeywordSeries,
    scorer: &VolatilityScorer,
    engine: &RetracementEngine,
    predictor: &Predictor,
) -> Option<KeywordAnalysis> {
    let span = keyword_span!("analyze_keyword", series.keyword, series.len());
    let _enter = span.enter();

    if !series.is_analyzable() {
        debug!("Insufficient data, skipping");
        return None;
    }

    let volatility = scorer.score(series)?;
    let retracement = engine.analyze(series)?;
    let prediction = predictor.predict_with(series, &retracement);

    debug!(
        score = volatility.score,
        volatile = volatility.is_volatile,
        patterns = retracement.patterns.len(),
        reliability = retracement.reliability,
        "Keyword analyzed"
    );

    Some(KeywordAnalysis {
        series: series.clone(),
        volatility,
        retracement,
        prediction,
    })
}
