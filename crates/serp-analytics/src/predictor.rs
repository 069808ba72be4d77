//! 다음 레벨 예측 (Predictor).
//!
//! 직전 → 현재 순위 변화로 추세를 정하고, 추세 방향으로 다음에 만날
//! 되돌림 레벨을 고릅니다. 신뢰도는 되돌림 분석의 패턴 신뢰도를
//! `[0, 1]`로 환산한 값입니다.

use serp_core::{KeywordSeries, LevelValue, Prediction, RetracementLevels, Trend};
use tracing::trace;

use crate::retracement::{RetracementAnalysis, RetracementEngine};

/// 예측기.
#[derive(Debug, Clone, Copy, Default)]
pub struct Predictor {
    engine: RetracementEngine,
}

impl Predictor {
    pub fn new(engine: RetracementEngine) -> Self {
        Self { engine }
    }

    /// 시리즈를 직접 분석해 예측합니다. 포인트가 2개 미만이면 `None`.
    pub fn predict(&self, series: &KeywordSeries) -> Option<Prediction> {
        let analysis = self.engine.analyze(series)?;
        self.predict_with(series, &analysis)
    }

    /// 이미 계산된 되돌림 분석으로 예측합니다.
    pub fn predict_with(
        &self,
        series: &KeywordSeries,
        analysis: &RetracementAnalysis,
    ) -> Option<Prediction> {
        let previous = series.previous_position()?;
        let current = series.current_position()?;

        let trend = Trend::from_moves(previous, current);
        let position = f64::from(current);
        let current_level = analysis.levels.nearest(position);
        let next_level = next_level(&analysis.levels, position, trend);
        let confidence = (analysis.reliability / 100.0).clamp(0.0, 1.0);

        trace!(
            keyword = %series.keyword,
            %trend,
            current_level = %current_level.level,
            next_level = %next_level.level,
            confidence,
            "Prediction made"
        );

        Some(Prediction {
            trend,
            current_level,
            next_level,
            confidence,
        })
    }
}

/// 추세 방향으로 다음에 만날 레벨.
///
/// - 개선: 현재 순위보다 작은 값 중 가장 가까운 레벨, 없으면 가장 작은 값의 레벨
/// - 하락: 현재 순위보다 큰 값 중 가장 가까운 레벨, 없으면 가장 큰 값의 레벨
pub fn next_level(levels: &RetracementLevels, position: f64, trend: Trend) -> LevelValue {
    let sorted = levels.sorted_by_value();
    // sorted_by_value는 항상 7개 레벨을 반환
    let lowest = sorted[0];
    let highest = sorted[sorted.len() - 1];

    match trend {
        Trend::Improving => sorted
            .iter()
            .rev()
            .find(|l| l.value < position)
            .copied()
            .unwrap_or(lowest),
        Trend::Declining => sorted
            .iter()
            .find(|l| l.value > position)
            .copied()
            .unwrap_or(highest),
    }
}
