//! 변동성 점수 (Volatility Scorer).
//!
//! 일별 순위 변동 폭 `Δᵢ = |pᵢ − pᵢ₋₁|`의 분산을 평균 순위로 정규화합니다.
//!
//! ```text
//! score = (w_std × σ(Δ) + w_avg × mean(Δ)) / mean(p) × 100
//! ```
//!
//! σ는 모집단 표준편차입니다. 순위는 1 이상이므로 mean(p)는 0이 될 수 없습니다.
//! `w_avg > 0`이면 점수가 0인 것은 모든 변동이 0인 것과 동치입니다.

use serp_core::{KeywordSeries, VolatilityConfig, VolatilityResult, MIN_ANALYZABLE_POINTS};
use tracing::trace;

/// 순위 변동 통계.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChurnStats {
    /// 변동 폭의 모집단 표준편차
    pub std_dev_change: f64,
    /// 평균 변동 폭
    pub avg_change: f64,
    /// 평균 순위
    pub avg_position: f64,
}

impl ChurnStats {
    /// 순위 목록에서 통계를 계산합니다. 2개 미만이면 `None`.
    pub fn from_positions(positions: &[u32]) -> Option<Self> {
        if positions.len() < MIN_ANALYZABLE_POINTS {
            return None;
        }

        let changes: Vec<f64> = positions
            .windows(2)
            .map(|w| (f64::from(w[1]) - f64::from(w[0])).abs())
            .collect();

        let n = changes.len() as f64;
        let avg_change = changes.iter().sum::<f64>() / n;
        let variance = changes
            .iter()
            .map(|c| (c - avg_change).powi(2))
            .sum::<f64>()
            / n;

        let avg_position =
            positions.iter().map(|&p| f64::from(p)).sum::<f64>() / positions.len() as f64;

        Some(Self {
            std_dev_change: variance.sqrt(),
            avg_change,
            avg_position,
        })
    }
}

/// 변동성 점수 계산기.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolatilityScorer {
    config: VolatilityConfig,
}

impl VolatilityScorer {
    pub fn new(config: VolatilityConfig) -> Self {
        Self { config }
    }

    /// 임계값만 바꾼 계산기.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// 통계로부터 점수를 계산합니다.
    pub fn score_stats(&self, stats: &ChurnStats) -> f64 {
        if stats.avg_position <= 0.0 {
            return 0.0;
        }
        let churn = self.config.std_dev_weight * stats.std_dev_change
            + self.config.avg_change_weight * stats.avg_change;
        churn / stats.avg_position * 100.0
    }

    /// 한 키워드의 변동성을 평가합니다. 포인트가 2개 미만이면 `None`.
    pub fn score(&self, series: &KeywordSeries) -> Option<VolatilityResult> {
        let stats = ChurnStats::from_positions(&series.positions())?;
        let score = self.score_stats(&stats);

        trace!(
            keyword = %series.keyword,
            std_dev_change = stats.std_dev_change,
            avg_change = stats.avg_change,
            avg_position = stats.avg_position,
            score,
            "Volatility scored"
        );

        Some(VolatilityResult {
            keyword: series.keyword.clone(),
            score,
            is_volatile: score > self.config.threshold,
        })
    }

    /// 여러 키워드를 평가하고 점수 내림차순으로 정렬합니다.
    ///
    /// 동점이면 입력 순서를 유지합니다. 포인트가 부족한 키워드는 제외됩니다.
    pub fn score_all<'a, I>(&self, series: I) -> Vec<VolatilityResult>
    where
        I: IntoIterator<Item = &'a KeywordSeries>,
    {
        let mut results: Vec<VolatilityResult> =
            series.into_iter().filter_map(|s| self.score(s)).collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results
    }
}
