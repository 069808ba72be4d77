//! 피보나치 되돌림 엔진 (Retracement Engine).
//!
//! 시리즈 전체의 최저/최고 순위로 레벨을 한 번 계산하고(global-range 방식),
//! 레벨 근처에서 국소 극값을 만든 지점을 반등으로 기록합니다.
//!
//! # 반등 판정
//!
//! 첫/마지막을 제외한 각 지점 `i`와 각 레벨 `r`에 대해 `|pᵢ − level[r]| ≤ tolerance`이면:
//! - 양쪽 이웃이 모두 더 나쁜 순위(큰 숫자) → **Support**
//! - 양쪽 이웃이 모두 더 좋은 순위(작은 숫자) → **Resistance**
//!
//! 한 지점이 여러 레벨의 허용 오차 안에 있으면 레벨마다 하나씩 기록합니다.
//!
//! # 신뢰도
//!
//! `반등 지점 수 / (n − 1) × 100`. 여러 레벨에 걸친 한 지점은 한 번만 셉니다.
//! 내부 지점은 최대 `n − 2`개이므로 결과는 항상 `[0, 100)` 범위입니다.

use serp_core::{
    BouncePattern, BounceType, KeywordSeries, RetracementConfig, RetracementLevels, SeriesPoint,
    MIN_ANALYZABLE_POINTS,
};
use serde::Serialize;
use tracing::trace;

/// 한 키워드의 되돌림 분석 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetracementAnalysis {
    /// 전체 구간 레벨
    pub levels: RetracementLevels,
    /// 발생 순서대로의 반등
    pub patterns: Vec<BouncePattern>,
    /// 0 ~ 100 패턴 신뢰도
    pub reliability: f64,
}

impl RetracementAnalysis {
    /// 가장 최근 반등.
    pub fn latest_pattern(&self) -> Option<&BouncePattern> {
        self.patterns.last()
    }

    pub fn count_by_type(&self, bounce_type: BounceType) -> usize {
        self.patterns
            .iter()
            .filter(|p| p.bounce_type == bounce_type)
            .count()
    }
}

/// 되돌림 엔진.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetracementEngine {
    config: RetracementConfig,
}

impl RetracementEngine {
    pub fn new(config: RetracementConfig) -> Self {
        Self { config }
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self::new(RetracementConfig { tolerance })
    }

    pub fn tolerance(&self) -> f64 {
        self.config.tolerance
    }

    /// 시리즈를 분석합니다. 빈 시리즈면 `None`.
    ///
    /// 포인트가 하나뿐이면 레벨은 계산되지만 반등은 없고 신뢰도는 0입니다.
    pub fn analyze(&self, series: &KeywordSeries) -> Option<RetracementAnalysis> {
        let levels = RetracementLevels::from_positions(&series.positions())?;
        let (patterns, bounce_points) = self.detect_patterns(&series.points, &levels);
        let reliability = reliability(bounce_points, series.len());

        trace!(
            keyword = %series.keyword,
            low = levels.low(),
            high = levels.high(),
            patterns = patterns.len(),
            reliability,
            "Retracement analyzed"
        );

        Some(RetracementAnalysis {
            levels,
            patterns,
            reliability,
        })
    }

    /// 레벨 근처의 반등을 찾습니다.
    ///
    /// 반등 목록과, 반등이 하나 이상 기록된 지점 수를 반환합니다.
    pub fn detect_patterns(
        &self,
        points: &[SeriesPoint],
        levels: &RetracementLevels,
    ) -> (Vec<BouncePattern>, usize) {
        let mut patterns = Vec::new();
        let mut bounce_points = 0;

        if points.len() < 3 {
            return (patterns, bounce_points);
        }

        for window in points.windows(3) {
            let (prev, point, next) = (&window[0], &window[1], &window[2]);

            let bounce_type = if prev.position > point.position && next.position > point.position
            {
                BounceType::Support
            } else if prev.position < point.position && next.position < point.position {
                BounceType::Resistance
            } else {
                continue;
            };

            let position = f64::from(point.position);
            let before = patterns.len();
            for level in levels.iter() {
                if (position - level.value).abs() <= self.config.tolerance {
                    patterns.push(BouncePattern {
                        date: point.date,
                        position: point.position,
                        level: level.level,
                        bounce_type,
                    });
                }
            }
            if patterns.len() > before {
                bounce_points += 1;
            }
        }

        (patterns, bounce_points)
    }
}

/// 반등 지점 비율을 백분율로 계산합니다.
pub fn reliability(bounce_points: usize, point_count: usize) -> f64 {
    if point_count < MIN_ANALYZABLE_POINTS || bounce_points == 0 {
        return 0.0;
    }
    let moves = (point_count - 1) as f64;
    (bounce_points as f64 / moves * 100.0).clamp(0.0, 100.0)
}
