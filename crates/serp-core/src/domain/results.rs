//! 분석 결과 타입.
//!
//! 모두 분석 실행마다 새로 만들어지는 파생 값이며, 이전 실행 결과와 병합되지 않습니다.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use super::levels::{FibRatio, LevelValue};

/// 키워드 변동성 점수.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolatilityResult {
    pub keyword: String,
    /// 0 이상의 변동성 점수
    pub score: f64,
    /// `score > threshold`
    pub is_volatile: bool,
}

/// 반등 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BounceType {
    /// 양쪽 이웃보다 순위가 좋은 지점 (국소 최고 순위)
    Support,
    /// 양쪽 이웃보다 순위가 나쁜 지점 (국소 최저 순위)
    Resistance,
}

impl fmt::Display for BounceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BounceType::Support => write!(f, "support"),
            BounceType::Resistance => write!(f, "resistance"),
        }
    }
}

/// 되돌림 레벨 근처에서 발생한 반등.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BouncePattern {
    pub date: NaiveDate,
    pub position: u32,
    pub level: FibRatio,
    #[serde(rename = "type")]
    pub bounce_type: BounceType,
}

/// 순위 품질 기준 추세 방향.
///
/// 순위 숫자가 줄어드는 것이 개선(`Improving`)입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// 현재 순위 < 직전 순위
    Improving,
    /// 현재 순위 >= 직전 순위
    Declining,
}

impl Trend {
    /// 직전/현재 순위로 추세를 판정합니다.
    pub fn from_moves(previous: u32, current: u32) -> Self {
        if current < previous {
            Trend::Improving
        } else {
            Trend::Declining
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Declining => write!(f, "declining"),
        }
    }
}

/// 다음 지지/저항 레벨 예측.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub trend: Trend,
    /// 현재 순위에 가장 가까운 레벨
    pub current_level: LevelValue,
    /// 추세 방향으로 다음에 도달할 레벨
    pub next_level: LevelValue,
    /// 0.0 ~ 1.0 휴리스틱 신뢰도
    pub confidence: f64,
}
