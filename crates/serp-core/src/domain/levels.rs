//! 피보나치 되돌림 레벨.
//!
//! 순위는 숫자가 작을수록 좋기 때문에 되돌림은 최저 순위(high, 가장 큰 숫자)에서
//! 최고 순위(low, 가장 작은 숫자) 방향으로 측정합니다.
//!
//! ```text
//! level[r] = high - (high - low) × r
//! level[0] = high, level[1] = low
//! ```

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

/// 고정된 피보나치 비율.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FibRatio {
    /// 0%
    Zero,
    /// 23.6%
    R236,
    /// 38.2%
    R382,
    /// 50%
    Half,
    /// 61.8%
    R618,
    /// 78.6%
    R786,
    /// 100%
    One,
}

/// 비율 오름차순의 전체 레벨 집합.
pub const FIB_RATIOS: [FibRatio; 7] = [
    FibRatio::Zero,
    FibRatio::R236,
    FibRatio::R382,
    FibRatio::Half,
    FibRatio::R618,
    FibRatio::R786,
    FibRatio::One,
];

impl FibRatio {
    /// 비율 값.
    pub fn value(self) -> f64 {
        match self {
            FibRatio::Zero => 0.0,
            FibRatio::R236 => 0.236,
            FibRatio::R382 => 0.382,
            FibRatio::Half => 0.5,
            FibRatio::R618 => 0.618,
            FibRatio::R786 => 0.786,
            FibRatio::One => 1.0,
        }
    }

    /// 직렬화 키 ("0", "0.236", ..., "1").
    pub fn key(self) -> &'static str {
        match self {
            FibRatio::Zero => "0",
            FibRatio::R236 => "0.236",
            FibRatio::R382 => "0.382",
            FibRatio::Half => "0.5",
            FibRatio::R618 => "0.618",
            FibRatio::R786 => "0.786",
            FibRatio::One => "1",
        }
    }

    /// 표시용 백분율 라벨.
    pub fn label(self) -> &'static str {
        match self {
            FibRatio::Zero => "0%",
            FibRatio::R236 => "23.6%",
            FibRatio::R382 => "38.2%",
            FibRatio::Half => "50%",
            FibRatio::R618 => "61.8%",
            FibRatio::R786 => "78.6%",
            FibRatio::One => "100%",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FibRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for FibRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

/// 비율과 그 레벨의 순위 값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelValue {
    pub level: FibRatio,
    pub value: f64,
}

/// `(low, high)` 쌍으로부터 계산된 되돌림 레벨.
///
/// 두 입력의 순수 함수이며 숨은 상태가 없습니다. `low == high`(평탄한 시리즈)이면
/// 모든 레벨이 같은 값으로 수렴하며, 이는 정상입니다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetracementLevels {
    low: f64,
    high: f64,
    values: [f64; 7],
}

impl RetracementLevels {
    /// 최저/최고 순위 값으로 레벨을 계산합니다.
    pub fn from_range(low: f64, high: f64) -> Self {
        let range = high - low;
        let mut values = [0.0; 7];
        for ratio in FIB_RATIOS {
            values[ratio.index()] = high - range * ratio.value();
        }
        // 경계 레벨은 부동소수 오차 없이 입력값 그대로
        values[FibRatio::Zero.index()] = high;
        values[FibRatio::One.index()] = low;

        Self { low, high, values }
    }

    /// 순위 목록의 최소/최대로 레벨을 계산합니다. 빈 목록이면 `None`.
    pub fn from_positions(positions: &[u32]) -> Option<Self> {
        let low = positions.iter().copied().min()?;
        let high = positions.iter().copied().max()?;
        Some(Self::from_range(f64::from(low), f64::from(high)))
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// 특정 비율의 레벨 값.
    pub fn get(&self, ratio: FibRatio) -> f64 {
        self.values[ratio.index()]
    }

    /// 비율 오름차순으로 레벨을 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = LevelValue> + '_ {
        FIB_RATIOS.iter().map(move |&level| LevelValue {
            level,
            value: self.get(level),
        })
    }

    /// 값 오름차순으로 정렬된 레벨 (같은 값은 비율 순서 유지).
    pub fn sorted_by_value(&self) -> Vec<LevelValue> {
        let mut levels: Vec<LevelValue> = self.iter().collect();
        levels.sort_by(|a, b| a.value.total_cmp(&b.value));
        levels
    }

    /// 주어진 순위에 가장 가까운 레벨 (거리가 같으면 비율이 작은 쪽).
    pub fn nearest(&self, position: f64) -> LevelValue {
        let mut best = LevelValue {
            level: FibRatio::Zero,
            value: self.get(FibRatio::Zero),
        };
        for candidate in self.iter().skip(1) {
            if (candidate.value - position).abs() < (best.value - position).abs() {
                best = candidate;
            }
        }
        best
    }
}

impl Serialize for RetracementLevels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIB_RATIOS.len()))?;
        for level in self.iter() {
            map.serialize_entry(level.level.key(), &level.value)?;
        }
        map.end()
    }
}
