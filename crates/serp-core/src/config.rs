//! 설정 관리.
//!
//! 분석 파이프라인의 임계값과 로깅 설정을 정의합니다.
//! 모든 값에는 이름 있는 기본 상수가 있으며, TOML 파일과 `SERP__` 접두사
//! 환경 변수로 덮어쓸 수 있습니다.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RankError, RankResult};

/// 허용하는 최상위 순위.
pub const DEFAULT_MIN_POSITION: u32 = 1;
/// 허용하는 최하위 순위. 이보다 큰 순위는 "순위 없음"으로 버립니다.
pub const DEFAULT_MAX_POSITION: u32 = 100;
/// 변동성 임계값 (평균 순위 대비 두 자릿수 변동).
pub const DEFAULT_VOLATILITY_THRESHOLD: f64 = 10.0;
/// 변동 폭 표준편차 가중치.
pub const DEFAULT_STD_DEV_WEIGHT: f64 = 0.5;
/// 평균 변동 폭 가중치.
pub const DEFAULT_AVG_CHANGE_WEIGHT: f64 = 0.5;
/// 레벨 터치 판정 허용 오차 (순위 단위).
pub const DEFAULT_TOLERANCE: f64 = 2.0;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 행 정규화 설정
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    /// 변동성 점수 설정
    #[serde(default)]
    pub volatility: VolatilityConfig,
    /// 피보나치 되돌림 설정
    #[serde(default)]
    pub retracement: RetracementConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 행 정규화 설정.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct NormalizerConfig {
    /// 허용 순위 하한
    pub min_position: u32,
    /// 허용 순위 상한
    pub max_position: u32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            min_position: DEFAULT_MIN_POSITION,
            max_position: DEFAULT_MAX_POSITION,
        }
    }
}

impl NormalizerConfig {
    /// 순위가 허용 범위 안에 있는지 확인합니다.
    pub fn accepts(&self, position: i64) -> bool {
        position >= i64::from(self.min_position) && position <= i64::from(self.max_position)
    }
}

/// 변동성 점수 설정.
///
/// `score = (std_dev_weight × σ(Δ) + avg_change_weight × mean(Δ)) / mean(position) × 100`
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct VolatilityConfig {
    /// 이 값을 초과하면 변동성 키워드로 분류
    pub threshold: f64,
    /// 변동 폭 표준편차 가중치
    pub std_dev_weight: f64,
    /// 평균 변동 폭 가중치
    pub avg_change_weight: f64,
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_VOLATILITY_THRESHOLD,
            std_dev_weight: DEFAULT_STD_DEV_WEIGHT,
            avg_change_weight: DEFAULT_AVG_CHANGE_WEIGHT,
        }
    }
}

/// 피보나치 되돌림 설정.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct RetracementConfig {
    /// 레벨과의 절대 거리 허용 오차
    pub tolerance: f64,
}

impl Default for RetracementConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> RankResult<Self> {
        let builder = Self::defaults_builder()?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(Self::env_source());

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일 없이 기본값과 환경 변수만으로 로드합니다.
    pub fn from_env() -> RankResult<Self> {
        let builder = Self::defaults_builder()?.add_source(Self::env_source());

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 파일이 주어지면 파일에서, 아니면 환경 변수에서 로드합니다.
    pub fn load_optional<P: AsRef<Path>>(path: Option<P>) -> RankResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::from_env(),
        }
    }

    fn defaults_builder(
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("normalizer.min_position", i64::from(DEFAULT_MIN_POSITION))?
            .set_default("normalizer.max_position", i64::from(DEFAULT_MAX_POSITION))?
            .set_default("volatility.threshold", DEFAULT_VOLATILITY_THRESHOLD)?
            .set_default("volatility.std_dev_weight", DEFAULT_STD_DEV_WEIGHT)?
            .set_default("volatility.avg_change_weight", DEFAULT_AVG_CHANGE_WEIGHT)?
            .set_default("retracement.tolerance", DEFAULT_TOLERANCE)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "compact")
    }

    fn env_source() -> config::Environment {
        config::Environment::with_prefix("SERP")
            .separator("__")
            .try_parsing(true)
    }

    /// 설정 값의 일관성을 검증합니다.
    pub fn validate(&self) -> RankResult<()> {
        let n = &self.normalizer;
        if n.min_position < 1 {
            return Err(RankError::Config(
                "normalizer.min_position은 1 이상이어야 합니다".to_string(),
            ));
        }
        if n.max_position < n.min_position {
            return Err(RankError::Config(format!(
                "normalizer.max_position({})이 min_position({})보다 작습니다",
                n.max_position, n.min_position
            )));
        }

        let v = &self.volatility;
        if !is_non_negative(v.threshold) {
            return Err(RankError::Config(format!(
                "volatility.threshold가 올바르지 않습니다: {}",
                v.threshold
            )));
        }
        if !is_non_negative(v.std_dev_weight) || !is_non_negative(v.avg_change_weight) {
            return Err(RankError::Config(
                "volatility 가중치는 0 이상의 유한한 값이어야 합니다".to_string(),
            ));
        }
        if v.std_dev_weight == 0.0 && v.avg_change_weight == 0.0 {
            return Err(RankError::Config(
                "volatility 가중치가 모두 0입니다".to_string(),
            ));
        }

        if !is_non_negative(self.retracement.tolerance) {
            return Err(RankError::Config(format!(
                "retracement.tolerance가 올바르지 않습니다: {}",
                self.retracement.tolerance
            )));
        }

        Ok(())
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
