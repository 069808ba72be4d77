//! 순위 분석 도메인 모델.

pub mod levels;
pub mod record;
pub mod results;
pub mod series;

pub use levels::{FibRatio, LevelValue, RetracementLevels, FIB_RATIOS};
pub use record::PositionRecord;
pub use results::{BouncePattern, BounceType, Prediction, Trend, VolatilityResult};
pub use series::{KeywordSeries, SeriesPoint, MIN_ANALYZABLE_POINTS};
