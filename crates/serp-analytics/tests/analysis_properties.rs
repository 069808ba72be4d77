//! 분석 파이프라인 통합 테스트
//!
//! 점수 범위와 단일 포인트 시리즈 처리 검증

use chrono::NaiveDate;
use proptest::prelude::*;
use serp_analytics::{
    AnalysisPipeline, Predictor, RetracementEngine, RunStatus, VolatilityScorer,
};
use serp_core::{AppConfig, FibRatio, KeywordSeries, RankError, RetracementLevels, SeriesPoint};
use serp_data::parse_rows;

fn series(positions: &[u32]) -> KeywordSeries {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    KeywordSeries {
        keyword: "kw".to_string(),
        search_volume: 10,
        points: positions
            .iter()
            .enumerate()
            .map(|(i, &position)| SeriesPoint {
                date: base + chrono::Duration::days(i as i64),
                position,
                url: None,
            })
            .collect(),
    }
}

#[test]
fn test_wide_example_single_record() {
    let csv = "Keyword,Search Volume,site.com/x_20240101,site.com/x_20240201\nshoes,1000,5,-\n";
    let rows = parse_rows(csv).unwrap();
    let report = AnalysisPipeline::default().run(&rows).unwrap();

    assert_eq!(report.format, "wide");
    assert_eq!(report.summary.records, 1);
    // 1개 포인트: 키워드 수에는 포함되지만 변동성/예측은 없음
    assert_eq!(report.summary.keywords, 1);
    assert_eq!(report.summary.insufficient, 1);
    assert!(report.volatility.is_empty());
    assert!(report.chart_for("shoes").is_none());
    assert!(report.chart_payloads().is_empty());
}

#[test]
fn test_single_point_series_has_no_outputs() {
    let one = series(&[4]);
    assert!(VolatilityScorer::default().score(&one).is_none());
    assert!(Predictor::default().predict(&one).is_none());
}

#[test]
fn test_missing_columns_fails_before_rows() {
    let rows = parse_rows("Name,Rank\nshoes,3\n").unwrap();
    let result = AnalysisPipeline::default().run(&rows);

    assert!(matches!(result, Err(RankError::MissingColumns { .. })));
    assert!(!RunStatus::from(&result).is_success());
}

#[test]
fn test_config_flows_into_stages() {
    let csv = "Keyword,Date,Position\nshoes,2024-01-01,10\nshoes,2024-01-02,12\n";
    let rows = parse_rows(csv).unwrap();

    let mut config = AppConfig::default();
    config.volatility.threshold = 0.0;
    let report = AnalysisPipeline::new(config).run(&rows).unwrap();
    assert_eq!(report.summary.volatile, 1);

    let mut config = AppConfig::default();
    config.normalizer.max_position = 10;
    let report = AnalysisPipeline::new(config).run(&rows).unwrap();
    // 12위는 허용 범위 밖 → 경고 1건, 포인트 1개
    assert_eq!(report.summary.warnings, 1);
    assert_eq!(report.summary.insufficient, 1);
}

proptest! {
    #[test]
    fn prop_reliability_and_confidence_bounded(
        positions in prop::collection::vec(1u32..=100, 2..60),
        tolerance in 0.0f64..50.0,
    ) {
        let s = series(&positions);
        let engine = RetracementEngine::with_tolerance(tolerance);
        let analysis = engine.analyze(&s).unwrap();

        prop_assert!((0.0..=100.0).contains(&analysis.reliability));

        let prediction = Predictor::new(engine).predict_with(&s, &analysis).unwrap();
        prop_assert!((0.0..=1.0).contains(&prediction.confidence));
    }

    #[test]
    fn prop_volatility_zero_iff_flat(positions in prop::collection::vec(1u32..=100, 2..40)) {
        let result = VolatilityScorer::default().score(&series(&positions)).unwrap();
        let flat = positions.windows(2).all(|w| w[0] == w[1]);

        prop_assert!(result.score >= 0.0);
        prop_assert_eq!(result.score == 0.0, flat);
    }

    #[test]
    fn prop_level_boundary_identities(positions in prop::collection::vec(1u32..=100, 1..40)) {
        let levels = RetracementLevels::from_positions(&positions).unwrap();
        let low = f64::from(*positions.iter().min().unwrap());
        let high = f64::from(*positions.iter().max().unwrap());

        prop_assert_eq!(levels.get(FibRatio::Zero), high);
        prop_assert_eq!(levels.get(FibRatio::One), low);
    }

    #[test]
    fn prop_patterns_are_interior_extrema(positions in prop::collection::vec(1u32..=30, 3..40)) {
        let s = series(&positions);
        let analysis = RetracementEngine::default().analyze(&s).unwrap();
        let first = s.first_date().unwrap();
        let last = s.last_date().unwrap();

        for pattern in &analysis.patterns {
            prop_assert!(pattern.date > first && pattern.date < last);
        }
    }
}
