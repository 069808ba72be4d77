//! 키워드 차트 페이로드 추출.

use anyhow::{anyhow, Context, Result};
use serp_analytics::ChartPayload;
use serp_core::AppConfig;
use std::path::PathBuf;
use tracing::info;

use super::{run_analysis, write_output};

/// 차트 명령 설정.
#[derive(Debug)]
pub struct ChartConfig {
    pub input: PathBuf,
    pub keyword: String,
    pub output: Option<PathBuf>,
}

/// 한 키워드의 차트 페이로드를 JSON으로 출력합니다.
pub async fn chart(config: ChartConfig, app: &AppConfig) -> Result<ChartPayload> {
    let report = run_analysis(&config.input, app).await?;

    let payload = report.chart_for(&config.keyword).ok_or_else(|| {
        if report.summary.keywords > report.keywords.len() {
            anyhow!(
                "Keyword not found or has fewer than 2 points: {}",
                config.keyword
            )
        } else {
            anyhow!("Keyword not found: {}", config.keyword)
        }
    })?;

    info!(
        keyword = %payload.keyword,
        points = payload.series.len(),
        patterns = payload.patterns.len(),
        "Chart payload built"
    );

    let content = serde_json::to_string_pretty(&payload).context("Failed to serialize to JSON")?;
    write_output(&content, config.output.as_deref())?;

    Ok(payload)
}
