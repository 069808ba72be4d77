//! CLI 명령어 구현 모듈.

pub mod analyze;
pub mod chart;
pub mod config;
pub mod levels;

use anyhow::{Context, Result};
use serp_analytics::{AnalysisPipeline, AnalysisReport};
use serp_core::AppConfig;
use std::path::Path;
use tracing::info;

/// 입력 파일을 읽고 전체 분석을 실행합니다.
pub async fn run_analysis(input: &Path, config: &AppConfig) -> Result<AnalysisReport> {
    let rows = serp_data::read_rows_from_path(input)
        .await
        .with_context(|| format!("Failed to read input: {}", input.display()))?;

    info!(path = %input.display(), rows = rows.len(), "Input loaded");

    let report = AnalysisPipeline::new(config.clone()).run(&rows)?;
    Ok(report)
}

/// 파일 또는 stdout에 출력합니다.
pub fn write_output(content: &str, output_path: Option<&Path>) -> Result<()> {
    if let Some(path) = output_path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        info!("Output written to: {}", path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}
