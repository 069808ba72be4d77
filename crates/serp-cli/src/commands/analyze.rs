//! 순위 내보내기 분석 명령.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serp_analytics::{AnalysisReport, AnalysisSummary, ChartPayload, RunStatus, VolatileKeyword};
use serp_core::{AppConfig, RowWarning};
use std::path::PathBuf;
use tracing::{info, warn};

use super::{run_analysis, write_output};

/// 분석 명령 설정.
#[derive(Debug)]
pub struct AnalyzeConfig {
    /// 입력 CSV 경로
    pub input: PathBuf,
    /// 출력 형식
    pub format: OutputFormat,
    /// 출력 파일 경로
    pub output: Option<PathBuf>,
    /// 최대 행 수 (0 = 무제한)
    pub top: usize,
    /// 변동성 여부와 무관하게 모든 키워드 출력
    pub all: bool,
}

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(anyhow!("Invalid format: {}. Use: table, json", s)),
        }
    }
}

/// JSON 출력 문서.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDocument<'a> {
    pub status: String,
    pub format: &'a str,
    pub summary: AnalysisSummary,
    pub volatile_keywords: Vec<VolatileKeyword>,
    pub charts: Vec<ChartPayload>,
    pub warnings: &'a [RowWarning],
}

impl<'a> AnalysisDocument<'a> {
    pub fn new(report: &'a AnalysisReport, rows: Vec<VolatileKeyword>) -> Self {
        Self {
            status: report.status().to_string(),
            format: &report.format,
            summary: report.summary,
            volatile_keywords: rows,
            charts: report.chart_payloads(),
            warnings: &report.warnings,
        }
    }
}

/// 분석을 실행하고 결과를 출력합니다.
///
/// 실패하면 한 줄짜리 실패 상태를 에러로 반환합니다.
pub async fn analyze(config: AnalyzeConfig, app: &AppConfig) -> Result<RunStatus> {
    let report = match run_analysis(&config.input, app).await {
        Ok(report) => report,
        Err(e) => {
            let status = RunStatus::Failed(format!("{:#}", e));
            return Err(anyhow!("{}", status));
        }
    };

    for warning in &report.warnings {
        warn!(%warning, "Row dropped");
    }

    let rows = select_rows(&report, config.all, config.top);
    info!(rows = rows.len(), all = config.all, "Keywords selected");

    let content = match config.format {
        OutputFormat::Table => format!("{}\n\n{}", report.status(), format_table(&rows)),
        OutputFormat::Json => serde_json::to_string_pretty(&AnalysisDocument::new(&report, rows))
            .context("Failed to serialize to JSON")?,
    };

    write_output(&content, config.output.as_deref())?;

    Ok(report.status())
}

/// 출력할 키워드 행을 고릅니다.
pub fn select_rows(report: &AnalysisReport, all: bool, top: usize) -> Vec<VolatileKeyword> {
    let mut rows = if all {
        report.ranked_keywords()
    } else {
        report.volatile_keywords()
    };
    if top > 0 {
        rows.truncate(top);
    }
    rows
}

/// 테이블 형식 출력.
pub fn format_table(rows: &[VolatileKeyword]) -> String {
    let mut output = String::new();

    // 헤더
    output.push_str(&format!(
        "{:<4} {:<40} {:>10} {:>12} {:>8}\n",
        "#", "KEYWORD", "SCORE", "VOLUME", "POSITION"
    ));
    output.push_str(&"-".repeat(78));
    output.push('\n');

    for (i, row) in rows.iter().enumerate() {
        output.push_str(&format!(
            "{:<4} {:<40} {:>10.2} {:>12} {:>8}\n",
            i + 1,
            truncate(&row.keyword, 40),
            row.volatility_score,
            row.search_volume,
            row.current_position
        ));
    }

    output.push('\n');
    output.push_str(&format!("Total: {} keywords", rows.len()));

    output
}

/// 문자열 자르기 (UTF-8 안전).
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
