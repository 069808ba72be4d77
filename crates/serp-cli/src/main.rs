//! 키워드 순위 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 변동성 키워드 테이블
//! serp analyze -i export.csv
//!
//! # 전체 키워드를 JSON 보고서로 저장
//! serp analyze -i export.csv --all --format json -o report.json
//!
//! # 한 키워드의 차트 페이로드
//! serp chart -i export.csv -k "running shoes"
//!
//! # 되돌림 레벨 계산
//! serp levels --low 3 --high 10
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serp_core::{init_logging, AppConfig, LogConfig};
use tracing::{error, info};

use serp_cli::commands::analyze::{analyze, AnalyzeConfig, OutputFormat};
use serp_cli::commands::chart::{chart, ChartConfig};
use serp_cli::commands::config::render_config;
use serp_cli::commands::levels::{compute_levels, format_levels};

#[derive(Parser)]
#[command(name = "serp")]
#[command(about = "SERP rank volatility CLI - 키워드 순위 변동성 및 피보나치 되돌림 분석", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (TOML). 없으면 기본값과 SERP__* 환경 변수 사용
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 순위 내보내기 CSV 분석 (wide/long 형식 자동 판별)
    Analyze {
        /// 입력 CSV 파일
        #[arg(short, long)]
        input: PathBuf,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 최대 키워드 수 (0 = 무제한)
        #[arg(long, default_value = "0")]
        top: usize,

        /// 변동성 키워드뿐 아니라 전체 키워드 출력
        #[arg(long, default_value = "false")]
        all: bool,
    },

    /// 한 키워드의 차트 페이로드 (JSON)
    Chart {
        /// 입력 CSV 파일
        #[arg(short, long)]
        input: PathBuf,

        /// 키워드 (대소문자 구분)
        #[arg(short, long)]
        keyword: String,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 순위 구간의 되돌림 레벨 계산
    Levels {
        /// 가장 좋은 순위 (작은 숫자)
        #[arg(long)]
        low: f64,

        /// 가장 나쁜 순위 (큰 숫자)
        #[arg(long)]
        high: f64,

        /// 가장 가까운 레벨을 표시할 현재 순위
        #[arg(short, long)]
        position: Option<f64>,
    },

    /// 유효 설정 출력 (TOML)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일은 선택 사항
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let app = AppConfig::load_optional(cli.config.as_ref())?;

    init_logging(LogConfig::from_settings(&app.logging))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    match cli.command {
        Commands::Analyze {
            input,
            format,
            output,
            top,
            all,
        } => {
            let config = AnalyzeConfig {
                input,
                format: OutputFormat::parse(&format)?,
                output,
                top,
                all,
            };

            match analyze(config, &app).await {
                Ok(status) => {
                    info!("{}", status);
                }
                Err(e) => {
                    error!("Analysis failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::Chart {
            input,
            keyword,
            output,
        } => {
            let config = ChartConfig {
                input,
                keyword,
                output,
            };

            if let Err(e) = chart(config, &app).await {
                error!("Chart failed: {:#}", e);
                return Err(e);
            }
        }

        Commands::Levels {
            low,
            high,
            position,
        } => {
            let levels = compute_levels(low, high)?;
            println!("{}", format_levels(&levels, position));
        }

        Commands::Config => {
            print!("{}", render_config(&app)?);
        }
    }

    Ok(())
}
