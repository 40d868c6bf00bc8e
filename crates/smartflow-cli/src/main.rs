//! 스마트 머니 수급 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 일간 수급 파일 전체 분석
//! smartflow analyze -i demos/flows.json --pretty
//!
//! # 패턴만 감지
//! smartflow patterns -i demos/flows.json
//!
//! # 시장 폭 계산 (신고가/신저가 포함)
//! smartflow breadth -a 420 -d 180 -u 100 --new-highs 35 --new-lows 8 --previous-ad-ratio 1.8
//!
//! # 적용된 설정 확인
//! smartflow --config config/default.toml config
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;

use smartflow_analytics::SmartMoneyEngine;
use smartflow_cli::commands::analyze::{load_flows, run_analyze, run_patterns};
use smartflow_cli::commands::breadth::{run_breadth, BreadthArgs};
use smartflow_cli::commands::show_config::render_config;
use smartflow_core::{init_logging, AppConfig};

#[derive(Parser)]
#[command(name = "smartflow")]
#[command(about = "Smart money flow CLI - 투자자별 순매수 기반 시장 분석", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로 (기본: config/default.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 일간 수급 파일 전체 분석 (신호, 점수, 추세, 패턴)
    Analyze {
        /// 입력 JSON 파일 (DailyFlow 배열, 시간순)
        #[arg(short, long)]
        input: PathBuf,

        /// 들여쓰기된 JSON 출력
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// 수급 패턴만 감지
    Patterns {
        /// 입력 JSON 파일 (DailyFlow 배열, 시간순)
        #[arg(short, long)]
        input: PathBuf,

        /// 들여쓰기된 JSON 출력
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// 시장 폭 계산
    Breadth {
        /// 상승 종목 수
        #[arg(short, long)]
        advances: u32,

        /// 하락 종목 수
        #[arg(short, long)]
        declines: u32,

        /// 보합 종목 수
        #[arg(short, long, default_value = "0")]
        unchanged: u32,

        /// 신고가 종목 수
        #[arg(long)]
        new_highs: Option<u32>,

        /// 신저가 종목 수
        #[arg(long)]
        new_lows: Option<u32>,

        /// 직전 A/D 비율 (추세 판정용)
        #[arg(long)]
        previous_ad_ratio: Option<Decimal>,

        /// 들여쓰기된 JSON 출력
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// 파일 + 환경 변수가 적용된 최종 설정 출력 (TOML)
    Config,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let app = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("설정 로드 실패: {}", path.display()))?,
        None => AppConfig::load_default().context("기본 설정 로드 실패")?,
    };

    init_logging(&app.logging)?;
    debug!(config = ?cli.config, "configuration loaded");

    let engine = SmartMoneyEngine::new(app.engine.clone()).context("엔진 생성 실패")?;

    let output = match cli.command {
        Commands::Analyze { input, pretty } => {
            let flows = load_flows(&input)?;
            run_analyze(&engine, &flows, pretty)?
        }
        Commands::Patterns { input, pretty } => {
            let flows = load_flows(&input)?;
            run_patterns(&engine, &flows, pretty)?
        }
        Commands::Breadth {
            advances,
            declines,
            unchanged,
            new_highs,
            new_lows,
            previous_ad_ratio,
            pretty,
        } => {
            let args = BreadthArgs {
                advances,
                declines,
                unchanged,
                new_highs,
                new_lows,
                previous_ad_ratio,
            };
            run_breadth(&engine, &args, pretty)?
        }
        Commands::Config => render_config(&app)?,
    };

    println!("{}", output);
    Ok(())
}
