//! 대만 주식 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # TSMC 6개월 분석 (Yahoo Finance + FinMind)
//! twstock analyze -t 2330.TW
//!
//! # 로컬 CSV와 법인 매매 JSON으로 분석, 보유 단가/EPS 포함, JSON 출력
//! twstock analyze -t 2330 --csv data/2330_tw_1y.csv --flow-json flow.json \
//!     --cost 580 --eps 39.2 --no-news --format json
//!
//! # 장외 종목 1년치 일봉 다운로드
//! twstock download -t 6488.TWO -p 1y
//!
//! # 기본 관심 종목 보기
//! twstock list
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{error, info};

use twstock_analytics::AdvisorExtras;
use twstock_cli::commands::analyze::{run_analyze, AnalyzeConfig, FlowInput};
use twstock_cli::commands::download::{download_data, DownloadConfig};
use twstock_cli::commands::list::print_watchlist;
use twstock_cli::ReportFormat;
use twstock_core::{init_logging, AppConfig, LogConfig, LookbackPeriod, Ticker};

#[derive(Parser)]
#[command(name = "twstock")]
#[command(about = "Taiwan stock advisor - 기술 지표 기반 대만 주식 분석 도구", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 종목 분석 (지표, 시그널, 종합 점수, 진단)
    Analyze {
        /// 종목 코드 (예: 2330.TW, 6488.TWO, 2330)
        #[arg(short, long)]
        ticker: Ticker,

        /// 조회 기간 (5d, 1mo, 6mo, 1y, 2y)
        #[arg(short, long, default_value = "6mo")]
        period: LookbackPeriod,

        /// 시세 CSV 파일 (지정하지 않으면 Yahoo Finance 조회)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// 법인 매매 JSON 파일 (지정하지 않으면 FinMind 조회)
        #[arg(long, conflicts_with = "no_flow")]
        flow_json: Option<PathBuf>,

        /// 법인 매매 없이 분석 (점수에서 제외)
        #[arg(long, default_value = "false")]
        no_flow: bool,

        /// 최근 뉴스 생략
        #[arg(long, default_value = "false")]
        no_news: bool,

        /// 보유 단가
        #[arg(long)]
        cost: Option<Decimal>,

        /// 최근 4분기 누적 EPS
        #[arg(long)]
        eps: Option<Decimal>,

        /// 주가순자산비율 (EPS가 없을 때 사용)
        #[arg(long)]
        pb: Option<Decimal>,

        /// 출력 형식 (text, json)
        #[arg(short, long, default_value = "text")]
        format: ReportFormat,
    },

    /// 일봉 OHLCV 데이터 다운로드 (Yahoo Finance → CSV)
    Download {
        /// 종목 코드 (예: 2330.TW, 6488.TWO)
        #[arg(short, long)]
        ticker: Ticker,

        /// 조회 기간 (5d, 1mo, 6mo, 1y, 2y)
        #[arg(short, long, default_value = "1y")]
        period: LookbackPeriod,

        /// 출력 파일 경로 (자동 생성됨)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 기본 관심 종목 목록 보기
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let app = AppConfig::load(&cli.config)?;

    init_logging(LogConfig::from(&app.logging))
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    match cli.command {
        Commands::Analyze {
            ticker,
            period,
            csv,
            flow_json,
            no_flow,
            no_news,
            cost,
            eps,
            pb,
            format,
        } => {
            let flow = match (no_flow, flow_json) {
                (true, _) => FlowInput::Disabled,
                (false, Some(path)) => FlowInput::File(path),
                (false, None) => FlowInput::Remote,
            };
            let config = AnalyzeConfig {
                ticker,
                period,
                csv,
                flow,
                news: !no_news,
                extras: AdvisorExtras {
                    cost_basis: cost,
                    eps,
                    price_to_book: pb,
                    ..Default::default()
                },
                format,
            };

            match run_analyze(&app, &config).await {
                Ok(report) => println!("{}", report),
                Err(e) => {
                    error!("Analysis failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::Download {
            ticker,
            period,
            output,
        } => {
            let config = DownloadConfig::new(ticker, period, output);
            match download_data(&app, &config).await {
                Ok(count) => {
                    info!("Download complete: {} candles", count);
                    println!(
                        "{}개 일봉을 {}에 저장했습니다",
                        count,
                        config.output_path.display()
                    );
                }
                Err(e) => {
                    error!("Download failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::List => print_watchlist(),
    }

    Ok(())
}
