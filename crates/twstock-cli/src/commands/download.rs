//! 일봉 데이터 다운로드 명령.
//!
//! Yahoo Finance chart API에서 일봉을 받아 `date,open,high,low,close,volume` CSV로 저장합니다.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use twstock_core::{AppConfig, LookbackPeriod, Ticker};

use super::analyze::fetch_series;
use super::spinner;
use crate::sources::{write_csv, PriceSource, YahooChartClient};

/// 다운로드 설정.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub ticker: Ticker,
    pub period: LookbackPeriod,
    /// 출력 파일 경로
    pub output_path: PathBuf,
}

impl DownloadConfig {
    /// 출력 경로를 지정하지 않으면 `data/{종목번호}_{기간}.csv`를 사용합니다.
    pub fn new(ticker: Ticker, period: LookbackPeriod, output: Option<PathBuf>) -> Self {
        let output_path = output.unwrap_or_else(|| default_output_path(&ticker, period));
        Self {
            ticker,
            period,
            output_path,
        }
    }
}

/// 기본 출력 경로
pub fn default_output_path(ticker: &Ticker, period: LookbackPeriod) -> PathBuf {
    Path::new("data").join(format!(
        "{}_{}_{}.csv",
        ticker.stock_id(),
        ticker.board.yahoo_suffix().to_lowercase(),
        period
    ))
}

/// 설정된 Yahoo Finance 소스로 다운로드합니다.
pub async fn download_data(app: &AppConfig, config: &DownloadConfig) -> Result<usize> {
    let yahoo = YahooChartClient::new(&app.sources)?;
    download_with(&yahoo, config).await
}

/// 주어진 소스에서 시세를 받아 CSV로 저장합니다.
pub async fn download_with(source: &dyn PriceSource, config: &DownloadConfig) -> Result<usize> {
    info!(
        ticker = %config.ticker,
        period = %config.period,
        output = %config.output_path.display(),
        "Starting data download"
    );

    let pb = spinner(format!("{} 시세 다운로드 중...", config.ticker));
    let series = fetch_series(source, &config.ticker, config.period).await;
    pb.finish_and_clear();
    let series = series?;

    let saved = write_csv(&config.output_path, &series).with_context(|| {
        format!("출력 파일 저장 실패: {}", config.output_path.display())
    })?;

    Ok(saved)
}
