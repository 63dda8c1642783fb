//! Yahoo Finance chart API 일봉 시세 클라이언트.
//!
//! `GET {base}/v8/finance/chart/{symbol}?range={period}&interval=1d`
//!
//! 타임스탬프는 대만 현지 날짜(Asia/Taipei)로 변환합니다.
//! OHLCV 중 하나라도 비어 있는 캔들은 건너뜁니다.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use chrono_tz::Asia::Taipei;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use twstock_core::{LookbackPeriod, PriceBar, PriceSeries, SourcesConfig, Ticker};

use super::{http_client, IngestError, IngestResult, PriceSource};

/// Yahoo Finance API 응답 구조체
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<i64>>>,
}

/// Yahoo Finance 일봉 클라이언트.
#[derive(Debug, Clone)]
pub struct YahooChartClient {
    client: Client,
    base_url: String,
}

impl YahooChartClient {
    /// 설정의 기본 URL과 타임아웃으로 클라이언트를 생성합니다.
    pub fn new(config: &SourcesConfig) -> IngestResult<Self> {
        Ok(Self {
            client: http_client(config.timeout_secs)?,
            base_url: config.yahoo_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, ticker: &Ticker) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, ticker.yahoo_symbol())
    }
}

#[async_trait]
impl PriceSource for YahooChartClient {
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        period: LookbackPeriod,
    ) -> IngestResult<PriceSeries> {
        let url = self.chart_url(ticker);
        debug!(url = %url, period = %period, "Fetching from Yahoo Finance");

        let response = self
            .client
            .get(&url)
            .query(&[("range", period.as_str()), ("interval", "1d")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(IngestError::Http {
                status: status.as_u16(),
                body,
            });
        }
        debug!(bytes = body.len(), "Yahoo Finance response received");

        let chart: YahooChartResponse = serde_json::from_str(&body)?;
        let bars = parse_chart(chart)?;
        if bars.is_empty() {
            return Err(IngestError::Empty(format!("{} {}", ticker, period)));
        }

        let series = PriceSeries::from_unsorted(ticker.clone(), period, bars)?;
        info!(ticker = %ticker, bars = series.len(), "Downloaded daily bars from Yahoo Finance");
        Ok(series)
    }
}

/// 응답에서 유효한 캔들만 추출합니다.
fn parse_chart(response: YahooChartResponse) -> IngestResult<Vec<PriceBar>> {
    if let Some(error) = response.chart.error {
        return Err(IngestError::Provider(format!(
            "{} - {}",
            error.code, error.description
        )));
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| IngestError::Empty("Yahoo Finance 응답에 결과가 없습니다".to_string()))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| IngestError::Empty("Yahoo Finance 응답에 시세가 없습니다".to_string()))?;

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let value = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten().and_then(to_decimal);

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let volume = volumes.get(i).copied().flatten();
        let fields = (
            taipei_date(ts),
            value(&opens, i),
            value(&highs, i),
            value(&lows, i),
            value(&closes, i),
            volume,
        );

        // 모든 필드가 유효한 경우만 추가
        if let (Some(date), Some(o), Some(h), Some(l), Some(c), Some(v)) = fields {
            bars.push(PriceBar::new(date, o, h, l, c, Decimal::from(v)));
        }
    }

    Ok(bars)
}

/// UNIX 타임스탬프를 대만 현지 날짜로 변환
fn taipei_date(ts: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.with_timezone(&Taipei).date_naive())
}

/// f64 시세를 소수점 4자리 Decimal로 변환 (NaN/무한대는 None)
fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_str(&format!("{:.4}", value)).ok()
}
