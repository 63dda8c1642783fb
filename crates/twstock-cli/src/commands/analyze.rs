//! 종목 분석 명령.
//!
//! 시세(CSV 또는 Yahoo) → 법인 매매(JSON 또는 FinMind, 선택) → Advisor 파이프라인
//! → 뉴스(FinMind, 선택) → 리포트

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use twstock_analytics::{Advisor, AdvisorExtras, AdvisorReport};
use twstock_core::{
    curate_news, AppConfig, InstitutionalFlow, InvestorClassConfig, LookbackPeriod, NewsItem,
    PriceSeries, Ticker,
};

use super::{spinner, DataUnavailable};
use crate::report::{render, ReportFormat};
use crate::sources::{
    load_csv, load_flow_rows, lookback_start, search_link, FinMindClient, FlowSource,
    NewsSource, PriceSource, YahooChartClient,
};

/// PER 밴드 계산 기간.
const VALUATION_PERIOD: LookbackPeriod = LookbackPeriod::Year1;

/// 법인 매매 입력 방식.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowInput {
    /// FinMind API 조회
    Remote,
    /// 로컬 JSON 파일
    File(PathBuf),
    /// 사용하지 않음 (점수에서 제외)
    Disabled,
}

/// 분석 명령 설정.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub ticker: Ticker,
    pub period: LookbackPeriod,
    /// 시세 CSV 파일 (없으면 Yahoo Finance)
    pub csv: Option<PathBuf>,
    pub flow: FlowInput,
    /// 최근 뉴스 포함 여부 (FinMind)
    pub news: bool,
    pub extras: AdvisorExtras,
    pub format: ReportFormat,
}

/// 분석을 실행하고 렌더링된 리포트를 반환합니다.
pub async fn run_analyze(app: &AppConfig, config: &AnalyzeConfig) -> Result<String> {
    let series = match &config.csv {
        Some(path) => load_csv(path, config.ticker.clone(), config.period).map_err(|e| {
            warn!(path = %path.display(), error = %e, "CSV load failed");
            DataUnavailable {
                ticker: config.ticker.clone(),
                period: config.period,
            }
        })?,
        None => {
            let yahoo = YahooChartClient::new(&app.sources)?;
            let pb = spinner(format!("{} 시세 조회 중...", config.ticker));
            let result = fetch_series(&yahoo, &config.ticker, config.period).await;
            pb.finish_and_clear();
            result?
        }
    };

    let flow = match &config.flow {
        FlowInput::Disabled => None,
        FlowInput::File(path) => match load_flow_rows(path) {
            Ok(rows) => InstitutionalFlow::aggregate(&rows, &app.investor_classes),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Institutional flow file unreadable");
                None
            }
        },
        FlowInput::Remote => {
            let finmind = FinMindClient::new(&app.sources)?;
            debug!(authenticated = finmind.has_token(), "Querying FinMind institutional flow");
            let start = lookback_start(Utc::now(), app.sources.institutional_lookback_days);
            fetch_flow(&finmind, &config.ticker, start, &app.investor_classes).await
        }
    };

    let mut extras = config.extras.clone();
    if extras.eps.is_some() {
        extras.valuation_history = if config.csv.is_some() || config.period == VALUATION_PERIOD {
            Some(trailing_year_closes(&series))
        } else {
            let yahoo = YahooChartClient::new(&app.sources)?;
            fetch_valuation_history(&yahoo, &config.ticker).await
        };
    }

    let mut report = analyze_series(app, &series, flow.as_ref(), &extras)?;

    if config.news {
        let finmind = FinMindClient::new(&app.sources)?;
        let start = lookback_start(Utc::now(), app.sources.news_lookback_days);
        report.news = fetch_news(&finmind, &config.ticker, start, app.sources.news_limit).await;
    }

    render(&report, config.format)
}

/// 시계열 마지막 날 기준 최근 1년 종가.
pub fn trailing_year_closes(series: &PriceSeries) -> Vec<Decimal> {
    let start = VALUATION_PERIOD.start_from(series.latest().date);
    series
        .bars()
        .iter()
        .filter(|bar| bar.date > start)
        .map(|bar| bar.close)
        .collect()
}

/// PER 밴드용 1년 종가를 가져옵니다.
///
/// 실패하면 `None`을 반환하며 가치 진단은 분석 시계열 종가로 대신합니다.
pub async fn fetch_valuation_history(
    source: &dyn PriceSource,
    ticker: &Ticker,
) -> Option<Vec<Decimal>> {
    match source.fetch_series(ticker, VALUATION_PERIOD).await {
        Ok(series) => Some(series.closes()),
        Err(e) => {
            warn!(ticker = %ticker, error = %e, "Valuation history fetch failed");
            None
        }
    }
}

/// 최근 뉴스를 가져와 정리합니다.
///
/// 중복 제거, 최신순 정렬, `limit`건 제한 후 원문 링크가 없는 항목에는
/// 검색 링크를 붙입니다. 실패하면 빈 목록을 반환합니다.
pub async fn fetch_news(
    source: &dyn NewsSource,
    ticker: &Ticker,
    start: NaiveDate,
    limit: usize,
) -> Vec<NewsItem> {
    match source.fetch_news(ticker, start).await {
        Ok(items) => curate_news(items, limit)
            .into_iter()
            .map(|mut item| {
                if item.link.is_none() {
                    item.link = search_link(&item.title);
                }
                item
            })
            .collect(),
        Err(e) => {
            warn!(ticker = %ticker, error = %e, "News fetch failed");
            Vec::new()
        }
    }
}

/// 시세를 가져옵니다. 실패 원인은 로그로 남기고 `DataUnavailable` 하나로 보고합니다.
pub async fn fetch_series(
    source: &dyn PriceSource,
    ticker: &Ticker,
    period: LookbackPeriod,
) -> Result<PriceSeries> {
    source.fetch_series(ticker, period).await.map_err(|e| {
        warn!(ticker = %ticker, period = %period, error = %e, "Price fetch failed");
        DataUnavailable {
            ticker: ticker.clone(),
            period,
        }
        .into()
    })
}

/// 법인 매매를 가져와 최근 거래일 기준으로 합산합니다.
///
/// 실패하거나 행이 없으면 `None`을 반환하며 분석은 계속됩니다.
pub async fn fetch_flow(
    source: &dyn FlowSource,
    ticker: &Ticker,
    start: NaiveDate,
    classes: &InvestorClassConfig,
) -> Option<InstitutionalFlow> {
    match source.fetch_rows(ticker, start).await {
        Ok(rows) => {
            let flow = InstitutionalFlow::aggregate(&rows, classes);
            if flow.is_none() {
                warn!(ticker = %ticker, "No institutional rows returned");
            }
            flow
        }
        Err(e) => {
            warn!(ticker = %ticker, error = %e, "Institutional flow fetch failed");
            None
        }
    }
}

/// 설정된 파이프라인으로 시계열을 분석합니다.
pub fn analyze_series(
    app: &AppConfig,
    series: &PriceSeries,
    flow: Option<&InstitutionalFlow>,
    extras: &AdvisorExtras,
) -> Result<AdvisorReport> {
    let report = Advisor::new(&app.analysis)
        .analyze_with(series, flow, extras)
        .with_context(|| format!("{} 분석 실패", series.ticker()))?;

    info!(
        ticker = %report.ticker,
        score = report.score.score,
        tier = report.score.tier.as_str(),
        "Report ready"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use twstock_core::PriceBar;

    #[test]
    fn test_trailing_year_closes_drops_older_bars() {
        let start = NaiveDate::from_ymd_opt(2022, 6, 1).unwrap();
        let bars = (0..25)
            .map(|i| {
                let close = dec!(100) + Decimal::from(i);
                PriceBar::new(
                    start + chrono::Duration::days(i * 30),
                    close,
                    close + dec!(1),
                    close - dec!(1),
                    close,
                    dec!(1000),
                )
            })
            .collect();
        let series = PriceSeries::new(Ticker::twse("2454"), LookbackPeriod::Year2, bars).unwrap();

        let closes = trailing_year_closes(&series);

        // 30일 간격 25개 중 마지막 365일 이내는 13개
        assert_eq!(closes.len(), 13);
        assert_eq!(closes.last(), Some(&dec!(124)));
        assert_eq!(closes.first(), Some(&dec!(112)));
    }
}
