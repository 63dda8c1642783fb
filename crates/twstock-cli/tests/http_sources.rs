//! 외부 데이터 소스 통합 테스트
//!
//! 로컬 mockito 서버로 Yahoo Finance / FinMind 응답을 흉내내어
//! 수집 → 분석 → 저장 흐름을 검증

use std::path::PathBuf;

use chrono::NaiveDate;
use mockito::Matcher;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use twstock_cli::commands::analyze::{
    fetch_flow, fetch_news, fetch_series, run_analyze, AnalyzeConfig, FlowInput,
};
use twstock_cli::commands::download::{download_with, DownloadConfig};
use twstock_cli::commands::DataUnavailable;
use twstock_cli::sources::{load_csv, FinMindClient, FlowSource, PriceSource, YahooChartClient};
use twstock_cli::NewsSource;
use twstock_cli::{IngestError, ReportFormat};
use twstock_analytics::AdvisorExtras;
use twstock_core::{AppConfig, InvestorClassConfig, LookbackPeriod, SourcesConfig, Ticker};

/// 2024-01-02 00:00 UTC
const FIRST_TS: i64 = 1_704_153_600;

fn sources(base_url: &str) -> SourcesConfig {
    SourcesConfig {
        yahoo_base_url: base_url.to_string(),
        finmind_base_url: base_url.to_string(),
        timeout_secs: 5,
        ..Default::default()
    }
}

/// `len`일치 chart 응답 (인덱스 2는 시가 누락)
fn chart_body(len: usize) -> String {
    let ts: Vec<i64> = (0..len as i64).map(|i| FIRST_TS + i * 86_400).collect();
    let close: Vec<f64> = (0..len).map(|i| 580.0 + i as f64).collect();
    let open: Vec<Option<f64>> = close
        .iter()
        .enumerate()
        .map(|(i, c)| if i == 2 { None } else { Some(c - 1.0) })
        .collect();
    let high: Vec<f64> = close.iter().map(|c| c + 3.0).collect();
    let low: Vec<f64> = close.iter().map(|c| c - 3.0).collect();
    let volume: Vec<i64> = vec![25_000_000; len];

    json!({
        "chart": {
            "result": [{
                "timestamp": ts,
                "indicators": {
                    "quote": [{
                        "open": open,
                        "high": high,
                        "low": low,
                        "close": close,
                        "volume": volume
                    }]
                }
            }],
            "error": null
        }
    })
    .to_string()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("twstock-test-{}-{}", std::process::id(), name))
}

#[tokio::test]
async fn yahoo_chart_builds_series() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v8/finance/chart/2330.TW")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("range".into(), "6mo".into()),
            Matcher::UrlEncoded("interval".into(), "1d".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chart_body(5))
        .create_async()
        .await;

    let client = YahooChartClient::new(&sources(&server.url())).unwrap();
    let series = client
        .fetch_series(&Ticker::twse("2330"), LookbackPeriod::Month6)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(series.len(), 4);
    assert_eq!(series.bars()[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert_eq!(series.latest().close, dec!(584));
}

#[tokio::test]
async fn yahoo_http_error_surfaces_as_data_unavailable() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v8/finance/chart/9999.TW")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body("Not Found")
        .create_async()
        .await;

    let client = YahooChartClient::new(&sources(&server.url())).unwrap();
    let ticker = Ticker::twse("9999");

    let raw = client.fetch_series(&ticker, LookbackPeriod::Year1).await;
    assert!(matches!(raw, Err(IngestError::Http { status: 404, .. })));

    let err = fetch_series(&client, &ticker, LookbackPeriod::Year1)
        .await
        .unwrap_err();
    let unavailable = err.downcast_ref::<DataUnavailable>().unwrap();
    assert_eq!(unavailable.period, LookbackPeriod::Year1);
    assert_eq!(err.to_string(), "9999.TW (1y) 데이터를 사용할 수 없습니다");
}

#[tokio::test]
async fn yahoo_single_bar_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v8/finance/chart/2618.TW")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(chart_body(1))
        .create_async()
        .await;

    let client = YahooChartClient::new(&sources(&server.url())).unwrap();
    let result = client
        .fetch_series(&Ticker::twse("2618"), LookbackPeriod::Days5)
        .await;

    assert!(matches!(result, Err(IngestError::Core(_))));
}

#[tokio::test]
async fn finmind_rows_aggregate_into_flow() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "msg": "success",
        "status": 200,
        "data": [
            {"date": "2024-05-09", "stock_id": "2330", "buy": 1000000, "name": "Foreign_Investor", "sell": 0},
            {"date": "2024-05-10", "stock_id": "2330", "buy": 9000000, "name": "Foreign_Investor", "sell": 2500000},
            {"date": "2024-05-10", "stock_id": "2330", "buy": 400000, "name": "Investment_Trust", "sell": 100000},
            {"date": "2024-05-10", "stock_id": "2330", "buy": 50000, "name": "Dealer_self", "sell": 80000}
        ]
    });
    let mock = server
        .mock("GET", "/api/v4/data")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "dataset".into(),
                "TaiwanStockInstitutionalInvestorsBuySell".into(),
            ),
            Matcher::UrlEncoded("data_id".into(), "2330".into()),
            Matcher::UrlEncoded("start_date".into(), "2024-05-01".into()),
        ]))
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let config = SourcesConfig {
        finmind_token: Some("test-token".to_string()),
        ..sources(&server.url())
    };
    let client = FinMindClient::new(&config).unwrap();
    let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

    let flow = fetch_flow(&client, &Ticker::twse("2330"), start, &InvestorClassConfig::default())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(flow.date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
    assert_eq!(flow.foreign, dec!(6500));
    assert_eq!(flow.trust, dec!(300));
    assert_eq!(flow.dealer, dec!(-30));
}

#[tokio::test]
async fn finmind_failures_degrade_to_missing_flow() {
    let mut server = mockito::Server::new_async().await;
    let _quota = server
        .mock("GET", "/api/v4/data")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"msg":"Requests reach the upper limit.","status":402}"#)
        .create_async()
        .await;

    let client = FinMindClient::new(&sources(&server.url())).unwrap();
    let ticker = Ticker::twse("2330");
    let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

    let raw = client.fetch_rows(&ticker, start).await;
    assert!(matches!(raw, Err(IngestError::Provider(msg)) if msg.contains("402")));

    let flow = fetch_flow(&client, &ticker, start, &InvestorClassConfig::default()).await;
    assert!(flow.is_none());
}

#[tokio::test]
async fn download_then_analyze_from_files() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v8/finance/chart/2330.TW")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(chart_body(70))
        .create_async()
        .await;

    let client = YahooChartClient::new(&sources(&server.url())).unwrap();
    let csv_path = temp_path("2330.csv");
    let download = DownloadConfig::new(
        Ticker::twse("2330"),
        LookbackPeriod::Month6,
        Some(csv_path.clone()),
    );

    let saved = download_with(&client, &download).await.unwrap();
    assert_eq!(saved, 69);

    let reloaded = load_csv(&csv_path, Ticker::twse("2330"), LookbackPeriod::Month6).unwrap();
    assert_eq!(reloaded.len(), 69);
    assert_eq!(reloaded.latest().close, dec!(649));

    let flow_path = temp_path("flow.json");
    std::fs::write(
        &flow_path,
        r#"[{"date":"2024-03-10","name":"Foreign_Investor","buy":"800000","sell":"100000"}]"#,
    )
    .unwrap();

    let analyze = AnalyzeConfig {
        ticker: Ticker::twse("2330"),
        period: LookbackPeriod::Month6,
        csv: Some(csv_path.clone()),
        flow: FlowInput::File(flow_path.clone()),
        news: false,
        extras: AdvisorExtras {
            cost_basis: Some(dec!(600)),
            ..Default::default()
        },
        format: ReportFormat::Json,
    };
    let output = run_analyze(&AppConfig::default(), &analyze).await.unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(report["ticker"]["code"], "2330");
    let foreign: Decimal = report["institutional"]["foreign"].as_str().unwrap().parse().unwrap();
    assert_eq!(foreign, dec!(700));
    assert!(report["score"]["skipped"].as_array().unwrap().is_empty());
    assert!(report["diagnostics"]["position"].is_object());

    let _ = std::fs::remove_file(csv_path);
    let _ = std::fs::remove_file(flow_path);
}

#[tokio::test]
async fn missing_csv_is_data_unavailable() {
    let analyze = AnalyzeConfig {
        ticker: Ticker::twse("2002"),
        period: LookbackPeriod::Month1,
        csv: Some(temp_path("does-not-exist.csv")),
        flow: FlowInput::Disabled,
        news: false,
        extras: AdvisorExtras::default(),
        format: ReportFormat::Text,
    };

    let err = run_analyze(&AppConfig::default(), &analyze).await.unwrap_err();
    assert!(err.downcast_ref::<DataUnavailable>().is_some());
}

#[tokio::test]
async fn finmind_news_is_curated() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "msg": "success",
        "status": 200,
        "data": [
            {"date": "2024-05-08 10:00:00", "stock_id": "2330", "link": "https://news.example/a", "source": "經濟日報", "title": "台積電擴產 - 經濟日報"},
            {"date": "2024-05-10 09:00:00", "stock_id": "2330", "link": "", "source": "工商時報", "title": "外資連三買 - 工商時報"},
            {"date": "2024-05-09 15:00:00", "stock_id": "2330", "link": "https://news.example/b", "source": "自由時報", "title": "台積電擴產 - 自由時報"},
            {"date": "2024-05-10 14:00:00", "stock_id": "2330", "link": "https://news.example/c", "source": "鉅亨網", "title": "ADR 收紅"}
        ]
    });
    let mock = server
        .mock("GET", "/api/v4/data")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("dataset".into(), "TaiwanStockNews".into()),
            Matcher::UrlEncoded("data_id".into(), "2330".into()),
            Matcher::UrlEncoded("start_date".into(), "2024-05-05".into()),
        ]))
        .match_header("authorization", "Bearer news-token")
        .with_status(200)
        .with_body(body.to_string())
        .expect(2)
        .create_async()
        .await;

    let config = SourcesConfig {
        finmind_token: Some("news-token".to_string()),
        ..sources(&server.url())
    };
    let client = FinMindClient::new(&config).unwrap();
    let ticker = Ticker::twse("2330");
    let start = NaiveDate::from_ymd_opt(2024, 5, 5).unwrap();

    let raw = client.fetch_news(&ticker, start).await.unwrap();
    assert_eq!(raw.len(), 4);

    let news = fetch_news(&client, &ticker, start, 8).await;

    mock.assert_async().await;
    let titles: Vec<&str> = news.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["ADR 收紅", "外資連三買", "台積電擴產"]);
    assert_eq!(news[2].link.as_deref(), Some("https://news.example/a"));
    assert!(news[1]
        .link
        .as_deref()
        .unwrap()
        .starts_with("https://www.google.com/search?q="));
}

#[tokio::test]
async fn short_period_valuation_uses_year_history() {
    let mut server = mockito::Server::new_async().await;
    let short = server
        .mock("GET", "/v8/finance/chart/2330.TW")
        .match_query(Matcher::UrlEncoded("range".into(), "5d".into()))
        .with_status(200)
        .with_body(chart_body(6))
        .create_async()
        .await;
    let yearly = server
        .mock("GET", "/v8/finance/chart/2330.TW")
        .match_query(Matcher::UrlEncoded("range".into(), "1y".into()))
        .with_status(200)
        .with_body(chart_body(70))
        .create_async()
        .await;

    let app = AppConfig {
        sources: sources(&server.url()),
        ..Default::default()
    };
    let analyze = AnalyzeConfig {
        ticker: Ticker::twse("2330"),
        period: LookbackPeriod::Days5,
        csv: None,
        flow: FlowInput::Disabled,
        news: false,
        extras: AdvisorExtras {
            eps: Some(dec!(10)),
            ..Default::default()
        },
        format: ReportFormat::Json,
    };

    let output = run_analyze(&app, &analyze).await.unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();

    short.assert_async().await;
    yearly.assert_async().await;
    let valuation = &report["diagnostics"]["valuation"];
    assert_eq!(valuation["method"], "pe_band");
    // 5일치 종가만 쓰면 최고 PER은 58.5
    let max_pe: Decimal = valuation["max_pe"].as_str().unwrap().parse().unwrap();
    let min_pe: Decimal = valuation["min_pe"].as_str().unwrap().parse().unwrap();
    assert_eq!(max_pe, dec!(64.9));
    assert_eq!(min_pe, dec!(58));
}

#[tokio::test]
async fn unreadable_flow_file_and_news_failure_degrade() {
    let mut server = mockito::Server::new_async().await;
    let _chart = server
        .mock("GET", "/v8/finance/chart/2330.TW")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(chart_body(40))
        .create_async()
        .await;
    let news = server
        .mock("GET", "/api/v4/data")
        .match_query(Matcher::UrlEncoded("dataset".into(), "TaiwanStockNews".into()))
        .with_status(500)
        .with_body("upstream error")
        .create_async()
        .await;

    let flow_path = temp_path("broken-flow.json");
    std::fs::write(&flow_path, "{ not json").unwrap();

    let app = AppConfig {
        sources: sources(&server.url()),
        ..Default::default()
    };
    let analyze = AnalyzeConfig {
        ticker: Ticker::twse("2330"),
        period: LookbackPeriod::Month1,
        csv: None,
        flow: FlowInput::File(flow_path.clone()),
        news: true,
        extras: AdvisorExtras::default(),
        format: ReportFormat::Json,
    };

    let output = run_analyze(&app, &analyze).await.unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();

    news.assert_async().await;
    assert!(report["institutional"].is_null());
    assert_eq!(report["score"]["skipped"], json!(["institutional"]));
    assert!(report.get("news").is_none());

    let _ = std::fs::remove_file(flow_path);
}
