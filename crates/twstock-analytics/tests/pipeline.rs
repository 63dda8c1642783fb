//! 분석 파이프라인 통합 테스트
//!
//! 합성 시계열로 프레임 → 시그널 → 점수 → 진단 전체 흐름 검증

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;
use twstock_analytics::diagnosis::{Posture, VolumeVerdict};
use twstock_analytics::{
    Advisor, AdvisorExtras, BreakoutRisk, MacdCross, RecommendationTier, ScoreComponent, StopState,
    TrendSignal,
};
use twstock_core::{
    AnalysisConfig, InstitutionalFlow, InstitutionalRow, InvestorClassConfig, LookbackPeriod,
    PriceBar, PriceSeries, Ticker, ZeroLossPolicy,
};

fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64)
}

/// 종가 목록으로 캔들 생성 (고가 +1%, 저가 -1%)
fn series_from(closes: &[Decimal], volumes: &[Decimal]) -> PriceSeries {
    let bars = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&c, &v))| {
            PriceBar::new(day(i), c, c * dec!(1.01), c * dec!(0.99), c, v)
        })
        .collect();
    PriceSeries::new(Ticker::twse("2330"), LookbackPeriod::Month6, bars).unwrap()
}

/// 60일 상승 후 20일 급락
fn rally_then_crash() -> PriceSeries {
    let mut closes: Vec<Decimal> = (0..60).map(|i| dec!(500) + Decimal::from(i) * dec!(3)).collect();
    let peak = *closes.last().unwrap();
    closes.extend((1..=20).map(|i| peak - Decimal::from(i) * dec!(12)));
    let volumes = vec![dec!(20000000); closes.len()];
    series_from(&closes, &volumes)
}

#[test]
fn crash_after_rally_is_bearish() {
    let advisor = Advisor::default();
    let flow = InstitutionalFlow::new(day(79), dec!(-2500), dec!(-300), dec!(-50));

    let report = advisor.analyze(&rally_then_crash(), Some(&flow)).unwrap();

    assert_eq!(report.signals.trend, Some(TrendSignal::BelowMa20));
    assert_eq!(report.signals.macd_cross, Some(MacdCross::Bearish));
    assert_eq!(report.signals.stop, Some(StopState::Violated));
    assert_eq!(report.score.tier, RecommendationTier::StrongSell);
    assert_eq!(report.diagnostics.posture, Some(Posture::Weak));
    assert!(report.score.skipped.is_empty());
}

#[test]
fn steady_rally_is_bullish() {
    // 마지막 캔들이 짝수 인덱스(+0.4)가 되도록 81개
    let closes: Vec<Decimal> = (0..81)
        .map(|i| dec!(100) + Decimal::from(i) + if i % 2 == 0 { dec!(0.4) } else { Decimal::ZERO })
        .collect();
    let volumes = vec![dec!(5000000); closes.len()];
    let series = series_from(&closes, &volumes);

    let report = Advisor::default().analyze(&series, None).unwrap();

    assert_eq!(report.signals.trend, Some(TrendSignal::AboveMa20));
    assert_eq!(report.signals.stop, Some(StopState::Holding));
    assert!(report.score.institutional_skipped());
    assert!(report.score.tier >= RecommendationTier::Accumulate);
    assert_eq!(report.diagnostics.posture, Some(Posture::StrongBull));
    assert_eq!(report.diagnostics.flow, None);
}

#[test]
fn volume_surge_on_last_bar() {
    let closes: Vec<Decimal> = (0..30).map(|i| dec!(50) + Decimal::from(i % 3)).collect();
    let mut volumes = vec![dec!(1000000); 30];
    volumes[29] = dec!(2500000);

    let report = Advisor::default()
        .analyze(&series_from(&closes, &volumes), None)
        .unwrap();

    let surge = report.diagnostics.volume.unwrap();
    assert_eq!(surge.ratio, dec!(2.5));
    assert_eq!(surge.verdict, VolumeVerdict::Surge);
}

#[test]
fn short_history_degrades_instead_of_failing() {
    let closes = [dec!(100), dec!(101), dec!(99), dec!(102), dec!(103)];
    let volumes = [dec!(1000); 5];

    let report = Advisor::default()
        .analyze(&series_from(&closes, &volumes), None)
        .unwrap();

    assert!(report.quote.ma_short.is_some());
    assert!(report.quote.ma_mid.is_none());
    assert_eq!(report.signals.trend, None);
    assert_eq!(report.signals.rsi_zone, None);
    assert!(report.score.skipped.contains(&ScoreComponent::Trend));
    assert!(report.score.skipped.contains(&ScoreComponent::Stop));
    assert_eq!(report.score.tier, RecommendationTier::Neutral);
    assert!(report.diagnostics.bias.is_none());
}

#[test]
fn breakout_risk_on_short_history_matches_quote_high() {
    // 22개 캔들: 고가 최대 100, 마지막 종가 99.5
    let bars = (0..22)
        .map(|i| {
            let close = if i == 21 { dec!(99.5) } else { dec!(90) + Decimal::from(i % 5) };
            let high = if i == 10 { dec!(100) } else { close + dec!(0.3) };
            PriceBar::new(day(i), close, high, close - dec!(1), close, dec!(1000000))
        })
        .collect();
    let series = PriceSeries::new(Ticker::twse("2330"), LookbackPeriod::Month1, bars).unwrap();

    let report = Advisor::default().analyze(&series, None).unwrap();

    assert_eq!(report.quote.high_60, dec!(100));
    assert_eq!(report.quote.challenge_progress_pct, dec!(99.5));
    assert_eq!(report.signals.breakout, Some(BreakoutRisk::ApproachingResistance));
}

/// WARN 이벤트 수를 세는 레이어
struct WarnCounter(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[test]
fn missing_flow_warns_once() {
    let warnings = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));

    let report = tracing::subscriber::with_default(subscriber, || {
        Advisor::default().analyze(&rally_then_crash(), None).unwrap()
    });

    assert_eq!(report.score.skipped, vec![ScoreComponent::Institutional]);
    assert_eq!(warnings.load(Ordering::SeqCst), 1);
}

#[test]
fn configured_thresholds_flow_through() {
    let config = AnalysisConfig {
        rsi_zero_loss: ZeroLossPolicy::Neutral,
        ..Default::default()
    };
    let closes: Vec<Decimal> = (0..40).map(|i| dec!(10) + Decimal::from(i)).collect();
    let volumes = vec![dec!(1000); 40];

    let report = Advisor::new(&config)
        .analyze(&series_from(&closes, &volumes), None)
        .unwrap();

    // 하락 없는 시계열: 중립 정책이면 RSI 50
    assert_eq!(report.signals.rsi, Some(dec!(50)));
    assert_eq!(report.score.points_for(ScoreComponent::Rsi), 0);
}

#[test]
fn aggregated_rows_feed_the_scorer() {
    let rows = vec![
        InstitutionalRow {
            date: day(79),
            name: "Foreign_Investor".to_string(),
            buy: dec!(900000),
            sell: dec!(100000),
        },
        InstitutionalRow {
            date: day(79),
            name: "Investment_Trust".to_string(),
            buy: dec!(50000),
            sell: dec!(10000),
        },
    ];
    let flow = InstitutionalFlow::aggregate(&rows, &InvestorClassConfig::default()).unwrap();
    assert_eq!(flow.foreign, dec!(800));
    assert_eq!(flow.trust, dec!(40));

    let report = Advisor::default().analyze(&rally_then_crash(), Some(&flow)).unwrap();
    assert_eq!(report.score.points_for(ScoreComponent::Institutional), 2);
}

#[test]
fn extras_and_json_report() {
    let closes: Vec<Decimal> = (0..70).map(|i| dec!(200) + Decimal::from(i % 10)).collect();
    let volumes = vec![dec!(3000000); 70];
    let series = series_from(&closes, &volumes);
    let extras = AdvisorExtras {
        cost_basis: Some(dec!(250)),
        eps: None,
        price_to_book: Some(dec!(0.9)),
        ..Default::default()
    };

    let report = Advisor::default()
        .analyze_with(&series, None, &extras)
        .unwrap()
        .without_frame();

    let position = report.diagnostics.position.as_ref().unwrap();
    assert!(position.pl_pct < dec!(-8));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["ticker"]["code"], "2330");
    assert!(json.get("frame").is_none());
    assert_eq!(json["diagnostics"]["valuation"]["method"], "price_to_book");
    assert_eq!(json["score"]["skipped"][0], "institutional");
    assert!(report.diagnostics.bias.is_some());
}
