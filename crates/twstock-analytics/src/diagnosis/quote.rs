//! 시세 개요.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use twstock_core::{DecimalExt, PriceSeries};

use crate::indicators::IndicatorFrame;

/// 최신 캔들 기준 시세 개요.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteOverview {
    pub price: Decimal,
    /// 전일 종가 대비 변동
    pub change: Decimal,
    /// 전일 종가 대비 변동률 (%)
    pub change_pct: Option<Decimal>,
    /// 거래량 (장, 소수점 버림)
    pub volume_lots: Decimal,
    /// 최근 60개 캔들 고가의 최고값 (60개 미만이면 전체)
    pub high_60: Decimal,
    /// 고점까지 남은 거리 (%)
    pub distance_to_high_pct: Decimal,
    /// 고점 도전 진행률 (%) = 100 - 거리
    pub challenge_progress_pct: Decimal,
    pub ma_short: Option<Decimal>,
    pub ma_mid: Option<Decimal>,
    pub ma_long: Option<Decimal>,
}

impl QuoteOverview {
    /// 시계열과 지표 프레임으로 개요를 만듭니다.
    pub fn build(series: &PriceSeries, frame: &IndicatorFrame) -> Self {
        let latest = series.latest();
        let previous = series.previous();
        let price = latest.close;

        let row = frame.latest();

        // 돌파 위험 시그널과 같은 저항 열을 사용
        let high_60 = row
            .as_ref()
            .and_then(|r| r.resistance)
            .unwrap_or(latest.high);

        let distance_to_high_pct = if high_60.is_zero() {
            Decimal::ZERO
        } else {
            (high_60 - price) / high_60 * dec!(100)
        };

        Self {
            price,
            change: price - previous.close,
            change_pct: price.pct_change_from(previous.close),
            volume_lots: latest.volume_lots(),
            high_60,
            distance_to_high_pct,
            challenge_progress_pct: dec!(100) - distance_to_high_pct,
            ma_short: row.as_ref().and_then(|r| r.ma_short),
            ma_mid: row.as_ref().and_then(|r| r.ma_mid),
            ma_long: row.as_ref().and_then(|r| r.ma_long),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{FrameParams, IndicatorEngine};
    use chrono::NaiveDate;
    use twstock_core::{LookbackPeriod, PriceBar, Ticker};

    fn series(closes: &[Decimal]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                PriceBar::new(
                    start + chrono::Duration::days(i as i64),
                    c,
                    c + dec!(2),
                    c - dec!(1),
                    c,
                    dec!(1234567),
                )
            })
            .collect();
        PriceSeries::new(Ticker::twse("3008"), LookbackPeriod::Month1, bars).unwrap()
    }

    #[test]
    fn test_overview_values() {
        let s = series(&[dec!(100), dec!(110), dec!(104)]);
        let frame = IndicatorEngine::new()
            .frame(&s, &FrameParams::default())
            .unwrap();

        let quote = QuoteOverview::build(&s, &frame);

        assert_eq!(quote.price, dec!(104));
        assert_eq!(quote.change, dec!(-6));
        assert_eq!(quote.volume_lots, dec!(1234));
        // 고가 최고값 112, 거리 (112-104)/112*100
        assert_eq!(quote.high_60, dec!(112));
        assert_eq!(
            quote.challenge_progress_pct + quote.distance_to_high_pct,
            dec!(100)
        );
        assert!(quote.distance_to_high_pct > dec!(7) && quote.distance_to_high_pct < dec!(7.2));
        // MA 데이터 부족
        assert_eq!(quote.ma_short, None);
        assert_eq!(quote.ma_long, None);
    }
}
