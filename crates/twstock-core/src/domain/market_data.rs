//! 일봉 시세 데이터 구조체.
//!
//! - `PriceBar` - 하루치 OHLCV
//! - `PriceSeries` - 한 종목의 날짜 오름차순 일봉 시계열

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{DecimalExt, LookbackPeriod, Price, Quantity, Ticker};

/// 델타 계산에 필요한 최소 캔들 수 (현재 + 직전).
pub const MIN_SERIES_LEN: usize = 2;

/// 하루치 OHLCV 캔들.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    /// 거래일
    pub date: NaiveDate,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량 (주)
    pub volume: Quantity,
}

impl PriceBar {
    /// 새 캔들을 생성합니다.
    pub fn new(
        date: NaiveDate,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Quantity,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 양봉 여부 (종가 ≥ 시가).
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// 거래량을 장 단위로 반환합니다 (소수점 버림).
    pub fn volume_lots(&self) -> Decimal {
        self.volume.shares_to_lots().trunc()
    }

    /// 캔들 단위 불변식을 검사합니다.
    fn validate(&self) -> CoreResult<()> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| *p <= Decimal::ZERO) {
            return Err(CoreError::InvalidSeries(format!(
                "{}: 가격은 0보다 커야 합니다",
                self.date
            )));
        }
        if self.high < self.low {
            return Err(CoreError::InvalidSeries(format!(
                "{}: 고가({})가 저가({})보다 낮습니다",
                self.date, self.high, self.low
            )));
        }
        if self.volume < Decimal::ZERO {
            return Err(CoreError::InvalidSeries(format!(
                "{}: 거래량은 음수일 수 없습니다",
                self.date
            )));
        }
        Ok(())
    }
}

/// 한 종목의 일봉 시계열.
///
/// 생성 시점에 다음을 보장합니다:
/// - 최소 2개 캔들
/// - 날짜 엄격 오름차순 (중복 없음)
/// - 모든 가격 양수, 고가 ≥ 저가, 거래량 ≥ 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: Ticker,
    period: LookbackPeriod,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// 검증된 시계열을 생성합니다.
    pub fn new(ticker: Ticker, period: LookbackPeriod, bars: Vec<PriceBar>) -> CoreResult<Self> {
        if bars.len() < MIN_SERIES_LEN {
            return Err(CoreError::InvalidSeries(format!(
                "{} {}: 캔들이 부족합니다 (필요 {}개, 제공 {}개)",
                ticker,
                period,
                MIN_SERIES_LEN,
                bars.len()
            )));
        }

        for bar in &bars {
            bar.validate()?;
        }

        if let Some(pair) = bars.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(CoreError::InvalidSeries(format!(
                "날짜가 오름차순이 아닙니다: {} → {}",
                pair[0].date, pair[1].date
            )));
        }

        Ok(Self {
            ticker,
            period,
            bars,
        })
    }

    /// 정렬되지 않은 캔들을 날짜순으로 정렬한 뒤 시계열을 생성합니다.
    ///
    /// 같은 날짜가 여러 번 나오면 마지막 캔들을 사용합니다.
    pub fn from_unsorted(
        ticker: Ticker,
        period: LookbackPeriod,
        mut bars: Vec<PriceBar>,
    ) -> CoreResult<Self> {
        bars.sort_by_key(|bar| bar.date);
        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }
        Self::new(ticker, period, deduped)
    }

    /// 종목 코드.
    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// 조회 기간.
    pub fn period(&self) -> LookbackPeriod {
        self.period
    }

    /// 전체 캔들.
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// 캔들 수.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// 비어 있는지 여부 (검증된 시계열은 항상 false).
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// 최신 캔들.
    pub fn latest(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }

    /// 직전 캔들.
    pub fn previous(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 2]
    }

    /// 거래일 목록.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// 고가 목록.
    pub fn highs(&self) -> Vec<Price> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// 저가 목록.
    pub fn lows(&self) -> Vec<Price> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// 종가 목록.
    pub fn closes(&self) -> Vec<Price> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// 거래량 목록.
    pub fn volumes(&self) -> Vec<Quantity> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}
