//! 지표 프레임 (IndicatorFrame).
//!
//! 시계열의 각 캔들에 날짜 기준으로 정렬된 지표 값을 담는 열 지향 테이블입니다.
//! 모든 열은 시계열과 길이가 같으며, 데이터가 부족한 캔들은 `None`입니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use twstock_core::{AnalysisConfig, PriceSeries};

use super::{
    AtrParams, IndicatorEngine, IndicatorResult, MacdParams, RsiParams, SmaParams,
    TrailingStopParams,
};

/// 프레임 계산 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameParams {
    /// 단기 이동평균 (MA5)
    pub ma_short: SmaParams,
    /// 중기 이동평균 (MA20)
    pub ma_mid: SmaParams,
    /// 장기 이동평균 (MA60)
    pub ma_long: SmaParams,
    /// RSI
    pub rsi: RsiParams,
    /// MACD
    pub macd: MacdParams,
    /// ATR 트레일링 스탑 (ATR 파라미터 포함)
    pub stop: TrailingStopParams,
    /// 전고점 계산 기간 (고가 기준)
    pub resistance_lookback: usize,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for FrameParams {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            ma_short: SmaParams {
                period: config.ma_short,
            },
            ma_mid: SmaParams {
                period: config.ma_mid,
            },
            ma_long: SmaParams {
                period: config.ma_long,
            },
            rsi: RsiParams {
                period: config.rsi_period,
                zero_loss: config.rsi_zero_loss,
            },
            macd: MacdParams {
                fast_period: config.macd_fast,
                slow_period: config.macd_slow,
                signal_period: config.macd_signal,
            },
            stop: TrailingStopParams {
                lookback: config.stop_lookback,
                atr_multiplier: config.stop_atr_multiplier,
                atr: AtrParams {
                    period: config.atr_period,
                },
            },
            resistance_lookback: config.resistance_lookback,
        }
    }
}

/// 한 캔들의 지표 값.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: Decimal,
    pub ma_short: Option<Decimal>,
    pub ma_mid: Option<Decimal>,
    pub ma_long: Option<Decimal>,
    pub rsi: Option<Decimal>,
    pub macd: Option<Decimal>,
    pub macd_signal: Option<Decimal>,
    pub macd_histogram: Option<Decimal>,
    pub atr: Option<Decimal>,
    pub atr_stop: Option<Decimal>,
    /// 최근 N일 최고가 (전고점 저항)
    pub resistance: Option<Decimal>,
}

/// 시계열 전체에 대한 지표 테이블.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub dates: Vec<NaiveDate>,
    pub close: Vec<Decimal>,
    pub ma_short: Vec<Option<Decimal>>,
    pub ma_mid: Vec<Option<Decimal>>,
    pub ma_long: Vec<Option<Decimal>>,
    pub rsi: Vec<Option<Decimal>>,
    pub macd: Vec<Option<Decimal>>,
    pub macd_signal: Vec<Option<Decimal>>,
    pub macd_histogram: Vec<Option<Decimal>>,
    pub atr: Vec<Option<Decimal>>,
    pub atr_stop: Vec<Option<Decimal>>,
    pub resistance: Vec<Option<Decimal>>,
}

impl IndicatorEngine {
    /// 시계열 전체의 지표 프레임을 계산합니다.
    ///
    /// 매 호출마다 처음부터 다시 계산하며 내부 상태를 남기지 않습니다.
    pub fn frame(&self, series: &PriceSeries, params: &FrameParams) -> IndicatorResult<IndicatorFrame> {
        let closes = series.closes();
        let highs = series.highs();
        let lows = series.lows();

        let ma_short = self.sma(&closes, params.ma_short)?;
        let ma_mid = self.sma(&closes, params.ma_mid)?;
        let ma_long = self.sma(&closes, params.ma_long)?;
        let rsi = self.rsi(&closes, params.rsi)?;
        let macd = self.macd(&closes, params.macd)?;
        let atr = self.atr(&highs, &lows, &closes, params.stop.atr)?;
        let atr_stop = self.trailing_stop_from_atr(&closes, &atr, params.stop)?;
        let resistance = self.trailing_max(&highs, params.resistance_lookback)?;

        tracing::debug!(
            ticker = %series.ticker(),
            bars = closes.len(),
            "Indicator frame computed"
        );

        Ok(IndicatorFrame {
            dates: series.dates(),
            close: closes,
            ma_short,
            ma_mid,
            ma_long,
            rsi,
            macd: macd.iter().map(|m| m.macd).collect(),
            macd_signal: macd.iter().map(|m| m.signal).collect(),
            macd_histogram: macd.iter().map(|m| m.histogram).collect(),
            atr,
            atr_stop,
            resistance,
        })
    }
}

impl IndicatorFrame {
    /// 행 수 (= 시계열 길이).
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// 비어 있는지 여부.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// i번째 행.
    pub fn row(&self, i: usize) -> Option<IndicatorRow> {
        if i >= self.len() {
            return None;
        }
        Some(IndicatorRow {
            date: self.dates[i],
            close: self.close[i],
            ma_short: self.ma_short[i],
            ma_mid: self.ma_mid[i],
            ma_long: self.ma_long[i],
            rsi: self.rsi[i],
            macd: self.macd[i],
            macd_signal: self.macd_signal[i],
            macd_histogram: self.macd_histogram[i],
            atr: self.atr[i],
            atr_stop: self.atr_stop[i],
            resistance: self.resistance[i],
        })
    }

    /// 최신 행.
    pub fn latest(&self) -> Option<IndicatorRow> {
        self.len().checked_sub(1).and_then(|i| self.row(i))
    }

    /// 직전 행.
    pub fn previous(&self) -> Option<IndicatorRow> {
        self.len().checked_sub(2).and_then(|i| self.row(i))
    }
}
