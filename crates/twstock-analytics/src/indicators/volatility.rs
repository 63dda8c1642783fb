//! 변동성 지표 (Volatility Indicators).
//!
//! 가격 변동성을 측정하는 지표들을 제공합니다.
//! - True Range
//! - ATR (Average True Range, 단순 이동평균 방식)
//! - ATR 트레일링 스탑 (구간 최고 종가 - k × ATR)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::trend::{SmaParams, TrendIndicators};
use super::{IndicatorError, IndicatorResult};

/// ATR 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtrParams {
    /// ATR 기간 (기본: 14).
    pub period: usize,
}

impl Default for AtrParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// ATR 트레일링 스탑 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailingStopParams {
    /// 최고 종가 계산 기간 (기본: 20).
    pub lookback: usize,
    /// ATR 배수 (기본: 2).
    pub atr_multiplier: Decimal,
    /// ATR 파라미터.
    pub atr: AtrParams,
}

impl Default for TrailingStopParams {
    fn default() -> Self {
        Self {
            lookback: 20,
            atr_multiplier: dec!(2),
            atr: AtrParams::default(),
        }
    }
}

/// 변동성 지표 계산기.
#[derive(Debug, Default)]
pub struct VolatilityIndicators {
    trend: TrendIndicators,
}

fn check_lengths(high: &[Decimal], low: &[Decimal], close: &[Decimal]) -> IndicatorResult<usize> {
    if high.len() != low.len() || low.len() != close.len() {
        return Err(IndicatorError::LengthMismatch {
            high: high.len(),
            low: low.len(),
            close: close.len(),
        });
    }
    Ok(close.len())
}

impl VolatilityIndicators {
    /// 새로운 변동성 지표 계산기 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// True Range 계산.
    ///
    /// TR = max(고가 - 저가, |고가 - 전일종가|, |저가 - 전일종가|)
    /// 첫 캔들은 전일종가가 없으므로 고가 - 저가.
    pub fn true_range(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
    ) -> IndicatorResult<Vec<Decimal>> {
        let len = check_lengths(high, low, close)?;

        let mut true_ranges = Vec::with_capacity(len);
        for i in 0..len {
            let hl = high[i] - low[i];
            if i == 0 {
                true_ranges.push(hl);
                continue;
            }
            let hc = (high[i] - close[i - 1]).abs();
            let lc = (low[i] - close[i - 1]).abs();
            true_ranges.push(hl.max(hc).max(lc));
        }

        Ok(true_ranges)
    }

    /// ATR (Average True Range) 계산.
    ///
    /// ATR = True Range의 단순 이동평균. 처음 period-1개는 None.
    pub fn atr(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AtrParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let true_ranges = self.true_range(high, low, close)?;
        self.trend.sma(
            &true_ranges,
            SmaParams {
                period: params.period,
            },
        )
    }

    /// ATR 트레일링 스탑 계산.
    ///
    /// 스탑 = 최근 lookback개 종가의 최고값 - multiplier × ATR
    ///
    /// 최고 종가와 ATR이 모두 정의된 캔들에서만 값이 있습니다.
    pub fn atr_trailing_stop(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: TrailingStopParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        if params.atr_multiplier < Decimal::ZERO {
            return Err(IndicatorError::InvalidParameter(
                "ATR 배수는 음수일 수 없습니다".to_string(),
            ));
        }

        let atr = self.atr(high, low, close, params.atr)?;
        self.trailing_stop_from_atr(close, &atr, params)
    }

    /// 이미 계산된 ATR 시계열로 트레일링 스탑을 계산합니다.
    pub fn trailing_stop_from_atr(
        &self,
        close: &[Decimal],
        atr: &[Option<Decimal>],
        params: TrailingStopParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let highest_close = self.trend.rolling_max(close, params.lookback)?;

        let result = highest_close
            .iter()
            .zip(atr)
            .map(|(highest, atr)| match (highest, atr) {
                (Some(h), Some(a)) => Some(*h - params.atr_multiplier * *a),
                _ => None,
            })
            .collect();

        Ok(result)
    }
}
