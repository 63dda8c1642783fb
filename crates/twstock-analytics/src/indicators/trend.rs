//! 추세 지표 (Trend Indicators).
//!
//! 이동평균 기반의 추세 지표들을 제공합니다.
//! - SMA (Simple Moving Average)
//! - EMA (Exponential Moving Average, `adjust=False` 방식)
//! - MACD (Moving Average Convergence Divergence)
//! - 구간 최고값 (Rolling Max)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// EMA span (alpha = 2 / (span + 1)).
    pub span: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { span: 12 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA span (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA span (기본: 26).
    pub slow_period: usize,
    /// 시그널 라인 span (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdResult {
    /// MACD 라인 (단기 EMA - 장기 EMA).
    pub macd: Option<Decimal>,
    /// 시그널 라인 (MACD의 EMA).
    pub signal: Option<Decimal>,
    /// 히스토그램 (MACD - 시그널).
    pub histogram: Option<Decimal>,
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

fn check_period(period: usize) -> IndicatorResult<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(
            "기간은 0보다 커야 합니다".to_string(),
        ));
    }
    Ok(())
}

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// # 반환
    /// 입력과 같은 길이의 벡터. 처음 period-1개는 None (데이터 부족).
    /// 데이터가 period보다 짧으면 전부 None.
    pub fn sma(
        &self,
        prices: &[Decimal],
        params: SmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        check_period(period)?;

        let period_decimal = Decimal::from(period);
        let mut result = Vec::with_capacity(prices.len());

        for i in 0..prices.len() {
            if i + 1 < period {
                result.push(None);
            } else {
                let sum: Decimal = prices[i + 1 - period..=i].iter().sum();
                result.push(Some(sum / period_decimal));
            }
        }

        Ok(result)
    }

    /// 워밍업 구간 없이 전체 EMA 시계열을 계산합니다.
    ///
    /// ema[0] = price[0]
    /// ema[i] = alpha × price[i] + (1 - alpha) × ema[i-1], alpha = 2 / (span + 1)
    pub fn ewm(&self, prices: &[Decimal], span: usize) -> IndicatorResult<Vec<Decimal>> {
        check_period(span)?;

        let alpha = dec!(2) / Decimal::from(span + 1);
        let one_minus_alpha = Decimal::ONE - alpha;

        let mut result = Vec::with_capacity(prices.len());
        let mut iter = prices.iter();
        if let Some(first) = iter.next() {
            let mut prev = *first;
            result.push(prev);
            for price in iter {
                prev = (*price * alpha) + (prev * one_minus_alpha);
                result.push(prev);
            }
        }

        Ok(result)
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// 재귀식은 첫 캔들부터 적용하지만, 처음 span-1개는 워밍업 구간으로 보고 None 처리합니다.
    pub fn ema(
        &self,
        prices: &[Decimal],
        params: EmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let full = self.ewm(prices, params.span)?;
        Ok(mask_warmup(&full, params.span - 1))
    }

    /// MACD 계산.
    ///
    /// MACD 라인 = 단기 EMA - 장기 EMA
    /// 시그널 라인 = MACD 라인의 EMA
    /// 히스토그램 = MACD 라인 - 시그널 라인
    ///
    /// MACD 라인은 slow-1번째, 시그널/히스토그램은 slow+signal-2번째 캔들부터 정의됩니다.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        if params.fast_period >= params.slow_period {
            return Err(IndicatorError::InvalidParameter(format!(
                "단기 span({})은 장기 span({})보다 작아야 합니다",
                params.fast_period, params.slow_period
            )));
        }

        let fast = self.ewm(prices, params.fast_period)?;
        let slow = self.ewm(prices, params.slow_period)?;
        let macd_line: Vec<Decimal> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal_line = self.ewm(&macd_line, params.signal_period)?;

        let macd_ready = params.slow_period - 1;
        let signal_ready = macd_ready + params.signal_period - 1;

        let result = macd_line
            .iter()
            .zip(&signal_line)
            .enumerate()
            .map(|(i, (&macd, &signal))| {
                if i < macd_ready {
                    MacdResult {
                        macd: None,
                        signal: None,
                        histogram: None,
                    }
                } else if i < signal_ready {
                    MacdResult {
                        macd: Some(macd),
                        signal: None,
                        histogram: None,
                    }
                } else {
                    MacdResult {
                        macd: Some(macd),
                        signal: Some(signal),
                        histogram: Some(macd - signal),
                    }
                }
            })
            .collect();

        Ok(result)
    }

    /// 구간 최고값 계산 (현재 캔들 포함).
    ///
    /// 처음 period-1개는 None.
    pub fn rolling_max(
        &self,
        values: &[Decimal],
        period: usize,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        check_period(period)?;

        let result = (0..values.len())
            .map(|i| {
                if i + 1 < period {
                    None
                } else {
                    values[i + 1 - period..=i].iter().max().copied()
                }
            })
            .collect();

        Ok(result)
    }

    /// 최근 period개 최고값 (현재 캔들 포함).
    ///
    /// 캔들이 period개보다 적은 구간은 그때까지의 전체 캔들로 계산하므로
    /// 입력이 있는 한 항상 Some.
    pub fn trailing_max(
        &self,
        values: &[Decimal],
        period: usize,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        check_period(period)?;

        let result = (0..values.len())
            .map(|i| {
                let start = (i + 1).saturating_sub(period);
                values[start..=i].iter().max().copied()
            })
            .collect();

        Ok(result)
    }
}

/// 처음 `warmup`개 값을 None으로 가립니다.
pub(crate) fn mask_warmup(values: &[Decimal], warmup: usize) -> Vec<Option<Decimal>> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| if i < warmup { None } else { Some(*v) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_prices() -> Vec<Decimal> {
        vec![
            dec!(100.0),
            dec!(102.0),
            dec!(101.0),
            dec!(103.0),
            dec!(105.0),
            dec!(104.0),
            dec!(106.0),
            dec!(108.0),
            dec!(107.0),
            dec!(109.0),
        ]
    }

    #[test]
    fn test_sma_basic() {
        let trend = TrendIndicators::new();
        let sma = trend.sma(&sample_prices(), SmaParams { period: 3 }).unwrap();

        assert!(sma[0].is_none());
        assert!(sma[1].is_none());
        // (100 + 102 + 101) / 3 = 101
        assert_eq!(sma[2], Some(dec!(101)));
        assert_eq!(sma.len(), 10);
    }

    #[test]
    fn test_sma_short_input_is_all_none() {
        let trend = TrendIndicators::new();
        let sma = trend
            .sma(&[dec!(100), dec!(101)], SmaParams { period: 20 })
            .unwrap();

        assert_eq!(sma, vec![None, None]);
    }

    #[test]
    fn test_zero_period_rejected() {
        let trend = TrendIndicators::new();
        assert!(trend.sma(&sample_prices(), SmaParams { period: 0 }).is_err());
        assert!(trend.ewm(&sample_prices(), 0).is_err());
    }

    #[test]
    fn test_ewm_recurrence() {
        let trend = TrendIndicators::new();
        // span 3 → alpha 0.5
        let ema = trend.ewm(&[dec!(10), dec!(20), dec!(30)], 3).unwrap();

        assert_eq!(ema[0], dec!(10));
        assert_eq!(ema[1], dec!(15));
        assert_eq!(ema[2], dec!(22.5));
    }

    #[test]
    fn test_ema_warmup_masked() {
        let trend = TrendIndicators::new();
        let ema = trend.ema(&sample_prices(), EmaParams { span: 3 }).unwrap();

        assert!(ema[0].is_none());
        assert!(ema[1].is_none());
        assert!(ema[2].is_some());
    }

    #[test]
    fn test_macd_definition_boundaries() {
        let trend = TrendIndicators::new();
        let prices: Vec<Decimal> = (0..50).map(|i| Decimal::from(100 + i)).collect();

        let macd = trend.macd(&prices, MacdParams::default()).unwrap();

        assert_eq!(macd.len(), prices.len());
        assert!(macd[24].macd.is_none());
        assert!(macd[25].macd.is_some());
        assert!(macd[25].signal.is_none());
        assert!(macd[32].histogram.is_none());
        assert!(macd[33].histogram.is_some());

        // 꾸준한 상승 추세에서 MACD는 양수
        assert!(macd[49].macd.unwrap() > Decimal::ZERO);
    }

    #[test]
    fn test_macd_rejects_inverted_spans() {
        let trend = TrendIndicators::new();
        let params = MacdParams {
            fast_period: 26,
            slow_period: 12,
            signal_period: 9,
        };
        assert!(trend.macd(&sample_prices(), params).is_err());
    }

    #[test]
    fn test_rolling_max() {
        let trend = TrendIndicators::new();
        let max = trend.rolling_max(&sample_prices(), 3).unwrap();

        assert_eq!(max[1], None);
        assert_eq!(max[2], Some(dec!(102)));
        assert_eq!(max[4], Some(dec!(105)));
        assert_eq!(max[5], Some(dec!(105)));
    }

    #[test]
    fn test_trailing_max_uses_partial_window() {
        let trend = TrendIndicators::new();
        let values = sample_prices();
        let max = trend.trailing_max(&values, 60).unwrap();

        assert_eq!(max.len(), values.len());
        assert!(max.iter().all(Option::is_some));
        assert_eq!(max[0], Some(values[0]));
        assert_eq!(max[values.len() - 1], values.iter().max().copied());

        let strict = trend.rolling_max(&values, 3).unwrap();
        let partial = trend.trailing_max(&values, 3).unwrap();
        assert_eq!(partial[2..], strict[2..]);
    }
}
