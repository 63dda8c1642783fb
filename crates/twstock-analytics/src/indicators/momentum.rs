//! 모멘텀 지표 (Momentum Indicators).
//!
//! 가격 모멘텀과 과매수/과매도 상태를 측정하는 지표를 제공합니다.
//! - RSI (Relative Strength Index, 단순 이동평균 방식)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use twstock_core::ZeroLossPolicy;

use super::{IndicatorError, IndicatorResult};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
    /// 평균 하락폭이 0일 때의 처리 정책 (기본: 100으로 포화).
    pub zero_loss: ZeroLossPolicy,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            period: 14,
            zero_loss: ZeroLossPolicy::Saturate,
        }
    }
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS))
    /// RS = 평균 상승폭 / 평균 하락폭 (최근 period개 변화량의 단순 평균)
    ///
    /// 첫 캔들의 변화량은 0으로 간주하므로 period-1번째 캔들부터 값이 정의됩니다.
    /// 평균 하락폭이 0이면 `ZeroLossPolicy`에 따라 100 또는 50을 반환합니다.
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들 (워밍업 구간은 None)
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        // 가격 변화 계산
        let mut deltas = Vec::with_capacity(prices.len());
        if !prices.is_empty() {
            deltas.push(Decimal::ZERO); // 첫 번째는 변화 없음
        }
        for i in 1..prices.len() {
            deltas.push(prices[i] - prices[i - 1]);
        }

        let period_decimal = Decimal::from(period);
        let mut result = Vec::with_capacity(prices.len());

        for i in 0..deltas.len() {
            if i + 1 < period {
                result.push(None);
                continue;
            }

            let window = &deltas[i + 1 - period..=i];
            let gain: Decimal = window.iter().filter(|d| d.is_sign_positive()).sum();
            let loss: Decimal = window
                .iter()
                .filter(|d| d.is_sign_negative())
                .map(|d| d.abs())
                .sum();

            let avg_gain = gain / period_decimal;
            let avg_loss = loss / period_decimal;

            let rsi = if avg_loss.is_zero() {
                match params.zero_loss {
                    ZeroLossPolicy::Saturate => dec!(100),
                    ZeroLossPolicy::Neutral => dec!(50),
                }
            } else {
                let rs = avg_gain / avg_loss;
                dec!(100) - (dec!(100) / (Decimal::ONE + rs))
            };
            result.push(Some(rsi));
        }

        Ok(result)
    }
}
