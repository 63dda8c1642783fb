//! 기술적 지표 모듈.
//!
//! 일봉 시계열로부터 대시보드에서 사용하는 고정된 지표 세트를 계산합니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **SMA**: 단순 이동평균 (MA5 / MA20 / MA60)
//! - **EMA**: 지수 이동평균 (`ema[0] = close[0]` 시작)
//! - **MACD**: 12/26/9 MACD 라인, 시그널, 히스토그램
//!
//! ## 모멘텀 지표 (Momentum Indicators)
//! - **RSI**: 14일 단순 평균 방식 상대강도지수
//!
//! ## 변동성 지표 (Volatility Indicators)
//! - **ATR**: 14일 평균 실제 범위
//! - **ATR 트레일링 스탑**: 20일 최고 종가 - 2 × ATR
//!
//! # 데이터 부족 처리
//!
//! 기간보다 짧은 구간의 값은 에러가 아니라 `None`으로 표시됩니다.
//! 에러는 잘못된 파라미터나 입력 길이 불일치에서만 발생합니다.
//!
//! # 사용 예시
//!
//! ```ignore
//! use twstock_analytics::indicators::{IndicatorEngine, SmaParams, RsiParams};
//!
//! let engine = IndicatorEngine::new();
//! let ma20 = engine.sma(&closes, SmaParams { period: 20 })?;
//! let rsi = engine.rsi(&closes, RsiParams::default())?;
//! ```

pub mod frame;
pub mod momentum;
pub mod trend;
pub mod volatility;

use rust_decimal::Decimal;
use thiserror::Error;

pub use frame::{FrameParams, IndicatorFrame, IndicatorRow};
pub use momentum::{MomentumCalculator, RsiParams};
pub use trend::{EmaParams, MacdParams, MacdResult, SmaParams, TrendIndicators};
pub use volatility::{AtrParams, TrailingStopParams, VolatilityIndicators};

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 데이터 부족 (명시적으로 최소 길이를 요구한 경우)
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientHistory { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 고가/저가/종가 길이 불일치
    #[error("입력 길이 불일치: 고가 {high}개, 저가 {low}개, 종가 {close}개")]
    LengthMismatch {
        high: usize,
        low: usize,
        close: usize,
    },
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// 통합 지표 엔진.
///
/// 모든 지표 계산을 위한 단일 진입점을 제공합니다. 상태가 없으므로
/// 같은 입력에 대해 항상 같은 결과를 반환합니다.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    volatility: VolatilityIndicators,
}

impl IndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== 추세 지표 ====================

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// # 반환
    /// 계산된 SMA 값들의 벡터 (처음 period-1개는 None)
    pub fn sma(&self, prices: &[Decimal], params: SmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.sma(prices, params)
    }

    /// 지수 이동평균 (EMA) 계산.
    pub fn ema(&self, prices: &[Decimal], params: EmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.ema(prices, params)
    }

    /// MACD 계산.
    ///
    /// # 반환
    /// MACD 라인, 시그널 라인, 히스토그램
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        self.trend.macd(prices, params)
    }

    /// 최근 N개 최고값 (초기 구간은 가용 캔들 전체).
    pub fn trailing_max(
        &self,
        values: &[Decimal],
        period: usize,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.trailing_max(values, period)
    }

    // ==================== 모멘텀 지표 ====================

    /// RSI (Relative Strength Index) 계산.
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.momentum.rsi(prices, params)
    }

    // ==================== 변동성 지표 ====================

    /// True Range 계산.
    pub fn true_range(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
    ) -> IndicatorResult<Vec<Decimal>> {
        self.volatility.true_range(high, low, close)
    }

    /// ATR (Average True Range) 계산.
    pub fn atr(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AtrParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.volatility.atr(high, low, close, params)
    }

    /// ATR 트레일링 스탑 계산.
    pub fn atr_trailing_stop(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: TrailingStopParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.volatility.atr_trailing_stop(high, low, close, params)
    }

    /// 이미 계산된 ATR로 트레일링 스탑 계산.
    pub fn trailing_stop_from_atr(
        &self,
        close: &[Decimal],
        atr: &[Option<Decimal>],
        params: TrailingStopParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.volatility.trailing_stop_from_atr(close, atr, params)
    }
}
