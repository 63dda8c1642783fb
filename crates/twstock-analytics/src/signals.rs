//! 시그널 평가기 (Signal Evaluator).
//!
//! 지표 프레임의 최신 행(과 직전 히스토그램)을 독립적인 이산 시그널로 분류합니다.
//!
//! # 시그널 차원
//!
//! - **추세**: 종가 vs MA20
//! - **MACD 교차**: MACD 라인 vs 시그널 라인
//! - **모멘텀 가속**: 현재 히스토그램 vs 직전 히스토그램
//! - **RSI 구간**: 75/25 극단, 45~55 균형
//! - **RSI 배지**: 70/30 과매수/과매도
//! - **돌파 리스크**: 60일 고점 2% 이내 접근
//! - **스탑 상태**: 종가 vs ATR 트레일링 스탑
//!
//! 각 차원은 필요한 지표가 정의되지 않았으면 `None`입니다.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use twstock_core::AnalysisConfig;

use crate::indicators::IndicatorFrame;

/// 추세 시그널.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSignal {
    /// 종가 > MA20
    AboveMa20,
    /// 종가 <= MA20
    BelowMa20,
}

/// MACD 교차 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdCross {
    /// MACD 라인 > 시그널 라인
    Bullish,
    /// MACD 라인 <= 시그널 라인
    Bearish,
}

/// 모멘텀 가속 (히스토그램 변화).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentumAcceleration {
    /// 히스토그램 양수 + 확대
    StrengtheningBull,
    /// 히스토그램 양수 + 축소
    WeakeningBull,
    /// 히스토그램 음수 + 확대
    AcceleratingBear,
    /// 히스토그램 음수 + 축소
    WeakeningBear,
}

/// RSI 구간 (75/25 극단 기준).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiZone {
    ExtremeOverbought,
    ExtremeOversold,
    NeutralBalance,
    Normal,
}

/// RSI 배지 (70/30 기준).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiBadge {
    Overbought,
    Oversold,
    Normal,
}

/// 전고점 돌파 리스크.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakoutRisk {
    /// 고점 아래 근접 구간 (저항 테스트 중)
    ApproachingResistance,
    Clear,
}

/// ATR 트레일링 스탑 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopState {
    /// 종가 >= 스탑
    Holding,
    /// 종가 < 스탑
    Violated,
}

impl TrendSignal {
    pub fn label(self) -> &'static str {
        match self {
            TrendSignal::AboveMa20 => "MA20 위 (상승 추세)",
            TrendSignal::BelowMa20 => "MA20 아래 (하락 추세)",
        }
    }
}

impl MacdCross {
    pub fn label(self) -> &'static str {
        match self {
            MacdCross::Bullish => "골든크로스 유지",
            MacdCross::Bearish => "데드크로스 유지",
        }
    }
}

impl MomentumAcceleration {
    pub fn label(self) -> &'static str {
        match self {
            MomentumAcceleration::StrengtheningBull => "상승 모멘텀 강화",
            MomentumAcceleration::WeakeningBull => "상승 모멘텀 둔화",
            MomentumAcceleration::AcceleratingBear => "하락 모멘텀 가속",
            MomentumAcceleration::WeakeningBear => "하락 모멘텀 둔화",
        }
    }
}

impl RsiZone {
    pub fn label(self) -> &'static str {
        match self {
            RsiZone::ExtremeOverbought => "극단적 과매수",
            RsiZone::ExtremeOversold => "극단적 과매도",
            RsiZone::NeutralBalance => "매수/매도 균형",
            RsiZone::Normal => "정상 범위",
        }
    }
}

impl RsiBadge {
    pub fn label(self) -> &'static str {
        match self {
            RsiBadge::Overbought => "과매수",
            RsiBadge::Oversold => "과매도",
            RsiBadge::Normal => "중립",
        }
    }
}

impl BreakoutRisk {
    pub fn label(self) -> &'static str {
        match self {
            BreakoutRisk::ApproachingResistance => "전고점 저항 근접",
            BreakoutRisk::Clear => "저항 부담 없음",
        }
    }
}

impl StopState {
    pub fn label(self) -> &'static str {
        match self {
            StopState::Holding => "스탑 위 유지",
            StopState::Violated => "스탑 이탈",
        }
    }
}

macro_rules! display_via_label {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )*
    };
}

display_via_label!(
    TrendSignal,
    MacdCross,
    MomentumAcceleration,
    RsiZone,
    RsiBadge,
    BreakoutRisk,
    StopState,
);

/// 시그널 임계값.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalParams {
    /// 전고점 근접 판단 비율 (%, 기본: 2)
    pub resistance_proximity_pct: Decimal,
    /// 극단적 과매수 (기본: 75)
    pub rsi_extreme_overbought: Decimal,
    /// 극단적 과매도 (기본: 25)
    pub rsi_extreme_oversold: Decimal,
    /// 균형 구간 하한 (기본: 45)
    pub rsi_neutral_low: Decimal,
    /// 균형 구간 상한 (기본: 55)
    pub rsi_neutral_high: Decimal,
    /// 배지 과매수 (기본: 70)
    pub rsi_overbought: Decimal,
    /// 배지 과매도 (기본: 30)
    pub rsi_oversold: Decimal,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for SignalParams {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            resistance_proximity_pct: config.resistance_proximity_pct,
            rsi_extreme_overbought: config.rsi_extreme_overbought,
            rsi_extreme_oversold: config.rsi_extreme_oversold,
            rsi_neutral_low: config.rsi_neutral_low,
            rsi_neutral_high: config.rsi_neutral_high,
            rsi_overbought: config.rsi_overbought,
            rsi_oversold: config.rsi_oversold,
        }
    }
}

/// 시그널 평가 입력 (최신 캔들 기준 스냅샷).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalInputs {
    pub date: NaiveDate,
    pub close: Decimal,
    pub ma_mid: Option<Decimal>,
    pub rsi: Option<Decimal>,
    pub macd: Option<Decimal>,
    pub macd_signal: Option<Decimal>,
    pub histogram: Option<Decimal>,
    pub prev_histogram: Option<Decimal>,
    pub atr_stop: Option<Decimal>,
    pub resistance: Option<Decimal>,
}

impl SignalInputs {
    /// 프레임의 최신 행과 직전 히스토그램으로 입력을 구성합니다.
    pub fn from_frame(frame: &IndicatorFrame) -> Option<Self> {
        let latest = frame.latest()?;
        let prev_histogram = frame.previous().and_then(|row| row.macd_histogram);

        Some(Self {
            date: latest.date,
            close: latest.close,
            ma_mid: latest.ma_mid,
            rsi: latest.rsi,
            macd: latest.macd,
            macd_signal: latest.macd_signal,
            histogram: latest.macd_histogram,
            prev_histogram,
            atr_stop: latest.atr_stop,
            resistance: latest.resistance,
        })
    }
}

/// 최신 캔들의 시그널 분류 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSet {
    pub date: NaiveDate,
    pub close: Decimal,
    pub rsi: Option<Decimal>,
    pub trend: Option<TrendSignal>,
    pub macd_cross: Option<MacdCross>,
    pub acceleration: Option<MomentumAcceleration>,
    pub rsi_zone: Option<RsiZone>,
    pub rsi_badge: Option<RsiBadge>,
    pub breakout: Option<BreakoutRisk>,
    pub stop: Option<StopState>,
}

impl SignalSet {
    /// 계산되지 않은 시그널 차원의 이름 목록.
    pub fn unavailable(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.trend.is_none() {
            missing.push("trend");
        }
        if self.macd_cross.is_none() {
            missing.push("macd_cross");
        }
        if self.acceleration.is_none() {
            missing.push("acceleration");
        }
        if self.rsi_zone.is_none() {
            missing.push("rsi");
        }
        if self.breakout.is_none() {
            missing.push("breakout");
        }
        if self.stop.is_none() {
            missing.push("stop");
        }
        missing
    }
}

/// 추세 분류: 종가가 MA20보다 엄격히 클 때만 상승.
pub fn classify_trend(close: Decimal, ma_mid: Decimal) -> TrendSignal {
    if close > ma_mid {
        TrendSignal::AboveMa20
    } else {
        TrendSignal::BelowMa20
    }
}

/// MACD 교차 분류.
pub fn classify_macd_cross(macd: Decimal, signal: Decimal) -> MacdCross {
    if macd > signal {
        MacdCross::Bullish
    } else {
        MacdCross::Bearish
    }
}

/// 모멘텀 가속 분류.
pub fn classify_acceleration(histogram: Decimal, previous: Decimal) -> MomentumAcceleration {
    if histogram > Decimal::ZERO {
        if histogram > previous {
            MomentumAcceleration::StrengtheningBull
        } else {
            MomentumAcceleration::WeakeningBull
        }
    } else if histogram < previous {
        MomentumAcceleration::AcceleratingBear
    } else {
        MomentumAcceleration::WeakeningBear
    }
}

/// RSI 구간 분류 (경계값은 해당 구간에 포함).
pub fn classify_rsi_zone(rsi: Decimal, params: &SignalParams) -> RsiZone {
    if rsi >= params.rsi_extreme_overbought {
        RsiZone::ExtremeOverbought
    } else if rsi <= params.rsi_extreme_oversold {
        RsiZone::ExtremeOversold
    } else if rsi >= params.rsi_neutral_low && rsi <= params.rsi_neutral_high {
        RsiZone::NeutralBalance
    } else {
        RsiZone::Normal
    }
}

/// RSI 배지 분류 (경계값 포함).
pub fn classify_rsi_badge(rsi: Decimal, params: &SignalParams) -> RsiBadge {
    if rsi >= params.rsi_overbought {
        RsiBadge::Overbought
    } else if rsi <= params.rsi_oversold {
        RsiBadge::Oversold
    } else {
        RsiBadge::Normal
    }
}

/// 전고점 근접 분류: 고점 아래이면서 고점 × (1 - pct/100) 이상.
pub fn classify_breakout(close: Decimal, resistance: Decimal, proximity_pct: Decimal) -> BreakoutRisk {
    let floor = resistance * (Decimal::ONE - proximity_pct / dec!(100));
    if close < resistance && close >= floor {
        BreakoutRisk::ApproachingResistance
    } else {
        BreakoutRisk::Clear
    }
}

/// 스탑 상태 분류.
pub fn classify_stop(close: Decimal, stop: Decimal) -> StopState {
    if close < stop {
        StopState::Violated
    } else {
        StopState::Holding
    }
}

/// 시그널 평가기.
#[derive(Debug, Clone, Default)]
pub struct SignalEvaluator {
    params: SignalParams,
}

impl SignalEvaluator {
    /// 임계값으로 평가기 생성.
    pub fn new(params: SignalParams) -> Self {
        Self { params }
    }

    /// 현재 임계값.
    pub fn params(&self) -> &SignalParams {
        &self.params
    }

    /// 최신 스냅샷을 시그널로 분류합니다.
    pub fn evaluate(&self, inputs: &SignalInputs) -> SignalSet {
        let close = inputs.close;

        let trend = inputs.ma_mid.map(|ma| classify_trend(close, ma));
        let macd_cross = match (inputs.macd, inputs.macd_signal) {
            (Some(m), Some(s)) => Some(classify_macd_cross(m, s)),
            _ => None,
        };
        let acceleration = match (inputs.histogram, inputs.prev_histogram) {
            (Some(h), Some(p)) => Some(classify_acceleration(h, p)),
            _ => None,
        };
        let rsi_zone = inputs.rsi.map(|r| classify_rsi_zone(r, &self.params));
        let rsi_badge = inputs.rsi.map(|r| classify_rsi_badge(r, &self.params));
        let breakout = inputs
            .resistance
            .map(|r| classify_breakout(close, r, self.params.resistance_proximity_pct));
        let stop = inputs.atr_stop.map(|s| classify_stop(close, s));

        let signals = SignalSet {
            date: inputs.date,
            close,
            rsi: inputs.rsi,
            trend,
            macd_cross,
            acceleration,
            rsi_zone,
            rsi_badge,
            breakout,
            stop,
        };

        let unavailable = signals.unavailable();
        if !unavailable.is_empty() {
            tracing::debug!(date = %inputs.date, ?unavailable, "Signals with insufficient history");
        }

        signals
    }
}
