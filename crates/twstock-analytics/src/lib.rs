//! 지표 계산 및 매매 판단 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 기술적 지표 (MA, RSI, MACD, ATR, ATR 트레일링 스탑)
//! - 시그널 평가 (추세, 모멘텀, RSI 구간, 돌파 리스크, 스탑 이탈)
//! - 종합 점수 및 7단계 추천 등급
//! - 보조 진단 (이격도, 수급, 국면, 손익, 거래량, 가치)
//! - 위 단계를 연결하는 분석 파이프라인
//!
//! # Re-exports
//!
//! - [`indicators`]: 지표 엔진과 지표 프레임
//! - [`signals`]: 시그널 분류기
//! - [`scorer`]: 종합 점수 계산기
//! - [`advisor`]: 분석 파이프라인

pub mod advisor;
pub mod diagnosis;
pub mod indicators;
pub mod scorer;
pub mod signals;

// Advisor 모듈 re-exports
pub use advisor::{
    Advisor, AdvisorError, AdvisorExtras, AdvisorReport, AdvisorResult, Diagnostics,
};

// Indicators 모듈 re-exports
pub use indicators::{
    // 변동성 지표
    AtrParams,
    EmaParams,
    // 지표 프레임
    FrameParams,
    IndicatorEngine,
    IndicatorError,
    IndicatorFrame,
    IndicatorResult,
    IndicatorRow,
    MacdParams,
    MacdResult,
    MomentumCalculator,
    // 모멘텀 지표
    RsiParams,
    // 추세 지표
    SmaParams,
    TrailingStopParams,
    TrendIndicators,
    VolatilityIndicators,
};

// Scorer 모듈 re-exports
pub use scorer::{
    CompositeScore, CompositeScorer, RationaleKind, RecommendationTier, ScoreComponent,
    ScoreContribution, ScorerParams,
};

// Signals 모듈 re-exports
pub use signals::{
    BreakoutRisk, MacdCross, MomentumAcceleration, RsiBadge, RsiZone, SignalEvaluator,
    SignalInputs, SignalParams, SignalSet, StopState, TrendSignal,
};
