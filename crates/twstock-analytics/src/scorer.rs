//! 종합 점수 계산기 (Composite Scorer).
//!
//! 기술적 시그널과 기관 수급을 고정 가중치로 합산해 정수 점수를 만들고,
//! 점수를 7단계 추천 등급으로 매핑합니다.
//!
//! # 가중치
//!
//! | 조건 | 점수 |
//! |---|---|
//! | 종가 > MA20 | +2, 아니면 -2 |
//! | RSI <= 30 | +1 |
//! | RSI >= 70 | -1 |
//! | MACD > 시그널 | +1, 아니면 -1 |
//! | 외국인 > 0 그리고 투신 > 0 | +2 |
//! | 그 외 (외국인+투신) > 0 | +1 |
//! | (외국인+투신) < 0 | -1 |
//! | 종가 < ATR 스탑 | -2 |
//! | 종가 >= ATR 스탑 | +1 |
//!
//! # 부가 설명 덮어쓰기
//!
//! 점수와 등급은 바꾸지 않고 설명 문구만 바꿉니다. 우선순위는 다음과 같습니다.
//!
//! 1. 스탑 이탈 + 점수 양수 → 가짜 돌파 경고
//! 2. 외국인 순매수 > 임계값 + MA20 아래 → 역발상 매집

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use twstock_core::{AnalysisConfig, InstitutionalFlow};

use crate::signals::{MacdCross, RsiBadge, SignalSet, StopState, TrendSignal};

/// 추천 등급 (7단계, 높은 순).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    StrongSell,
    Reduce,
    Neutral,
    Cautious,
    Accumulate,
    Buy,
    StrongBuy,
}

impl RecommendationTier {
    /// 모든 등급 (높은 순).
    pub const ALL: [RecommendationTier; 7] = [
        RecommendationTier::StrongBuy,
        RecommendationTier::Buy,
        RecommendationTier::Accumulate,
        RecommendationTier::Cautious,
        RecommendationTier::Neutral,
        RecommendationTier::Reduce,
        RecommendationTier::StrongSell,
    ];

    /// 점수를 등급으로 매핑합니다. 경계값은 표기된 등급에 속합니다.
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 4 => RecommendationTier::StrongBuy,
            3 => RecommendationTier::Buy,
            2 => RecommendationTier::Accumulate,
            1 => RecommendationTier::Cautious,
            0 => RecommendationTier::Neutral,
            -1 => RecommendationTier::Reduce,
            _ => RecommendationTier::StrongSell,
        }
    }

    /// 직렬화용 식별자.
    pub fn as_str(self) -> &'static str {
        match self {
            RecommendationTier::StrongBuy => "strong_buy",
            RecommendationTier::Buy => "buy",
            RecommendationTier::Accumulate => "accumulate",
            RecommendationTier::Cautious => "cautious",
            RecommendationTier::Neutral => "neutral",
            RecommendationTier::Reduce => "reduce",
            RecommendationTier::StrongSell => "strong_sell",
        }
    }

    /// 화면 표시용 이름.
    pub fn label(self) -> &'static str {
        match self {
            RecommendationTier::StrongBuy => "강력 매수",
            RecommendationTier::Buy => "매수",
            RecommendationTier::Accumulate => "분할 매수",
            RecommendationTier::Cautious => "신중 관망",
            RecommendationTier::Neutral => "중립",
            RecommendationTier::Reduce => "비중 축소",
            RecommendationTier::StrongSell => "강력 매도",
        }
    }

    /// 등급 기본 설명.
    pub fn default_rationale(self) -> &'static str {
        match self {
            RecommendationTier::StrongBuy => "추세와 수급이 함께 받쳐주는 강세 구간입니다",
            RecommendationTier::Buy => "상승 우위가 뚜렷해 매수 관점이 유효합니다",
            RecommendationTier::Accumulate => "우호적이지만 확신은 약해 분할 매수가 적절합니다",
            RecommendationTier::Cautious => "긍정 신호가 미약해 추가 확인이 필요합니다",
            RecommendationTier::Neutral => "상승과 하락 신호가 균형을 이룹니다",
            RecommendationTier::Reduce => "약세 신호가 우세해 비중 축소를 검토하세요",
            RecommendationTier::StrongSell => "추세가 무너져 보수적 대응이 필요합니다",
        }
    }

    /// 매수 계열 등급 여부.
    pub fn is_bullish(self) -> bool {
        self >= RecommendationTier::Accumulate
    }
}

impl fmt::Display for RecommendationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 점수 구성 요소.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreComponent {
    Trend,
    Rsi,
    Macd,
    Institutional,
    Stop,
}

impl ScoreComponent {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoreComponent::Trend => "trend",
            ScoreComponent::Rsi => "rsi",
            ScoreComponent::Macd => "macd",
            ScoreComponent::Institutional => "institutional",
            ScoreComponent::Stop => "stop",
        }
    }
}

/// 구성 요소별 기여 점수.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreContribution {
    pub component: ScoreComponent,
    pub points: i32,
    pub reason: String,
}

/// 설명 문구 출처.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RationaleKind {
    /// 등급 기본 설명
    Tier,
    /// 스탑 이탈인데 점수가 양수
    FalseBreakout,
    /// MA20 아래에서 외국인 대량 순매수
    ContrarianAccumulation,
}

/// 종합 점수 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub score: i32,
    pub tier: RecommendationTier,
    pub rationale: String,
    pub rationale_kind: RationaleKind,
    pub contributions: Vec<ScoreContribution>,
    /// 입력이 없어 0점 처리된 구성 요소
    pub skipped: Vec<ScoreComponent>,
}

impl CompositeScore {
    /// 기관 수급 기여가 생략되었는지 여부.
    pub fn institutional_skipped(&self) -> bool {
        self.skipped.contains(&ScoreComponent::Institutional)
    }

    /// 특정 구성 요소의 기여 점수.
    pub fn points_for(&self, component: ScoreComponent) -> i32 {
        self.contributions
            .iter()
            .filter(|c| c.component == component)
            .map(|c| c.points)
            .sum()
    }
}

/// 점수 계산 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScorerParams {
    /// 역발상 매집 판단 외국인 순매수 임계값 (장, 기본: 500)
    pub contrarian_foreign_lots: Decimal,
}

impl Default for ScorerParams {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for ScorerParams {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            contrarian_foreign_lots: config.contrarian_foreign_lots,
        }
    }
}

/// 종합 점수 계산기.
///
/// 어떤 입력이 빠져도 실패하지 않으며, 빠진 구성 요소는 0점과 함께
/// `skipped`에 기록됩니다.
#[derive(Debug, Clone, Default)]
pub struct CompositeScorer {
    params: ScorerParams,
}

impl CompositeScorer {
    pub fn new(params: ScorerParams) -> Self {
        Self { params }
    }

    /// 시그널과 기관 수급으로 종합 점수를 계산합니다.
    pub fn score(&self, signals: &SignalSet, flow: Option<&InstitutionalFlow>) -> CompositeScore {
        let mut contributions = Vec::with_capacity(5);
        let mut skipped = Vec::new();

        let mut push = |component: ScoreComponent, scored: Option<(i32, String)>| match scored {
            Some((points, reason)) => contributions.push(ScoreContribution {
                component,
                points,
                reason,
            }),
            None => skipped.push(component),
        };

        push(ScoreComponent::Trend, signals.trend.map(score_trend));
        push(ScoreComponent::Rsi, signals.rsi_badge.map(score_rsi));
        push(ScoreComponent::Macd, signals.macd_cross.map(score_macd));
        push(ScoreComponent::Institutional, flow.map(score_flow));
        push(ScoreComponent::Stop, signals.stop.map(score_stop));

        let score: i32 = contributions.iter().map(|c| c.points).sum();
        let tier = RecommendationTier::from_score(score);
        let (rationale_kind, rationale) = self.rationale(score, tier, signals, flow);

        if !skipped.is_empty() {
            tracing::warn!(
                date = %signals.date,
                skipped = ?skipped.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
                "Score components skipped due to missing inputs"
            );
        }
        tracing::debug!(score, tier = %tier, ?rationale_kind, "Composite score computed");

        CompositeScore {
            score,
            tier,
            rationale,
            rationale_kind,
            contributions,
            skipped,
        }
    }

    fn rationale(
        &self,
        score: i32,
        tier: RecommendationTier,
        signals: &SignalSet,
        flow: Option<&InstitutionalFlow>,
    ) -> (RationaleKind, String) {
        if signals.stop == Some(StopState::Violated) && score > 0 {
            return (
                RationaleKind::FalseBreakout,
                format!(
                    "점수는 {}점이지만 종가가 ATR 트레일링 스탑 아래입니다. 가짜 돌파 가능성에 주의하세요",
                    score
                ),
            );
        }

        if let Some(flow) = flow {
            if flow.foreign > self.params.contrarian_foreign_lots
                && signals.trend == Some(TrendSignal::BelowMa20)
            {
                return (
                    RationaleKind::ContrarianAccumulation,
                    format!(
                        "주가는 MA20 아래지만 외국인이 {}장 순매수했습니다. 역발상 매집 가능성이 있습니다",
                        flow.foreign.round_dp(0)
                    ),
                );
            }
        }

        (RationaleKind::Tier, tier.default_rationale().to_string())
    }
}

fn score_trend(trend: TrendSignal) -> (i32, String) {
    match trend {
        TrendSignal::AboveMa20 => (2, "종가가 MA20 위".to_string()),
        TrendSignal::BelowMa20 => (-2, "종가가 MA20 아래".to_string()),
    }
}

fn score_rsi(badge: RsiBadge) -> (i32, String) {
    match badge {
        RsiBadge::Oversold => (1, "RSI 과매도".to_string()),
        RsiBadge::Overbought => (-1, "RSI 과매수".to_string()),
        RsiBadge::Normal => (0, "RSI 중립".to_string()),
    }
}

fn score_macd(cross: MacdCross) -> (i32, String) {
    match cross {
        MacdCross::Bullish => (1, "MACD가 시그널 위".to_string()),
        MacdCross::Bearish => (-1, "MACD가 시그널 아래".to_string()),
    }
}

fn score_flow(flow: &InstitutionalFlow) -> (i32, String) {
    let combined = flow.foreign_and_trust();
    if flow.foreign > Decimal::ZERO && flow.trust > Decimal::ZERO {
        (2, "외국인·투신 동반 순매수".to_string())
    } else if combined > Decimal::ZERO {
        (1, "외국인+투신 합산 순매수".to_string())
    } else if combined < Decimal::ZERO {
        (-1, "외국인+투신 합산 순매도".to_string())
    } else {
        (0, "외국인+투신 합산 수급 0".to_string())
    }
}

fn score_stop(stop: StopState) -> (i32, String) {
    match stop {
        StopState::Violated => (-2, "ATR 트레일링 스탑 이탈".to_string()),
        StopState::Holding => (1, "ATR 트레일링 스탑 위".to_string()),
    }
}
