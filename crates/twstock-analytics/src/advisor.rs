//! 분석 파이프라인 (Advisor).
//!
//! 시계열 → 지표 프레임 → 시그널 → 종합 점수 → 보조 진단 순서로 계산해
//! 직렬화 가능한 리포트를 만듭니다. 호출마다 처음부터 다시 계산하며
//! 호출 간에 공유하는 상태는 없습니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use twstock_core::{
    AnalysisConfig, CoreError, InstitutionalFlow, LookbackPeriod, NewsItem, PriceSeries, Ticker,
};

use crate::diagnosis::{
    assess_valuation, detect_volume_surge, diagnose_bias, diagnose_flow, diagnose_position,
    diagnose_posture, BiasDiagnosis, FlowDiagnosis, PositionDiagnosis, Posture, QuoteOverview,
    Valuation, VolumeSurge,
};
use crate::indicators::{FrameParams, IndicatorEngine, IndicatorFrame, IndicatorError, IndicatorResult};
use crate::scorer::{CompositeScore, CompositeScorer, ScorerParams};
use crate::signals::{SignalEvaluator, SignalInputs, SignalParams, SignalSet};

/// 파이프라인 오류.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// 지표 계산 오류
    #[error("지표 계산 실패: {0}")]
    Indicator(#[from] IndicatorError),

    /// 잘못된 사용자 입력 (보유 단가 등)
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// 파이프라인 결과 타입.
pub type AdvisorResult<T> = Result<T, AdvisorError>;

/// 시세 외 사용자 입력.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisorExtras {
    /// 보유 단가
    pub cost_basis: Option<Decimal>,
    /// 최근 4분기 누적 EPS
    pub eps: Option<Decimal>,
    /// 주가순자산비율
    pub price_to_book: Option<Decimal>,
    /// PER 밴드용 최근 1년 종가 (없으면 입력 시계열 종가)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valuation_history: Option<Vec<Decimal>>,
}

/// 보조 진단 묶음.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub bias: Option<BiasDiagnosis>,
    pub flow: Option<FlowDiagnosis>,
    pub posture: Option<Posture>,
    pub volume: Option<VolumeSurge>,
    pub position: Option<PositionDiagnosis>,
    pub valuation: Option<Valuation>,
}

/// 분석 리포트.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorReport {
    pub ticker: Ticker,
    pub period: LookbackPeriod,
    pub as_of: NaiveDate,
    pub quote: QuoteOverview,
    pub signals: SignalSet,
    pub score: CompositeScore,
    pub institutional: Option<InstitutionalFlow>,
    pub diagnostics: Diagnostics,
    /// 최근 뉴스 (수집 계층에서 채움)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub news: Vec<NewsItem>,
    /// 전체 지표 테이블 (JSON 출력 시 생략 가능)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<IndicatorFrame>,
}

impl AdvisorReport {
    /// 지표 테이블을 제외한 리포트.
    pub fn without_frame(mut self) -> Self {
        self.frame = None;
        self
    }
}

/// 분석 파이프라인.
#[derive(Debug, Default)]
pub struct Advisor {
    engine: IndicatorEngine,
    frame_params: FrameParams,
    evaluator: SignalEvaluator,
    scorer: CompositeScorer,
}

impl Advisor {
    /// 설정으로 파이프라인을 구성합니다.
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            engine: IndicatorEngine::new(),
            frame_params: FrameParams::from(config),
            evaluator: SignalEvaluator::new(SignalParams::from(config)),
            scorer: CompositeScorer::new(ScorerParams::from(config)),
        }
    }

    /// 시계열과 (선택적) 기관 수급으로 리포트를 만듭니다.
    ///
    /// 데이터가 짧아도 실패하지 않습니다. 정의되지 않은 지표는 시그널에서
    /// `None`이 되고 점수에서는 `skipped`로 표시됩니다.
    pub fn analyze(
        &self,
        series: &PriceSeries,
        flow: Option<&InstitutionalFlow>,
    ) -> IndicatorResult<AdvisorReport> {
        let span = twstock_core::analysis_span!("analyze", series.ticker(), series.period());
        let _guard = span.enter();

        let frame = self.engine.frame(series, &self.frame_params)?;
        let inputs = SignalInputs::from_frame(&frame).ok_or(IndicatorError::InsufficientHistory {
            required: 1,
            provided: frame.len(),
        })?;

        let signals = self.evaluator.evaluate(&inputs);
        let score = self.scorer.score(&signals, flow);

        let quote = QuoteOverview::build(series, &frame);
        let price = quote.price;
        let diagnostics = Diagnostics {
            bias: diagnose_bias(price, quote.ma_short, quote.ma_mid),
            flow: diagnose_flow(flow),
            posture: diagnose_posture(price, quote.ma_short, quote.ma_mid, quote.ma_long),
            volume: detect_volume_surge(&series.volumes()),
            position: None,
            valuation: None,
        };

        tracing::info!(
            score = score.score,
            tier = %score.tier,
            skipped = score.skipped.len(),
            "Analysis complete"
        );

        Ok(AdvisorReport {
            ticker: series.ticker().clone(),
            period: series.period(),
            as_of: inputs.date,
            quote,
            signals,
            score,
            institutional: flow.cloned(),
            diagnostics,
            news: Vec::new(),
            frame: Some(frame),
        })
    }

    /// 보유 단가와 가치 지표까지 포함한 리포트를 만듭니다.
    ///
    /// 과거 PER 분포는 `valuation_history`가 있으면 그 종가로, 없으면
    /// 입력 시계열의 종가로 계산합니다.
    pub fn analyze_with(
        &self,
        series: &PriceSeries,
        flow: Option<&InstitutionalFlow>,
        extras: &AdvisorExtras,
    ) -> AdvisorResult<AdvisorReport> {
        let mut report = self.analyze(series, flow)?;
        let price = report.quote.price;

        if let Some(cost) = extras.cost_basis {
            report.diagnostics.position = Some(diagnose_position(price, cost)?);
        }
        let closes = match &extras.valuation_history {
            Some(history) => history.clone(),
            None => series.closes(),
        };
        report.diagnostics.valuation =
            assess_valuation(price, &closes, extras.eps, extras.price_to_book);

        Ok(report)
    }
}
