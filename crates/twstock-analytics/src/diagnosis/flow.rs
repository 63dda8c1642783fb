//! 외국인 수급 진단.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use twstock_core::InstitutionalFlow;

/// 외국인 순매수 판정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowVerdict {
    /// 순매수 > 500장
    ForeignAccumulation,
    /// 순매수 < -1000장
    HeavyForeignSelling,
    /// 그 외
    WeakParticipation,
}

impl FlowVerdict {
    pub fn label(self) -> &'static str {
        match self {
            FlowVerdict::ForeignAccumulation => "외국인 매집, 수급 지지",
            FlowVerdict::HeavyForeignSelling => "외국인 대량 매도, 매물 부담",
            FlowVerdict::WeakParticipation => "법인 매매 강도 약함",
        }
    }
}

/// 수급 진단 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowDiagnosis {
    /// 외국인 순매수 (장)
    pub foreign_lots: Decimal,
    pub verdict: FlowVerdict,
}

/// 외국인 순매수로 수급을 진단합니다. 수급 데이터가 없으면 `None`.
pub fn diagnose_flow(flow: Option<&InstitutionalFlow>) -> Option<FlowDiagnosis> {
    let foreign = flow?.foreign;
    let verdict = if foreign > dec!(500) {
        FlowVerdict::ForeignAccumulation
    } else if foreign < dec!(-1000) {
        FlowVerdict::HeavyForeignSelling
    } else {
        FlowVerdict::WeakParticipation
    };

    Some(FlowDiagnosis {
        foreign_lots: foreign,
        verdict,
    })
}
