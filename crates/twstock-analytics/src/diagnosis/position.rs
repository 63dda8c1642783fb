//! 보유 포지션 손익 조언.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use twstock_core::{CoreError, CoreResult, DecimalExt};

/// 손익 기반 조언.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionAdvice {
    /// 수익률 >= 15%
    TakePartialProfit,
    /// 수익률 <= -8%
    ConsiderStopLoss,
    Hold,
}

impl PositionAdvice {
    pub fn label(self) -> &'static str {
        match self {
            PositionAdvice::TakePartialProfit => "수익 15% 이상, 일부 차익 실현 권장",
            PositionAdvice::ConsiderStopLoss => "손실 8% 도달, 손절 검토",
            PositionAdvice::Hold => "보유 유지",
        }
    }
}

/// 포지션 진단 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionDiagnosis {
    pub cost: Decimal,
    /// (현재가 - 단가) / 단가 × 100
    pub pl_pct: Decimal,
    pub advice: PositionAdvice,
}

/// 보유 단가 대비 손익을 진단합니다.
///
/// # 에러
/// 단가가 0 이하이면 `CoreError::InvalidInput`.
pub fn diagnose_position(price: Decimal, cost: Decimal) -> CoreResult<PositionDiagnosis> {
    let pl_pct = price
        .pct_change_from(cost)
        .filter(|_| cost > Decimal::ZERO)
        .ok_or_else(|| CoreError::InvalidInput(format!("보유 단가는 0보다 커야 합니다: {}", cost)))?;

    let advice = if pl_pct >= dec!(15) {
        PositionAdvice::TakePartialProfit
    } else if pl_pct <= dec!(-8) {
        PositionAdvice::ConsiderStopLoss
    } else {
        PositionAdvice::Hold
    };

    Ok(PositionDiagnosis {
        cost,
        pl_pct,
        advice,
    })
}
