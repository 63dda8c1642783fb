//! 가치 진단 (과거 PER 밴드 / PBR).
//!
//! EPS가 양수이면 과거 종가로 PER 분포를 만들어 저평가/적정/고평가 가격대를
//! 계산하고, EPS가 없거나 적자이면 PBR로 대체합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// 저평가 가격 = EPS × 평균 PER × 0.85
const CHEAP_FACTOR: Decimal = dec!(0.85);
/// 고평가 가격 = EPS × 평균 PER × 1.15
const EXPENSIVE_FACTOR: Decimal = dec!(1.15);

/// PER 밴드 위치 판정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeVerdict {
    Cheap,
    Fair,
    Expensive,
}

impl PeVerdict {
    pub fn label(self) -> &'static str {
        match self {
            PeVerdict::Cheap => "저평가 구간",
            PeVerdict::Fair => "적정 범위",
            PeVerdict::Expensive => "고평가 구간",
        }
    }
}

/// 과거 PER 밴드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeBand {
    pub eps: Decimal,
    pub current_pe: Decimal,
    pub avg_pe: Decimal,
    pub min_pe: Decimal,
    pub max_pe: Decimal,
    pub cheap_price: Decimal,
    pub fair_price: Decimal,
    pub expensive_price: Decimal,
    pub verdict: PeVerdict,
    /// 연중 최저(0) ~ 최고(1) 사이 위치
    pub band_position: Decimal,
}

/// PBR 대체 진단.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceToBook {
    pub pb: Decimal,
    pub below_book: bool,
}

/// 가치 진단 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Valuation {
    PeBand(PeBand),
    PriceToBook(PriceToBook),
}

/// 가치 진단을 수행합니다.
///
/// - EPS > 0 이고 과거 종가가 1개 이상이면 PER 밴드
/// - 그 외에 PBR이 있으면 PBR 진단
/// - 둘 다 불가능하면 `None`
pub fn assess_valuation(
    price: Decimal,
    history: &[Decimal],
    eps: Option<Decimal>,
    pb: Option<Decimal>,
) -> Option<Valuation> {
    if let Some(eps) = eps.filter(|e| *e > Decimal::ZERO) {
        if let Some(band) = pe_band(price, history, eps) {
            return Some(Valuation::PeBand(band));
        }
    }

    pb.map(|pb| {
        Valuation::PriceToBook(PriceToBook {
            pb,
            below_book: pb < Decimal::ONE,
        })
    })
}

fn pe_band(price: Decimal, history: &[Decimal], eps: Decimal) -> Option<PeBand> {
    let pes: Vec<Decimal> = history.iter().map(|close| *close / eps).collect();
    let min_pe = pes.iter().min().copied()?;
    let max_pe = pes.iter().max().copied()?;
    let avg_pe = pes.iter().sum::<Decimal>() / Decimal::from(pes.len());

    let fair_price = eps * avg_pe;
    let cheap_price = eps * avg_pe * CHEAP_FACTOR;
    let expensive_price = eps * avg_pe * EXPENSIVE_FACTOR;

    let verdict = if price <= cheap_price {
        PeVerdict::Cheap
    } else if price >= expensive_price {
        PeVerdict::Expensive
    } else {
        PeVerdict::Fair
    };

    let band_position = if max_pe == min_pe {
        dec!(0.5)
    } else {
        let raw = (price - min_pe * eps) / ((max_pe - min_pe) * eps);
        raw.max(Decimal::ZERO).min(Decimal::ONE)
    };

    Some(PeBand {
        eps,
        current_pe: price / eps,
        avg_pe,
        min_pe,
        max_pe,
        cheap_price,
        fair_price,
        expensive_price,
        verdict,
        band_position,
    })
}
