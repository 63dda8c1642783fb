//! 기술적 진단: MA5 이격도와 종합 국면.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// MA5 이격도 판정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasVerdict {
    /// |이격도| < 0.5%: 5일선 지지 테스트
    TestingSupport,
    /// 종가 < MA20: 월선 아래 약세
    WeakBelowMonthly,
    /// 이격도 > 3%: 과열, 추격 매수 자제
    Overextended,
    /// 그 외: 정배열 안정
    SteadyBullish,
}

impl BiasVerdict {
    pub fn label(self) -> &'static str {
        match self {
            BiasVerdict::TestingSupport => "5일선 근접, 지지 테스트 중",
            BiasVerdict::WeakBelowMonthly => "월선(MA20) 아래 약세 국면",
            BiasVerdict::Overextended => "이격도 과열, 추격 매수 비추천",
            BiasVerdict::SteadyBullish => "지표 안정, 정배열 진행 중",
        }
    }
}

/// MA5 이격도 진단 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasDiagnosis {
    /// (종가 - MA5) / MA5 × 100
    pub bias_pct: Decimal,
    pub verdict: BiasVerdict,
}

/// MA5 이격도를 진단합니다. 규칙은 위에서부터 순서대로 적용됩니다.
///
/// MA5나 MA20이 정의되지 않았거나 MA5가 0이면 `None`.
pub fn diagnose_bias(
    price: Decimal,
    ma_short: Option<Decimal>,
    ma_mid: Option<Decimal>,
) -> Option<BiasDiagnosis> {
    let ma5 = ma_short?;
    let ma20 = ma_mid?;
    if ma5.is_zero() {
        return None;
    }

    let bias_pct = (price - ma5) / ma5 * dec!(100);
    let verdict = if bias_pct.abs() < dec!(0.5) {
        BiasVerdict::TestingSupport
    } else if price < ma20 {
        BiasVerdict::WeakBelowMonthly
    } else if bias_pct > dec!(3) {
        BiasVerdict::Overextended
    } else {
        BiasVerdict::SteadyBullish
    };

    Some(BiasDiagnosis { bias_pct, verdict })
}

/// 종합 국면.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Posture {
    /// 종가 > MA5 그리고 종가 > MA20
    StrongBull,
    /// 종가 < MA60
    Weak,
    /// 그 외 박스권
    RangeBound,
}

impl Posture {
    pub fn label(self) -> &'static str {
        match self {
            Posture::StrongBull => "강세 상승: 보유 유지 또는 5일선 눌림목 추가 매수",
            Posture::Weak => "약세 국면: 관망 또는 엄격한 손절",
            Posture::RangeBound => "박스권 등락: 저점 매수 고점 매도 단기 대응",
        }
    }
}

/// 종합 국면을 판정합니다.
///
/// 강세 판정에는 MA5/MA20이, 약세/박스권 판정에는 MA60이 추가로 필요합니다.
pub fn diagnose_posture(
    price: Decimal,
    ma_short: Option<Decimal>,
    ma_mid: Option<Decimal>,
    ma_long: Option<Decimal>,
) -> Option<Posture> {
    let ma5 = ma_short?;
    let ma20 = ma_mid?;
    if price > ma5 && price > ma20 {
        return Some(Posture::StrongBull);
    }

    let ma60 = ma_long?;
    if price < ma60 {
        Some(Posture::Weak)
    } else {
        Some(Posture::RangeBound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bias_rule_order() {
        // 이격도 0.2% → MA20 아래여도 지지 테스트가 우선
        let d = diagnose_bias(dec!(100.2), Some(dec!(100)), Some(dec!(105))).unwrap();
        assert_eq!(d.verdict, BiasVerdict::TestingSupport);

        let d = diagnose_bias(dec!(98), Some(dec!(100)), Some(dec!(105))).unwrap();
        assert_eq!(d.verdict, BiasVerdict::WeakBelowMonthly);

        let d = diagnose_bias(dec!(104), Some(dec!(100)), Some(dec!(95))).unwrap();
        assert_eq!(d.verdict, BiasVerdict::Overextended);
        assert_eq!(d.bias_pct, dec!(4));

        let d = diagnose_bias(dec!(102), Some(dec!(100)), Some(dec!(95))).unwrap();
        assert_eq!(d.verdict, BiasVerdict::SteadyBullish);
    }

    #[test]
    fn test_bias_unavailable() {
        assert!(diagnose_bias(dec!(100), None, Some(dec!(100))).is_none());
        assert!(diagnose_bias(dec!(100), Some(dec!(100)), None).is_none());
    }

    #[test]
    fn test_posture() {
        assert_eq!(
            diagnose_posture(dec!(110), Some(dec!(105)), Some(dec!(100)), None),
            Some(Posture::StrongBull)
        );
        assert_eq!(
            diagnose_posture(dec!(90), Some(dec!(95)), Some(dec!(100)), Some(dec!(98))),
            Some(Posture::Weak)
        );
        assert_eq!(
            diagnose_posture(dec!(99), Some(dec!(100)), Some(dec!(97)), Some(dec!(95))),
            Some(Posture::RangeBound)
        );
        assert_eq!(
            diagnose_posture(dec!(90), Some(dec!(95)), Some(dec!(100)), None),
            None
        );
    }
}
