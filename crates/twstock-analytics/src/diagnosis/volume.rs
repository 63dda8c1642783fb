//! 거래량 급증 감지.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// 비교 기준이 되는 직전 캔들 수.
const BASELINE_BARS: usize = 5;

/// 거래량 배수 판정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeVerdict {
    /// 배수 >= 2.0
    Surge,
    /// 배수 <= 0.5
    Quiet,
    Normal,
}

impl VolumeVerdict {
    pub fn label(self) -> &'static str {
        match self {
            VolumeVerdict::Surge => "거래량 폭증, 공격 신호",
            VolumeVerdict::Quiet => "거래 한산, 관심 이탈",
            VolumeVerdict::Normal => "평균 수준 거래량",
        }
    }
}

/// 거래량 급증 감지 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSurge {
    /// 최신 거래량 / 직전 5개 평균
    pub ratio: Decimal,
    pub verdict: VolumeVerdict,
}

/// 최신 거래량을 직전 5개 캔들 평균과 비교합니다.
///
/// 캔들이 6개 미만이거나 평균이 0이면 `None`.
pub fn detect_volume_surge(volumes: &[Decimal]) -> Option<VolumeSurge> {
    let (last, rest) = volumes.split_last()?;
    if rest.len() < BASELINE_BARS {
        return None;
    }

    let baseline = &rest[rest.len() - BASELINE_BARS..];
    let average = baseline.iter().sum::<Decimal>() / Decimal::from(BASELINE_BARS);
    if average.is_zero() {
        return None;
    }

    let ratio = *last / average;
    let verdict = if ratio >= dec!(2) {
        VolumeVerdict::Surge
    } else if ratio <= dec!(0.5) {
        VolumeVerdict::Quiet
    } else {
        VolumeVerdict::Normal
    };

    Some(VolumeSurge { ratio, verdict })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surge_uses_previous_five_only() {
        // 첫 값(매우 큼)은 기준에서 제외
        let volumes = [dec!(999999), dec!(100), dec!(100), dec!(100), dec!(100), dec!(100), dec!(200)];
        let surge = detect_volume_surge(&volumes).unwrap();

        assert_eq!(surge.ratio, dec!(2));
        assert_eq!(surge.verdict, VolumeVerdict::Surge);
    }

    #[test]
    fn test_quiet_and_normal() {
        let quiet = [dec!(100), dec!(100), dec!(100), dec!(100), dec!(100), dec!(50)];
        assert_eq!(detect_volume_surge(&quiet).unwrap().verdict, VolumeVerdict::Quiet);

        let normal = [dec!(100), dec!(100), dec!(100), dec!(100), dec!(100), dec!(120)];
        assert_eq!(detect_volume_surge(&normal).unwrap().verdict, VolumeVerdict::Normal);
    }

    #[test]
    fn test_unavailable() {
        assert!(detect_volume_surge(&[dec!(1); 5]).is_none());
        assert!(detect_volume_surge(&[Decimal::ZERO; 6]).is_none());
        assert!(detect_volume_surge(&[]).is_none());
    }
}
