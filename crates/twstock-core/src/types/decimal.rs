//! 정밀한 금융 계산을 위한 Decimal 유틸리티.

use rust_decimal::Decimal;

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// 거래량/수량 타입 (주 단위).
pub type Quantity = Decimal;

/// 퍼센트 타입 (5 = 5%).
pub type Percentage = Decimal;

/// 대만 증시 1장(board lot)의 주식 수.
pub const SHARES_PER_LOT: u32 = 1000;

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 퍼센트 문자열로 변환합니다 (값이 이미 % 단위일 때, 예: "5.25%").
    fn to_percentage_string(&self) -> String;

    /// 지정된 소수점 자릿수로 반올림합니다 (사사오입).
    fn round_dp_half_up(&self, dp: u32) -> Decimal;

    /// 주 단위 수량을 장 단위로 변환합니다.
    fn shares_to_lots(&self) -> Decimal;

    /// 기준값 대비 변화율(%)을 계산합니다. 기준값이 0이면 None.
    fn pct_change_from(&self, base: Decimal) -> Option<Decimal>;
}

impl DecimalExt for Decimal {
    fn to_percentage_string(&self) -> String {
        format!("{:.2}%", self)
    }

    fn round_dp_half_up(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    }

    fn shares_to_lots(&self) -> Decimal {
        *self / Decimal::from(SHARES_PER_LOT)
    }

    fn pct_change_from(&self, base: Decimal) -> Option<Decimal> {
        if base.is_zero() {
            None
        } else {
            Some((*self - base) / base * Decimal::ONE_HUNDRED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percentage_string() {
        assert_eq!(dec!(5.254).to_percentage_string(), "5.25%");
    }

    #[test]
    fn test_shares_to_lots() {
        assert_eq!(dec!(600000).shares_to_lots(), dec!(600));
        assert_eq!(dec!(-1500).shares_to_lots(), dec!(-1.5));
    }

    #[test]
    fn test_pct_change() {
        assert_eq!(dec!(110).pct_change_from(dec!(100)), Some(dec!(10)));
        assert_eq!(dec!(110).pct_change_from(Decimal::ZERO), None);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(dec!(2.345).round_dp_half_up(2), dec!(2.35));
    }
}
