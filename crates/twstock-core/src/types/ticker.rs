//! 종목 코드 및 시장 구분 정의.
//!
//! - `Board` - 상장 시장 (상장/TWSE, 장외/TPEx)
//! - `Ticker` - Yahoo 형식 종목 코드 (예: 2330.TW, 6488.TWO)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 대만 증시 상장 시장.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Board {
    /// 대만증권거래소 (상장)
    Twse,
    /// 증권거래센터 (장외, 上櫃)
    Tpex,
}

impl Board {
    /// Yahoo Finance 심볼 접미사 반환
    pub fn yahoo_suffix(&self) -> &'static str {
        match self {
            Self::Twse => "TW",
            Self::Tpex => "TWO",
        }
    }
}

/// 분석 대상 종목 코드.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticker {
    /// 종목 번호 (예: "2330", "0050")
    pub code: String,
    /// 상장 시장
    pub board: Board,
}

impl Ticker {
    /// 새 종목 코드를 생성합니다.
    pub fn new(code: impl Into<String>, board: Board) -> Self {
        Self {
            code: code.into(),
            board,
        }
    }

    /// 상장 종목 코드를 생성합니다.
    pub fn twse(code: impl Into<String>) -> Self {
        Self::new(code, Board::Twse)
    }

    /// 법인 매매 데이터 조회용 종목 번호를 반환합니다.
    pub fn stock_id(&self) -> &str {
        &self.code
    }

    /// Yahoo Finance 심볼을 반환합니다.
    pub fn yahoo_symbol(&self) -> String {
        format!("{}.{}", self.code, self.board.yahoo_suffix())
    }
}

impl FromStr for Ticker {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (code, board) = match trimmed.split_once('.') {
            Some((code, suffix)) => {
                let board = match suffix.to_uppercase().as_str() {
                    "TW" => Board::Twse,
                    "TWO" => Board::Tpex,
                    _ => return Err(CoreError::InvalidTicker(s.to_string())),
                };
                (code, board)
            }
            None => (trimmed, Board::Twse),
        };

        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidTicker(s.to_string()));
        }

        Ok(Self::new(code.to_uppercase(), board))
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.yahoo_symbol())
    }
}

/// 기본 관심 종목 목록 (종목 코드, 종목명).
pub fn default_watchlist() -> Vec<(&'static str, &'static str)> {
    vec![
        ("2356.TW", "英業達"),
        ("2618.TW", "長榮航"),
        ("2609.TW", "陽明"),
        ("2352.TW", "佳世達"),
        ("2002.TW", "中鋼"),
        ("2646.TW", "星宇航空"),
        ("0050.TW", "元大台灣50"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_suffix() {
        let ticker: Ticker = "2330.TW".parse().unwrap();
        assert_eq!(ticker.code, "2330");
        assert_eq!(ticker.board, Board::Twse);

        let otc: Ticker = "6488.two".parse().unwrap();
        assert_eq!(otc.board, Board::Tpex);
        assert_eq!(otc.yahoo_symbol(), "6488.TWO");
    }

    #[test]
    fn test_bare_code_defaults_to_twse() {
        let ticker: Ticker = "0050".parse().unwrap();
        assert_eq!(ticker.to_string(), "0050.TW");
        assert_eq!(ticker.stock_id(), "0050");
    }

    #[test]
    fn test_invalid_tickers() {
        assert!("".parse::<Ticker>().is_err());
        assert!("2330.KS".parse::<Ticker>().is_err());
        assert!("23 30".parse::<Ticker>().is_err());
    }

    #[test]
    fn test_watchlist_parses() {
        for (symbol, _) in default_watchlist() {
            assert!(symbol.parse::<Ticker>().is_ok(), "{symbol}");
        }
    }
}
