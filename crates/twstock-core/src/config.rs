//! 설정 관리.
//!
//! 분석 임계값, 외부 데이터 소스, 투자자 분류 매핑, 로깅 설정을 정의합니다.
//! 모든 섹션은 `Default`를 구현하므로 설정 파일 없이도 동작합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::CoreResult;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 지표/신호/점수 계산 설정
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// 외부 데이터 소스 설정
    #[serde(default)]
    pub sources: SourcesConfig,
    /// 투자자 분류 매핑
    #[serde(default)]
    pub investor_classes: InvestorClassConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

/// RSI 평균 하락폭이 0일 때의 처리 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroLossPolicy {
    /// RSI = 100으로 포화
    #[default]
    Saturate,
    /// RSI = 50 (중립)으로 처리
    Neutral,
}

/// 분석 설정.
///
/// 이동평균 기간, RSI/MACD/ATR 파라미터와 신호 임계값을 담습니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 단기 이동평균 기간 (MA5)
    pub ma_short: usize,
    /// 중기 이동평균 기간 (MA20, 월선)
    pub ma_mid: usize,
    /// 장기 이동평균 기간 (MA60, 분기선)
    pub ma_long: usize,
    /// RSI 기간
    pub rsi_period: usize,
    /// RSI 평균 하락폭 0 처리 정책
    pub rsi_zero_loss: ZeroLossPolicy,
    /// MACD 단기 EMA span
    pub macd_fast: usize,
    /// MACD 장기 EMA span
    pub macd_slow: usize,
    /// MACD 시그널 span
    pub macd_signal: usize,
    /// ATR 기간
    pub atr_period: usize,
    /// ATR 트레일링 스탑 최고가 기간
    pub stop_lookback: usize,
    /// ATR 트레일링 스탑 배수
    pub stop_atr_multiplier: Decimal,
    /// 전고점 계산 기간
    pub resistance_lookback: usize,
    /// 전고점 근접 판정 비율 (%)
    pub resistance_proximity_pct: Decimal,
    /// RSI 극단 과매수 임계값
    pub rsi_extreme_overbought: Decimal,
    /// RSI 극단 과매도 임계값
    pub rsi_extreme_oversold: Decimal,
    /// RSI 중립 구간 하한
    pub rsi_neutral_low: Decimal,
    /// RSI 중립 구간 상한
    pub rsi_neutral_high: Decimal,
    /// RSI 과매수 배지 임계값 (점수 계산에도 사용)
    pub rsi_overbought: Decimal,
    /// RSI 과매도 배지 임계값 (점수 계산에도 사용)
    pub rsi_oversold: Decimal,
    /// 역발상 매집 판정 외국인 순매수 임계값 (장)
    pub contrarian_foreign_lots: Decimal,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ma_short: 5,
            ma_mid: 20,
            ma_long: 60,
            rsi_period: 14,
            rsi_zero_loss: ZeroLossPolicy::Saturate,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            atr_period: 14,
            stop_lookback: 20,
            stop_atr_multiplier: dec!(2),
            resistance_lookback: 60,
            resistance_proximity_pct: dec!(2),
            rsi_extreme_overbought: dec!(75),
            rsi_extreme_oversold: dec!(25),
            rsi_neutral_low: dec!(45),
            rsi_neutral_high: dec!(55),
            rsi_overbought: dec!(70),
            rsi_oversold: dec!(30),
            contrarian_foreign_lots: dec!(500),
        }
    }
}

/// 외부 데이터 소스 설정.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Yahoo Finance chart API 기본 URL
    pub yahoo_base_url: String,
    /// FinMind API 기본 URL
    pub finmind_base_url: String,
    /// FinMind API 토큰 (없으면 익명 호출)
    pub finmind_token: Option<String>,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 법인 매매 조회 기간 (일)
    pub institutional_lookback_days: i64,
    /// 뉴스 조회 기간 (일)
    pub news_lookback_days: i64,
    /// 리포트에 표시할 최대 뉴스 수
    pub news_limit: usize,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            yahoo_base_url: "https://query1.finance.yahoo.com".to_string(),
            finmind_base_url: "https://api.finmindtrade.com".to_string(),
            finmind_token: None,
            timeout_secs: 10,
            institutional_lookback_days: 10,
            news_lookback_days: 5,
            news_limit: 8,
        }
    }
}

impl fmt::Debug for SourcesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourcesConfig")
            .field("yahoo_base_url", &self.yahoo_base_url)
            .field("finmind_base_url", &self.finmind_base_url)
            .field(
                "finmind_token",
                &self.finmind_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("institutional_lookback_days", &self.institutional_lookback_days)
            .field("news_lookback_days", &self.news_lookback_days)
            .field("news_limit", &self.news_limit)
            .finish()
    }
}

/// 투자자 분류 매핑.
///
/// 데이터 제공자의 투자자 명칭 중 어떤 항목을 외국인/투신/자영업자로 합산할지 정의합니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InvestorClassConfig {
    /// 외국인으로 합산할 명칭
    pub foreign: Vec<String>,
    /// 투신으로 합산할 명칭
    pub trust: Vec<String>,
    /// 자영업자(딜러)로 합산할 명칭
    pub dealer: Vec<String>,
}

impl Default for InvestorClassConfig {
    fn default() -> Self {
        Self {
            foreign: vec![
                "Foreign_Investor".to_string(),
                "Foreign_Investor_Excluded_Foreign_Investment_Trust".to_string(),
                "Foreign_Dealer_Self".to_string(),
            ],
            trust: vec!["Investment_Trust".to_string()],
            dealer: vec![
                "Dealer_Self".to_string(),
                "Dealer_self".to_string(),
                "Dealer_proprietary".to_string(),
                "Dealer_Hedge".to_string(),
                "Dealer_Hedging".to_string(),
            ],
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값 위에 환경 변수만 적용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("TWSTOCK")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
