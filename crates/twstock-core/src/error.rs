//! 핵심 도메인 에러 타입.
//!
//! 시세 수집 경계와 도메인 타입 생성 시 발생하는 에러를 정의합니다.
//! 지표 계산 에러는 `twstock-analytics`의 `IndicatorError`가 담당합니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 시계열 불변식 위반 (날짜 정렬, 가격 범위 등)
    #[error("잘못된 시계열: {0}")]
    InvalidSeries(String),

    /// 종목 코드 파싱 실패
    #[error("잘못된 종목 코드: {0}")]
    InvalidTicker(String),

    /// 조회 기간 파싱 실패
    #[error("지원하지 않는 조회 기간: {0}")]
    InvalidPeriod(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 도메인 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}
