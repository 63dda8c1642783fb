//! 외부 데이터 수집 계층.
//!
//! - [`yahoo`]: Yahoo Finance chart API 일봉 시세
//! - [`finmind`]: FinMind 3대 법인 매매 동향, 종목 뉴스
//! - [`file`]: 로컬 CSV 시세 / JSON 법인 매매 파일
//!
//! 네트워크 요청은 설정된 타임아웃으로 한 번만 시도하며 재시도하지 않습니다.

pub mod file;
pub mod finmind;
pub mod yahoo;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use thiserror::Error;

use twstock_core::{CoreError, InstitutionalRow, LookbackPeriod, NewsItem, PriceSeries, Ticker};

pub use file::{load_csv, load_flow_rows, write_csv};
pub use finmind::{lookback_start, search_link, FinMindClient};
pub use yahoo::YahooChartClient;

/// 데이터 수집 에러.
#[derive(Debug, Error)]
pub enum IngestError {
    /// 네트워크/연결 에러 (타임아웃 포함)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 성공이 아닌 HTTP 상태 코드
    #[error("HTTP 에러 {status}: {body}")]
    Http { status: u16, body: String },

    /// 응답 파싱 에러
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 제공자가 보고한 에러
    #[error("제공자 에러: {0}")]
    Provider(String),

    /// 응답은 정상이지만 데이터가 비어 있음
    #[error("데이터 없음: {0}")]
    Empty(String),

    /// 파일 입출력 에러
    #[error("파일 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 수집한 데이터가 도메인 불변식을 위반
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            IngestError::Parse(err.to_string())
        } else {
            IngestError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::Parse(err.to_string())
    }
}

/// 수집 작업을 위한 Result 타입.
pub type IngestResult<T> = Result<T, IngestError>;

/// 일봉 시세 제공자.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// 종목의 조회 기간 일봉 시계열을 가져옵니다.
    async fn fetch_series(&self, ticker: &Ticker, period: LookbackPeriod)
        -> IngestResult<PriceSeries>;
}

/// 3대 법인 매매 동향 제공자.
#[async_trait]
pub trait FlowSource: Send + Sync {
    /// `start` 이후의 투자자별 매매 행을 가져옵니다.
    async fn fetch_rows(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
    ) -> IngestResult<Vec<InstitutionalRow>>;
}

/// 종목 뉴스 제공자.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// `start` 이후 게시된 뉴스를 정리 전 원본 순서대로 가져옵니다.
    async fn fetch_news(&self, ticker: &Ticker, start: NaiveDate) -> IngestResult<Vec<NewsItem>>;
}

/// 공통 HTTP 클라이언트 생성.
pub(crate) fn http_client(timeout_secs: u64) -> IngestResult<Client> {
    Client::builder()
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| IngestError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))
}
