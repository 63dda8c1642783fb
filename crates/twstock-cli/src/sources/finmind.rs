//! FinMind 데이터셋 클라이언트 (3대 법인 매매 동향, 종목 뉴스).
//!
//! `GET {base}/api/v4/data?dataset=..&data_id=..&start_date=..`
//!
//! - `TaiwanStockInstitutionalInvestorsBuySell`: 투자자별 매수/매도 주식 수
//! - `TaiwanStockNews`: 종목 관련 뉴스 헤드라인
//!
//! 토큰은 설정(`sources.finmind_token`) 또는 환경 변수(`TWSTOCK__SOURCES__FINMIND_TOKEN`)로만
//! 주입되며, 없으면 익명으로 호출합니다.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Asia::Taipei;
use reqwest::{Client, Url};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use twstock_core::{InstitutionalRow, NewsItem, SourcesConfig, Ticker};

use super::{http_client, FlowSource, IngestError, IngestResult, NewsSource};

const INSTITUTIONAL_DATASET: &str = "TaiwanStockInstitutionalInvestorsBuySell";
const NEWS_DATASET: &str = "TaiwanStockNews";
const SEARCH_URL: &str = "https://www.google.com/search";

/// FinMind API 응답 구조체
#[derive(Debug, Deserialize)]
struct FinMindResponse<T> {
    #[serde(default)]
    msg: String,
    status: u16,
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct FinMindRow {
    date: NaiveDate,
    name: String,
    buy: Decimal,
    sell: Decimal,
}

impl From<FinMindRow> for InstitutionalRow {
    fn from(row: FinMindRow) -> Self {
        Self {
            date: row.date,
            name: row.name,
            buy: row.buy,
            sell: row.sell,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FinMindNewsRow {
    date: String,
    title: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

impl FinMindNewsRow {
    /// 게시 시각을 해석할 수 없는 행은 버립니다.
    fn into_item(self) -> Option<NewsItem> {
        let date = NaiveDateTime::parse_from_str(&self.date, "%Y-%m-%d %H:%M:%S")
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            });
        if date.is_none() {
            debug!(date = %self.date, "Skipping news row with unparsable date");
        }

        Some(NewsItem {
            date: date?,
            title: self.title,
            link: self.link,
            source: self.source,
        })
    }
}

/// 원문 링크가 없는 뉴스의 검색 링크.
pub fn search_link(title: &str) -> Option<String> {
    Url::parse_with_params(SEARCH_URL, &[("q", title)])
        .ok()
        .map(String::from)
}

/// FinMind 클라이언트.
pub struct FinMindClient {
    client: Client,
    base_url: String,
    token: Option<SecretString>,
}

impl FinMindClient {
    /// 설정의 기본 URL, 토큰, 타임아웃으로 클라이언트를 생성합니다.
    pub fn new(config: &SourcesConfig) -> IngestResult<Self> {
        let token = config
            .finmind_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(|t| SecretString::from(t.to_string()));

        Ok(Self {
            client: http_client(config.timeout_secs)?,
            base_url: config.finmind_base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// 토큰 설정 여부.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

impl FinMindClient {
    /// 데이터셋 한 종류를 조회합니다.
    async fn fetch_dataset<T: DeserializeOwned>(
        &self,
        dataset: &str,
        ticker: &Ticker,
        start: NaiveDate,
    ) -> IngestResult<Vec<T>> {
        let url = format!("{}/api/v4/data", self.base_url);
        let start_date = start.format("%Y-%m-%d").to_string();
        debug!(
            url = %url,
            dataset,
            stock_id = ticker.stock_id(),
            start = %start_date,
            "Fetching from FinMind"
        );

        let mut request = self.client.get(&url).query(&[
            ("dataset", dataset),
            ("data_id", ticker.stock_id()),
            ("start_date", start_date.as_str()),
        ]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(IngestError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: FinMindResponse<T> = serde_json::from_str(&body)?;
        if parsed.status != 200 {
            return Err(IngestError::Provider(format!(
                "status {}: {}",
                parsed.status, parsed.msg
            )));
        }
        Ok(parsed.data)
    }
}

impl std::fmt::Debug for FinMindClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinMindClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[async_trait]
impl FlowSource for FinMindClient {
    async fn fetch_rows(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
    ) -> IngestResult<Vec<InstitutionalRow>> {
        let data: Vec<FinMindRow> = self
            .fetch_dataset(INSTITUTIONAL_DATASET, ticker, start)
            .await?;

        let rows: Vec<InstitutionalRow> = data.into_iter().map(Into::into).collect();
        info!(ticker = %ticker, rows = rows.len(), "Downloaded institutional rows from FinMind");
        Ok(rows)
    }
}

#[async_trait]
impl NewsSource for FinMindClient {
    async fn fetch_news(&self, ticker: &Ticker, start: NaiveDate) -> IngestResult<Vec<NewsItem>> {
        let data: Vec<FinMindNewsRow> = self.fetch_dataset(NEWS_DATASET, ticker, start).await?;

        let items: Vec<NewsItem> = data.into_iter().filter_map(FinMindNewsRow::into_item).collect();
        info!(ticker = %ticker, items = items.len(), "Downloaded news from FinMind");
        Ok(items)
    }
}

/// 대만 현지 날짜 기준 조회 시작일 (`now`의 대만 날짜 - `days`일).
pub fn lookback_start(now: DateTime<Utc>, days: i64) -> NaiveDate {
    now.with_timezone(&Taipei).date_naive() - Duration::days(days)
}
