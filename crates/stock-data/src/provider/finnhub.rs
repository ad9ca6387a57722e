//! Finnhub REST API 클라이언트.
//!
//! 시세(`/quote`), 기업 뉴스(`/company-news`), 심볼 검색(`/search`)을 조회합니다.
//!
//! # API 키 관리
//!
//! API 키는 `X-Finnhub-Token` 헤더로 전달되며, 설정의 `upstream.api_key` 또는
//! `FINNHUB_API_KEY` 환경 변수에서 읽습니다. 키가 없으면 클라이언트를 만들 수 없습니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use stock_data::provider::FinnhubClient;
//!
//! let client = FinnhubClient::from_config(&config.upstream)?;
//! let quote = client.fetch_quote(&Ticker::parse("MSFT")?).await?;
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use stock_core::{SearchQuery, Ticker, UpstreamConfig, API_KEY_ENV};
use tracing::{debug, warn};

use super::{RawNewsArticle, RawQuote, RawSearchResult, StockDataProvider};
use crate::error::{DataError, Result};

/// 업스트림 날짜 파라미터 형식.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Finnhub REST API 클라이언트.
#[derive(Clone)]
pub struct FinnhubClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

/// 심볼 검색 응답 래퍼 (`{"count": N, "result": [...]}`).
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<serde_json::Value>,
}

impl FinnhubClient {
    /// Finnhub 기본 URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://finnhub.io/api/v1";

    /// 새 클라이언트 생성.
    ///
    /// 빈 API 키는 `DataError::ConfigError`를 반환합니다.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(DataError::ConfigError(format!(
                "{} is not set",
                API_KEY_ENV
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::ConfigError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            api_key: SecretString::from(api_key.trim().to_string()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// 업스트림 설정에서 클라이언트 생성.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| DataError::ConfigError(format!("{} is not set", API_KEY_ENV)))?;

        Self::new(api_key, config.base_url.clone(), config.timeout())
    }

    /// 기본 URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET 요청 실행 후 JSON 역직렬화.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);

        debug!(url = %url, "Finnhub API request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .header("X-Finnhub-Token", self.api_key.expose_secret())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(path, status = status.as_u16(), "Finnhub API returned error status");
            return Err(DataError::UpstreamStatus {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

/// 항목 단위로 역직렬화하여 형식이 잘못된 항목만 건너뜁니다.
fn decode_items<T: DeserializeOwned>(items: Vec<serde_json::Value>, resource: &str) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<T>(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(resource, index, error = %e, "Skipping malformed upstream item");
                None
            }
        })
        .collect()
}

#[async_trait]
impl StockDataProvider for FinnhubClient {
    fn name(&self) -> &str {
        "finnhub"
    }

    async fn fetch_quote(&self, symbol: &Ticker) -> Result<Option<RawQuote>> {
        let quote: RawQuote = self.get_json("quote", &[("symbol", symbol.as_str())]).await?;

        if quote.is_empty() {
            debug!(symbol = %symbol, "Finnhub returned empty quote");
            return Ok(None);
        }

        Ok(Some(quote))
    }

    async fn fetch_news(
        &self,
        symbol: &Ticker,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RawNewsArticle>> {
        let from = from.format(DATE_FORMAT).to_string();
        let to = to.format(DATE_FORMAT).to_string();

        let items: Vec<serde_json::Value> = self
            .get_json(
                "company-news",
                &[
                    ("symbol", symbol.as_str()),
                    ("from", from.as_str()),
                    ("to", to.as_str()),
                ],
            )
            .await?;

        Ok(decode_items(items, "news"))
    }

    async fn search_symbols(&self, query: &SearchQuery) -> Result<Vec<RawSearchResult>> {
        let response: SearchResponse = self.get_json("search", &[("q", query.as_str())]).await?;

        Ok(decode_items(response.result, "search"))
    }
}
