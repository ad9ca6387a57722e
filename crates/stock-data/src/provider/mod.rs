//! 업스트림 데이터 Provider 모듈.
//!
//! 시세/뉴스/심볼 검색 데이터를 외부 제공자에서 가져오는 계약을 정의합니다.
//!
//! ## 호출 계약
//! - 데이터 있음 → 원시 응답 반환
//! - 데이터 없음 → `None` 또는 빈 목록 (빈 신호)
//! - 전송/인증/파싱 실패 → `Err` (빈 결과로 숨기지 않음)
//!
//! ## Finnhub
//! - `FinnhubClient`: Finnhub REST API 클라이언트 (API 키 필요)

pub mod finnhub;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use finnhub::FinnhubClient;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockProvider;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use stock_core::{SearchQuery, Ticker};

use crate::error::Result;

/// 업스트림 원시 시세.
///
/// 존재하지 않는 심볼에 대해서도 업스트림은 0으로 채운 응답을 반환하므로
/// [`RawQuote::is_empty`]로 빈 신호를 판정합니다.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawQuote {
    /// 현재가
    #[serde(rename = "c")]
    pub current: f64,
    /// 전일 대비 변동
    #[serde(rename = "d")]
    pub change: Option<f64>,
    /// 전일 대비 변동률 (%)
    #[serde(rename = "dp")]
    pub change_percent: Option<f64>,
    /// 고가
    #[serde(rename = "h")]
    pub high: f64,
    /// 저가
    #[serde(rename = "l")]
    pub low: f64,
    /// 시가
    #[serde(rename = "o")]
    pub open: f64,
    /// 전일 종가
    #[serde(rename = "pc")]
    pub previous_close: f64,
    /// 업스트림 시각 (Unix epoch 초)
    #[serde(rename = "t")]
    pub timestamp: i64,
}

impl RawQuote {
    /// 사용할 수 있는 데이터가 없는 응답인지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.current == 0.0 && (self.timestamp == 0 || self.change.is_none())
    }
}

/// 업스트림 원시 뉴스 기사. 필드 누락은 가공 단계에서 판정합니다.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawNewsArticle {
    pub id: Option<i64>,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub source: Option<String>,
    pub category: Option<String>,
    pub datetime: Option<i64>,
    pub related: Option<String>,
}

/// 업스트림 원시 심볼 검색 결과.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawSearchResult {
    pub symbol: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub instrument_type: Option<String>,
    #[serde(rename = "displaySymbol")]
    pub display_symbol: Option<String>,
    pub currency: Option<String>,
}

/// 주식 데이터 Provider trait.
#[async_trait]
pub trait StockDataProvider: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 시세 조회. 데이터가 없으면 `Ok(None)`.
    async fn fetch_quote(&self, symbol: &Ticker) -> Result<Option<RawQuote>>;

    /// 기간 내 기업 뉴스 조회 (`from`, `to`는 `YYYY-MM-DD`로 전달).
    async fn fetch_news(
        &self,
        symbol: &Ticker,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RawNewsArticle>>;

    /// 심볼 검색.
    async fn search_symbols(&self, query: &SearchQuery) -> Result<Vec<RawSearchResult>>;
}
