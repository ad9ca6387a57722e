//! 테스트용 인메모리 Provider.
//!
//! 네트워크 없이 서비스/라우터 테스트를 구성할 때 사용합니다.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use stock_core::{SearchQuery, Ticker};

use super::{RawNewsArticle, RawQuote, RawSearchResult, StockDataProvider};
use crate::error::{DataError, Result};

/// 고정 응답을 돌려주는 Provider. 호출 횟수를 기록합니다.
#[derive(Debug, Default)]
pub struct MockProvider {
    quotes: HashMap<String, RawQuote>,
    news: HashMap<String, Vec<RawNewsArticle>>,
    search: HashMap<String, Vec<RawSearchResult>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 심볼의 시세 등록.
    pub fn with_quote(mut self, symbol: &str, quote: RawQuote) -> Self {
        self.quotes.insert(symbol.to_uppercase(), quote);
        self
    }

    /// 심볼의 뉴스 등록.
    pub fn with_news(mut self, symbol: &str, articles: Vec<RawNewsArticle>) -> Self {
        self.news.insert(symbol.to_uppercase(), articles);
        self
    }

    /// 검색어의 결과 등록.
    pub fn with_search(mut self, query: &str, results: Vec<RawSearchResult>) -> Self {
        self.search.insert(query.to_lowercase(), results);
        self
    }

    /// 이후 모든 호출을 전송 오류로 실패시킬지 설정.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// 지금까지의 업스트림 호출 수.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(DataError::FetchError("mock upstream unavailable".to_string()));
        }
        Ok(())
    }

    /// 정상 시세 응답 예시.
    pub fn sample_quote(price: f64) -> RawQuote {
        RawQuote {
            current: price,
            change: Some(1.5),
            change_percent: Some(0.5),
            high: price + 2.0,
            low: price - 2.0,
            open: price - 1.0,
            previous_close: price - 1.5,
            timestamp: 1_718_900_000,
        }
    }

    /// 정상 뉴스 기사 예시.
    pub fn sample_article(id: i64) -> RawNewsArticle {
        RawNewsArticle {
            id: Some(id),
            headline: Some(format!("Headline {}", id)),
            summary: Some(format!("Summary {}", id)),
            url: Some(format!("https://news.example.com/{}", id)),
            image: None,
            source: Some("Reuters".to_string()),
            category: Some("company".to_string()),
            datetime: Some(1_717_200_000 + id),
            related: None,
        }
    }

    /// 검색 결과 예시.
    pub fn sample_search_result(symbol: &str, instrument_type: &str) -> RawSearchResult {
        RawSearchResult {
            symbol: Some(symbol.to_string()),
            description: Some(format!("{} INC", symbol)),
            instrument_type: Some(instrument_type.to_string()),
            display_symbol: Some(symbol.to_string()),
            currency: Some("USD".to_string()),
        }
    }
}

#[async_trait]
impl StockDataProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_quote(&self, symbol: &Ticker) -> Result<Option<RawQuote>> {
        self.record_call()?;
        Ok(self.quotes.get(symbol.as_str()).cloned())
    }

    async fn fetch_news(
        &self,
        symbol: &Ticker,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<RawNewsArticle>> {
        self.record_call()?;
        Ok(self.news.get(symbol.as_str()).cloned().unwrap_or_default())
    }

    async fn search_symbols(&self, query: &SearchQuery) -> Result<Vec<RawSearchResult>> {
        self.record_call()?;
        Ok(self.search.get(query.as_str()).cloned().unwrap_or_default())
    }
}
