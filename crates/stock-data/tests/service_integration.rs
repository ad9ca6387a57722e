//! 데이터 서비스 통합 테스트.
//!
//! 업스트림 호출 수를 세는 Provider로 캐시 히트/미스, 빈 결과 처리,
//! 가공 규칙, 오류 전파를 검증합니다.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use stock_core::{SearchQuery, Ticker};
use stock_data::provider::{RawNewsArticle, RawQuote, RawSearchResult};
use stock_data::{
    CachePolicy, DataError, FetchOutcome, StockDataProvider, StockDataService, MAX_LIST_ITEMS,
};
use tokio::sync::Barrier;

#[derive(Default)]
struct CountingProvider {
    quote: Option<RawQuote>,
    news: Vec<RawNewsArticle>,
    search: Vec<RawSearchResult>,
    fail: AtomicBool,
    gate: Option<Barrier>,
    calls: AtomicUsize,
    news_windows: Mutex<Vec<(NaiveDate, NaiveDate)>>,
}

impl CountingProvider {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> stock_data::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.wait().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(DataError::UpstreamStatus {
                status: 500,
                message: "internal error".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl StockDataProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    async fn fetch_quote(&self, _symbol: &Ticker) -> stock_data::Result<Option<RawQuote>> {
        self.enter().await?;
        Ok(self.quote.clone())
    }

    async fn fetch_news(
        &self,
        _symbol: &Ticker,
        from: NaiveDate,
        to: NaiveDate,
    ) -> stock_data::Result<Vec<RawNewsArticle>> {
        self.enter().await?;
        self.news_windows.lock().unwrap().push((from, to));
        Ok(self.news.clone())
    }

    async fn search_symbols(&self, _query: &SearchQuery) -> stock_data::Result<Vec<RawSearchResult>> {
        self.enter().await?;
        Ok(self.search.clone())
    }
}

fn msft_quote() -> RawQuote {
    RawQuote {
        current: 410.5,
        change: Some(-2.25),
        change_percent: Some(-0.545),
        high: 415.0,
        low: 409.1,
        open: 412.0,
        previous_close: 412.75,
        timestamp: 1_718_900_000,
    }
}

fn article(id: i64) -> RawNewsArticle {
    RawNewsArticle {
        id: Some(id),
        headline: Some(format!("Headline {}", id)),
        summary: Some("summary".to_string()),
        url: Some(format!("https://news.example.com/{}", id)),
        image: Some(format!("https://img.example.com/{}.png", id)),
        source: Some("MarketWatch".to_string()),
        category: Some("company".to_string()),
        datetime: Some(1_717_300_000 - id),
        related: None,
    }
}

fn search_item(symbol: &str, instrument_type: &str) -> RawSearchResult {
    RawSearchResult {
        symbol: Some(symbol.to_string()),
        description: Some("APPLE INC".to_string()),
        instrument_type: Some(instrument_type.to_string()),
        display_symbol: Some(symbol.to_string()),
        currency: None,
    }
}

fn service_with(provider: CountingProvider) -> (Arc<CountingProvider>, StockDataService) {
    let provider = Arc::new(provider);
    let service = StockDataService::new(provider.clone(), CachePolicy::default());
    (provider, service)
}

#[tokio::test]
async fn test_quote_end_to_end_hit_keeps_payload() {
    let (provider, service) = service_with(CountingProvider {
        quote: Some(msft_quote()),
        ..Default::default()
    });

    let first = service.get_quote("msft ").await.unwrap();
    assert_eq!(first.outcome, FetchOutcome::MissSuccess);
    assert_eq!(first.data.symbol, "MSFT");
    assert_eq!(first.data.price, 410.5);

    let second = service.get_quote("MSFT").await.unwrap();
    assert!(second.is_cached());
    assert_eq!(second.data.timestamp, first.data.timestamp);
    assert_eq!(second.data, first.data);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_quote_not_found_is_not_cached() {
    let (provider, service) = service_with(CountingProvider::default());

    for _ in 0..2 {
        let err = service.get_quote("ZZZZZ").await.unwrap_err();
        assert!(matches!(err, DataError::NotFound(ref s) if s == "ZZZZZ"));
    }

    assert_eq!(provider.calls(), 2);
    assert_eq!(service.cache_entry_count(), 0);
}

#[tokio::test]
async fn test_empty_news_and_search_are_cached() {
    let (provider, service) = service_with(CountingProvider::default());

    let news = service.get_news("AAPL", 7).await.unwrap();
    assert!(news.data.is_empty());
    assert_eq!(news.outcome, FetchOutcome::MissEmpty);

    let news = service.get_news("aapl", 7).await.unwrap();
    assert!(news.data.is_empty());
    assert_eq!(news.outcome, FetchOutcome::Hit);

    let search = service.search("nothing").await.unwrap();
    assert_eq!(search.outcome, FetchOutcome::MissEmpty);
    let search = service.search("NOTHING ").await.unwrap();
    assert_eq!(search.outcome, FetchOutcome::Hit);

    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_news_truncated_in_upstream_order() {
    let (provider, service) = service_with(CountingProvider {
        news: (1..=15).map(article).collect(),
        ..Default::default()
    });

    let news = service.get_news(" aapl", 7).await.unwrap();
    assert_eq!(news.data.len(), MAX_LIST_ITEMS);
    assert_eq!(
        news.data.iter().map(|a| a.id).collect::<Vec<_>>(),
        (1..=10).collect::<Vec<_>>()
    );
    assert!(news.data.iter().all(|a| a.related == "AAPL"));

    let windows = provider.news_windows.lock().unwrap();
    let (from, to) = windows[0];
    assert_eq!((to - from).num_days(), 7);
}

#[tokio::test]
async fn test_search_filters_to_stock_like_types() {
    let (_provider, service) = service_with(CountingProvider {
        search: vec![
            search_item("AAPL", "Common Stock"),
            search_item("OANDA:AAPL", "Forex"),
            search_item("APC.DE", "Common Stock"),
        ],
        ..Default::default()
    });

    let results = service.search("Apple").await.unwrap();
    let symbols: Vec<_> = results.data.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAPL", "APC.DE"]);
}

#[tokio::test]
async fn test_fetch_error_propagates_and_is_not_cached() {
    let (provider, service) = service_with(CountingProvider {
        quote: Some(msft_quote()),
        news: vec![article(1)],
        fail: AtomicBool::new(true),
        ..Default::default()
    });

    let err = service.get_quote("MSFT").await.unwrap_err();
    assert!(err.is_fetch_failure());
    let err = service.get_news("MSFT", 7).await.unwrap_err();
    assert!(err.is_fetch_failure());
    assert_eq!(service.cache_entry_count(), 0);

    provider.fail.store(false, Ordering::SeqCst);
    let quote = service.get_quote("MSFT").await.unwrap();
    assert_eq!(quote.outcome, FetchOutcome::MissSuccess);
    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn test_clear_forces_refetch() {
    let (provider, service) = service_with(CountingProvider {
        quote: Some(msft_quote()),
        news: vec![article(1)],
        ..Default::default()
    });

    service.get_quote("MSFT").await.unwrap();
    service.get_news("MSFT", 7).await.unwrap();
    assert_eq!(service.clear_cache(), 2);

    let quote = service.get_quote("MSFT").await.unwrap();
    assert_eq!(quote.outcome, FetchOutcome::MissSuccess);
    assert_eq!(provider.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_quote_expires_after_ttl() {
    let (provider, service) = service_with(CountingProvider {
        quote: Some(msft_quote()),
        ..Default::default()
    });

    service.get_quote("MSFT").await.unwrap();

    tokio::time::advance(Duration::from_secs(59)).await;
    assert!(service.get_quote("MSFT").await.unwrap().is_cached());

    tokio::time::advance(Duration::from_secs(2)).await;
    let refreshed = service.get_quote("MSFT").await.unwrap();
    assert_eq!(refreshed.outcome, FetchOutcome::MissSuccess);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_news_ttl_longer_than_quote_ttl() {
    let (provider, service) = service_with(CountingProvider {
        quote: Some(msft_quote()),
        news: vec![article(1)],
        ..Default::default()
    });

    service.get_quote("MSFT").await.unwrap();
    service.get_news("MSFT", 7).await.unwrap();

    tokio::time::advance(Duration::from_secs(120)).await;
    assert!(!service.get_quote("MSFT").await.unwrap().is_cached());
    assert!(service.get_news("MSFT", 7).await.unwrap().is_cached());
    assert_eq!(provider.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_search_expires_after_ttl() {
    let (provider, service) = service_with(CountingProvider {
        search: vec![search_item("AAPL", "Common Stock")],
        ..Default::default()
    });

    service.search("apple").await.unwrap();

    tokio::time::advance(Duration::from_secs(119)).await;
    assert!(service.search("Apple ").await.unwrap().is_cached());

    tokio::time::advance(Duration::from_secs(2)).await;
    let refreshed = service.search("apple").await.unwrap();
    assert_eq!(refreshed.outcome, FetchOutcome::MissSuccess);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_news_expires_after_ttl() {
    let (provider, service) = service_with(CountingProvider {
        news: vec![article(1)],
        ..Default::default()
    });

    service.get_news("MSFT", 7).await.unwrap();

    tokio::time::advance(Duration::from_secs(299)).await;
    assert!(service.get_news("MSFT", 7).await.unwrap().is_cached());

    tokio::time::advance(Duration::from_secs(2)).await;
    let refreshed = service.get_news("MSFT", 7).await.unwrap();
    assert_eq!(refreshed.outcome, FetchOutcome::MissSuccess);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_concurrent_misses_each_call_upstream() {
    let (provider, service) = service_with(CountingProvider {
        quote: Some(msft_quote()),
        gate: Some(Barrier::new(2)),
        ..Default::default()
    });

    let (a, b) = futures::join!(service.get_quote("MSFT"), service.get_quote("msft"));

    assert_eq!(a.unwrap().outcome, FetchOutcome::MissSuccess);
    assert_eq!(b.unwrap().outcome, FetchOutcome::MissSuccess);
    assert_eq!(provider.calls(), 2);
    assert_eq!(service.cache_entry_count(), 1);
}
