//! 주식 데이터 서비스.
//!
//! 캐시 조회 → 미스 시 업스트림 호출 → 가공 → 캐시 저장 흐름을
//! 리소스 유형(시세/뉴스/검색)별로 조율합니다.
//!
//! # 빈 결과 처리
//!
//! | 리소스 | 업스트림 빈 응답 |
//! |---|---|
//! | 시세 | `DataError::NotFound`, 캐시하지 않음 (다음 요청에서 다시 조회) |
//! | 뉴스/검색 | 빈 목록을 캐시하고 반환 |
//!
//! 업스트림 호출 실패는 캐시하지 않고 그대로 전파하며, 자동 재시도하지 않습니다.
//!
//! # 동시성
//!
//! 같은 키에 대한 동시 미스는 합쳐지지 않습니다. 두 요청 모두 업스트림을
//! 호출할 수 있으며 마지막으로 기록된 값이 남습니다.

use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use stock_core::{AppConfig, NewsArticle, Quote, SearchQuery, SearchResult, Ticker};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{CacheKey, CachePolicy, ResourceKind, StockCaches};
use crate::error::{DataError, Result};
use crate::provider::{FinnhubClient, StockDataProvider};
use crate::shaping::{shape_news, shape_quote, shape_search};

/// 뉴스 조회 기간 범위 (일).
pub const NEWS_DAYS_RANGE: std::ops::RangeInclusive<u32> = 1..=30;

/// 뉴스 조회 기본 기간 (일).
pub const DEFAULT_NEWS_DAYS: u32 = 7;

/// 조회 결과의 출처.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 캐시에서 제공
    Hit,
    /// 업스트림에서 새로 가져와 캐시에 저장
    MissSuccess,
    /// 업스트림이 빈 결과를 반환 (뉴스/검색은 빈 목록이 캐시됨)
    MissEmpty,
}

impl FetchOutcome {
    /// 메트릭 라벨용 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchOutcome::Hit => "hit",
            FetchOutcome::MissSuccess => "miss_success",
            FetchOutcome::MissEmpty => "miss_empty",
        }
    }

    /// 캐시에서 제공되었는지 여부.
    pub fn is_cached(&self) -> bool {
        matches!(self, FetchOutcome::Hit)
    }
}

/// 조회된 데이터와 출처.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub outcome: FetchOutcome,
}

impl<T> Fetched<T> {
    fn hit(data: T) -> Self {
        Self {
            data,
            outcome: FetchOutcome::Hit,
        }
    }

    fn fresh(data: T, empty: bool) -> Self {
        Self {
            data,
            outcome: if empty {
                FetchOutcome::MissEmpty
            } else {
                FetchOutcome::MissSuccess
            },
        }
    }

    /// 캐시에서 제공되었는지 여부.
    pub fn is_cached(&self) -> bool {
        self.outcome.is_cached()
    }
}

/// 주식 데이터 서비스.
pub struct StockDataService {
    provider: Arc<dyn StockDataProvider>,
    caches: StockCaches,
    policy: CachePolicy,
}

impl StockDataService {
    /// Provider와 캐시 정책으로 서비스 생성.
    pub fn new(provider: Arc<dyn StockDataProvider>, policy: CachePolicy) -> Self {
        info!(
            provider = provider.name(),
            quote_ttl_secs = policy.quote_ttl.as_secs(),
            news_ttl_secs = policy.news_ttl.as_secs(),
            search_ttl_secs = policy.search_ttl.as_secs(),
            "Stock data service initialized"
        );

        Self {
            provider,
            caches: StockCaches::default(),
            policy,
        }
    }

    /// 애플리케이션 설정으로 Finnhub 기반 서비스 생성.
    ///
    /// API 키가 없으면 `DataError::ConfigError`를 반환합니다.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = FinnhubClient::from_config(&config.upstream)?;
        Ok(Self::new(Arc::new(client), CachePolicy::from(&config.cache)))
    }

    /// 업스트림 Provider 이름.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// 캐시 정책.
    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// 현재 캐시 항목 수 (만료되었지만 아직 제거되지 않은 항목 포함).
    pub fn cache_entry_count(&self) -> usize {
        self.caches.len()
    }

    /// 모든 캐시 비우기. 삭제된 항목 수를 반환합니다.
    pub fn clear_cache(&self) -> usize {
        let removed = self.caches.clear();
        info!(removed, "Stock cache cleared");
        removed
    }

    /// 만료 항목 일괄 정리.
    pub fn sweep_expired(&self) -> usize {
        self.caches.sweep_expired(&self.policy)
    }

    /// 종목 시세 조회.
    pub async fn get_quote(&self, symbol: &str) -> Result<Fetched<Quote>> {
        let symbol = Ticker::parse(symbol)?;
        let key = CacheKey::quote(&symbol);
        let ttl = self.policy.ttl_for(ResourceKind::Quote);

        if let Some(quote) = self.caches.quotes.get(key.as_str(), ttl) {
            debug!(key = %key, "Cache hit");
            return Ok(Fetched::hit(quote));
        }

        debug!(key = %key, "Cache miss, fetching quote");
        let raw = self
            .provider
            .fetch_quote(&symbol)
            .await
            .inspect_err(|e| warn!(symbol = %symbol, error = %e, "Quote fetch failed"))?;

        let Some(raw) = raw else {
            info!(symbol = %symbol, "No quote data for symbol");
            return Err(DataError::NotFound(symbol.to_string()));
        };

        let quote = shape_quote(&symbol, raw, Utc::now());
        self.caches.quotes.put(key.as_str(), quote.clone());
        Ok(Fetched::fresh(quote, false))
    }

    /// 최근 `days`일간의 기업 뉴스 조회 (최대 10건).
    pub async fn get_news(&self, symbol: &str, days: u32) -> Result<Fetched<Vec<NewsArticle>>> {
        if !NEWS_DAYS_RANGE.contains(&days) {
            return Err(DataError::InvalidInput(format!(
                "days must be between {} and {}",
                NEWS_DAYS_RANGE.start(),
                NEWS_DAYS_RANGE.end()
            )));
        }

        let symbol = Ticker::parse(symbol)?;
        let key = CacheKey::news(&symbol, days);
        let ttl = self.policy.ttl_for(ResourceKind::News);

        if let Some(articles) = self.caches.news.get(key.as_str(), ttl) {
            debug!(key = %key, count = articles.len(), "Cache hit");
            return Ok(Fetched::hit(articles));
        }

        let to = Utc::now().date_naive();
        let from = to - ChronoDuration::days(i64::from(days));

        debug!(key = %key, %from, %to, "Cache miss, fetching news");
        let raw = self
            .provider
            .fetch_news(&symbol, from, to)
            .await
            .inspect_err(|e| warn!(symbol = %symbol, error = %e, "News fetch failed"))?;

        let articles = shape_news(&symbol, raw);
        let empty = articles.is_empty();
        if empty {
            info!(symbol = %symbol, days, "No news for symbol, caching empty result");
        }

        self.caches.news.put(key.as_str(), articles.clone());
        Ok(Fetched::fresh(articles, empty))
    }

    /// 심볼 검색 (주식형만, 최대 10건).
    pub async fn search(&self, query: &str) -> Result<Fetched<Vec<SearchResult>>> {
        let query = SearchQuery::parse(query)?;
        let key = CacheKey::search(&query);
        let ttl = self.policy.ttl_for(ResourceKind::Search);

        if let Some(results) = self.caches.search.get(key.as_str(), ttl) {
            debug!(key = %key, count = results.len(), "Cache hit");
            return Ok(Fetched::hit(results));
        }

        debug!(key = %key, "Cache miss, searching symbols");
        let raw = self
            .provider
            .search_symbols(&query)
            .await
            .inspect_err(|e| warn!(query = %query, error = %e, "Symbol search failed"))?;

        let results = shape_search(raw);
        let empty = results.is_empty();
        if empty {
            info!(query = %query, "No stock-like matches, caching empty result");
        }

        self.caches.search.put(key.as_str(), results.clone());
        Ok(Fetched::fresh(results, empty))
    }

    /// 주기적으로 만료 항목을 정리하는 백그라운드 태스크 시작.
    ///
    /// `shutdown`이 취소되면 종료됩니다.
    pub fn spawn_sweeper(
        self: Arc<Self>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            info!(interval_secs = interval.as_secs(), "Cache sweeper started");

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("Cache sweeper stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let removed = self.sweep_expired();
                        if removed > 0 {
                            debug!(removed, remaining = self.cache_entry_count(), "Expired cache entries swept");
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockProvider;

    fn service(provider: MockProvider) -> (Arc<MockProvider>, StockDataService) {
        let provider = Arc::new(provider);
        let service = StockDataService::new(provider.clone(), CachePolicy::default());
        (provider, service)
    }

    #[test]
    fn test_fetch_outcome_labels() {
        assert_eq!(FetchOutcome::Hit.as_str(), "hit");
        assert!(FetchOutcome::Hit.is_cached());
        assert!(!FetchOutcome::MissEmpty.is_cached());
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = AppConfig::default();
        assert!(matches!(
            StockDataService::from_config(&config),
            Err(DataError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_quote_hit_after_miss() {
        let (provider, service) =
            service(MockProvider::new().with_quote("AAPL", MockProvider::sample_quote(190.0)));

        let first = service.get_quote("aapl").await.unwrap();
        assert_eq!(first.outcome, FetchOutcome::MissSuccess);

        let second = service.get_quote(" AAPL ").await.unwrap();
        assert_eq!(second.outcome, FetchOutcome::Hit);
        assert_eq!(second.data, first.data);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_blank_symbol_is_invalid_input() {
        let (provider, service) = service(MockProvider::new());

        assert!(matches!(
            service.get_quote("   ").await,
            Err(DataError::InvalidInput(_))
        ));
        assert!(matches!(service.search("").await, Err(DataError::InvalidInput(_))));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_news_days_out_of_range() {
        let (provider, service) = service(MockProvider::new());

        for days in [0, 31] {
            assert!(matches!(
                service.get_news("AAPL", days).await,
                Err(DataError::InvalidInput(_))
            ));
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_news_keys_include_days() {
        let (provider, service) = service(
            MockProvider::new().with_news("AAPL", vec![MockProvider::sample_article(1)]),
        );

        service.get_news("AAPL", 7).await.unwrap();
        service.get_news("AAPL", 3).await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(service.cache_entry_count(), 2);
    }

    #[tokio::test]
    async fn test_clear_cache_returns_removed_count() {
        let (provider, service) = service(
            MockProvider::new()
                .with_quote("AAPL", MockProvider::sample_quote(190.0))
                .with_search("apple", vec![MockProvider::sample_search_result("AAPL", "Common Stock")]),
        );

        service.get_quote("AAPL").await.unwrap();
        service.search("Apple").await.unwrap();
        assert_eq!(service.clear_cache(), 2);
        assert_eq!(service.cache_entry_count(), 0);

        service.get_quote("AAPL").await.unwrap();
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_removes_expired_entries() {
        let provider = Arc::new(
            MockProvider::new().with_quote("AAPL", MockProvider::sample_quote(190.0)),
        );
        let service = Arc::new(StockDataService::new(provider, CachePolicy::default()));
        let shutdown = CancellationToken::new();

        service.get_quote("AAPL").await.unwrap();
        let handle = service
            .clone()
            .spawn_sweeper(Duration::from_secs(30), shutdown.clone());

        tokio::time::sleep(Duration::from_secs(61)).await;
        // 스케줄된 sweep이 실행될 기회를 줌
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(service.cache_entry_count(), 0);

        shutdown.cancel();
        handle.await.unwrap();
    }
}
