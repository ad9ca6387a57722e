//! 캐싱 레이어.
//!
//! - TTL 캐시: 키별 저장 시각 기반 인메모리 캐시
//! - 캐시 키: 리소스 유형 + 정규화 파라미터
//! - 리소스별 캐시 묶음: 시세/뉴스/검색을 타입별로 분리 보관

pub mod key;
pub mod ttl;

pub use key::{CacheKey, ResourceKind};
pub use ttl::{CacheEntry, TtlCache};

use std::time::Duration;

use stock_core::{CacheConfig, NewsArticle, Quote, SearchResult};

/// 리소스 유형별 TTL 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// 시세 TTL (기본 60초)
    pub quote_ttl: Duration,
    /// 뉴스 TTL (기본 300초)
    pub news_ttl: Duration,
    /// 검색 TTL (기본 120초)
    pub search_ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            quote_ttl: Duration::from_secs(60),
            news_ttl: Duration::from_secs(300),
            search_ttl: Duration::from_secs(120),
        }
    }
}

impl From<&CacheConfig> for CachePolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            quote_ttl: config.quote_ttl(),
            news_ttl: config.news_ttl(),
            search_ttl: config.search_ttl(),
        }
    }
}

impl CachePolicy {
    /// 리소스 유형의 TTL.
    pub fn ttl_for(&self, kind: ResourceKind) -> Duration {
        match kind {
            ResourceKind::Quote => self.quote_ttl,
            ResourceKind::News => self.news_ttl,
            ResourceKind::Search => self.search_ttl,
        }
    }
}

/// 리소스 유형별 타입 캐시 묶음.
///
/// 값 타입이 리소스마다 고정되어 있어 조회 시 타입 불일치가 생기지 않습니다.
#[derive(Debug, Default)]
pub struct StockCaches {
    pub quotes: TtlCache<Quote>,
    pub news: TtlCache<Vec<NewsArticle>>,
    pub search: TtlCache<Vec<SearchResult>>,
}

impl StockCaches {
    /// 전체 항목 수 (만료되었지만 제거되지 않은 항목 포함).
    pub fn len(&self) -> usize {
        self.quotes.len() + self.news.len() + self.search.len()
    }

    /// 모든 캐시가 비어 있는지 확인.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 모든 캐시 비우기. 삭제된 항목 수를 반환합니다.
    pub fn clear(&self) -> usize {
        self.quotes.clear() + self.news.clear() + self.search.clear()
    }

    /// 정책의 TTL로 만료 항목을 일괄 정리합니다.
    pub fn sweep_expired(&self, policy: &CachePolicy) -> usize {
        self.quotes.sweep_expired(policy.quote_ttl)
            + self.news.sweep_expired(policy.news_ttl)
            + self.search.sweep_expired(policy.search_ttl)
    }
}
