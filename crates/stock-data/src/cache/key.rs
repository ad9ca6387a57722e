//! 캐시 키 생성.
//!
//! 리소스 유형과 정규화된 파라미터로 키를 만듭니다.
//!
//! | 리소스 | 형식 |
//! |---|---|
//! | 시세 | `quote_{SYMBOL}` |
//! | 뉴스 | `news_{SYMBOL}_{days}` |
//! | 검색 | `search_{query}` |

use std::fmt;

use stock_core::{SearchQuery, Ticker};

/// 캐시되는 리소스 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Quote,
    News,
    Search,
}

impl ResourceKind {
    /// 로그/메트릭 라벨용 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Quote => "quote",
            ResourceKind::News => "news",
            ResourceKind::Search => "search",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 정규화된 캐시 키.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// 시세 키.
    pub fn quote(symbol: &Ticker) -> Self {
        Self(format!("quote_{}", symbol))
    }

    /// 뉴스 키 (심볼 + 조회 일수).
    pub fn news(symbol: &Ticker, days: u32) -> Self {
        Self(format!("news_{}_{}", symbol, days))
    }

    /// 검색 키.
    pub fn search(query: &SearchQuery) -> Self {
        Self(format!("search_{}", query))
    }

    /// 키 문자열.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shapes() {
        let aapl = Ticker::parse("aapl").unwrap();
        assert_eq!(CacheKey::quote(&aapl).as_str(), "quote_AAPL");
        assert_eq!(CacheKey::news(&aapl, 7).as_str(), "news_AAPL_7");

        let query = SearchQuery::parse("Apple").unwrap();
        assert_eq!(CacheKey::search(&query).as_str(), "search_apple");
    }

    #[test]
    fn test_equivalent_inputs_share_key() {
        let a = Ticker::parse(" aapl ").unwrap();
        let b = Ticker::parse("AAPL").unwrap();
        assert_eq!(CacheKey::quote(&a), CacheKey::quote(&b));
        assert_eq!(CacheKey::news(&a, 3), CacheKey::news(&b, 3));
        assert_ne!(CacheKey::news(&a, 3), CacheKey::news(&b, 4));

        let q1 = SearchQuery::parse("Apple").unwrap();
        let q2 = SearchQuery::parse("apple ").unwrap();
        assert_eq!(CacheKey::search(&q1), CacheKey::search(&q2));
    }
}
