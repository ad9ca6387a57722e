//! 주식 데이터 조회 및 캐싱.
//!
//! 이 crate는 다음을 제공합니다:
//! - 리소스 유형별 TTL 인메모리 캐시
//! - 업스트림 데이터 Provider (Finnhub REST API)
//! - 원시 응답 가공 (필드 매핑, 필터링, 개수 제한)
//! - 캐시와 업스트림을 조율하는 데이터 서비스

pub mod cache;
pub mod error;
pub mod provider;
pub mod service;
pub mod shaping;

pub use error::{DataError, Result};

pub use cache::{CacheKey, CachePolicy, ResourceKind, StockCaches, TtlCache};
pub use provider::{FinnhubClient, StockDataProvider};
pub use service::{FetchOutcome, Fetched, StockDataService, DEFAULT_NEWS_DAYS, NEWS_DAYS_RANGE};
pub use shaping::{ShapingError, MAX_LIST_ITEMS};

#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockProvider;
