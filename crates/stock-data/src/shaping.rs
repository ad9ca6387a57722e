//! 업스트림 원시 응답을 응답 모델로 가공.
//!
//! - 시세: 필드 매핑 (1건)
//! - 뉴스: 업스트림 순서 유지, 최대 10건, 모든 기사에 `related = SYMBOL`
//! - 검색: 주식형 상품만 남기고 최대 10건
//!
//! 목록 가공 중 개별 항목 오류는 해당 항목만 건너뛰고 경고 로그를 남깁니다.

use chrono::{DateTime, Utc};
use stock_core::{is_stock_like, NewsArticle, Quote, SearchResult, Ticker};
use thiserror::Error;
use tracing::warn;

use crate::provider::{RawNewsArticle, RawQuote, RawSearchResult};

/// 목록 응답 최대 항목 수.
pub const MAX_LIST_ITEMS: usize = 10;

/// 항목 단위 가공 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapingError {
    /// 필수 필드 누락
    #[error("{resource} item is missing required field `{field}`")]
    MissingField {
        resource: &'static str,
        field: &'static str,
    },
}

fn required<T>(value: Option<T>, resource: &'static str, field: &'static str) -> Result<T, ShapingError> {
    value.ok_or(ShapingError::MissingField { resource, field })
}

fn required_text(
    value: Option<String>,
    resource: &'static str,
    field: &'static str,
) -> Result<String, ShapingError> {
    required(value.filter(|s| !s.trim().is_empty()), resource, field)
}

/// 원시 시세를 [`Quote`]로 변환합니다.
///
/// `fetched_at`은 업스트림에서 가져온 시각이며 캐시 히트 시 그대로 유지됩니다.
pub fn shape_quote(symbol: &Ticker, raw: RawQuote, fetched_at: DateTime<Utc>) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        price: raw.current,
        change: raw.change.unwrap_or_default(),
        change_percent: raw.change_percent.unwrap_or_default(),
        high: raw.high,
        low: raw.low,
        open: raw.open,
        previous_close: raw.previous_close,
        timestamp: fetched_at,
    }
}

/// 뉴스 기사 1건 변환.
pub fn shape_article(symbol: &Ticker, raw: RawNewsArticle) -> Result<NewsArticle, ShapingError> {
    const RESOURCE: &str = "news";

    Ok(NewsArticle {
        id: required(raw.id, RESOURCE, "id")?,
        headline: required_text(raw.headline, RESOURCE, "headline")?,
        url: required_text(raw.url, RESOURCE, "url")?,
        datetime: required(raw.datetime, RESOURCE, "datetime")?,
        summary: raw.summary.unwrap_or_default(),
        image: raw.image.filter(|s| !s.trim().is_empty()),
        source: raw.source.unwrap_or_default(),
        category: raw.category.unwrap_or_default(),
        related: symbol.to_string(),
    })
}

/// 뉴스 목록 변환 (순서 유지, 최대 [`MAX_LIST_ITEMS`]건).
pub fn shape_news(symbol: &Ticker, raw: Vec<RawNewsArticle>) -> Vec<NewsArticle> {
    raw.into_iter()
        .filter_map(|item| match shape_article(symbol, item) {
            Ok(article) => Some(article),
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Skipping news article");
                None
            }
        })
        .take(MAX_LIST_ITEMS)
        .collect()
}

/// 검색 결과 1건 변환. 주식형이 아니면 `Ok(None)`.
pub fn shape_search_result(raw: RawSearchResult) -> Result<Option<SearchResult>, ShapingError> {
    const RESOURCE: &str = "search";

    let symbol = required_text(raw.symbol, RESOURCE, "symbol")?;
    let instrument_type = required(raw.instrument_type, RESOURCE, "type")?;

    if !is_stock_like(&instrument_type) {
        return Ok(None);
    }

    Ok(Some(SearchResult {
        display_symbol: raw
            .display_symbol
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| symbol.clone()),
        description: raw.description.unwrap_or_default(),
        symbol,
        instrument_type,
        currency: raw.currency,
    }))
}

/// 검색 결과 목록 변환 (주식형만, 최대 [`MAX_LIST_ITEMS`]건).
pub fn shape_search(raw: Vec<RawSearchResult>) -> Vec<SearchResult> {
    raw.into_iter()
        .filter_map(|item| match shape_search_result(item) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Skipping search result");
                None
            }
        })
        .take(MAX_LIST_ITEMS)
        .collect()
}
