//! 주식 데이터 endpoint.
//!
//! - `GET /api/stocks/health` - 업스트림 구성 여부 및 캐시 상태
//! - `GET /api/stocks/quote/{symbol}` - 종목 시세
//! - `GET /api/stocks/news/{symbol}?days=7` - 기업 뉴스 (최대 10건)
//! - `GET /api/stocks/search?q=...` - 심볼 검색 (주식형만, 최대 10건)
//! - `POST /api/stocks/cache/clear` - 캐시 비우기
//!
//! 모든 데이터 응답은 [`StockResponse`]로 감싸며, `cached` 필드로
//! 캐시 응답과 새로 가져온 응답을 구분합니다.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stock_core::{NewsArticle, Quote, SearchResult};
use stock_data::{DataError, Fetched, ResourceKind, DEFAULT_NEWS_DAYS};
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{data_error_response, validation_error_response, ApiErrorResponse, ApiResult};
use crate::extract::ApiQuery;
use crate::metrics::{record_cache_lookup, set_cache_entries};
use crate::state::AppState;

// ==================== 응답 타입 ====================

/// 주식 데이터 응답 래퍼.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StockResponse<T> {
    /// 조회 성공 여부
    pub success: bool,
    /// 응답 데이터
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// 실패 사유
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 캐시에서 제공되었는지 여부
    pub cached: bool,
}

impl<T> StockResponse<T> {
    /// 조회 결과로 성공 응답 생성.
    pub fn from_fetched(fetched: Fetched<T>) -> Self {
        Self {
            success: true,
            cached: fetched.is_cached(),
            data: Some(fetched.data),
            error: None,
        }
    }

    /// 데이터 없음 응답 생성.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            cached: false,
        }
    }
}

/// 주식 서비스 헬스 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StocksHealthResponse {
    /// "healthy" | "degraded"
    pub status: String,
    /// 서비스 이름
    pub service: String,
    /// 업스트림 API 키 설정 여부
    pub upstream_configured: bool,
    /// 현재 캐시 항목 수
    pub cache_entries: usize,
    /// API 버전
    pub version: String,
    /// 서버 업타임(초)
    pub uptime_secs: i64,
}

/// 캐시 비우기 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClearCacheResponse {
    pub success: bool,
    /// 삭제된 항목 수
    pub removed: usize,
    pub message: String,
}

// ==================== 요청 타입 ====================

/// 뉴스 조회 파라미터.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NewsQuery {
    /// 조회 기간 (일, 1-30, 기본 7)
    #[serde(default = "default_news_days")]
    #[validate(range(min = 1, max = 30, message = "days must be between 1 and 30"))]
    pub days: u32,
}

fn default_news_days() -> u32 {
    DEFAULT_NEWS_DAYS
}

/// 심볼 검색 파라미터.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SymbolSearchQuery {
    /// 검색어 (회사명 또는 심볼)
    #[serde(default)]
    #[validate(length(min = 1, message = "Search query is required"))]
    pub q: String,
}

// ==================== 핸들러 ====================

/// 조회 결과를 메트릭에 기록하고 그대로 반환합니다.
fn observe<T>(
    kind: ResourceKind,
    result: Result<Fetched<T>, DataError>,
) -> Result<Fetched<T>, DataError> {
    match &result {
        Ok(fetched) => record_cache_lookup(kind.as_str(), fetched.outcome.as_str()),
        Err(DataError::NotFound(_)) => record_cache_lookup(kind.as_str(), "miss_empty"),
        Err(e) if e.is_fetch_failure() => record_cache_lookup(kind.as_str(), "miss_error"),
        Err(_) => {}
    }
    result
}

/// 주식 서비스 헬스 체크.
///
/// GET /api/stocks/health
#[utoipa::path(
    get,
    path = "/api/stocks/health",
    responses(
        (status = 200, description = "서비스 상태", body = StocksHealthResponse)
    ),
    tag = "stocks"
)]
pub async fn stocks_health(State(state): State<Arc<AppState>>) -> Json<StocksHealthResponse> {
    let upstream_configured = state.has_stock_service();
    let cache_entries = state.cache_entry_count();
    set_cache_entries(cache_entries);

    Json(StocksHealthResponse {
        status: if upstream_configured { "healthy" } else { "degraded" }.to_string(),
        service: "stock-data".to_string(),
        upstream_configured,
        cache_entries,
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
    })
}

/// 종목 시세 조회.
///
/// 업스트림에 데이터가 없는 심볼은 200 응답에 `success: false`로 알립니다.
///
/// GET /api/stocks/quote/{symbol}
#[utoipa::path(
    get,
    path = "/api/stocks/quote/{symbol}",
    params(
        ("symbol" = String, Path, description = "종목 심볼 (대소문자/앞뒤 공백 무시)")
    ),
    responses(
        (status = 200, description = "시세 조회 결과", body = StockResponse<Quote>),
        (status = 400, description = "잘못된 심볼", body = ApiErrorResponse),
        (status = 502, description = "업스트림 오류", body = ApiErrorResponse),
        (status = 503, description = "업스트림 미설정", body = ApiErrorResponse)
    ),
    tag = "stocks"
)]
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<StockResponse<Quote>>> {
    let service = state.stock_service().map_err(|e| data_error_response(&e))?;

    match observe(ResourceKind::Quote, service.get_quote(&symbol).await) {
        Ok(fetched) => Ok(Json(StockResponse::from_fetched(fetched))),
        Err(DataError::NotFound(symbol)) => Ok(Json(StockResponse::failure(format!(
            "Could not fetch data for symbol: {}",
            symbol
        )))),
        Err(e) => Err(data_error_response(&e)),
    }
}

/// 기업 뉴스 조회.
///
/// GET /api/stocks/news/{symbol}?days=7
#[utoipa::path(
    get,
    path = "/api/stocks/news/{symbol}",
    params(
        ("symbol" = String, Path, description = "종목 심볼"),
        NewsQuery
    ),
    responses(
        (status = 200, description = "뉴스 목록 (최대 10건)", body = StockResponse<Vec<NewsArticle>>),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 502, description = "업스트림 오류", body = ApiErrorResponse),
        (status = 503, description = "업스트림 미설정", body = ApiErrorResponse)
    ),
    tag = "stocks"
)]
pub async fn get_news(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    ApiQuery(query): ApiQuery<NewsQuery>,
) -> ApiResult<Json<StockResponse<Vec<NewsArticle>>>> {
    query.validate().map_err(|e| validation_error_response(&e))?;
    let service = state.stock_service().map_err(|e| data_error_response(&e))?;

    let fetched = observe(ResourceKind::News, service.get_news(&symbol, query.days).await)
        .map_err(|e| data_error_response(&e))?;

    debug!(symbol = %symbol, days = query.days, count = fetched.data.len(), "News served");
    Ok(Json(StockResponse::from_fetched(fetched)))
}

/// 심볼 검색.
///
/// GET /api/stocks/search?q=apple
#[utoipa::path(
    get,
    path = "/api/stocks/search",
    params(SymbolSearchQuery),
    responses(
        (status = 200, description = "검색 결과 (최대 10건)", body = StockResponse<Vec<SearchResult>>),
        (status = 400, description = "검색어 누락", body = ApiErrorResponse),
        (status = 502, description = "업스트림 오류", body = ApiErrorResponse),
        (status = 503, description = "업스트림 미설정", body = ApiErrorResponse)
    ),
    tag = "stocks"
)]
pub async fn search_symbols(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SymbolSearchQuery>,
) -> ApiResult<Json<StockResponse<Vec<SearchResult>>>> {
    query.validate().map_err(|e| validation_error_response(&e))?;
    let service = state.stock_service().map_err(|e| data_error_response(&e))?;

    let fetched = observe(ResourceKind::Search, service.search(&query.q).await)
        .map_err(|e| data_error_response(&e))?;

    Ok(Json(StockResponse::from_fetched(fetched)))
}

/// 캐시 비우기.
///
/// POST /api/stocks/cache/clear
#[utoipa::path(
    post,
    path = "/api/stocks/cache/clear",
    responses(
        (status = 200, description = "캐시 비움", body = ClearCacheResponse),
        (status = 503, description = "업스트림 미설정", body = ApiErrorResponse)
    ),
    tag = "stocks"
)]
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> ApiResult<Json<ClearCacheResponse>> {
    let service = state.stock_service().map_err(|e| data_error_response(&e))?;

    let removed = service.clear_cache();
    set_cache_entries(service.cache_entry_count());
    info!(removed, "Cache cleared via API");

    Ok(Json(ClearCacheResponse {
        success: true,
        removed,
        message: format!("Cleared {} cache entries", removed),
    }))
}

/// 주식 데이터 라우터 생성.
pub fn stocks_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(stocks_health))
        .route("/quote/{symbol}", get(get_quote))
        .route("/news/{symbol}", get(get_news))
        .route("/search", get(search_symbols))
        .route("/cache/clear", post(clear_cache))
}
