//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use stock_core::{NewsArticle, Quote, SearchResult};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorResponse;
use crate::routes::{BannerResponse, ClearCacheResponse, StocksHealthResponse};

/// StockStream API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "StockStream API",
        description = r#"
# StockStream 주식 데이터 REST API

업스트림 금융 데이터 제공자의 시세, 기업 뉴스, 심볼 검색 결과를
TTL 캐시를 거쳐 제공합니다.

## 캐시 TTL (기본값)

- **시세**: 60초
- **뉴스**: 300초
- **검색**: 120초

모든 데이터 응답의 `cached` 필드로 캐시 응답 여부를 확인할 수 있습니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "stocks", description = "주식 데이터 - 시세/뉴스/검색 및 캐시 관리")
    ),
    components(
        schemas(
            // ===== Health =====
            BannerResponse,
            StocksHealthResponse,

            // ===== Common =====
            ApiErrorResponse,

            // ===== Stocks =====
            Quote,
            NewsArticle,
            SearchResult,
            ClearCacheResponse,
        )
    ),
    paths(
        // ===== Health =====
        crate::routes::health::root,
        crate::routes::health::health_check,

        // ===== Stocks =====
        crate::routes::stocks::stocks_health,
        crate::routes::stocks::get_quote,
        crate::routes::stocks::get_news,
        crate::routes::stocks::search_symbols,
        crate::routes::stocks::clear_cache,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// 다음 경로에 문서 UI를 마운트합니다:
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("StockStream API"));
        assert!(json.contains("/api/stocks/quote/{symbol}"));
        assert!(json.contains("/api/stocks/news/{symbol}"));
        assert!(json.contains("/api/stocks/search"));
        assert!(json.contains("/api/stocks/cache/clear"));
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        assert!(json.contains("Quote"));
        assert!(json.contains("NewsArticle"));
        assert!(json.contains("StocksHealthResponse"));
        assert!(json.contains("ApiErrorResponse"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }
}
