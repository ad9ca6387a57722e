//! 헬스 체크 endpoint.
//!
//! - `GET /` - 서비스 배너
//! - `GET /health` - liveness 체크
//!
//! 업스트림 구성 여부와 캐시 상태는 `GET /api/stocks/health`에서 제공합니다
//! ([`crate::routes::stocks::stocks_health`]).

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

/// 서비스 배너 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BannerResponse {
    /// 서비스 이름
    pub message: String,
    /// API 버전
    pub version: String,
    /// 문서 경로
    pub docs: String,
}

/// 서비스 배너.
///
/// GET /
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "서비스 배너", body = BannerResponse)
    ),
    tag = "health"
)]
pub async fn root() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "StockStream API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs: "/swagger-ui".to_string(),
    })
}

/// 간단한 헬스 체크 (liveness 체크용).
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "서버 응답 가능", body = String)
    ),
    tag = "health"
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(health_check))
}
