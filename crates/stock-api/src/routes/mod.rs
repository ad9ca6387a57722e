//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/` - 서비스 배너
//! - `/health` - 헬스 체크 (liveness)
//! - `/api/stocks` - 시세, 뉴스, 심볼 검색, 캐시 관리

pub mod health;
pub mod stocks;

pub use health::{health_router, BannerResponse};
pub use stocks::{
    stocks_router, ClearCacheResponse, NewsQuery, StockResponse, StocksHealthResponse,
    SymbolSearchQuery,
};

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health::root))
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // 주식 데이터 엔드포인트
        .nest("/api/stocks", stocks_router())
}
