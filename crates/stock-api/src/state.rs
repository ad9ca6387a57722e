//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 모든 API 핸들러에서 공유되는 상태를 관리합니다.
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.

use std::sync::Arc;
use stock_core::AppConfig;
use stock_data::{DataError, StockDataService};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 주식 데이터 서비스. API 키가 없으면 `None` (데이터 엔드포인트는 503 응답)
    pub stock_service: Option<Arc<StockDataService>>,

    /// 서비스 생성 실패 사유 (설정 누락 등)
    pub config_error: Option<String>,

    /// 서버 시작 시각
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 서비스 없이 상태 생성.
    pub fn new() -> Self {
        Self {
            stock_service: None,
            config_error: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 설정에서 상태 생성.
    ///
    /// 업스트림 설정이 잘못되어도 서버는 시작할 수 있도록 에러를 기록만 합니다.
    pub fn from_config(config: &AppConfig) -> Self {
        match StockDataService::from_config(config) {
            Ok(service) => Self::new().with_stock_service(Arc::new(service)),
            Err(e) => {
                warn!(error = %e, "Stock data service unavailable, running in degraded mode");
                Self::new().with_config_error(e.to_string())
            }
        }
    }

    /// 주식 데이터 서비스 설정.
    pub fn with_stock_service(mut self, service: Arc<StockDataService>) -> Self {
        self.stock_service = Some(service);
        self.config_error = None;
        self
    }

    /// 설정 에러 기록.
    pub fn with_config_error(mut self, message: impl Into<String>) -> Self {
        self.config_error = Some(message.into());
        self
    }

    /// 업스트림이 구성되어 있는지 확인.
    pub fn has_stock_service(&self) -> bool {
        self.stock_service.is_some()
    }

    /// 주식 데이터 서비스 반환. 없으면 `DataError::ConfigError`.
    pub fn stock_service(&self) -> Result<&Arc<StockDataService>, DataError> {
        self.stock_service.as_ref().ok_or_else(|| {
            DataError::ConfigError(
                self.config_error
                    .clone()
                    .unwrap_or_else(|| "Stock data service is not configured".to_string()),
            )
        })
    }

    /// 현재 캐시 항목 수 (서비스가 없으면 0).
    pub fn cache_entry_count(&self) -> usize {
        self.stock_service
            .as_ref()
            .map(|s| s.cache_entry_count())
            .unwrap_or(0)
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 설정된 경우 캐시 정리 백그라운드 태스크 시작.
    pub fn start_cache_sweeper(
        &self,
        config: &AppConfig,
        shutdown_token: CancellationToken,
    ) -> Option<JoinHandle<()>> {
        let interval = config.cache.sweep_interval()?;
        let service = self.stock_service.clone()?;

        info!(interval_secs = interval.as_secs(), "Starting cache sweeper");
        Some(service.spawn_sweeper(interval, shutdown_token))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// 테스트용 상태 생성.
///
/// `MockProvider`에 AAPL 시세/뉴스와 "apple" 검색 결과가 등록되어 있습니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use stock_data::{CachePolicy, MockProvider};

    let provider = MockProvider::new()
        .with_quote("AAPL", MockProvider::sample_quote(190.0))
        .with_news(
            "AAPL",
            (1..=12).map(MockProvider::sample_article).collect(),
        )
        .with_search(
            "apple",
            vec![
                MockProvider::sample_search_result("AAPL", "Common Stock"),
                MockProvider::sample_search_result("OANDA:AAPL", "Forex"),
            ],
        );

    let service = StockDataService::new(Arc::new(provider), CachePolicy::default());
    AppState::new().with_stock_service(Arc::new(service))
}
