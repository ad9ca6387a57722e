//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 캐시 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설정하고 핸들을 반환합니다.
///
/// 레코더가 이미 설치되어 있으면 에러를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        // HTTP 요청 지속 시간 히스토그램 버킷 설정
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭 헬퍼 함수
// ============================================================================

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string())
        .increment(1);
}

/// HTTP 응답 카운터 증가.
///
/// `resource`는 [`resource_for_path`] 값입니다.
pub fn record_http_response(method: &str, path: &str, resource: &'static str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "resource" => resource,
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, path: &str, resource: &'static str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "resource" => resource
    )
    .record(duration_secs);
}

// ============================================================================
// 캐시 메트릭 헬퍼 함수
// ============================================================================

/// 캐시 조회 결과 카운터 증가.
///
/// `outcome`: `hit` | `miss_success` | `miss_empty` | `miss_error`
pub fn record_cache_lookup(resource: &str, outcome: &str) {
    counter!(
        "stock_cache_lookups_total",
        "resource" => resource.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// 현재 캐시 항목 수 설정.
pub fn set_cache_entries(count: usize) {
    gauge!("stock_cache_entries").set(count as f64);
}

// ============================================================================
// 경로 정규화 유틸리티
// ============================================================================

/// 경로에서 동적 파라미터를 정규화합니다.
///
/// 종목 심볼 경로는 라벨 카디널리티를 제한하기 위해 묶습니다.
///
/// 예: `/api/stocks/quote/AAPL` → `/api/stocks/quote/:symbol`
pub fn normalize_path(path: &str) -> String {
    const SYMBOL_ROUTES: [&str; 2] = ["quote", "news"];

    let segments: Vec<&str> = path.split('/').collect();
    let normalized: Vec<String> = segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let follows_symbol_route = i > 0 && SYMBOL_ROUTES.contains(&segments[i - 1]);
            let is_numeric = !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit());

            if follows_symbol_route && !segment.is_empty() {
                ":symbol".to_string()
            } else if is_numeric {
                ":id".to_string()
            } else {
                (*segment).to_string()
            }
        })
        .collect();
    normalized.join("/")
}

/// 요청 경로가 가리키는 주식 데이터 리소스.
///
/// `/api/stocks/` 아래의 `quote`, `news`, `search`, `cache` 경로는 그 이름을,
/// `/api/stocks/health`는 `health`를, 나머지는 `other`를 반환합니다.
pub fn resource_for_path(path: &str) -> &'static str {
    let Some(rest) = path.strip_prefix("/api/stocks/") else {
        return "other";
    };

    match rest.split('/').next() {
        Some("quote") => "quote",
        Some("news") => "news",
        Some("search") => "search",
        Some("cache") => "cache",
        Some("health") => "health",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_symbol() {
        assert_eq!(
            normalize_path("/api/stocks/quote/AAPL"),
            "/api/stocks/quote/:symbol"
        );
        assert_eq!(
            normalize_path("/api/stocks/news/msft"),
            "/api/stocks/news/:symbol"
        );
    }

    #[test]
    fn test_normalize_path_numeric() {
        assert_eq!(normalize_path("/api/items/12345"), "/api/items/:id");
    }

    #[test]
    fn test_resource_for_path() {
        assert_eq!(resource_for_path("/api/stocks/quote/AAPL"), "quote");
        assert_eq!(resource_for_path("/api/stocks/news/MSFT"), "news");
        assert_eq!(resource_for_path("/api/stocks/search"), "search");
        assert_eq!(resource_for_path("/api/stocks/cache/clear"), "cache");
        assert_eq!(resource_for_path("/api/stocks/health"), "health");
        assert_eq!(resource_for_path("/health"), "other");
        assert_eq!(resource_for_path("/api/stocks/unknown"), "other");
    }

    #[test]
    fn test_normalize_path_no_params() {
        assert_eq!(normalize_path("/api/stocks/search"), "/api/stocks/search");
        assert_eq!(normalize_path("/api/stocks/quote/"), "/api/stocks/quote/");
    }
}
