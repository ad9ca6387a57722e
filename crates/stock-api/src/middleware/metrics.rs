//! HTTP 요청 metrics middleware.

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use std::time::Instant;
use tracing::warn;

use crate::metrics::{
    normalize_path, record_http_duration, record_http_request, record_http_response,
    resource_for_path,
};

/// HTTP 메트릭을 수집하는 미들웨어 레이어.
///
/// 각 요청에 대해 다음 메트릭을 기록합니다:
/// - `http_requests_total`: 총 요청 수 (method, path 라벨)
/// - `http_responses_total`: 총 응답 수 (method, path, resource, status 라벨)
/// - `http_request_duration_seconds`: 요청 처리 시간 히스토그램 (resource 라벨 포함)
///
/// `path` 라벨은 종목 심볼을 `:symbol`로 치환한 값이고, `resource` 라벨은
/// 시세/뉴스/검색 중 어느 데이터 경로인지 나타냅니다. 업스트림 장애(502/503)는
/// 리소스별로 `warn` 로그를 남깁니다.
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());
    let resource = resource_for_path(request.uri().path());

    record_http_request(&method, &path);

    let response = next.run(request).await;

    let status = response.status();
    let elapsed = start.elapsed();
    record_http_response(&method, &path, resource, status.as_u16());
    record_http_duration(&method, &path, resource, elapsed.as_secs_f64());

    if matches!(status, StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE) {
        warn!(
            resource,
            path = %path,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Stock data request failed upstream"
        );
    }

    response
}
