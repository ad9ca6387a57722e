//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.
//!
//! # 상태 코드 매핑
//!
//! | `DataError` | HTTP | 코드 |
//! |---|---|---|
//! | `InvalidInput` | 400 | `INVALID_INPUT` |
//! | `ConfigError` | 503 | `CONFIGURATION_ERROR` |
//! | `FetchError` / `UpstreamStatus` / `ParseError` | 502 | `FETCH_ERROR` |
//! | `NotFound` | 404 | `NOT_FOUND` |
//!
//! 요청 검증 실패는 400 `VALIDATION_ERROR`, 해석할 수 없는 쿼리 문자열은
//! 400 `INVALID_QUERY`로 응답합니다.
//!
//! 시세 라우트는 `NotFound`를 에러로 취급하지 않고 `success: false` 응답으로 변환합니다.

use axum::extract::rejection::QueryRejection;
use axum::http::{StatusCode, Uri};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use stock_data::DataError;
use utoipa::ToSchema;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "FETCH_ERROR",
///   "message": "Upstream returned 500: internal error",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_INPUT", "FETCH_ERROR", "CONFIGURATION_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 데이터 계층 에러의 HTTP 상태 코드와 에러 코드.
pub fn status_for(err: &DataError) -> (StatusCode, &'static str) {
    match err {
        DataError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
        DataError::ConfigError(_) => (StatusCode::SERVICE_UNAVAILABLE, "CONFIGURATION_ERROR"),
        DataError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        DataError::FetchError(_) | DataError::UpstreamStatus { .. } | DataError::ParseError(_) => {
            (StatusCode::BAD_GATEWAY, "FETCH_ERROR")
        }
    }
}

/// 데이터 계층 에러를 API 에러 응답으로 변환합니다.
pub fn data_error_response(err: &DataError) -> (StatusCode, Json<ApiErrorResponse>) {
    let (status, code) = status_for(err);

    let message = match err {
        // 입력 오류는 사용자 메시지 그대로 노출
        DataError::InvalidInput(msg) | DataError::ConfigError(msg) => msg.clone(),
        other => other.to_string(),
    };

    (status, Json(ApiErrorResponse::new(code, message)))
}

/// 요청 검증 실패 응답 (400 `VALIDATION_ERROR`).
///
/// 실패한 필드 이름은 `details.fields`에 담깁니다.
pub fn validation_error_response(
    errors: &validator::ValidationErrors,
) -> (StatusCode, Json<ApiErrorResponse>) {
    let field_errors = errors.field_errors();

    let mut fields: Vec<String> = field_errors.keys().map(|f| f.to_string()).collect();
    fields.sort();

    let message = field_errors
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: invalid value", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ");

    (
        StatusCode::BAD_REQUEST,
        Json(ApiErrorResponse::with_details(
            "VALIDATION_ERROR",
            message,
            json!({ "fields": fields }),
        )),
    )
}

/// 쿼리 문자열 해석 실패 응답 (400 `INVALID_QUERY`).
///
/// 원본 쿼리 문자열은 `details.query`에 담깁니다.
pub fn query_rejection_response(
    rejection: &QueryRejection,
    uri: &Uri,
) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiErrorResponse::with_details(
            "INVALID_QUERY",
            rejection.body_text(),
            json!({ "query": uri.query().unwrap_or_default() }),
        )),
    )
}
