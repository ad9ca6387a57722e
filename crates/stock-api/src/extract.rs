//! 요청 추출기.
//!
//! axum 기본 `Query` 거부 응답은 평문이므로, 모든 400 응답이
//! [`ApiErrorResponse`](crate::error::ApiErrorResponse) 형식을 갖도록 감쌉니다.

use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{query_rejection_response, ApiErrorResponse};

/// JSON 에러 응답을 반환하는 쿼리 추출기.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ApiErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::try_from_uri(&parts.uri) {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => {
                debug!(uri = %parts.uri, error = %rejection.body_text(), "Query string rejected");
                Err(query_rejection_response(&rejection, &parts.uri))
            }
        }
    }
}
