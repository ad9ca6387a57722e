//! 데이터 모듈 오류 타입.

use stock_core::CoreError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 설정 오류 (API 키 누락 등)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 잘못된 요청 입력
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 업스트림에 데이터가 없음 (시세 전용)
    #[error("Record not found: {0}")]
    NotFound(String),

    /// 데이터 가져오기 오류 (네트워크/전송)
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// 업스트림이 실패 상태 코드를 반환
    #[error("Upstream returned {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    /// 응답 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl DataError {
    /// 업스트림 호출 실패로 분류되는 오류인지 확인합니다.
    ///
    /// 이 오류들은 캐시되지 않으며 호출자에게 장애로 전달됩니다.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            DataError::FetchError(_) | DataError::UpstreamStatus { .. } | DataError::ParseError(_)
        )
    }

    /// 인증 실패(401/403)인지 확인합니다.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, DataError::UpstreamStatus { status: 401 | 403, .. })
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DataError::ParseError(err.to_string())
        } else {
            DataError::FetchError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::ParseError(err.to_string())
    }
}

impl From<CoreError> for DataError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config(msg) => DataError::ConfigError(msg),
            CoreError::InvalidInput(msg) => DataError::InvalidInput(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
