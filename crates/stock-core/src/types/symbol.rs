//! 티커 심볼 및 검색어 정규화.
//!
//! 이 모듈은 요청 입력을 정규화한 값 타입을 정의합니다:
//! - `Ticker` - 공백 제거 + 대문자 변환된 종목 심볼
//! - `SearchQuery` - 공백 제거 + 소문자 변환된 검색어
//!
//! 대소문자나 앞뒤 공백만 다른 입력은 항상 같은 값으로 정규화됩니다.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// 정규화된 종목 심볼 (예: " aapl " → "AAPL").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// 원시 입력을 정규화하여 티커를 생성합니다.
    ///
    /// 공백만 있는 입력은 `CoreError::InvalidInput`을 반환합니다.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(CoreError::InvalidInput(
                "Stock symbol is required".to_string(),
            ));
        }
        Ok(Self(normalized))
    }

    /// 정규화된 문자열 반환.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 정규화된 심볼 검색어 (예: "Apple " → "apple").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// 원시 검색어를 정규화합니다.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(CoreError::InvalidInput(
                "Search query is required".to_string(),
            ));
        }
        Ok(Self(normalized))
    }

    /// 정규화된 문자열 반환.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
