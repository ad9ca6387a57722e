//! 실시간 시세 스냅샷.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 종목 시세.
///
/// 업스트림에서 새로 가져오거나 캐시에서 그대로 제공되며,
/// 일부 필드만 갱신되는 일은 없습니다 (항상 통째로 교체).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// 정규화된 종목 심볼 (대문자)
    pub symbol: String,
    /// 현재가
    pub price: f64,
    /// 전일 대비 변동
    pub change: f64,
    /// 전일 대비 변동률 (%)
    pub change_percent: f64,
    /// 당일 고가
    pub high: f64,
    /// 당일 저가
    pub low: f64,
    /// 당일 시가
    pub open: f64,
    /// 전일 종가
    pub previous_close: f64,
    /// 업스트림에서 가져온 시각
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_serializes_camel_case() {
        let quote = Quote {
            symbol: "MSFT".to_string(),
            price: 410.5,
            change: -2.25,
            change_percent: -0.55,
            high: 415.0,
            low: 409.1,
            open: 412.0,
            previous_close: 412.75,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["changePercent"], -0.55);
        assert_eq!(json["previousClose"], 412.75);
    }
}
