//! 심볼 검색 결과.

use serde::{Deserialize, Serialize};

/// 주식으로 취급하는 상품 유형.
///
/// 이 목록에 없는 유형(Forex, Crypto 등)은 검색 결과에서 제외됩니다.
pub const STOCK_LIKE_TYPES: &[&str] = &["Common Stock", "ADR", "ETP", "REIT"];

/// 주식으로 취급되는 상품 유형인지 확인합니다.
pub fn is_stock_like(instrument_type: &str) -> bool {
    STOCK_LIKE_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(instrument_type.trim()))
}

/// 심볼 검색 결과 항목.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// 심볼
    pub symbol: String,
    /// 종목 설명 (회사명)
    pub description: String,
    /// 상품 유형 (예: "Common Stock")
    #[serde(rename = "type")]
    pub instrument_type: String,
    /// 표시용 심볼
    pub display_symbol: String,
    /// 통화 (업스트림이 제공하지 않으면 없음)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_stock_like() {
        assert!(is_stock_like("Common Stock"));
        assert!(is_stock_like("common stock"));
        assert!(is_stock_like("ADR"));
        assert!(!is_stock_like("Forex"));
        assert!(!is_stock_like("Crypto"));
        assert!(!is_stock_like(""));
    }

    #[test]
    fn test_search_result_type_field_name() {
        let result = SearchResult {
            symbol: "AAPL".to_string(),
            description: "APPLE INC".to_string(),
            instrument_type: "Common Stock".to_string(),
            display_symbol: "AAPL".to_string(),
            currency: None,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "Common Stock");
        assert_eq!(json["displaySymbol"], "AAPL");
        assert!(json.get("currency").is_none());
    }
}
