//! 기업 뉴스 기사.

use serde::{Deserialize, Serialize};

/// 뉴스 기사.
///
/// `related`에는 조회에 사용된 심볼이 모든 기사에 동일하게 기록됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct NewsArticle {
    /// 업스트림 기사 ID
    pub id: i64,
    /// 제목
    pub headline: String,
    /// 요약
    pub summary: String,
    /// 원문 URL
    pub url: String,
    /// 대표 이미지 URL (없을 수 있음)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// 출처
    pub source: String,
    /// 카테고리
    pub category: String,
    /// 게시 시각 (Unix epoch 초)
    pub datetime: i64,
    /// 조회 심볼
    pub related: String,
}
