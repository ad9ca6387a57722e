//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//!
//! 로드 순서 (뒤가 앞을 덮어씀):
//! 1. 내장 기본값
//! 2. 설정 파일 (`config/default.toml`, 없으면 건너뜀)
//! 3. `STOCKSTREAM__` 접두사 환경 변수 (예: `STOCKSTREAM__SERVER__PORT=9000`)
//!
//! API 키가 설정되지 않았으면 `FINNHUB_API_KEY` 환경 변수를 폴백으로 사용합니다.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

/// 업스트림 API 키 폴백 환경 변수.
pub const API_KEY_ENV: &str = "FINNHUB_API_KEY";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 업스트림 데이터 제공자 설정
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// 캐시 설정
    #[serde(default)]
    pub cache: CacheConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// CORS 허용 origin 목록 (비어 있으면 모든 origin 허용)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
        }
    }
}

/// 업스트림 데이터 제공자 설정.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// REST API 기본 URL
    pub base_url: String,
    /// API 키 (선택)
    pub api_key: Option<String>,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://finnhub.io/api/v1".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl UpstreamConfig {
    /// 공백이 아닌 API 키 반환.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// API 키 설정 여부.
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    /// 요청 타임아웃.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// API 키가 로그에 남지 않도록 Debug를 직접 구현
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// 캐시 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 시세 캐시 TTL (초)
    pub quote_ttl_secs: u64,
    /// 뉴스 캐시 TTL (초)
    pub news_ttl_secs: u64,
    /// 심볼 검색 캐시 TTL (초)
    pub search_ttl_secs: u64,
    /// 만료 항목 정리 주기 (초). 없으면 조회 시점에만 제거합니다.
    pub sweep_interval_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            quote_ttl_secs: 60,
            news_ttl_secs: 300,
            search_ttl_secs: 120,
            sweep_interval_secs: None,
        }
    }
}

impl CacheConfig {
    /// 시세 TTL.
    pub fn quote_ttl(&self) -> Duration {
        Duration::from_secs(self.quote_ttl_secs)
    }

    /// 뉴스 TTL.
    pub fn news_ttl(&self) -> Duration {
        Duration::from_secs(self.news_ttl_secs)
    }

    /// 검색 TTL.
    pub fn search_ttl(&self) -> Duration {
        Duration::from_secs(self.search_ttl_secs)
    }

    /// 백그라운드 정리 주기 (설정된 경우).
    pub fn sweep_interval(&self) -> Option<Duration> {
        self.sweep_interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// span 진입/종료 이벤트 출력 여부
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            span_events: false,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            // 파일에서 로드 (선택)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("STOCKSTREAM")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            );

        let mut config: AppConfig = builder.build()?.try_deserialize()?;

        if !config.upstream.has_api_key() {
            config.upstream.api_key = std::env::var(API_KEY_ENV).ok();
        }

        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> CoreResult<Self> {
        Self::load("config/default.toml")
    }

    /// 설정 값 검증.
    pub fn validate(&self) -> CoreResult<()> {
        if self.server.port == 0 {
            return Err(CoreError::Config("server.port must be non-zero".to_string()));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(CoreError::Config(
                "upstream.timeout_secs must be non-zero".to_string(),
            ));
        }

        let ttls = [
            ("cache.quote_ttl_secs", self.cache.quote_ttl_secs),
            ("cache.news_ttl_secs", self.cache.news_ttl_secs),
            ("cache.search_ttl_secs", self.cache.search_ttl_secs),
        ];
        for (name, secs) in ttls {
            if secs == 0 {
                return Err(CoreError::Config(format!("{} must be non-zero", name)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttls() {
        let config = AppConfig::default();
        assert_eq!(config.cache.quote_ttl(), Duration::from_secs(60));
        assert_eq!(config.cache.news_ttl(), Duration::from_secs(300));
        assert_eq!(config.cache.search_ttl(), Duration::from_secs(120));
        assert!(config.cache.sweep_interval().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let mut config = AppConfig::default();
        config.cache.news_ttl_secs = 0;

        let err = config.validate().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("cache.news_ttl_secs"));
    }

    #[test]
    fn test_blank_api_key_is_not_configured() {
        let mut upstream = UpstreamConfig::default();
        assert!(!upstream.has_api_key());

        upstream.api_key = Some("   ".to_string());
        assert!(!upstream.has_api_key());

        upstream.api_key = Some(" abc123 ".to_string());
        assert_eq!(upstream.api_key(), Some("abc123"));
    }

    #[test]
    fn test_upstream_debug_redacts_key() {
        let upstream = UpstreamConfig {
            api_key: Some("super-secret".to_string()),
            ..Default::default()
        };

        let printed = format!("{:?}", upstream);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("REDACTED"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.cache.quote_ttl_secs, 60);
        assert!(!config.server.host.is_empty());
    }

    #[test]
    fn test_sweep_interval_zero_is_disabled() {
        let cache = CacheConfig {
            sweep_interval_secs: Some(0),
            ..Default::default()
        };
        assert!(cache.sweep_interval().is_none());
    }
}
