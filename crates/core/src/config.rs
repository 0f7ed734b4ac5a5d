//! 설정 관리 — vulnscout.toml 파싱 및 런타임 설정
//!
//! [`VulnscoutConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`VULNSCOUT_SCANNER_BATCH_SIZE=20` 형식)
//! 3. 설정 파일 (`vulnscout.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), vulnscout_core::error::VulnscoutError> {
//! use vulnscout_core::config::VulnscoutConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = VulnscoutConfig::load("vulnscout.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = VulnscoutConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, VulnscoutError};

/// Vulnscout 통합 설정
///
/// `vulnscout.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VulnscoutConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 의존성 스캐너 설정
    #[serde(default)]
    pub scanner: ScannerConfig,
}

impl VulnscoutConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, VulnscoutError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, VulnscoutError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VulnscoutError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                VulnscoutError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, VulnscoutError> {
        toml::from_str(toml_str).map_err(|e| {
            VulnscoutError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `VULNSCOUT_{SECTION}_{FIELD}`
    /// 예: `VULNSCOUT_SCANNER_OSV_URL=https://osv.example/v1/query`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "VULNSCOUT_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "VULNSCOUT_GENERAL_LOG_FORMAT");

        // Scanner
        override_csv(
            &mut self.scanner.exclude_dirs,
            "VULNSCOUT_SCANNER_EXCLUDE_DIRS",
        );
        override_string(&mut self.scanner.osv_url, "VULNSCOUT_SCANNER_OSV_URL");
        override_string(
            &mut self.scanner.min_severity,
            "VULNSCOUT_SCANNER_MIN_SEVERITY",
        );
        override_usize(&mut self.scanner.batch_size, "VULNSCOUT_SCANNER_BATCH_SIZE");
        override_u32(&mut self.scanner.max_retries, "VULNSCOUT_SCANNER_MAX_RETRIES");
        override_u64(
            &mut self.scanner.request_timeout_secs,
            "VULNSCOUT_SCANNER_REQUEST_TIMEOUT_SECS",
        );
        override_u64(
            &mut self.scanner.batch_delay_ms,
            "VULNSCOUT_SCANNER_BATCH_DELAY_MS",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), VulnscoutError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // min_severity 검증
        let valid_severities = ["unknown", "low", "medium", "high", "critical"];
        if !valid_severities.contains(&self.scanner.min_severity.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "scanner.min_severity".to_owned(),
                reason: format!("must be one of: {}", valid_severities.join(", ")),
            }
            .into());
        }

        // osv_url 검증
        if !self.scanner.osv_url.starts_with("http://")
            && !self.scanner.osv_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                field: "scanner.osv_url".to_owned(),
                reason: "must be an http(s) URL".to_owned(),
            }
            .into());
        }

        // batch_size 검증
        if self.scanner.batch_size == 0 || self.scanner.batch_size > 100 {
            return Err(ConfigError::InvalidValue {
                field: "scanner.batch_size".to_owned(),
                reason: "must be between 1 and 100".to_owned(),
            }
            .into());
        }

        // request_timeout_secs 검증
        if self.scanner.request_timeout_secs == 0 || self.scanner.request_timeout_secs > 300 {
            return Err(ConfigError::InvalidValue {
                field: "scanner.request_timeout_secs".to_owned(),
                reason: "must be between 1 and 300".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

// Default는 derive 매크로로 자동 생성 (각 필드가 Default를 구현하므로)

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 의존성 스캐너 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// 탐색에서 제외할 디렉토리 이름
    pub exclude_dirs: Vec<String>,
    /// 취약점 조회 API 엔드포인트
    pub osv_url: String,
    /// 최소 표시 심각도 (unknown, low, medium, high, critical)
    pub min_severity: String,
    /// 조회 배치 크기
    pub batch_size: usize,
    /// 조회 재시도 횟수 (최초 시도 포함)
    pub max_retries: u32,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
    /// 배치 간 대기 시간 (밀리초)
    pub batch_delay_ms: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            exclude_dirs: vec![
                "node_modules".to_owned(),
                "vendor".to_owned(),
                "dist".to_owned(),
                "build".to_owned(),
                "target".to_owned(),
                "__pycache__".to_owned(),
                ".git".to_owned(),
                ".svn".to_owned(),
                ".hg".to_owned(),
            ],
            osv_url: "https://api.osv.dev/v1/query".to_owned(),
            min_severity: "unknown".to_owned(),
            batch_size: 10,
            max_retries: 3,
            request_timeout_secs: 30,
            batch_delay_ms: 100,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u32(target: &mut u32, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u32>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u32 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val.split(',').map(|s| s.trim().to_owned()).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = VulnscoutConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.scanner.batch_size, 10);
        assert_eq!(config.scanner.max_retries, 3);
        assert_eq!(config.scanner.request_timeout_secs, 30);
        assert_eq!(config.scanner.batch_delay_ms, 100);
        assert!(config.scanner.exclude_dirs.contains(&"node_modules".to_owned()));
        assert!(config.scanner.exclude_dirs.contains(&".git".to_owned()));
    }

    #[test]
    fn default_config_passes_validation() {
        let config = VulnscoutConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn from_str_empty_toml_uses_defaults() {
        let config = VulnscoutConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.scanner.batch_size, 10);
    }

    #[test]
    fn from_str_partial_toml_merges_with_defaults() {
        let toml = r#"
[general]
log_level = "debug"

[scanner]
batch_size = 25
"#;
        let config = VulnscoutConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        // log_format은 기본값 유지
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.scanner.batch_size, 25);
        assert_eq!(config.scanner.max_retries, 3);
    }

    #[test]
    fn from_str_full_toml() {
        let toml = r#"
[general]
log_level = "warn"
log_format = "json"

[scanner]
exclude_dirs = ["node_modules", ".git", "third_party"]
osv_url = "https://osv.internal/v1/query"
min_severity = "high"
batch_size = 50
max_retries = 5
request_timeout_secs = 60
batch_delay_ms = 250
"#;
        let config = VulnscoutConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.scanner.exclude_dirs.len(), 3);
        assert_eq!(config.scanner.osv_url, "https://osv.internal/v1/query");
        assert_eq!(config.scanner.min_severity, "high");
        assert_eq!(config.scanner.batch_size, 50);
        assert_eq!(config.scanner.batch_delay_ms, 250);
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let result = VulnscoutConfig::parse("invalid = [[[toml");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            VulnscoutError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = VulnscoutConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = VulnscoutConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_invalid_min_severity() {
        let mut config = VulnscoutConfig::default();
        config.scanner.min_severity = "severe".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_severity"));
    }

    #[test]
    fn validate_rejects_non_http_osv_url() {
        let mut config = VulnscoutConfig::default();
        config.scanner.osv_url = "ftp://osv.dev".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("osv_url"));
    }

    #[test]
    fn validate_rejects_zero_batch_size() {
        let mut config = VulnscoutConfig::default();
        config.scanner.batch_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn validate_rejects_oversized_batch() {
        let mut config = VulnscoutConfig::default();
        config.scanner.batch_size = 500;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = VulnscoutConfig::default();
        config.scanner.request_timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    fn env_override_string_applies() {
        let mut val = "original".to_owned();
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_VULNSCOUT_STR", "overridden") };
        override_string(&mut val, "TEST_VULNSCOUT_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_VULNSCOUT_STR") };
    }

    #[test]
    fn env_override_usize_invalid_keeps_original() {
        let mut val = 10usize;
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_VULNSCOUT_USIZE_BAD", "not-a-number") };
        override_usize(&mut val, "TEST_VULNSCOUT_USIZE_BAD");
        assert_eq!(val, 10); // 원래 값 유지
        unsafe { std::env::remove_var("TEST_VULNSCOUT_USIZE_BAD") };
    }

    #[test]
    fn env_override_csv_splits_and_trims() {
        let mut val = vec!["a".to_owned()];
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_VULNSCOUT_CSV", "x, y, z") };
        override_csv(&mut val, "TEST_VULNSCOUT_CSV");
        assert_eq!(val, vec!["x", "y", "z"]);
        unsafe { std::env::remove_var("TEST_VULNSCOUT_CSV") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_VULNSCOUT_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = VulnscoutConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = VulnscoutConfig::parse(&toml_str).unwrap();
        assert_eq!(config.general.log_level, parsed.general.log_level);
        assert_eq!(config.scanner.osv_url, parsed.scanner.osv_url);
        assert_eq!(config.scanner.batch_size, parsed.scanner.batch_size);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let result = VulnscoutConfig::from_file("/nonexistent/path/vulnscout.toml").await;
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            VulnscoutError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn from_file_reads_temp_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vulnscout.toml");
        std::fs::write(&path, "[scanner]\nbatch_size = 7\n").unwrap();
        let config = VulnscoutConfig::from_file(&path).await.unwrap();
        assert_eq!(config.scanner.batch_size, 7);
    }
}
