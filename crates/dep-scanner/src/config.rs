//! 의존성 스캐너 설정
//!
//! [`DepScannerConfig`]는 core의 [`ScannerConfig`](vulnscout_core::config::ScannerConfig)를
//! 확장하여 스캐너 고유 설정(파일 크기 제한 등)을 추가합니다.
//!
//! # 사용 예시
//!
//! ```
//! use vulnscout_dep_scanner::DepScannerConfig;
//!
//! // 기본값으로 생성
//! let config = DepScannerConfig::default();
//! config.validate().unwrap();
//!
//! // 빌더로 생성
//! use vulnscout_dep_scanner::DepScannerConfigBuilder;
//!
//! let config = DepScannerConfigBuilder::new()
//!     .batch_size(20)
//!     .max_retries(5)
//!     .build()
//!     .unwrap();
//! ```

use serde::{Deserialize, Serialize};

use vulnscout_core::types::Severity;

use crate::error::DepScannerError;

/// 의존성 스캐너 설정
///
/// core의 `ScannerConfig`에서 파생되며, 모듈 고유 확장 필드를 포함합니다.
///
/// # 필드
///
/// - **exclude_dirs**: 매니페스트 탐색에서 제외할 디렉토리 이름
/// - **osv_url**: 취약점 조회 API 엔드포인트
/// - **min_severity**: 리포트 표시 최소 심각도
/// - **batch_size**: 조회 배치 크기
/// - **max_retries**: 조회 재시도 횟수 (최초 시도 포함)
/// - **request_timeout_secs**: 요청 타임아웃 (초)
/// - **batch_delay_ms**: 배치 간 대기 시간 (밀리초)
/// - **max_file_size**: 매니페스트 최대 크기 (바이트)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepScannerConfig {
    /// 탐색에서 제외할 디렉토리 이름
    pub exclude_dirs: Vec<String>,
    /// 취약점 조회 API 엔드포인트
    pub osv_url: String,
    /// 리포트 표시 최소 심각도
    pub min_severity: Severity,
    /// 조회 배치 크기
    pub batch_size: usize,
    /// 조회 재시도 횟수 (최초 시도 포함)
    pub max_retries: u32,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
    /// 배치 간 대기 시간 (밀리초)
    pub batch_delay_ms: u64,

    // --- 모듈 고유 확장 ---
    /// 매니페스트 최대 허용 크기 (바이트)
    pub max_file_size: usize,
}

impl Default for DepScannerConfig {
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
            min_severity: Severity::Unknown,
            batch_size: 10,
            max_retries: 3,
            request_timeout_secs: 30,
            batch_delay_ms: 100,
            max_file_size: 10 * 1024 * 1024, // 10 MB
        }
    }
}

/// 설정 상한값 상수
const MAX_BATCH_SIZE: usize = 100;
const MAX_RETRIES_LIMIT: u32 = 10;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;
const MAX_BATCH_DELAY_MS: u64 = 60_000;
const MAX_FILE_SIZE: usize = 100 * 1024 * 1024; // 100 MB

impl DepScannerConfig {
    /// core의 `ScannerConfig`에서 스캐너 설정을 생성합니다.
    ///
    /// core 설정에 없는 확장 필드는 기본값을 사용합니다.
    pub fn from_core(core: &vulnscout_core::config::ScannerConfig) -> Self {
        let min_severity =
            Severity::from_str_loose(&core.min_severity).unwrap_or(Severity::Unknown);

        Self {
            exclude_dirs: core.exclude_dirs.clone(),
            osv_url: core.osv_url.clone(),
            min_severity,
            batch_size: core.batch_size,
            max_retries: core.max_retries,
            request_timeout_secs: core.request_timeout_secs,
            batch_delay_ms: core.batch_delay_ms,
            ..Self::default()
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `osv_url`: http(s) URL
    /// - `batch_size`: 1-100
    /// - `max_retries`: 1-10
    /// - `request_timeout_secs`: 1-300
    /// - `batch_delay_ms`: 0-60000
    /// - `max_file_size`: 1-104857600 (100MB)
    /// - `exclude_dirs`: 항목에 경로 구분자가 들어가면 안 됨 (디렉토리 이름만 허용)
    pub fn validate(&self) -> Result<(), DepScannerError> {
        if !self.osv_url.starts_with("http://") && !self.osv_url.starts_with("https://") {
            return Err(DepScannerError::Config {
                field: "osv_url".to_owned(),
                reason: "must be an http(s) URL".to_owned(),
            });
        }

        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(DepScannerError::Config {
                field: "batch_size".to_owned(),
                reason: format!("must be 1-{MAX_BATCH_SIZE}"),
            });
        }

        if self.max_retries == 0 || self.max_retries > MAX_RETRIES_LIMIT {
            return Err(DepScannerError::Config {
                field: "max_retries".to_owned(),
                reason: format!("must be 1-{MAX_RETRIES_LIMIT}"),
            });
        }

        if self.request_timeout_secs == 0 || self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(DepScannerError::Config {
                field: "request_timeout_secs".to_owned(),
                reason: format!("must be 1-{MAX_REQUEST_TIMEOUT_SECS}"),
            });
        }

        if self.batch_delay_ms > MAX_BATCH_DELAY_MS {
            return Err(DepScannerError::Config {
                field: "batch_delay_ms".to_owned(),
                reason: format!("must be 0-{MAX_BATCH_DELAY_MS}"),
            });
        }

        if self.max_file_size == 0 || self.max_file_size > MAX_FILE_SIZE {
            return Err(DepScannerError::Config {
                field: "max_file_size".to_owned(),
                reason: format!("must be 1-{MAX_FILE_SIZE}"),
            });
        }

        for dir in &self.exclude_dirs {
            if dir.is_empty() {
                return Err(DepScannerError::Config {
                    field: "exclude_dirs".to_owned(),
                    reason: "exclude directory name must not be empty".to_owned(),
                });
            }
            if dir.contains('/') || dir.contains('\\') {
                return Err(DepScannerError::Config {
                    field: "exclude_dirs".to_owned(),
                    reason: format!("'{dir}' must be a directory name, not a path"),
                });
            }
        }

        Ok(())
    }
}

/// [`DepScannerConfig`] 빌더
///
/// 유연한 설정 구성 및 빌드 시 유효성 검증을 제공합니다.
#[derive(Default)]
pub struct DepScannerConfigBuilder {
    config: DepScannerConfig,
}

impl DepScannerConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 제외 디렉토리 목록을 설정합니다.
    pub fn exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.config.exclude_dirs = dirs;
        self
    }

    /// OSV API 엔드포인트를 설정합니다.
    pub fn osv_url(mut self, url: impl Into<String>) -> Self {
        self.config.osv_url = url.into();
        self
    }

    /// 최소 심각도를 설정합니다.
    pub fn min_severity(mut self, severity: Severity) -> Self {
        self.config.min_severity = severity;
        self
    }

    /// 배치 크기를 설정합니다.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// 재시도 횟수를 설정합니다.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// 요청 타임아웃(초)을 설정합니다.
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    /// 배치 간 대기 시간(밀리초)을 설정합니다.
    pub fn batch_delay_ms(mut self, ms: u64) -> Self {
        self.config.batch_delay_ms = ms;
        self
    }

    /// 매니페스트 최대 크기(바이트)를 설정합니다.
    pub fn max_file_size(mut self, size: usize) -> Self {
        self.config.max_file_size = size;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    pub fn build(self) -> Result<DepScannerConfig, DepScannerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
