//! 의존성 스캐너 에러 타입
//!
//! [`DepScannerError`]는 스캐너 모듈 내에서 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<DepScannerError> for VulnscoutError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **스캔 대상**: `ProjectRoot`
//! - **매니페스트 탐색**: `Discovery`
//! - **매니페스트 파싱**: `ManifestParse`
//! - **취약점 조회**: `Query`
//! - **설정**: `Config`
//!
//! 개별 파일의 읽기 실패나 크기 초과는 에러가 아니라 진단
//! ([`crate::diag::Diagnostic`])으로 보고되고 스캔은 계속됩니다.

use vulnscout_core::error::{ScanError, VulnscoutError};

/// 의존성 스캐너 도메인 에러
///
/// 스캐너 내부의 모든 에러 시나리오를 포함합니다.
///
/// 파싱 에러와 네트워크 에러는 스캔 루프 안에서 흡수되어 진단으로만 보고되고,
/// 이 타입으로 `scan()`이 실패하는 것은 치명적 에러(`ProjectRoot`, `Config`)뿐입니다.
#[derive(Debug, thiserror::Error)]
pub enum DepScannerError {
    /// 스캔 대상 경로가 유효하지 않음 (치명적)
    #[error("invalid project root: {reason}")]
    ProjectRoot {
        /// 에러 사유
        reason: String,
    },

    /// 매니페스트 탐색 실패
    #[error("manifest discovery error: {path}: {reason}")]
    Discovery {
        /// 탐색 대상 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 매니페스트 파싱 실패
    #[error("manifest parse error: {path}: {reason}")]
    ManifestParse {
        /// 파싱 대상 파일 경로
        path: String,
        /// 파싱 실패 사유
        reason: String,
    },

    /// 취약점 API 조회 실패
    #[error("vulnerability query error: {0}")]
    Query(String),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },
}

impl From<DepScannerError> for VulnscoutError {
    fn from(err: DepScannerError) -> Self {
        match err {
            DepScannerError::ProjectRoot { reason } => {
                VulnscoutError::Scan(ScanError::ProjectRoot { reason })
            }
            DepScannerError::Discovery { path, reason } => {
                VulnscoutError::Scan(ScanError::Discovery { path, reason })
            }
            DepScannerError::ManifestParse { path, reason } => {
                VulnscoutError::Scan(ScanError::ManifestParse { path, reason })
            }
            DepScannerError::Query(reason) => VulnscoutError::Scan(ScanError::Query { reason }),
            DepScannerError::Config { field, reason } => {
                VulnscoutError::Config(vulnscout_core::error::ConfigError::InvalidValue {
                    field,
                    reason,
                })
            }
        }
    }
}
