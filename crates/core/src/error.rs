//! 에러 타입 — 도메인별 에러 정의

/// Vulnscout 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum VulnscoutError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 스캔 파이프라인 에러
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 스캔 파이프라인 에러
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// 스캔 대상 경로가 유효하지 않음 (치명적, 스캔 전체 실패)
    #[error("invalid project root: {reason}")]
    ProjectRoot { reason: String },

    /// 매니페스트 탐색 실패
    #[error("manifest discovery failed at '{path}': {reason}")]
    Discovery { path: String, reason: String },

    /// 매니페스트 파싱 실패
    #[error("failed to parse manifest '{path}': {reason}")]
    ManifestParse { path: String, reason: String },

    /// 취약점 API 조회 실패
    #[error("vulnerability query failed: {reason}")]
    Query { reason: String },
}
