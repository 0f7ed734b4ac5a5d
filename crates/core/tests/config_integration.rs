//! vulnscout.toml 통합 설정 테스트
//!
//! - vulnscout.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use vulnscout_core::config::VulnscoutConfig;
use vulnscout_core::error::{ConfigError, VulnscoutError};

// =============================================================================
// vulnscout.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../vulnscout.toml.example");
    let config = VulnscoutConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../vulnscout.toml.example");
    let config = VulnscoutConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_code_defaults() {
    let content = include_str!("../../../vulnscout.toml.example");
    let from_file = VulnscoutConfig::parse(content).expect("should parse");
    let from_code = VulnscoutConfig::default();

    // 모든 기본값이 코드 Default 구현과 일치하는지 확인
    assert_eq!(from_file.general.log_level, from_code.general.log_level);
    assert_eq!(from_file.general.log_format, from_code.general.log_format);
    assert_eq!(from_file.scanner.exclude_dirs, from_code.scanner.exclude_dirs);
    assert_eq!(from_file.scanner.osv_url, from_code.scanner.osv_url);
    assert_eq!(from_file.scanner.min_severity, from_code.scanner.min_severity);
    assert_eq!(from_file.scanner.batch_size, from_code.scanner.batch_size);
    assert_eq!(from_file.scanner.max_retries, from_code.scanner.max_retries);
    assert_eq!(
        from_file.scanner.request_timeout_secs,
        from_code.scanner.request_timeout_secs
    );
    assert_eq!(
        from_file.scanner.batch_delay_ms,
        from_code.scanner.batch_delay_ms
    );
}

// =============================================================================
// 부분 설정 로딩 테스트
// =============================================================================

#[test]
fn partial_config_general_only() {
    let toml = r#"
[general]
log_level = "debug"
log_format = "json"
"#;
    let config = VulnscoutConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.general.log_format, "json");
    // 나머지 섹션은 기본값
    assert_eq!(config.scanner.batch_size, 10);
    assert_eq!(config.scanner.osv_url, "https://api.osv.dev/v1/query");
}

#[test]
fn partial_config_scanner_only() {
    let toml = r#"
[scanner]
batch_size = 25
min_severity = "high"
"#;
    let config = VulnscoutConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.scanner.batch_size, 25);
    assert_eq!(config.scanner.min_severity, "high");
    // general은 기본값
    assert_eq!(config.general.log_level, "info");
    // exclude_dirs는 기본값 유지
    assert!(config.scanner.exclude_dirs.contains(&"node_modules".to_owned()));
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[general]
log_level = "info"
"#;

    let original = std::env::var("VULNSCOUT_GENERAL_LOG_LEVEL").ok();
    // SAFETY: 이 변수를 만지는 테스트는 이것 하나뿐입니다.
    unsafe {
        std::env::set_var("VULNSCOUT_GENERAL_LOG_LEVEL", "error");
    }

    let mut config = VulnscoutConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let result = config.general.log_level.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("VULNSCOUT_GENERAL_LOG_LEVEL", val),
            None => std::env::remove_var("VULNSCOUT_GENERAL_LOG_LEVEL"),
        }
    }

    assert_eq!(result, "error");
}

#[test]
fn env_override_numeric_field() {
    let original = std::env::var("VULNSCOUT_SCANNER_BATCH_SIZE").ok();
    // SAFETY: 이 변수를 만지는 테스트는 이것 하나뿐입니다.
    unsafe {
        std::env::set_var("VULNSCOUT_SCANNER_BATCH_SIZE", "42");
    }

    let mut config = VulnscoutConfig::parse("").expect("should parse");
    config.apply_env_overrides();
    let result = config.scanner.batch_size;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("VULNSCOUT_SCANNER_BATCH_SIZE", val),
            None => std::env::remove_var("VULNSCOUT_SCANNER_BATCH_SIZE"),
        }
    }

    assert_eq!(result, 42);
}

#[test]
fn env_override_csv_for_vec_fields() {
    let original = std::env::var("VULNSCOUT_SCANNER_EXCLUDE_DIRS").ok();
    // SAFETY: 이 변수를 만지는 테스트는 이것 하나뿐입니다.
    unsafe {
        std::env::set_var("VULNSCOUT_SCANNER_EXCLUDE_DIRS", "node_modules, .git, tmp");
    }

    let mut config = VulnscoutConfig::parse("").expect("should parse");
    config.apply_env_overrides();
    let result = config.scanner.exclude_dirs.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("VULNSCOUT_SCANNER_EXCLUDE_DIRS", val),
            None => std::env::remove_var("VULNSCOUT_SCANNER_EXCLUDE_DIRS"),
        }
    }

    assert_eq!(result, vec!["node_modules", ".git", "tmp"]);
}

// =============================================================================
// 빈 파일 / 잘못된 형식 에러 테스트
// =============================================================================

#[test]
fn empty_string_parses_with_defaults() {
    let config = VulnscoutConfig::parse("").expect("empty string should parse");
    config.validate().expect("should validate");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.scanner.batch_size, 10);
}

#[test]
fn whitespace_only_parses_with_defaults() {
    let config = VulnscoutConfig::parse("   \n\n  \t  ").expect("whitespace should parse");
    config.validate().expect("should validate");
    assert_eq!(config.general.log_level, "info");
}

#[test]
fn comments_only_parses_with_defaults() {
    let toml = r#"
# 이것은 주석입니다
# 모든 줄이 주석입니다
"#;
    let config = VulnscoutConfig::parse(toml).expect("comments-only should parse");
    config.validate().expect("should validate");
    assert_eq!(config.general.log_level, "info");
}

#[test]
fn malformed_toml_returns_parse_error() {
    let result = VulnscoutConfig::parse("[invalid toml");
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(matches!(
        err,
        VulnscoutError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[test]
fn wrong_type_for_numeric_field() {
    let toml = r#"
[scanner]
batch_size = "ten"
"#;
    let result = VulnscoutConfig::parse(toml);
    assert!(result.is_err());
    assert!(matches!(
        result.unwrap_err(),
        VulnscoutError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[tokio::test]
async fn from_file_nonexistent_returns_file_not_found() {
    let result = VulnscoutConfig::from_file("/tmp/vulnscout_test_nonexistent_12345.toml").await;
    assert!(result.is_err());
    assert!(matches!(
        result.unwrap_err(),
        VulnscoutError::Config(ConfigError::FileNotFound { .. })
    ));
}

// =============================================================================
// 직렬화 라운드트립 테스트
// =============================================================================

#[test]
fn serialize_and_reparse_roundtrip() {
    let original = VulnscoutConfig::default();
    let toml_str = toml::to_string_pretty(&original).expect("should serialize");
    let parsed = VulnscoutConfig::parse(&toml_str).expect("should reparse");
    parsed.validate().expect("reparsed should validate");

    assert_eq!(original.general.log_level, parsed.general.log_level);
    assert_eq!(original.scanner.osv_url, parsed.scanner.osv_url);
    assert_eq!(original.scanner.exclude_dirs, parsed.scanner.exclude_dirs);
}
