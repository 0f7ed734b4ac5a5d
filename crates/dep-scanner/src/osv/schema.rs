//! OSV v1 API 와이어 스키마
//!
//! <https://osv.dev/docs/> 의 쿼리 요청과 어드바이저리 응답 구조입니다.
//! 응답 필드는 어드바이저리마다 채워지는 정도가 달라 전부 `#[serde(default)]`로
//! 관대하게 파싱합니다.

use serde::{Deserialize, Serialize};

/// `POST /v1/query` 요청 본문
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsvQuery {
    /// 조회 대상 패키지
    pub package: OsvQueryPackage,
    /// 정규화된 고정 버전
    pub version: String,
}

impl OsvQuery {
    /// 패키지 좌표로 쿼리를 생성합니다.
    pub fn new(name: impl Into<String>, ecosystem: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            package: OsvQueryPackage {
                name: name.into(),
                ecosystem: ecosystem.into(),
            },
            version: version.into(),
        }
    }
}

/// 쿼리의 패키지 좌표
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsvQueryPackage {
    /// 패키지 이름
    pub name: String,
    /// OSV 생태계 이름 (예: "npm", "PyPI", "crates.io")
    pub ecosystem: String,
}

/// `POST /v1/query` 응답 본문
///
/// 취약점이 없으면 `vulns`가 생략된 빈 객체가 반환됩니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsvQueryResponse {
    /// 매칭된 어드바이저리 목록
    #[serde(default)]
    pub vulns: Vec<OsvAdvisory>,
}

/// OSV 어드바이저리
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsvAdvisory {
    /// 어드바이저리 ID (예: "GHSA-jf85-cpcp-j695")
    pub id: String,
    /// 한 줄 요약
    #[serde(default)]
    pub summary: Option<String>,
    /// 상세 설명
    #[serde(default)]
    pub details: Option<String>,
    /// 별칭 ID 목록 (CVE 등)
    #[serde(default)]
    pub aliases: Vec<String>,
    /// 게시 시각 (RFC 3339)
    #[serde(default)]
    pub published: Option<String>,
    /// 수정 시각 (RFC 3339)
    #[serde(default)]
    pub modified: Option<String>,
    /// 참고 링크 목록
    #[serde(default)]
    pub references: Vec<OsvReference>,
    /// 영향받는 패키지/버전 범위 목록
    #[serde(default)]
    pub affected: Vec<OsvAffected>,
    /// 심각도 항목 목록 (CVSS 벡터 등)
    #[serde(default)]
    pub severity: Vec<OsvSeverity>,
    /// 데이터베이스별 부가 정보 (라벨 심각도 등)
    #[serde(default)]
    pub database_specific: Option<serde_json::Value>,
}

/// 심각도 항목
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsvSeverity {
    /// 심각도 종류 (예: "CVSS_V3", "CVSS_V2")
    #[serde(rename = "type")]
    pub severity_type: String,
    /// 점수 (CVSS 벡터 문자열 또는 숫자 문자열)
    pub score: String,
}

/// 영향받는 패키지와 버전 범위
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsvAffected {
    /// 패키지 좌표
    #[serde(default)]
    pub package: Option<OsvQueryPackage>,
    /// 버전 범위 목록
    #[serde(default)]
    pub ranges: Vec<OsvRange>,
    /// 명시적 버전 목록
    #[serde(default)]
    pub versions: Vec<String>,
}

/// 버전 범위
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsvRange {
    /// 범위 종류 (예: "SEMVER", "ECOSYSTEM", "GIT")
    #[serde(default, rename = "type")]
    pub range_type: String,
    /// 범위 이벤트 목록
    #[serde(default)]
    pub events: Vec<OsvEvent>,
}

/// 범위 이벤트
///
/// 각 이벤트는 `introduced`, `fixed`, `last_affected`, `limit` 중 하나만 가집니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsvEvent {
    /// 취약점이 도입된 버전
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduced: Option<String>,
    /// 취약점이 수정된 버전
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<String>,
    /// 마지막으로 영향받는 버전
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_affected: Option<String>,
    /// 범위 상한
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

/// 참고 링크
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsvReference {
    /// 링크 종류 (예: "ADVISORY", "FIX", "WEB")
    #[serde(default, rename = "type")]
    pub reference_type: String,
    /// URL
    pub url: String,
}
