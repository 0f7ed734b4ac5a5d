//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 심각도와 정규화된 취약점 등, 스캐너와 CLI가 공유하는
//! 데이터 구조를 정의합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 심각도 레벨
///
/// 취약점의 심각도를 나타냅니다.
/// `Ord` 구현으로 심각도 비교가 가능합니다 (`Unknown < Low < Medium < High < Critical`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    /// 심각도 정보 없음
    #[default]
    Unknown,
    /// 낮은 심각도
    Low,
    /// 중간 심각도
    Medium,
    /// 높은 심각도
    High,
    /// 치명적 — 즉시 대응 필요
    Critical,
}

impl Severity {
    /// CVSS v3 기본 점수를 심각도 구간으로 변환합니다.
    ///
    /// | 점수 | 심각도 |
    /// |---|---|
    /// | >= 9.0 | Critical |
    /// | >= 7.0 | High |
    /// | >= 4.0 | Medium |
    /// | > 0.0 | Low |
    /// | 그 외 | Unknown |
    pub fn from_cvss(score: f64) -> Self {
        if score >= 9.0 {
            Self::Critical
        } else if score >= 7.0 {
            Self::High
        } else if score >= 4.0 {
            Self::Medium
        } else if score > 0.0 {
            Self::Low
        } else {
            Self::Unknown
        }
    }

    /// 문자열에서 심각도를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unknown" | "none" => Some(Self::Unknown),
            "low" => Some(Self::Low),
            "medium" | "med" | "moderate" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// 정규화된 취약점 정보
///
/// 업스트림 어드바이저리(OSV 등)를 스캐너 내부 표현으로 정규화한 결과입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    /// 어드바이저리 ID (예: GHSA-jf85-cpcp-j695, CVE-2024-1234)
    pub id: String,
    /// 요약 설명
    pub summary: String,
    /// 심각도
    pub severity: Severity,
    /// CVSS v3 기본 점수 (숫자 점수가 제공된 경우)
    pub cvss_score: Option<f64>,
    /// 연관된 CVE ID 목록 (정렬, 중복 제거)
    pub cve_ids: Vec<String>,
    /// 수정된 버전 목록 (정렬, 중복 제거)
    pub fixed_versions: Vec<String>,
    /// 참고 자료 URL
    pub references: Vec<String>,
    /// 공개 시각 (RFC 3339 문자열)
    pub published: Option<String>,
    /// 최종 수정 시각 (RFC 3339 문자열)
    pub modified: Option<String>,
}

impl fmt::Display for Vulnerability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} (fixed: {})",
            self.id,
            self.severity,
            self.summary,
            if self.fixed_versions.is_empty() {
                "N/A".to_owned()
            } else {
                self.fixed_versions.join(", ")
            },
        )
    }
}
