//! 스캐너 도메인 타입
//!
//! 의존성([`Dependency`]), 생태계([`Ecosystem`]), 스캔 결과([`ScanResult`]) 등
//! 스캔 파이프라인 전체에서 사용되는 타입을 정의합니다.

use std::fmt;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use vulnscout_core::types::{Severity, Vulnerability};

/// 패키지 생태계
///
/// 지원하는 8개 생태계를 나타냅니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ecosystem {
    /// npm (package.json, package-lock.json)
    Npm,
    /// PyPI (requirements.txt, Pipfile, Pipfile.lock)
    PyPi,
    /// crates.io (Cargo.toml, Cargo.lock)
    Cargo,
    /// Go modules (go.mod, go.sum)
    Go,
    /// Maven (pom.xml, build.gradle)
    Maven,
    /// Packagist (composer.json)
    Packagist,
    /// RubyGems (Gemfile, Gemfile.lock)
    RubyGems,
    /// NuGet (*.csproj)
    Nuget,
}

impl Ecosystem {
    /// OSV API가 사용하는 생태계 이름을 반환합니다.
    pub fn osv_name(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::PyPi => "PyPI",
            Self::Cargo => "crates.io",
            Self::Go => "Go",
            Self::Maven => "Maven",
            Self::Packagist => "Packagist",
            Self::RubyGems => "RubyGems",
            Self::Nuget => "NuGet",
        }
    }

    /// 문자열에서 생태계를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "npm" | "node" => Some(Self::Npm),
            "pypi" | "pip" | "python" => Some(Self::PyPi),
            "cargo" | "crates.io" | "rust" => Some(Self::Cargo),
            "go" | "golang" => Some(Self::Go),
            "maven" | "java" => Some(Self::Maven),
            "packagist" | "composer" | "php" => Some(Self::Packagist),
            "rubygems" | "gem" | "ruby" => Some(Self::RubyGems),
            "nuget" | "dotnet" => Some(Self::Nuget),
            _ => None,
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Npm => write!(f, "npm"),
            Self::PyPi => write!(f, "pypi"),
            Self::Cargo => write!(f, "cargo"),
            Self::Go => write!(f, "go"),
            Self::Maven => write!(f, "maven"),
            Self::Packagist => write!(f, "packagist"),
            Self::RubyGems => write!(f, "rubygems"),
            Self::Nuget => write!(f, "nuget"),
        }
    }
}

/// 선언된 직접 의존성
///
/// 매니페스트 파일에서 추출한 의존성 하나를 나타냅니다.
/// 동일성 기준은 (name, version, ecosystem, file_path)이며,
/// 취약점 조회 시에는 (name, 정규화된 version, ecosystem)으로 중복을 제거합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// 패키지 이름
    pub name: String,
    /// 매니페스트에 선언된 버전 요구사항 (예: "^4.17.0", "==2.25.1")
    pub version: String,
    /// 패키지 생태계
    pub ecosystem: Ecosystem,
    /// 선언된 매니페스트 파일 경로
    pub file_path: String,
    /// 선언된 줄 번호 (줄 단위 형식에서만 기록)
    pub line_number: Option<u32>,
}

impl Dependency {
    /// 조회용 정규화된 버전을 반환합니다.
    pub fn normalized_version(&self) -> String {
        crate::version::normalize(&self.version)
    }

    /// 조회 중복 제거에 사용하는 키를 반환합니다.
    pub fn query_key(&self) -> (String, String, Ecosystem) {
        (self.name.clone(), self.normalized_version(), self.ecosystem)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) [{}]",
            self.name, self.version, self.ecosystem, self.file_path,
        )
    }
}

/// 취약한 의존성 하나에 대한 리포트
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VulnerabilityReport {
    /// 대상 의존성
    pub dependency: Dependency,
    /// 매칭된 취약점 목록 (어드바이저리 ID 기준 정렬)
    pub vulnerabilities: Vec<Vulnerability>,
}

/// 심각도별 취약점 집계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    /// Critical 개수
    pub critical: u64,
    /// High 개수
    pub high: u64,
    /// Medium 개수
    pub medium: u64,
    /// Low 개수
    pub low: u64,
    /// Unknown 개수
    pub unknown: u64,
}

impl SeverityCounts {
    /// 해당 심각도의 카운트를 1 증가시킵니다.
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
            Severity::Unknown => self.unknown += 1,
        }
    }

    /// 전체 취약점 개수를 반환합니다.
    pub fn total(&self) -> u64 {
        self.critical + self.high + self.medium + self.low + self.unknown
    }
}

/// 스캔 결과
///
/// # 불변 조건
///
/// - `vulnerable_dependencies == reports.len()`
/// - `total_vulnerabilities == reports의 취약점 개수 합`
/// - `severity_counts.total() == total_vulnerabilities`
/// - `reports`는 (name, version, ecosystem) 기준으로 유일
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// 스캔 고유 ID
    pub scan_id: String,
    /// 스캔 대상 프로젝트 경로
    pub project_path: String,
    /// 스캔 시작 시각
    pub timestamp: SystemTime,
    /// 조회한 고유 의존성 수
    pub total_dependencies: usize,
    /// 취약점이 발견된 의존성 수
    pub vulnerable_dependencies: usize,
    /// 발견된 취약점 총수
    pub total_vulnerabilities: usize,
    /// 심각도별 집계
    pub severity_counts: SeverityCounts,
    /// 의존성별 리포트 (name, version, ecosystem 기준 정렬)
    pub reports: Vec<VulnerabilityReport>,
    /// 스캔 소요 시간
    pub scan_duration: Duration,
}

impl ScanResult {
    /// 발견된 취약점 중 가장 높은 심각도를 반환합니다.
    ///
    /// 취약점이 없으면 `None`을 반환합니다.
    pub fn max_severity(&self) -> Option<Severity> {
        self.reports
            .iter()
            .flat_map(|r| r.vulnerabilities.iter())
            .map(|v| v.severity)
            .max()
    }

    /// 취약점이 하나라도 발견되었는지 여부를 반환합니다.
    pub fn has_vulnerabilities(&self) -> bool {
        !self.reports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dependency() -> Dependency {
        Dependency {
            name: "lodash".to_owned(),
            version: "^4.17.0".to_owned(),
            ecosystem: Ecosystem::Npm,
            file_path: "package.json".to_owned(),
            line_number: None,
        }
    }

    fn sample_vuln(id: &str, severity: Severity) -> Vulnerability {
        Vulnerability {
            id: id.to_owned(),
            summary: "test advisory".to_owned(),
            severity,
            cvss_score: None,
            cve_ids: vec![],
            fixed_versions: vec![],
            references: vec![],
            published: None,
            modified: None,
        }
    }

    #[test]
    fn ecosystem_osv_names() {
        assert_eq!(Ecosystem::Npm.osv_name(), "npm");
        assert_eq!(Ecosystem::PyPi.osv_name(), "PyPI");
        assert_eq!(Ecosystem::Cargo.osv_name(), "crates.io");
        assert_eq!(Ecosystem::Go.osv_name(), "Go");
        assert_eq!(Ecosystem::Maven.osv_name(), "Maven");
        assert_eq!(Ecosystem::Packagist.osv_name(), "Packagist");
        assert_eq!(Ecosystem::RubyGems.osv_name(), "RubyGems");
        assert_eq!(Ecosystem::Nuget.osv_name(), "NuGet");
    }

    #[test]
    fn ecosystem_from_str_loose() {
        assert_eq!(Ecosystem::from_str_loose("npm"), Some(Ecosystem::Npm));
        assert_eq!(Ecosystem::from_str_loose("PyPI"), Some(Ecosystem::PyPi));
        assert_eq!(Ecosystem::from_str_loose("RUST"), Some(Ecosystem::Cargo));
        assert_eq!(Ecosystem::from_str_loose("golang"), Some(Ecosystem::Go));
        assert_eq!(
            Ecosystem::from_str_loose("composer"),
            Some(Ecosystem::Packagist)
        );
        assert_eq!(Ecosystem::from_str_loose("brew"), None);
    }

    #[test]
    fn ecosystem_display() {
        assert_eq!(Ecosystem::Npm.to_string(), "npm");
        assert_eq!(Ecosystem::Cargo.to_string(), "cargo");
        assert_eq!(Ecosystem::RubyGems.to_string(), "rubygems");
    }

    #[test]
    fn dependency_display() {
        let dep = sample_dependency();
        let display = dep.to_string();
        assert!(display.contains("lodash"));
        assert!(display.contains("^4.17.0"));
        assert!(display.contains("npm"));
        assert!(display.contains("package.json"));
    }

    #[test]
    fn dependency_query_key_normalizes_version() {
        let dep = sample_dependency();
        let (name, version, eco) = dep.query_key();
        assert_eq!(name, "lodash");
        assert_eq!(version, "4.17.0");
        assert_eq!(eco, Ecosystem::Npm);
    }

    #[test]
    fn severity_counts_add_and_total() {
        let mut counts = SeverityCounts::default();
        counts.add(Severity::Critical);
        counts.add(Severity::High);
        counts.add(Severity::High);
        counts.add(Severity::Low);
        counts.add(Severity::Unknown);

        assert_eq!(counts.critical, 1);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.medium, 0);
        assert_eq!(counts.low, 1);
        assert_eq!(counts.unknown, 1);
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn scan_result_max_severity() {
        let result = ScanResult {
            scan_id: "scan-001".to_owned(),
            project_path: "/app".to_owned(),
            timestamp: SystemTime::now(),
            total_dependencies: 3,
            vulnerable_dependencies: 1,
            total_vulnerabilities: 2,
            severity_counts: SeverityCounts {
                high: 1,
                medium: 1,
                ..Default::default()
            },
            reports: vec![VulnerabilityReport {
                dependency: sample_dependency(),
                vulnerabilities: vec![
                    sample_vuln("GHSA-aaaa", Severity::Medium),
                    sample_vuln("GHSA-bbbb", Severity::High),
                ],
            }],
            scan_duration: Duration::from_millis(150),
        };

        assert_eq!(result.max_severity(), Some(Severity::High));
        assert!(result.has_vulnerabilities());
    }

    #[test]
    fn scan_result_empty_has_no_max_severity() {
        let result = ScanResult {
            scan_id: "scan-002".to_owned(),
            project_path: "/app".to_owned(),
            timestamp: SystemTime::now(),
            total_dependencies: 10,
            vulnerable_dependencies: 0,
            total_vulnerabilities: 0,
            severity_counts: SeverityCounts::default(),
            reports: vec![],
            scan_duration: Duration::from_millis(10),
        };

        assert_eq!(result.max_severity(), None);
        assert!(!result.has_vulnerabilities());
    }

    #[test]
    fn scan_result_serialize_roundtrip() {
        let result = ScanResult {
            scan_id: "scan-003".to_owned(),
            project_path: "/srv/app".to_owned(),
            timestamp: SystemTime::now(),
            total_dependencies: 1,
            vulnerable_dependencies: 1,
            total_vulnerabilities: 1,
            severity_counts: SeverityCounts {
                critical: 1,
                ..Default::default()
            },
            reports: vec![VulnerabilityReport {
                dependency: sample_dependency(),
                vulnerabilities: vec![sample_vuln("GHSA-cccc", Severity::Critical)],
            }],
            scan_duration: Duration::from_secs(2),
        };

        let json = serde_json::to_string(&result).unwrap();
        let deserialized: ScanResult = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.scan_id, "scan-003");
        assert_eq!(deserialized.reports.len(), 1);
        assert_eq!(deserialized.severity_counts.critical, 1);
    }
}
