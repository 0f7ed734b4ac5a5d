//! 어드바이저리 상관 -- OSV 응답을 스캔 리포트로 변환
//!
//! 조회 결과를 도메인 [`Vulnerability`]로 정규화하고, 의존성별 리포트로
//! 묶은 뒤 전체 집계를 계산합니다.
//!
//! # 심각도 결정 순서
//!
//! 1. `severity` 항목 중 CVSS v3 점수가 숫자로 파싱되면 점수 구간으로 결정
//! 2. `database_specific.severity` 라벨이 있으면 라벨로 결정
//! 3. 둘 다 없으면 Unknown

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::time::{Duration, SystemTime};

use tracing::debug;
use uuid::Uuid;

use vulnscout_core::types::{Severity, Vulnerability};

use crate::osv::schema::OsvAdvisory;
use crate::types::{Dependency, Ecosystem, ScanResult, SeverityCounts, VulnerabilityReport};

/// OSV 어드바이저리를 도메인 취약점으로 정규화합니다.
pub fn normalize_advisory(advisory: &OsvAdvisory) -> Vulnerability {
    let cvss_score = cvss_base_score(advisory);
    let severity = match cvss_score {
        Some(score) => Severity::from_cvss(score),
        None => severity_label(advisory).unwrap_or(Severity::Unknown),
    };

    Vulnerability {
        id: advisory.id.clone(),
        summary: advisory
            .summary
            .clone()
            .or_else(|| advisory.details.clone())
            .unwrap_or_default(),
        severity,
        cvss_score,
        cve_ids: extract_cve_ids(advisory),
        fixed_versions: extract_fixed_versions(advisory),
        references: advisory.references.iter().map(|r| r.url.clone()).collect(),
        published: advisory.published.clone(),
        modified: advisory.modified.clone(),
    }
}

/// severity 항목에서 CVSS v3 숫자 점수를 찾습니다.
///
/// OSV는 보통 벡터 문자열을 담지만, 일부 소스는 숫자 점수를 그대로 담습니다.
/// 벡터 문자열은 점수로 환산하지 않고 라벨 경로로 넘어갑니다.
fn cvss_base_score(advisory: &OsvAdvisory) -> Option<f64> {
    advisory
        .severity
        .iter()
        .filter(|s| s.severity_type.starts_with("CVSS_V3"))
        .find_map(|s| s.score.trim().parse::<f64>().ok())
}

/// `database_specific.severity` 라벨에서 심각도를 읽습니다.
fn severity_label(advisory: &OsvAdvisory) -> Option<Severity> {
    let label = advisory
        .database_specific
        .as_ref()?
        .get("severity")?
        .as_str()?;
    Severity::from_str_loose(label)
}

/// id와 aliases에서 CVE ID를 추출합니다.
pub fn extract_cve_ids(advisory: &OsvAdvisory) -> Vec<String> {
    let mut cves = BTreeSet::new();
    for candidate in std::iter::once(&advisory.id).chain(advisory.aliases.iter()) {
        if is_cve_id(candidate) {
            cves.insert(candidate.clone());
        }
    }
    cves.into_iter().collect()
}

/// "CVE-YYYY-NNNN" 형식인지 확인합니다.
fn is_cve_id(id: &str) -> bool {
    let Some(rest) = id.strip_prefix("CVE-") else {
        return false;
    };
    let Some((year, seq)) = rest.split_once('-') else {
        return false;
    };
    year.len() == 4
        && year.bytes().all(|b| b.is_ascii_digit())
        && seq.len() >= 4
        && seq.bytes().all(|b| b.is_ascii_digit())
}

/// affected 범위 이벤트에서 수정 버전을 추출합니다.
pub fn extract_fixed_versions(advisory: &OsvAdvisory) -> Vec<String> {
    let mut fixed = BTreeSet::new();
    for affected in &advisory.affected {
        for range in &affected.ranges {
            for event in &range.events {
                if let Some(version) = &event.fixed {
                    fixed.insert(version.clone());
                }
            }
        }
    }
    fixed.into_iter().collect()
}

/// 조회 결과를 의존성별 리포트로 묶습니다.
///
/// - 의존성마다 어드바이저리를 ID 기준으로 중복 제거
/// - (name, version, ecosystem)이 같은 의존성의 리포트는 하나로 병합
/// - 리포트와 취약점 모두 결정적 순서로 정렬
pub fn build_reports(
    query_results: Vec<(Dependency, Vec<OsvAdvisory>)>,
) -> Vec<VulnerabilityReport> {
    let mut grouped: BTreeMap<(String, String, Ecosystem), (Dependency, Vec<Vulnerability>)> =
        BTreeMap::new();
    let mut seen_ids: BTreeMap<(String, String, Ecosystem), HashSet<String>> = BTreeMap::new();

    for (dep, advisories) in query_results {
        if advisories.is_empty() {
            continue;
        }

        let key = dep.query_key();
        let seen = seen_ids.entry(key.clone()).or_default();
        let entry = grouped.entry(key).or_insert_with(|| (dep, Vec::new()));

        for advisory in &advisories {
            if !seen.insert(advisory.id.clone()) {
                debug!(advisory = %advisory.id, "skipping duplicate advisory");
                continue;
            }
            entry.1.push(normalize_advisory(advisory));
        }
    }

    let mut reports: Vec<VulnerabilityReport> = grouped
        .into_values()
        .filter(|(_, vulns)| !vulns.is_empty())
        .map(|(dependency, mut vulnerabilities)| {
            vulnerabilities.sort_by(|a, b| a.id.cmp(&b.id));
            VulnerabilityReport {
                dependency,
                vulnerabilities,
            }
        })
        .collect();

    reports.sort_by(|a, b| {
        a.dependency
            .name
            .cmp(&b.dependency.name)
            .then_with(|| a.dependency.version.cmp(&b.dependency.version))
            .then_with(|| {
                a.dependency
                    .ecosystem
                    .to_string()
                    .cmp(&b.dependency.ecosystem.to_string())
            })
    });

    reports
}

/// 리포트로부터 스캔 결과를 조립합니다.
///
/// 집계 필드는 모두 `reports`에서 계산되므로 결과의 불변 조건이
/// 구성상 항상 성립합니다.
pub fn assemble_result(
    project_path: String,
    timestamp: SystemTime,
    total_dependencies: usize,
    reports: Vec<VulnerabilityReport>,
    scan_duration: Duration,
) -> ScanResult {
    let mut severity_counts = SeverityCounts::default();
    let mut total_vulnerabilities = 0;

    for report in &reports {
        for vuln in &report.vulnerabilities {
            severity_counts.add(vuln.severity);
            total_vulnerabilities += 1;
        }
    }

    ScanResult {
        scan_id: Uuid::new_v4().to_string(),
        project_path,
        timestamp,
        total_dependencies,
        vulnerable_dependencies: reports.len(),
        total_vulnerabilities,
        severity_counts,
        reports,
        scan_duration,
    }
}
