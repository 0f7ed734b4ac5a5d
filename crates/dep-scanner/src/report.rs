//! 텍스트 리포트 포매터
//!
//! [`ScanResult`]를 사람이 읽는 텍스트 리포트로 변환합니다.
//! 같은 결과는 항상 같은 텍스트를 만듭니다.

use std::time::UNIX_EPOCH;

use crate::types::ScanResult;

/// 스캔 결과를 텍스트 리포트로 변환합니다.
pub fn format_report(result: &ScanResult) -> String {
    let mut out = String::new();

    let unix_secs = result
        .timestamp
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    out.push_str("============================================================\n");
    out.push_str(" Dependency Vulnerability Scan Report\n");
    out.push_str("============================================================\n");
    out.push_str(&format!("Scan ID:      {}\n", result.scan_id));
    out.push_str(&format!("Project:      {}\n", result.project_path));
    out.push_str(&format!("Scanned at:   {unix_secs} (unix)\n"));
    out.push_str(&format!(
        "Duration:     {:.2}s\n",
        result.scan_duration.as_secs_f64()
    ));
    out.push_str(&format!(
        "Dependencies: {} scanned, {} vulnerable\n",
        result.total_dependencies, result.vulnerable_dependencies
    ));
    out.push_str(&format!(
        "Findings:     {} vulnerabilities\n",
        result.total_vulnerabilities
    ));
    out.push('\n');

    if !result.has_vulnerabilities() {
        out.push_str("No known vulnerabilities found.\n");
        return out;
    }

    let counts = &result.severity_counts;
    out.push_str("Severity breakdown:\n");
    out.push_str(&format!("  Critical: {}\n", counts.critical));
    out.push_str(&format!("  High:     {}\n", counts.high));
    out.push_str(&format!("  Medium:   {}\n", counts.medium));
    out.push_str(&format!("  Low:      {}\n", counts.low));
    out.push_str(&format!("  Unknown:  {}\n", counts.unknown));

    for report in &result.reports {
        let dep = &report.dependency;
        out.push_str("\n------------------------------------------------------------\n");
        out.push_str(&format!(
            "{} {} ({})\n",
            dep.name, dep.version, dep.ecosystem
        ));
        match dep.line_number {
            Some(line) => {
                out.push_str(&format!("  declared in: {}:{line}\n", dep.file_path));
            }
            None => out.push_str(&format!("  declared in: {}\n", dep.file_path)),
        }

        for vuln in &report.vulnerabilities {
            match vuln.cvss_score {
                Some(score) => out.push_str(&format!(
                    "  [{}] {} (CVSS {score:.1})\n",
                    vuln.severity, vuln.id
                )),
                None => out.push_str(&format!("  [{}] {}\n", vuln.severity, vuln.id)),
            }
            if !vuln.summary.is_empty() {
                out.push_str(&format!("    {}\n", vuln.summary));
            }
            if !vuln.cve_ids.is_empty() {
                out.push_str(&format!("    CVE: {}\n", vuln.cve_ids.join(", ")));
            }
            if vuln.fixed_versions.is_empty() {
                out.push_str("    fixed in: N/A\n");
            } else {
                out.push_str(&format!(
                    "    fixed in: {}\n",
                    vuln.fixed_versions.join(", ")
                ));
            }
            for url in &vuln.references {
                out.push_str(&format!("    ref: {url}\n"));
            }
        }
    }

    out
}
