//! `vulnscout scan` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use vulnscout_core::config::VulnscoutConfig;
use vulnscout_core::types::Severity;
use vulnscout_dep_scanner::{DepScannerBuilder, DepScannerConfig, ScanResult};

use crate::cli::ScanArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `scan` command.
///
/// Returns the severity gate exit code on success:
/// 0 = no HIGH/CRITICAL findings, 1 = HIGH findings, 2 = CRITICAL findings.
pub async fn execute(
    args: ScanArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<i32, CliError> {
    // Missing config file is fine; defaults apply.
    let config = if config_path.exists() {
        VulnscoutConfig::load(config_path).await?
    } else {
        debug!(path = %config_path.display(), "config file not found, using defaults");
        VulnscoutConfig::default()
    };

    let mut scanner_config = DepScannerConfig::from_core(&config.scanner);
    if let Some(min_severity) = &args.min_severity {
        scanner_config.min_severity = parse_severity(min_severity)?;
    }

    let scanner = DepScannerBuilder::new().config(scanner_config.clone()).build()?;

    info!(path = %args.path.display(), "starting dependency scan");
    let result = scanner.scan(&args.path).await?;

    let report = ScanReport::new(result, scanner_config.min_severity);
    writer.render(&report)?;

    Ok(report.exit_code())
}

fn parse_severity(s: &str) -> Result<Severity, CliError> {
    Severity::from_str_loose(s).ok_or_else(|| {
        CliError::Command(format!(
            "invalid severity: {s} (expected: unknown, low, medium, high, critical)"
        ))
    })
}

/// Scan output payload.
///
/// The full result drives the exit code; `min_severity` only filters
/// what is displayed.
#[derive(Serialize)]
pub struct ScanReport {
    /// Complete scan result (all findings, unfiltered)
    pub result: ScanResult,
    /// Minimum severity applied to the displayed findings
    pub min_severity: Severity,
}

impl ScanReport {
    /// Wrap a scan result with a display threshold.
    pub fn new(result: ScanResult, min_severity: Severity) -> Self {
        Self {
            result,
            min_severity,
        }
    }

    /// Severity gate exit code, computed from all findings.
    pub fn exit_code(&self) -> i32 {
        if self.result.severity_counts.critical > 0 {
            2
        } else if self.result.severity_counts.high > 0 {
            1
        } else {
            0
        }
    }

    /// Copy of the result with findings below the threshold removed.
    fn displayed_result(&self) -> ScanResult {
        let mut filtered = self.result.clone();
        for report in &mut filtered.reports {
            report
                .vulnerabilities
                .retain(|v| v.severity >= self.min_severity);
        }
        filtered.reports.retain(|r| !r.vulnerabilities.is_empty());
        filtered
    }
}

impl Render for ScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let displayed = self.displayed_result();
        write!(w, "{}", vulnscout_dep_scanner::format_report(&displayed))?;

        let hidden = self.result.total_vulnerabilities
            - displayed
                .reports
                .iter()
                .map(|r| r.vulnerabilities.len())
                .sum::<usize>();
        if hidden > 0 {
            writeln!(
                w,
                "\n{}",
                format!(
                    "({hidden} finding(s) below {} hidden; exit code reflects all findings)",
                    self.min_severity
                )
                .dimmed()
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use vulnscout_core::types::Vulnerability;
    use vulnscout_dep_scanner::{Dependency, Ecosystem, SeverityCounts, VulnerabilityReport};

    fn vuln(id: &str, severity: Severity) -> Vulnerability {
        Vulnerability {
            id: id.to_owned(),
            summary: "test".to_owned(),
            severity,
            cvss_score: None,
            cve_ids: vec![],
            fixed_versions: vec![],
            references: vec![],
            published: None,
            modified: None,
        }
    }

    fn result_with(vulns: Vec<Vulnerability>) -> ScanResult {
        let mut severity_counts = SeverityCounts::default();
        for v in &vulns {
            severity_counts.add(v.severity);
        }
        let reports = if vulns.is_empty() {
            vec![]
        } else {
            vec![VulnerabilityReport {
                dependency: Dependency {
                    name: "lodash".to_owned(),
                    version: "4.17.0".to_owned(),
                    ecosystem: Ecosystem::Npm,
                    file_path: "package.json".to_owned(),
                    line_number: None,
                },
                vulnerabilities: vulns,
            }]
        };

        ScanResult {
            scan_id: "scan-test".to_owned(),
            project_path: "/app".to_owned(),
            timestamp: SystemTime::now(),
            total_dependencies: 5,
            vulnerable_dependencies: reports.len(),
            total_vulnerabilities: severity_counts.total() as usize,
            severity_counts,
            reports,
            scan_duration: Duration::from_millis(10),
        }
    }

    #[test]
    fn test_exit_code_clean_scan() {
        let report = ScanReport::new(result_with(vec![]), Severity::Unknown);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_exit_code_low_findings_only() {
        let report = ScanReport::new(
            result_with(vec![vuln("GHSA-a", Severity::Low), vuln("GHSA-b", Severity::Medium)]),
            Severity::Unknown,
        );
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_exit_code_high_findings() {
        let report = ScanReport::new(
            result_with(vec![vuln("GHSA-a", Severity::High)]),
            Severity::Unknown,
        );
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_critical_dominates_high() {
        let report = ScanReport::new(
            result_with(vec![
                vuln("GHSA-a", Severity::High),
                vuln("GHSA-b", Severity::Critical),
            ]),
            Severity::Unknown,
        );
        assert_eq!(report.exit_code(), 2);
    }

    #[test]
    fn test_min_severity_filters_display_not_exit_code() {
        let report = ScanReport::new(
            result_with(vec![
                vuln("GHSA-a", Severity::Low),
                vuln("GHSA-b", Severity::Critical),
            ]),
            Severity::High,
        );

        let displayed = report.displayed_result();
        assert_eq!(displayed.reports[0].vulnerabilities.len(), 1);
        assert_eq!(displayed.reports[0].vulnerabilities[0].id, "GHSA-b");
        // exit code still computed from all findings
        assert_eq!(report.exit_code(), 2);
    }

    #[test]
    fn test_display_drops_fully_filtered_reports() {
        let report = ScanReport::new(
            result_with(vec![vuln("GHSA-a", Severity::Low)]),
            Severity::Critical,
        );
        let displayed = report.displayed_result();
        assert!(displayed.reports.is_empty());
    }

    #[test]
    fn test_render_text_mentions_hidden_findings() {
        let report = ScanReport::new(
            result_with(vec![
                vuln("GHSA-a", Severity::Low),
                vuln("GHSA-b", Severity::Critical),
            ]),
            Severity::High,
        );

        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render succeeds");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("GHSA-b"));
        assert!(!output.contains("GHSA-a\n"));
        assert!(output.contains("1 finding(s) below High hidden"));
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!(parse_severity("critical").unwrap(), Severity::Critical);
        assert_eq!(parse_severity("HIGH").unwrap(), Severity::High);
        assert!(parse_severity("bogus").is_err());
    }
}
