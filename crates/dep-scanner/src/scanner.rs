//! 의존성 스캐너 -- 스캔 파이프라인 오케스트레이터
//!
//! 탐색, 파싱, 조회, 상관, 집계를 하나의 `scan()` 호출로 묶습니다.
//! 개별 매니페스트의 실패는 진단으로 보고하고 스캔은 계속됩니다.
//! 치명적 에러는 잘못된 스캔 대상 경로뿐입니다.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime};

use tokio::task;
use tracing::{debug, info};

use crate::config::DepScannerConfig;
use crate::correlate;
use crate::diag::{Diagnostic, DiagnosticKind, DiagnosticSink, TracingSink};
use crate::error::DepScannerError;
use crate::locator::ManifestLocator;
use crate::osv::client::{AdvisoryProvider, OsvClient};
use crate::parser::{self, ManifestParser};
use crate::types::{Dependency, ScanResult};

/// 스캐너 누적 통계
#[derive(Debug, Clone, Copy, Default)]
pub struct ScannerStats {
    /// 완료된 스캔 수
    pub scans_completed: u64,
    /// 발견된 취약점 총수
    pub vulnerabilities_found: u64,
}

/// 의존성 취약점 스캐너
///
/// 어드바이저리 제공자는 제네릭으로 주입됩니다.
/// 운영에서는 [`OsvClient`], 테스트에서는 인메모리 구현을 사용합니다.
pub struct DepScanner<P: AdvisoryProvider> {
    config: DepScannerConfig,
    locator: ManifestLocator,
    parsers: Vec<Box<dyn ManifestParser>>,
    provider: P,
    diag: Arc<dyn DiagnosticSink>,
    scans_completed: Arc<AtomicU64>,
    vulnerabilities_found: Arc<AtomicU64>,
}

impl<P: AdvisoryProvider> DepScanner<P> {
    /// 프로젝트를 스캔하고 결과를 반환합니다.
    ///
    /// # Errors
    ///
    /// 스캔 대상 경로가 디렉토리가 아니면 `ProjectRoot` 에러를 반환합니다.
    /// 매니페스트 파싱 실패와 조회 실패는 에러가 아니라 진단으로 보고됩니다.
    pub async fn scan(&self, root: &Path) -> Result<ScanResult, DepScannerError> {
        if !root.is_dir() {
            return Err(DepScannerError::ProjectRoot {
                reason: format!("{} is not a directory", root.display()),
            });
        }

        let started = Instant::now();
        let timestamp = SystemTime::now();
        info!(root = %root.display(), "dependency scan started");

        let files = self.load_manifests(root).await?;
        let dependencies = self.parse_manifests(&files);
        let deduped = dedupe_dependencies(dependencies);
        let total_dependencies = deduped.len();
        debug!(
            manifests = files.len(),
            dependencies = total_dependencies,
            "manifests parsed"
        );

        let query_results = self.provider.fetch_advisories(deduped).await;
        let reports = correlate::build_reports(query_results);

        let result = correlate::assemble_result(
            root.display().to_string(),
            timestamp,
            total_dependencies,
            reports,
            started.elapsed(),
        );

        self.scans_completed.fetch_add(1, Ordering::Relaxed);
        self.vulnerabilities_found
            .fetch_add(result.total_vulnerabilities as u64, Ordering::Relaxed);

        info!(
            scan_id = %result.scan_id,
            dependencies = result.total_dependencies,
            vulnerable = result.vulnerable_dependencies,
            vulnerabilities = result.total_vulnerabilities,
            duration_ms = result.scan_duration.as_millis() as u64,
            "dependency scan complete"
        );
        Ok(result)
    }

    /// 매니페스트를 찾아 내용을 읽습니다.
    ///
    /// 파일 I/O는 blocking 스레드에서 수행합니다. 크기 제한을 넘거나
    /// 읽을 수 없는 파일은 진단으로 보고하고 건너뜁니다.
    async fn load_manifests(&self, root: &Path) -> Result<Vec<(PathBuf, String)>, DepScannerError> {
        let locator = self.locator.clone();
        let diag = Arc::clone(&self.diag);
        let root = root.to_path_buf();
        let max_file_size = self.config.max_file_size;

        task::spawn_blocking(move || {
            let manifests = locator.discover(&root, diag.as_ref());
            let mut files = Vec::with_capacity(manifests.len());

            for path in manifests {
                match std::fs::metadata(&path) {
                    Ok(meta) if meta.len() as usize > max_file_size => {
                        diag.report(Diagnostic::new(
                            DiagnosticKind::Parse,
                            path.display().to_string(),
                            format!("file too large: {} bytes (max: {max_file_size})", meta.len()),
                        ));
                        continue;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        diag.report(Diagnostic::new(
                            DiagnosticKind::Discovery,
                            path.display().to_string(),
                            e.to_string(),
                        ));
                        continue;
                    }
                }

                match std::fs::read_to_string(&path) {
                    Ok(content) => files.push((path, content)),
                    Err(e) => {
                        diag.report(Diagnostic::new(
                            DiagnosticKind::Parse,
                            path.display().to_string(),
                            e.to_string(),
                        ));
                    }
                }
            }

            files
        })
        .await
        .map_err(|e| DepScannerError::Discovery {
            path: "manifest discovery task".to_owned(),
            reason: e.to_string(),
        })
    }

    /// 읽은 매니페스트를 파싱합니다.
    ///
    /// 파싱 실패는 진단으로 보고하고 다음 파일로 넘어갑니다.
    fn parse_manifests(&self, files: &[(PathBuf, String)]) -> Vec<Dependency> {
        let mut dependencies = Vec::new();

        for (path, content) in files {
            let Some(manifest_parser) = self.parsers.iter().find(|p| p.can_parse(path)) else {
                continue;
            };

            let source_path = path.display().to_string();
            match manifest_parser.parse(content, &source_path) {
                Ok(mut deps) => {
                    debug!(
                        path = %source_path,
                        ecosystem = %manifest_parser.ecosystem(),
                        dependencies = deps.len(),
                        "manifest parsed"
                    );
                    dependencies.append(&mut deps);
                }
                Err(e) => {
                    self.diag
                        .report(Diagnostic::new(DiagnosticKind::Parse, source_path, e.to_string()));
                }
            }
        }

        dependencies
    }

    /// 스캐너 설정을 반환합니다.
    pub fn config(&self) -> &DepScannerConfig {
        &self.config
    }

    /// 누적 통계를 반환합니다.
    pub fn stats(&self) -> ScannerStats {
        ScannerStats {
            scans_completed: self.scans_completed.load(Ordering::Relaxed),
            vulnerabilities_found: self.vulnerabilities_found.load(Ordering::Relaxed),
        }
    }
}

/// (name, 정규화된 version, ecosystem) 기준으로 중복을 제거합니다.
///
/// 첫 번째 선언을 유지합니다.
fn dedupe_dependencies(dependencies: Vec<Dependency>) -> Vec<Dependency> {
    let mut seen = HashSet::new();
    dependencies
        .into_iter()
        .filter(|dep| seen.insert(dep.query_key()))
        .collect()
}

/// [`DepScanner`] 빌더
pub struct DepScannerBuilder {
    config: DepScannerConfig,
    diag: Option<Arc<dyn DiagnosticSink>>,
}

impl Default for DepScannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DepScannerBuilder {
    /// 기본 설정을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: DepScannerConfig::default(),
            diag: None,
        }
    }

    /// 스캐너 설정을 지정합니다.
    pub fn config(mut self, config: DepScannerConfig) -> Self {
        self.config = config;
        self
    }

    /// 진단 싱크를 지정합니다.
    ///
    /// 지정하지 않으면 [`TracingSink`]를 사용합니다.
    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diag = Some(sink);
        self
    }

    /// OSV 클라이언트를 제공자로 하는 스캐너를 빌드합니다.
    pub fn build(self) -> Result<DepScanner<OsvClient>, DepScannerError> {
        self.config.validate()?;
        let provider = OsvClient::new(&self.config)?;
        self.build_with_provider(provider)
    }

    /// 임의의 어드바이저리 제공자로 스캐너를 빌드합니다.
    pub fn build_with_provider<P: AdvisoryProvider>(
        self,
        provider: P,
    ) -> Result<DepScanner<P>, DepScannerError> {
        self.config.validate()?;
        Ok(DepScanner {
            locator: ManifestLocator::new(self.config.exclude_dirs.clone()),
            parsers: parser::default_parsers(),
            provider,
            diag: self.diag.unwrap_or_else(|| Arc::new(TracingSink)),
            scans_completed: Arc::new(AtomicU64::new(0)),
            vulnerabilities_found: Arc::new(AtomicU64::new(0)),
            config: self.config,
        })
    }
}
