//! 매니페스트 탐색 -- 프로젝트 트리에서 의존성 매니페스트 찾기
//!
//! 프로젝트 루트를 재귀적으로 순회하며 지원되는 매니페스트 파일을 찾습니다.
//! `node_modules`, `vendor` 같은 의존성 설치 디렉토리와 VCS 디렉토리는
//! 설정된 제외 목록에 따라 건너뜁니다.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::diag::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::parser;

/// 매니페스트 탐색기
#[derive(Debug, Clone)]
pub struct ManifestLocator {
    exclude_dirs: Vec<String>,
}

impl ManifestLocator {
    /// 제외 디렉토리 목록으로 탐색기를 생성합니다.
    pub fn new(exclude_dirs: Vec<String>) -> Self {
        Self { exclude_dirs }
    }

    /// 루트 이하의 모든 매니페스트 경로를 반환합니다.
    ///
    /// 읽을 수 없는 디렉토리는 탐색 진단으로 보고하고 건너뜁니다.
    /// 결과는 경로 기준으로 정렬되고 중복이 제거됩니다.
    pub fn discover(&self, root: &Path, diag: &dyn DiagnosticSink) -> Vec<PathBuf> {
        let mut manifests = BTreeSet::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry.path()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let subject = e
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| root.display().to_string());
                    diag.report(Diagnostic::new(
                        DiagnosticKind::Discovery,
                        subject,
                        e.to_string(),
                    ));
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            if parser::detect_ecosystem(entry.path()).is_some() {
                manifests.insert(entry.path().to_path_buf());
            }
        }

        debug!(
            root = %root.display(),
            count = manifests.len(),
            "manifest discovery complete"
        );
        manifests.into_iter().collect()
    }

    /// 경로의 파일 이름이 제외 디렉토리 목록에 있는지 확인합니다.
    fn is_excluded(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.exclude_dirs.iter().any(|d| d == name))
    }
}
