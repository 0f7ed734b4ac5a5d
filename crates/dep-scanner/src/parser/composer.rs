//! PHP 매니페스트 파서 -- composer.json
//!
//! [`ComposerJsonParser`]는 `require`/`require-dev` 섹션의 패키지를 추출합니다.
//! `php`, `ext-*`, `lib-*` 같은 플랫폼 패키지는 Packagist 패키지가 아니므로
//! 건너뜁니다.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::DepScannerError;
use crate::parser::ManifestParser;
use crate::types::{Dependency, Ecosystem};
use crate::version;

/// composer.json 파서
pub struct ComposerJsonParser;

/// composer.json 구조 (파싱용)
#[derive(Deserialize)]
struct ComposerJsonFile {
    #[serde(default)]
    require: HashMap<String, String>,
    #[serde(default, rename = "require-dev")]
    require_dev: HashMap<String, String>,
}

impl ManifestParser for ComposerJsonParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Packagist
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "composer.json")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<Vec<Dependency>, DepScannerError> {
        let manifest: ComposerJsonFile =
            serde_json::from_str(content).map_err(|e| DepScannerError::ManifestParse {
                path: source_path.to_owned(),
                reason: e.to_string(),
            })?;

        let mut deps = Vec::new();
        for (name, requirement) in manifest.require.iter().chain(manifest.require_dev.iter()) {
            if is_platform_package(name) {
                continue;
            }
            // "dev-main" 같은 브랜치 참조와 버전 없는 선언은 건너뜀
            if requirement.starts_with("dev-") || version::normalize(requirement).is_empty() {
                debug!(package = %name, requirement = %requirement, "skipping unversioned entry");
                continue;
            }

            deps.push(Dependency {
                name: name.clone(),
                version: requirement.clone(),
                ecosystem: Ecosystem::Packagist,
                file_path: source_path.to_owned(),
                line_number: None,
            });
        }

        deps.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(deps)
    }
}

/// Packagist 패키지가 아닌 플랫폼 요구사항인지 판별합니다.
///
/// Packagist 패키지명은 항상 `vendor/package` 형식입니다.
fn is_platform_package(name: &str) -> bool {
    name == "php"
        || name.starts_with("php-")
        || name.starts_with("ext-")
        || name.starts_with("lib-")
        || !name.contains('/')
}
