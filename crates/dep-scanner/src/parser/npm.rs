//! npm 매니페스트 파서 -- package.json, package-lock.json
//!
//! [`PackageJsonParser`]는 package.json의 `dependencies`/`devDependencies`를,
//! [`NpmLockParser`]는 package-lock.json (v1/v2/v3)의 패키지 항목을 추출합니다.
//!
//! # package-lock.json v3 형식 예시
//!
//! ```json
//! {
//!   "name": "my-app",
//!   "lockfileVersion": 3,
//!   "packages": {
//!     "": { "name": "my-app", "version": "1.0.0" },
//!     "node_modules/lodash": { "version": "4.17.21", "integrity": "sha512-..." }
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::DepScannerError;
use crate::parser::ManifestParser;
use crate::types::{Dependency, Ecosystem};
use crate::version;

/// package.json 파서
///
/// `dependencies`와 `devDependencies` 섹션의 선언을 추출합니다.
pub struct PackageJsonParser;

/// package.json 구조 (파싱용)
#[derive(Deserialize)]
struct PackageJsonFile {
    #[serde(default)]
    dependencies: HashMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: HashMap<String, String>,
}

impl ManifestParser for PackageJsonParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "package.json")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<Vec<Dependency>, DepScannerError> {
        let manifest: PackageJsonFile =
            serde_json::from_str(content).map_err(|e| DepScannerError::ManifestParse {
                path: source_path.to_owned(),
                reason: e.to_string(),
            })?;

        let mut deps = Vec::new();
        for (name, requirement) in manifest
            .dependencies
            .iter()
            .chain(manifest.dev_dependencies.iter())
        {
            // 로컬 경로, git 참조, 태그("latest") 등 버전이 없는 선언은 건너뜀
            if version::normalize(requirement).is_empty() {
                debug!(package = %name, requirement = %requirement, "skipping unversioned entry");
                continue;
            }
            deps.push(Dependency {
                name: name.clone(),
                version: requirement.clone(),
                ecosystem: Ecosystem::Npm,
                file_path: source_path.to_owned(),
                line_number: None,
            });
        }

        deps.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(deps)
    }
}

/// package-lock.json 파서
///
/// NPM lockfile v1/v2/v3 형식을 파싱합니다.
pub struct NpmLockParser;

/// package-lock.json 구조 (파싱용)
#[derive(Deserialize)]
struct NpmLockFile {
    /// v2/v3 packages 맵
    #[serde(default)]
    packages: HashMap<String, NpmPackageEntry>,
    /// v1 dependencies 맵 (packages가 비어있을 때만 사용)
    #[serde(default)]
    dependencies: HashMap<String, NpmV1Entry>,
}

/// package-lock.json v2/v3 내 개별 패키지 (파싱용)
#[derive(Deserialize)]
struct NpmPackageEntry {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    link: bool,
}

/// package-lock.json v1 내 개별 패키지 (파싱용)
#[derive(Deserialize)]
struct NpmV1Entry {
    #[serde(default)]
    version: Option<String>,
}

impl ManifestParser for NpmLockParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "package-lock.json")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<Vec<Dependency>, DepScannerError> {
        let lock_file: NpmLockFile =
            serde_json::from_str(content).map_err(|e| DepScannerError::ManifestParse {
                path: source_path.to_owned(),
                reason: e.to_string(),
            })?;

        let mut deps = Vec::new();

        if !lock_file.packages.is_empty() {
            for (key, entry) in &lock_file.packages {
                // 루트 패키지는 키가 빈 문자열
                if key.is_empty() || entry.link {
                    continue;
                }
                let Some(version) = &entry.version else {
                    continue; // 버전 없는 항목은 건너뜀
                };

                deps.push(Dependency {
                    name: extract_package_name(key),
                    version: version.clone(),
                    ecosystem: Ecosystem::Npm,
                    file_path: source_path.to_owned(),
                    line_number: None,
                });
            }
        } else {
            // v1 fallback: 최상위 dependencies 맵만 사용
            for (name, entry) in &lock_file.dependencies {
                let Some(version) = &entry.version else {
                    continue;
                };
                deps.push(Dependency {
                    name: name.clone(),
                    version: version.clone(),
                    ecosystem: Ecosystem::Npm,
                    file_path: source_path.to_owned(),
                    line_number: None,
                });
            }
        }

        deps.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(deps)
    }
}

/// "node_modules/@scope/name" 또는 "node_modules/name" 에서 패키지명 추출
fn extract_package_name(key: &str) -> String {
    // 마지막 "node_modules/" 이후의 부분을 패키지명으로 사용
    // scoped 패키지는 "node_modules/@scope/name" 형식
    if let Some(pos) = key.rfind("node_modules/") {
        key[pos + "node_modules/".len()..].to_owned()
    } else {
        key.to_owned()
    }
}
