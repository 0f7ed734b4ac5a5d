//! Python 매니페스트 파서 -- requirements.txt, Pipfile, Pipfile.lock
//!
//! [`RequirementsTxtParser`]는 줄 단위 requirements 형식을,
//! [`PipfileParser`]는 TOML 기반 Pipfile을,
//! [`PipfileLockParser`]는 JSON 기반 Pipfile.lock을 파싱합니다.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::DepScannerError;
use crate::parser::ManifestParser;
use crate::types::{Dependency, Ecosystem};
use crate::version;

/// requirements.txt 파서
///
/// `name==1.2.3` 형식의 줄을 파싱하며, 줄 번호를 기록합니다.
/// 주석, 빈 줄, 옵션 줄(`-r`, `--hash` 등)은 건너뜁니다.
pub struct RequirementsTxtParser;

impl ManifestParser for RequirementsTxtParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::PyPi
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "requirements.txt")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<Vec<Dependency>, DepScannerError> {
        let mut deps = Vec::new();

        for (idx, raw_line) in content.lines().enumerate() {
            let line_number = (idx + 1) as u32;
            let line = raw_line.trim();

            // 주석, 빈 줄, pip 옵션(-r, -e, --hash 등)은 건너뜀
            if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
                continue;
            }

            // 인라인 주석과 환경 마커 제거
            let line = line.split('#').next().unwrap_or("").trim();
            let line = line.split(';').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((name, requirement)) = split_requirement(line) else {
                debug!(line = %raw_line, line_number, "skipping unversioned requirement");
                continue;
            };

            deps.push(Dependency {
                name,
                version: requirement,
                ecosystem: Ecosystem::PyPi,
                file_path: source_path.to_owned(),
                line_number: Some(line_number),
            });
        }

        Ok(deps)
    }
}

/// `requests[security]==2.25.1` 형식에서 (이름, 버전 요구사항)을 분리합니다.
///
/// 버전 연산자가 없는 줄은 `None`.
fn split_requirement(line: &str) -> Option<(String, String)> {
    let op_pos = line.find(['=', '<', '>', '~', '!'])?;
    let name_part = line[..op_pos].trim();
    let requirement = line[op_pos..].trim();

    // extras 제거: requests[security] -> requests
    let name = name_part.split('[').next().unwrap_or(name_part).trim();
    if name.is_empty() || requirement.is_empty() {
        return None;
    }

    Some((name.to_owned(), requirement.to_owned()))
}

/// Pipfile 파서
///
/// `[packages]`와 `[dev-packages]` 섹션의 선언을 추출합니다.
pub struct PipfileParser;

impl ManifestParser for PipfileParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::PyPi
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "Pipfile")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<Vec<Dependency>, DepScannerError> {
        let value: toml::Value =
            toml::from_str(content).map_err(|e| DepScannerError::ManifestParse {
                path: source_path.to_owned(),
                reason: e.to_string(),
            })?;

        let mut deps = Vec::new();
        for section in ["packages", "dev-packages"] {
            let Some(table) = value.get(section).and_then(|v| v.as_table()) else {
                continue;
            };
            for (name, entry) in table {
                // 문자열 값("==1.2.3") 또는 테이블의 version 필드
                let requirement = match entry {
                    toml::Value::String(s) => s.clone(),
                    toml::Value::Table(t) => match t.get("version").and_then(|v| v.as_str()) {
                        Some(s) => s.to_owned(),
                        None => continue, // git/path 참조는 건너뜀
                    },
                    _ => continue,
                };

                if version::normalize(&requirement).is_empty() {
                    debug!(package = %name, requirement = %requirement, "skipping unversioned entry");
                    continue;
                }

                deps.push(Dependency {
                    name: name.clone(),
                    version: requirement,
                    ecosystem: Ecosystem::PyPi,
                    file_path: source_path.to_owned(),
                    line_number: None,
                });
            }
        }

        deps.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(deps)
    }
}

/// Pipfile.lock 파서
///
/// `default`와 `develop` 섹션의 고정 버전을 추출합니다.
pub struct PipfileLockParser;

/// Pipfile.lock 구조 (파싱용)
#[derive(Deserialize)]
struct PipfileLockFile {
    #[serde(default)]
    default: HashMap<String, PipfileLockEntry>,
    #[serde(default)]
    develop: HashMap<String, PipfileLockEntry>,
}

/// Pipfile.lock 내 개별 패키지 (파싱용)
#[derive(Deserialize)]
struct PipfileLockEntry {
    #[serde(default)]
    version: Option<String>,
}

impl ManifestParser for PipfileLockParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::PyPi
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "Pipfile.lock")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<Vec<Dependency>, DepScannerError> {
        let lock_file: PipfileLockFile =
            serde_json::from_str(content).map_err(|e| DepScannerError::ManifestParse {
                path: source_path.to_owned(),
                reason: e.to_string(),
            })?;

        let mut deps = Vec::new();
        for (name, entry) in lock_file.default.iter().chain(lock_file.develop.iter()) {
            let Some(requirement) = &entry.version else {
                continue;
            };
            deps.push(Dependency {
                name: name.clone(),
                version: requirement.clone(),
                ecosystem: Ecosystem::PyPi,
                file_path: source_path.to_owned(),
                line_number: None,
            });
        }

        deps.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(deps)
    }
}
