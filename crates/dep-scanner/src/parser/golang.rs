//! Go 매니페스트 파서 -- go.mod, go.sum
//!
//! [`GoModParser`]는 go.mod의 `require` 선언을,
//! [`GoSumParser`]는 go.sum의 체크섬 항목에서 모듈 버전을 추출합니다.

use std::collections::HashSet;
use std::path::Path;

use crate::error::DepScannerError;
use crate::parser::ManifestParser;
use crate::types::{Dependency, Ecosystem};

/// go.mod 파서
///
/// 단일 `require` 줄과 `require ( ... )` 블록을 모두 처리합니다.
/// `module`, `go`, `replace`, `exclude` 지시어는 무시합니다.
pub struct GoModParser;

impl ManifestParser for GoModParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Go
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "go.mod")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<Vec<Dependency>, DepScannerError> {
        let mut deps = Vec::new();
        let mut in_require_block = false;

        for (idx, raw_line) in content.lines().enumerate() {
            let line_number = (idx + 1) as u32;
            // 인라인 주석 제거
            let line = raw_line.split("//").next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            if in_require_block {
                if line == ")" {
                    in_require_block = false;
                    continue;
                }
                if let Some(dep) = parse_require_entry(line, source_path, line_number) {
                    deps.push(dep);
                }
                continue;
            }

            if line == "require (" {
                in_require_block = true;
                continue;
            }

            if let Some(rest) = line.strip_prefix("require ")
                && let Some(dep) = parse_require_entry(rest.trim(), source_path, line_number)
            {
                deps.push(dep);
            }
        }

        Ok(deps)
    }
}

/// `github.com/gin-gonic/gin v1.9.1` 형식의 require 항목을 파싱합니다.
fn parse_require_entry(entry: &str, source_path: &str, line_number: u32) -> Option<Dependency> {
    let mut parts = entry.split_whitespace();
    let module = parts.next()?;
    let module_version = parts.next()?;

    // Go 모듈 버전은 항상 v로 시작
    if !module_version.starts_with('v') {
        return None;
    }

    Some(Dependency {
        name: module.to_owned(),
        version: module_version.to_owned(),
        ecosystem: Ecosystem::Go,
        file_path: source_path.to_owned(),
        line_number: Some(line_number),
    })
}

/// go.sum 파서
///
/// `module version hash` 형식의 항목을 파싱합니다.
/// `/go.mod` 접미사가 붙은 체크섬 항목은 본체 항목과 중복이므로 건너뜁니다.
pub struct GoSumParser;

impl ManifestParser for GoSumParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Go
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "go.sum")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<Vec<Dependency>, DepScannerError> {
        let mut deps = Vec::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();

        for (idx, raw_line) in content.lines().enumerate() {
            let line_number = (idx + 1) as u32;
            let mut parts = raw_line.split_whitespace();
            let Some(module) = parts.next() else {
                continue;
            };
            let Some(module_version) = parts.next() else {
                continue;
            };

            // "v1.2.3/go.mod" 항목은 본체와 중복
            let module_version = match module_version.strip_suffix("/go.mod") {
                Some(stripped) => stripped,
                None => module_version,
            };
            if !module_version.starts_with('v') {
                continue;
            }

            if !seen.insert((module.to_owned(), module_version.to_owned())) {
                continue;
            }

            deps.push(Dependency {
                name: module.to_owned(),
                version: module_version.to_owned(),
                ecosystem: Ecosystem::Go,
                file_path: source_path.to_owned(),
                line_number: Some(line_number),
            });
        }

        Ok(deps)
    }
}
