//! Ruby 매니페스트 파서 -- Gemfile, Gemfile.lock
//!
//! [`GemfileParser`]는 `gem 'name', '~> 1.2'` 선언을,
//! [`GemfileLockParser`]는 lockfile의 `specs:` 섹션에서 고정 버전을 추출합니다.

use std::path::Path;

use tracing::debug;

use crate::error::DepScannerError;
use crate::parser::ManifestParser;
use crate::types::{Dependency, Ecosystem};

/// Gemfile 파서
///
/// 버전 요구사항이 명시된 `gem` 선언만 추출합니다.
/// 버전 없는 선언은 lockfile 없이는 버전을 알 수 없으므로 건너뜁니다.
pub struct GemfileParser;

impl ManifestParser for GemfileParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::RubyGems
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "Gemfile")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<Vec<Dependency>, DepScannerError> {
        let mut deps = Vec::new();

        for (idx, raw_line) in content.lines().enumerate() {
            let line_number = (idx + 1) as u32;
            let line = raw_line.trim();
            if !line.starts_with("gem ") && !line.starts_with("gem(") {
                continue;
            }

            let mut tokens = quoted_tokens(line);
            let Some(name) = tokens.next() else {
                continue;
            };
            // 두 번째 따옴표 토큰이 버전 요구사항
            let Some(requirement) = tokens.next() else {
                debug!(gem = %name, line_number, "skipping unversioned gem declaration");
                continue;
            };
            // ">= 0" 같은 토큰 뒤에 오는 것은 옵션 해시 값일 수 있으나
            // 버전 요구사항은 항상 첫 번째 추가 인자
            if !requirement.starts_with(|c: char| c.is_ascii_digit())
                && !requirement.starts_with(['~', '>', '<', '='])
            {
                debug!(gem = %name, line_number, "skipping gem with non-version argument");
                continue;
            }

            deps.push(Dependency {
                name: name.to_owned(),
                version: requirement.to_owned(),
                ecosystem: Ecosystem::RubyGems,
                file_path: source_path.to_owned(),
                line_number: Some(line_number),
            });
        }

        Ok(deps)
    }
}

/// 줄에서 작은따옴표/큰따옴표로 감싼 토큰을 순서대로 반환합니다.
fn quoted_tokens(line: &str) -> impl Iterator<Item = &str> {
    let mut rest = line;
    std::iter::from_fn(move || {
        let start = rest.find(['\'', '"'])?;
        let quote = rest.as_bytes()[start] as char;
        let after = &rest[start + 1..];
        let end = after.find(quote)?;
        let token = &after[..end];
        rest = &after[end + 1..];
        Some(token)
    })
}

/// Gemfile.lock 파서
///
/// `specs:` 섹션의 4칸 들여쓰기 항목(직접 해석된 gem)만 추출합니다.
/// 6칸 들여쓰기 항목은 전이 의존성의 요구사항이므로 건너뜁니다.
pub struct GemfileLockParser;

impl ManifestParser for GemfileLockParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::RubyGems
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "Gemfile.lock")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<Vec<Dependency>, DepScannerError> {
        let mut deps = Vec::new();
        let mut in_specs = false;

        for (idx, raw_line) in content.lines().enumerate() {
            let line_number = (idx + 1) as u32;

            if raw_line.trim_end() == "  specs:" {
                in_specs = true;
                continue;
            }
            if !in_specs {
                continue;
            }
            // specs 섹션은 들여쓰기가 끝나면 종료
            if !raw_line.starts_with("    ") {
                in_specs = false;
                continue;
            }
            // 6칸 들여쓰기는 전이 의존성 요구사항
            if raw_line.starts_with("      ") {
                continue;
            }

            let Some((name, lock_version)) = parse_spec_line(raw_line.trim()) else {
                continue;
            };

            deps.push(Dependency {
                name,
                version: lock_version,
                ecosystem: Ecosystem::RubyGems,
                file_path: source_path.to_owned(),
                line_number: Some(line_number),
            });
        }

        Ok(deps)
    }
}

/// `rails (7.0.4)` 형식의 spec 줄을 (이름, 버전)으로 분리합니다.
fn parse_spec_line(line: &str) -> Option<(String, String)> {
    let open = line.find('(')?;
    let close = line.rfind(')')?;
    if close <= open {
        return None;
    }
    let name = line[..open].trim();
    let spec_version = line[open + 1..close].trim();
    if name.is_empty() || spec_version.is_empty() {
        return None;
    }
    // "(>= 1.0)" 같은 요구사항이 아닌 고정 버전만
    if !spec_version.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Some((name.to_owned(), spec_version.to_owned()))
}
