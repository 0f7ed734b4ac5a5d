//! Java 매니페스트 파서 -- pom.xml, build.gradle
//!
//! [`PomXmlParser`]는 Maven POM의 `<dependency>` 블록을,
//! [`GradleParser`]는 Gradle 빌드 스크립트의 `group:artifact:version`
//! 표기 의존성을 추출합니다. 의존성 좌표만 필요하므로 전체 XML/Groovy
//! 파서 대신 문자열 스캔으로 처리합니다.

use std::path::Path;

use tracing::debug;

use crate::error::DepScannerError;
use crate::parser::ManifestParser;
use crate::types::{Dependency, Ecosystem};

/// pom.xml 파서
///
/// `<dependency>` 블록에서 groupId/artifactId/version을 추출합니다.
/// 이름은 OSV Maven 규약에 따라 `group:artifact` 형식입니다.
/// `${...}` 속성 참조 버전은 해석할 수 없어 건너뜁니다.
pub struct PomXmlParser;

impl ManifestParser for PomXmlParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Maven
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "pom.xml")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<Vec<Dependency>, DepScannerError> {
        let mut deps = Vec::new();
        let mut rest = content;

        while let Some(start) = rest.find("<dependency>") {
            let after_start = &rest[start + "<dependency>".len()..];
            let Some(end) = after_start.find("</dependency>") else {
                break;
            };
            let block = &after_start[..end];
            rest = &after_start[end + "</dependency>".len()..];

            let Some(group_id) = extract_tag(block, "groupId") else {
                continue;
            };
            let Some(artifact_id) = extract_tag(block, "artifactId") else {
                continue;
            };
            let Some(pom_version) = extract_tag(block, "version") else {
                continue;
            };

            // ${project.version} 등 속성 참조는 해석 불가
            if pom_version.contains("${") {
                debug!(
                    group = %group_id,
                    artifact = %artifact_id,
                    version = %pom_version,
                    "skipping property reference version"
                );
                continue;
            }

            deps.push(Dependency {
                name: format!("{group_id}:{artifact_id}"),
                version: pom_version,
                ecosystem: Ecosystem::Maven,
                file_path: source_path.to_owned(),
                line_number: None,
            });
        }

        Ok(deps)
    }
}

/// 블록에서 `<tag>value</tag>`의 값을 추출합니다.
fn extract_tag(block: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = block.find(&open)? + open.len();
    let end = block[start..].find(&close)? + start;
    let value = block[start..end].trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

/// build.gradle 파서
///
/// `implementation 'group:artifact:version'` 형식의 선언을 추출합니다.
/// Groovy/Kotlin DSL 양쪽의 따옴표 스타일을 처리합니다.
pub struct GradleParser;

/// 의존성 좌표가 올 수 있는 Gradle configuration 목록
const GRADLE_CONFIGURATIONS: &[&str] = &[
    "implementation",
    "api",
    "compile",
    "compileOnly",
    "runtimeOnly",
    "testImplementation",
    "testCompile",
    "annotationProcessor",
];

impl ManifestParser for GradleParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Maven
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "build.gradle")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<Vec<Dependency>, DepScannerError> {
        let mut deps = Vec::new();

        for (idx, raw_line) in content.lines().enumerate() {
            let line_number = (idx + 1) as u32;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }

            let Some(rest) = GRADLE_CONFIGURATIONS
                .iter()
                .find_map(|cfg| strip_configuration(line, cfg))
            else {
                continue;
            };

            let Some(coordinate) = extract_quoted(rest) else {
                continue;
            };

            // group:artifact:version 좌표만 처리
            let parts: Vec<&str> = coordinate.split(':').collect();
            if parts.len() < 3 {
                continue;
            }
            let (group, artifact, coord_version) = (parts[0], parts[1], parts[2]);
            if group.is_empty() || artifact.is_empty() || coord_version.is_empty() {
                continue;
            }
            if coord_version.contains('$') {
                debug!(coordinate = %coordinate, "skipping interpolated version");
                continue;
            }

            deps.push(Dependency {
                name: format!("{group}:{artifact}"),
                version: coord_version.to_owned(),
                ecosystem: Ecosystem::Maven,
                file_path: source_path.to_owned(),
                line_number: Some(line_number),
            });
        }

        Ok(deps)
    }
}

/// `implementation 'x'` 또는 `implementation('x')` 에서 configuration 접두사를 제거합니다.
fn strip_configuration<'a>(line: &'a str, cfg: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(cfg)?;
    // "implementationFoo" 같은 다른 식별자와 구분
    if rest.starts_with(' ') || rest.starts_with('(') {
        Some(rest)
    } else {
        None
    }
}

/// 첫 번째 따옴표 쌍(단일 또는 이중) 안의 문자열을 추출합니다.
fn extract_quoted(input: &str) -> Option<&str> {
    let start = input.find(['\'', '"'])?;
    let quote = input.as_bytes()[start] as char;
    let rest = &input[start + 1..];
    let end = rest.find(quote)?;
    Some(&rest[..end])
}
