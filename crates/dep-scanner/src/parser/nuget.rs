//! .NET 매니페스트 파서 -- *.csproj
//!
//! [`CsprojParser`]는 MSBuild 프로젝트 파일의 `<PackageReference>` 항목을
//! 추출합니다. `Version` 어트리뷰트와 중첩 `<Version>` 요소 형식을 모두
//! 처리합니다.

use std::path::Path;

use tracing::debug;

use crate::error::DepScannerError;
use crate::parser::ManifestParser;
use crate::types::{Dependency, Ecosystem};

/// *.csproj 파서
pub struct CsprojParser;

impl ManifestParser for CsprojParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Nuget
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some("csproj")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<Vec<Dependency>, DepScannerError> {
        let mut deps = Vec::new();
        let mut offset = 0;
        let mut rest = content;

        while let Some(pos) = rest.find("<PackageReference") {
            let tag_start = offset + pos;
            let after = &rest[pos..];
            let Some(tag_end) = after.find('>') else {
                break;
            };
            let tag = &after[..tag_end + 1];

            let Some(name) = extract_attribute(tag, "Include") else {
                rest = &after[tag_end + 1..];
                offset = tag_start + tag_end + 1;
                continue;
            };

            let ref_version = match extract_attribute(tag, "Version") {
                Some(v) => Some(v),
                None if !tag.ends_with("/>") => {
                    // 중첩 <Version> 요소 형식
                    after[tag_end + 1..]
                        .split("</PackageReference>")
                        .next()
                        .and_then(extract_version_element)
                }
                None => None,
            };

            if let Some(ref_version) = ref_version {
                deps.push(Dependency {
                    name,
                    version: ref_version,
                    ecosystem: Ecosystem::Nuget,
                    file_path: source_path.to_owned(),
                    line_number: Some(line_number_at(content, tag_start)),
                });
            } else {
                debug!(package = %name, "skipping PackageReference without version");
            }

            rest = &after[tag_end + 1..];
            offset = tag_start + tag_end + 1;
        }

        Ok(deps)
    }
}

/// 태그에서 `Name="value"` 어트리뷰트 값을 추출합니다.
fn extract_attribute(tag: &str, name: &str) -> Option<String> {
    let marker = format!("{name}=\"");
    let start = tag.find(&marker)? + marker.len();
    let end = tag[start..].find('"')? + start;
    let value = tag[start..end].trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

/// 블록에서 `<Version>value</Version>` 요소 값을 추출합니다.
fn extract_version_element(block: &str) -> Option<String> {
    let start = block.find("<Version>")? + "<Version>".len();
    let end = block[start..].find("</Version>")? + start;
    let value = block[start..end].trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

/// 바이트 오프셋이 속한 줄 번호(1부터)를 계산합니다.
fn line_number_at(content: &str, offset: usize) -> u32 {
    (content[..offset].bytes().filter(|b| *b == b'\n').count() + 1) as u32
}
