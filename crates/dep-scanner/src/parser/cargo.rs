//! Rust 매니페스트 파서 -- Cargo.toml, Cargo.lock
//!
//! [`CargoTomlParser`]는 Cargo.toml의 의존성 섹션을,
//! [`CargoLockParser`]는 Cargo.lock의 `[[package]]` 항목을 추출합니다.

use std::path::Path;

use tracing::debug;

use crate::error::DepScannerError;
use crate::parser::ManifestParser;
use crate::types::{Dependency, Ecosystem};
use crate::version;

/// Cargo.toml 파서
///
/// `dependencies`, `dev-dependencies`, `build-dependencies`,
/// `workspace.dependencies` 섹션의 선언을 추출합니다.
pub struct CargoTomlParser;

impl ManifestParser for CargoTomlParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cargo
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "Cargo.toml")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<Vec<Dependency>, DepScannerError> {
        let value: toml::Value =
            toml::from_str(content).map_err(|e| DepScannerError::ManifestParse {
                path: source_path.to_owned(),
                reason: e.to_string(),
            })?;

        let mut deps = Vec::new();
        let sections = [
            value.get("dependencies"),
            value.get("dev-dependencies"),
            value.get("build-dependencies"),
            value.get("workspace").and_then(|w| w.get("dependencies")),
        ];

        for table in sections.into_iter().flatten().filter_map(|v| v.as_table()) {
            for (name, entry) in table {
                // 문자열 값("1.2.3") 또는 테이블의 version 필드
                let requirement = match entry {
                    toml::Value::String(s) => s.clone(),
                    toml::Value::Table(t) => match t.get("version").and_then(|v| v.as_str()) {
                        Some(s) => s.to_owned(),
                        None => continue, // path/git 전용 의존성은 건너뜀
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
                    ecosystem: Ecosystem::Cargo,
                    file_path: source_path.to_owned(),
                    line_number: None,
                });
            }
        }

        deps.sort_by(|a, b| a.name.cmp(&b.name));
        deps.dedup_by(|a, b| a.name == b.name && a.version == b.version);
        Ok(deps)
    }
}

/// Cargo.lock 파서
///
/// `[[package]]` 배열에서 이름과 고정 버전을 추출합니다.
pub struct CargoLockParser;

impl ManifestParser for CargoLockParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cargo
    }

    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "Cargo.lock")
    }

    fn parse(&self, content: &str, source_path: &str) -> Result<Vec<Dependency>, DepScannerError> {
        let value: toml::Value =
            toml::from_str(content).map_err(|e| DepScannerError::ManifestParse {
                path: source_path.to_owned(),
                reason: e.to_string(),
            })?;

        let mut deps = Vec::new();
        let packages = value
            .get("package")
            .and_then(|v| v.as_array())
            .map(|arr| arr.as_slice())
            .unwrap_or(&[]);

        for entry in packages {
            let Some(name) = entry.get("name").and_then(|v| v.as_str()) else {
                continue;
            };
            let Some(pkg_version) = entry.get("version").and_then(|v| v.as_str()) else {
                continue;
            };

            deps.push(Dependency {
                name: name.to_owned(),
                version: pkg_version.to_owned(),
                ecosystem: Ecosystem::Cargo,
                file_path: source_path.to_owned(),
                line_number: None,
            });
        }

        deps.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.version.cmp(&b.version)));
        Ok(deps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CARGO_TOML: &str = r#"
[package]
name = "my-service"
version = "0.1.0"
edition = "2024"

[dependencies]
serde = { version = "1.0", features = ["derive"] }
tokio = "1.40"
local-util = { path = "../local-util" }

[dev-dependencies]
tempfile = "3.8"

[build-dependencies]
cc = "1.0.83"
"#;

    const SAMPLE_CARGO_LOCK: &str = r#"
version = 3

[[package]]
name = "serde"
version = "1.0.210"
source = "registry+https://github.com/rust-lang/crates.io-index"

[[package]]
name = "tokio"
version = "1.40.0"
source = "registry+https://github.com/rust-lang/crates.io-index"

[[package]]
name = "my-service"
version = "0.1.0"
"#;

    #[test]
    fn cargo_toml_can_parse() {
        let parser = CargoTomlParser;
        assert!(parser.can_parse(Path::new("Cargo.toml")));
        assert!(parser.can_parse(Path::new("/project/Cargo.toml")));
        assert!(!parser.can_parse(Path::new("Cargo.lock")));
    }

    #[test]
    fn cargo_toml_extracts_all_sections() {
        let parser = CargoTomlParser;
        let deps = parser.parse(SAMPLE_CARGO_TOML, "Cargo.toml").unwrap();

        // path 전용 의존성은 건너뜀
        assert_eq!(deps.len(), 4);
        let names: Vec<&str> = deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["cc", "serde", "tempfile", "tokio"]);

        let serde = deps.iter().find(|d| d.name == "serde").unwrap();
        assert_eq!(serde.version, "1.0");
        assert_eq!(serde.ecosystem, Ecosystem::Cargo);
    }

    #[test]
    fn cargo_toml_workspace_dependencies() {
        let parser = CargoTomlParser;
        let toml = r#"
[workspace]
members = ["crates/*"]

[workspace.dependencies]
tracing = "0.1"
anyhow = { version = "1.0.93" }
"#;
        let deps = parser.parse(toml, "Cargo.toml").unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].name, "anyhow");
        assert_eq!(deps[1].name, "tracing");
    }

    #[test]
    fn cargo_toml_invalid_returns_error() {
        let parser = CargoTomlParser;
        let result = parser.parse("[dependencies\nbroken", "Cargo.toml");
        assert!(matches!(result, Err(DepScannerError::ManifestParse { .. })));
    }

    #[test]
    fn cargo_toml_without_dependencies_is_empty() {
        let parser = CargoTomlParser;
        let deps = parser
            .parse("[package]\nname = \"empty\"\nversion = \"0.1.0\"\n", "Cargo.toml")
            .unwrap();
        assert!(deps.is_empty());
    }

    #[test]
    fn cargo_lock_can_parse() {
        let parser = CargoLockParser;
        assert!(parser.can_parse(Path::new("Cargo.lock")));
        assert!(!parser.can_parse(Path::new("Cargo.toml")));
    }

    #[test]
    fn cargo_lock_extracts_packages() {
        let parser = CargoLockParser;
        let deps = parser.parse(SAMPLE_CARGO_LOCK, "Cargo.lock").unwrap();

        assert_eq!(deps.len(), 3);
        let serde = deps.iter().find(|d| d.name == "serde").unwrap();
        assert_eq!(serde.version, "1.0.210");
        assert_eq!(serde.normalized_version(), "1.0.210");
    }

    #[test]
    fn cargo_lock_without_packages_is_empty() {
        let parser = CargoLockParser;
        let deps = parser.parse("version = 3\n", "Cargo.lock").unwrap();
        assert!(deps.is_empty());
    }

    #[test]
    fn cargo_lock_invalid_returns_error() {
        let parser = CargoLockParser;
        assert!(parser.parse("{{not toml", "Cargo.lock").is_err());
    }
}
