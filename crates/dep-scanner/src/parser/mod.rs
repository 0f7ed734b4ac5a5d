//! 매니페스트 파서 -- 생태계별 의존성 추출
//!
//! [`ManifestParser`] trait은 각 매니페스트 형식의 파서가 구현해야 하는 인터페이스입니다.
//! [`default_parsers`]는 지원되는 모든 형식의 파서 목록을 반환합니다.
//!
//! # 지원 형식
//!
//! | 생태계 | 파일 |
//! |---|---|
//! | npm | `package.json`, `package-lock.json` |
//! | PyPI | `requirements.txt`, `Pipfile`, `Pipfile.lock` |
//! | crates.io | `Cargo.toml`, `Cargo.lock` |
//! | Go | `go.mod`, `go.sum` |
//! | Maven | `pom.xml`, `build.gradle` |
//! | Packagist | `composer.json` |
//! | RubyGems | `Gemfile`, `Gemfile.lock` |
//! | NuGet | `*.csproj` |
//!
//! # 확장
//!
//! 새로운 형식을 지원하려면 `ManifestParser` trait을 구현하고
//! [`default_parsers`]와 [`detect_ecosystem`]에 등록합니다.

pub mod cargo;
pub mod composer;
pub mod golang;
pub mod maven;
pub mod npm;
pub mod nuget;
pub mod python;
pub mod ruby;

use std::path::Path;

use crate::error::DepScannerError;
use crate::types::{Dependency, Ecosystem};

/// 매니페스트 파서 trait
///
/// 각 패키지 생태계의 매니페스트 형식을 파싱하여 직접 의존성 목록을 추출합니다.
pub trait ManifestParser: Send + Sync {
    /// 이 파서가 담당하는 생태계를 반환합니다.
    fn ecosystem(&self) -> Ecosystem;

    /// 주어진 경로의 파일을 이 파서가 처리할 수 있는지 확인합니다.
    ///
    /// 파일 이름 패턴으로 판별합니다 (예: "package.json", "*.csproj").
    fn can_parse(&self, path: &Path) -> bool;

    /// 매니페스트 내용을 파싱하여 의존성 목록을 반환합니다.
    ///
    /// 버전을 확인할 수 없는 항목(로컬 경로, git 참조, `*` 등)은 건너뜁니다.
    ///
    /// # Arguments
    ///
    /// - `content`: 매니페스트 파일 내용 (UTF-8 문자열)
    /// - `source_path`: 원본 파일 경로 (에러 메시지 및 `file_path` 기록용)
    fn parse(&self, content: &str, source_path: &str) -> Result<Vec<Dependency>, DepScannerError>;
}

/// 알려진 매니페스트 파일명 목록
const MANIFEST_FILENAMES: &[(&str, Ecosystem)] = &[
    ("package.json", Ecosystem::Npm),
    ("package-lock.json", Ecosystem::Npm),
    ("requirements.txt", Ecosystem::PyPi),
    ("Pipfile", Ecosystem::PyPi),
    ("Pipfile.lock", Ecosystem::PyPi),
    ("Cargo.toml", Ecosystem::Cargo),
    ("Cargo.lock", Ecosystem::Cargo),
    ("go.mod", Ecosystem::Go),
    ("go.sum", Ecosystem::Go),
    ("pom.xml", Ecosystem::Maven),
    ("build.gradle", Ecosystem::Maven),
    ("composer.json", Ecosystem::Packagist),
    ("Gemfile", Ecosystem::RubyGems),
    ("Gemfile.lock", Ecosystem::RubyGems),
];

/// 주어진 경로가 지원되는 매니페스트인지 판별하고 생태계를 반환합니다.
///
/// 파일명 정확 일치와 `*.csproj` 확장자 패턴을 확인합니다.
pub fn detect_ecosystem(path: &Path) -> Option<Ecosystem> {
    let file_name = path.file_name().and_then(|n| n.to_str())?;

    if let Some((_, eco)) = MANIFEST_FILENAMES
        .iter()
        .find(|(known, _)| *known == file_name)
    {
        return Some(*eco);
    }

    if path.extension().and_then(|e| e.to_str()) == Some("csproj") {
        return Some(Ecosystem::Nuget);
    }

    None
}

/// 지원되는 모든 매니페스트 파서를 반환합니다.
pub fn default_parsers() -> Vec<Box<dyn ManifestParser>> {
    vec![
        Box::new(npm::PackageJsonParser),
        Box::new(npm::NpmLockParser),
        Box::new(python::RequirementsTxtParser),
        Box::new(python::PipfileParser),
        Box::new(python::PipfileLockParser),
        Box::new(cargo::CargoTomlParser),
        Box::new(cargo::CargoLockParser),
        Box::new(golang::GoModParser),
        Box::new(golang::GoSumParser),
        Box::new(maven::PomXmlParser),
        Box::new(maven::GradleParser),
        Box::new(composer::ComposerJsonParser),
        Box::new(ruby::GemfileParser),
        Box::new(ruby::GemfileLockParser),
        Box::new(nuget::CsprojParser),
    ]
}
