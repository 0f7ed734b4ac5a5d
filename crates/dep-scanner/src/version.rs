//! 버전 요구사항 정규화 -- 조회용 고정 버전 추출
//!
//! 매니페스트에 선언된 버전 요구사항(`^4.17.0`, `>=1.2.3, <2`, `~>1.2`)을
//! 정확 일치 조회에 사용할 하한 고정 버전으로 변환합니다.
//! SemVer 파싱은 로깅 목적의 검증에만 사용하며, SemVer가 아닌 문자열
//! (Go 의사 버전, Maven 4자리 버전 등)도 그대로 통과시킵니다.

use tracing::debug;

/// 요구사항 앞에 붙을 수 있는 비교 연산자 목록
///
/// 긴 연산자를 먼저 확인해야 `>=`가 `>`로 잘리지 않습니다.
const OPERATORS: &[&str] = &[">=", "<=", "==", "!=", "~>", "^", "~", ">", "<", "="];

/// 버전 요구사항을 조회용 고정 버전으로 정규화합니다.
///
/// # 규칙
///
/// - 공백과 따옴표를 제거
/// - 선행 비교 연산자(`^`, `~`, `>=`, `~>` 등)와 선행 `v`를 제거
/// - 쉼표/공백/`||`로 나뉜 범위 목록은 하한을 나타내는 첫 구성요소를 사용
/// - 와일드카드 세그먼트(`x`, `X`, `*`)는 `0`으로 치환 (`1.2.x` -> `1.2.0`)
/// - 빈 입력이나 버전이 남지 않는 입력은 빈 문자열 반환
///
/// # Examples
///
/// ```
/// use vulnscout_dep_scanner::version::normalize;
///
/// assert_eq!(normalize("^4.17.0"), "4.17.0");
/// assert_eq!(normalize(">=1.2.3, <2.0.0"), "1.2.3");
/// assert_eq!(normalize("v1.9.1"), "1.9.1");
/// assert_eq!(normalize("1.2.x"), "1.2.0");
/// ```
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    if trimmed.is_empty() {
        return String::new();
    }

    // 범위 목록에서 하한 후보를 고릅니다. 상한 전용 구성요소(`<`, `<=`, `!=`)는
    // 다른 후보가 없을 때만 사용합니다.
    let mut fallback: Option<&str> = None;
    for part in split_components(trimmed) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if part.starts_with('<') || part.starts_with("!=") {
            fallback.get_or_insert(part);
            continue;
        }
        if let Some(version) = strip_to_version(part) {
            return expand_wildcards(&version);
        }
    }

    if let Some(part) = fallback
        && let Some(version) = strip_to_version(part)
    {
        return expand_wildcards(&version);
    }

    String::new()
}

/// `||`, 쉼표, 공백으로 나뉜 범위 구성요소를 순서대로 반환합니다.
fn split_components(input: &str) -> impl Iterator<Item = &str> {
    input
        .split("||")
        .flat_map(|alt| alt.split(','))
        .flat_map(|part| part.split_whitespace())
}

/// 구성요소에서 연산자와 선행 `v`를 제거하고 버전 문자열을 반환합니다.
///
/// 버전으로 볼 수 없는 문자열(숫자/와일드카드로 시작하지 않음)은 `None`.
fn strip_to_version(part: &str) -> Option<String> {
    let mut rest = part;
    loop {
        let before = rest;
        for op in OPERATORS {
            if let Some(stripped) = rest.strip_prefix(op) {
                rest = stripped.trim_start();
                break;
            }
        }
        if rest == before {
            break;
        }
    }

    // Go 스타일 선행 v (v1.2.3)
    if let Some(stripped) = rest.strip_prefix('v')
        && stripped.starts_with(|c: char| c.is_ascii_digit())
    {
        rest = stripped;
    }

    let looks_like_version = rest.starts_with(|c: char| c.is_ascii_digit())
        || rest == "*"
        || rest.starts_with("x.")
        || rest.starts_with("X.");
    if !looks_like_version {
        return None;
    }

    if semver::Version::parse(rest).is_err() {
        // SemVer가 아니어도 그대로 사용합니다 (Go 의사 버전, 4자리 버전 등)
        debug!(version = rest, "normalized version is not strict semver");
    }

    Some(rest.to_owned())
}

/// 와일드카드 세그먼트를 `0`으로 치환합니다.
fn expand_wildcards(version: &str) -> String {
    if version == "*" || version == "x" || version == "X" {
        return "0.0.0".to_owned();
    }
    if !version.contains(['*', 'x', 'X']) {
        return version.to_owned();
    }

    let expanded: Vec<&str> = version
        .split('.')
        .map(|seg| match seg {
            "*" | "x" | "X" => "0",
            other => other,
        })
        .collect();
    expanded.join(".")
}
