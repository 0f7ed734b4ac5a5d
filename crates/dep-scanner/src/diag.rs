//! 스캔 진단 — 주입식 진단 싱크
//!
//! 스캔 중 발생하는 비치명적 이벤트(파싱 실패, 탐색 실패, 조회 실패)는
//! 스캔을 중단시키지 않고 [`DiagnosticSink`]로 보고됩니다.
//! 싱크는 스캐너 생성 시 주입되므로 호출자가 진단을 수집하거나
//! 로깅으로 흘려보내는 방식을 선택할 수 있습니다.

use std::sync::Mutex;

use tracing::{debug, warn};

/// 진단 이벤트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// 매니페스트 탐색 중 발생 (읽을 수 없는 디렉토리 등)
    Discovery,
    /// 매니페스트 파싱 실패 또는 항목 스킵
    Parse,
    /// 취약점 조회 실패 (재시도 소진)
    Query,
}

/// 스캔 진단 이벤트
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// 이벤트 종류
    pub kind: DiagnosticKind,
    /// 대상 (파일 경로, 패키지 이름 등)
    pub subject: String,
    /// 상세 메시지
    pub message: String,
}

impl Diagnostic {
    /// 새 진단 이벤트를 생성합니다.
    pub fn new(kind: DiagnosticKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

/// 진단 싱크 trait
///
/// 스캐너에 주입되어 비치명적 이벤트를 받습니다.
pub trait DiagnosticSink: Send + Sync {
    /// 진단 이벤트를 보고합니다.
    fn report(&self, diag: Diagnostic);
}

/// tracing으로 흘려보내는 기본 싱크
///
/// 파싱/조회 실패는 `warn`, 탐색 스킵은 `debug` 레벨로 기록합니다.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diag: Diagnostic) {
        match diag.kind {
            DiagnosticKind::Discovery => {
                debug!(subject = %diag.subject, message = %diag.message, "discovery skipped")
            }
            DiagnosticKind::Parse => {
                warn!(subject = %diag.subject, message = %diag.message, "manifest skipped")
            }
            DiagnosticKind::Query => {
                warn!(subject = %diag.subject, message = %diag.message, "query degraded")
            }
        }
    }
}

/// 진단을 메모리에 수집하는 싱크 (테스트 및 리포트용)
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// 빈 수집 싱크를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 수집된 진단의 복사본을 반환합니다.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// 특정 종류의 진단 개수를 반환합니다.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries().iter().filter(|d| d.kind == kind).count()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diag: Diagnostic) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(diag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_accumulates() {
        let sink = CollectingSink::new();
        sink.report(Diagnostic::new(
            DiagnosticKind::Parse,
            "package.json",
            "unexpected EOF",
        ));
        sink.report(Diagnostic::new(
            DiagnosticKind::Query,
            "lodash",
            "retries exhausted",
        ));

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, DiagnosticKind::Parse);
        assert_eq!(entries[0].subject, "package.json");
        assert_eq!(entries[1].kind, DiagnosticKind::Query);
    }

    #[test]
    fn collecting_sink_counts_by_kind() {
        let sink = CollectingSink::new();
        sink.report(Diagnostic::new(DiagnosticKind::Parse, "a", "x"));
        sink.report(Diagnostic::new(DiagnosticKind::Parse, "b", "y"));
        sink.report(Diagnostic::new(DiagnosticKind::Discovery, "c", "z"));

        assert_eq!(sink.count(DiagnosticKind::Parse), 2);
        assert_eq!(sink.count(DiagnosticKind::Discovery), 1);
        assert_eq!(sink.count(DiagnosticKind::Query), 0);
    }

    #[test]
    fn tracing_sink_does_not_panic() {
        let sink = TracingSink;
        sink.report(Diagnostic::new(DiagnosticKind::Discovery, "/root", "denied"));
    }

    #[test]
    fn sinks_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TracingSink>();
        assert_send_sync::<CollectingSink>();
    }
}
