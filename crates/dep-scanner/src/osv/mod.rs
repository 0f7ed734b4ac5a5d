//! OSV 취약점 조회 -- 클라이언트와 와이어 스키마
//!
//! [`client::OsvClient`]는 OSV `v1/query` 엔드포인트에 패키지별 조회를 보내고,
//! [`schema`]는 요청/응답 JSON 구조를 typed 형태로 정의합니다.
//!
//! 조회 실패는 스캔을 중단시키지 않습니다. 재시도가 소진된 의존성은
//! "데이터 없음"으로 처리되어 빈 어드바이저리 목록을 받습니다.

pub mod client;
pub mod schema;

pub use client::{AdvisoryProvider, OsvClient};
pub use schema::{OsvAdvisory, OsvQuery, OsvQueryResponse};
