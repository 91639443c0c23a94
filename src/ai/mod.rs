//! AI 서비스 연동 모듈
//!
//! 챗봇(ask), 번역(translate), 요약(summarize) 외부 서비스를 HTTP로 호출합니다.
//! 서비스 내부 구현은 범위 밖이며, 실패 시 언어별 대체 문구로 응답합니다.

pub mod client;
pub mod fallback;
pub mod types;

pub use client::{AiClient, AiEndpoints, AiService};
pub use types::AiReply;
