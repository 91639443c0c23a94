//! AI 서비스 요청/응답 타입 정의

use serde::{Deserialize, Serialize};

pub const DEFAULT_TARGET_LANG: &str = "en";
pub const DEFAULT_SOURCE_LANG: &str = "en";
pub const DEFAULT_MIN_LENGTH: u32 = 30;
pub const DEFAULT_MAX_LENGTH: u32 = 100;

fn default_target_lang() -> String {
    DEFAULT_TARGET_LANG.to_string()
}

fn default_source_lang() -> String {
    DEFAULT_SOURCE_LANG.to_string()
}

fn default_min_length() -> u32 {
    DEFAULT_MIN_LENGTH
}

fn default_max_length() -> u32 {
    DEFAULT_MAX_LENGTH
}

/// 챗봇 질문 (`POST /ask`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
}

/// 번역 (`POST /translate`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub translation: Option<String>,
}

/// 요약 (`POST /summarize`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
    #[serde(default = "default_min_length")]
    pub min_length: u32,
    #[serde(default = "default_max_length")]
    pub max_length: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeResponse {
    #[serde(default)]
    pub summary: Option<String>,
}

/// AI 호출 결과. 서비스 실패 시 `fallback = true`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiReply {
    pub text: String,
    pub fallback: bool,
}

impl AiReply {
    pub fn answered(text: String) -> Self {
        Self { text, fallback: false }
    }

    pub fn fallback(text: String) -> Self {
        Self { text, fallback: true }
    }
}

/// 프록시 응답 (`/ai/ask`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskReply {
    pub answer: String,
    pub fallback: bool,
}

/// 프록시 응답 (`/ai/translate`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateReply {
    pub translation: String,
    pub fallback: bool,
}

/// 프록시 응답 (`/ai/summarize`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeReply {
    pub summary: String,
    pub fallback: bool,
}

impl From<AiReply> for AskReply {
    fn from(r: AiReply) -> Self {
        Self { answer: r.text, fallback: r.fallback }
    }
}

impl From<AiReply> for TranslateReply {
    fn from(r: AiReply) -> Self {
        Self { translation: r.text, fallback: r.fallback }
    }
}

impl From<AiReply> for SummarizeReply {
    fn from(r: AiReply) -> Self {
        Self { summary: r.text, fallback: r.fallback }
    }
}
