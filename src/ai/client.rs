//! AI 서비스 HTTP 클라이언트
//!
//! 챗봇/번역/요약 서비스를 호출합니다. 각 서비스는 독립적이며
//! 실패(연결, 타임아웃, 비정상 상태 코드, 파싱 오류)는 `UpstreamUnavailable`로 변환됩니다.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use url::Url;

use crate::ai::fallback;
use crate::ai::types::*;
use crate::error::VerseError;

/// 외부 AI 서비스 주소
#[derive(Debug, Clone)]
pub struct AiEndpoints {
    pub chat_url: Url,
    pub translate_url: Url,
    pub summarize_url: Url,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiService {
    Chat,
    Translate,
    Summarize,
}

impl AiService {
    pub fn name(&self) -> &'static str {
        match self {
            AiService::Chat => "chatbot",
            AiService::Translate => "translate",
            AiService::Summarize => "summarize",
        }
    }

    fn path(&self) -> &'static str {
        match self {
            AiService::Chat => "ask",
            AiService::Translate => "translate",
            AiService::Summarize => "summarize",
        }
    }
}

/// AI 서비스 클라이언트
#[derive(Clone)]
pub struct AiClient {
    http: reqwest::Client,
    endpoints: AiEndpoints,
}

impl AiClient {
    pub fn new(endpoints: AiEndpoints) -> Result<Self, VerseError> {
        let http = reqwest::Client::builder()
            .timeout(endpoints.timeout)
            .build()
            .map_err(|e| VerseError::Config(format!("Failed to build AI HTTP client: {e}")))?;
        Ok(Self { http, endpoints })
    }

    fn base_url(&self, service: AiService) -> &Url {
        match service {
            AiService::Chat => &self.endpoints.chat_url,
            AiService::Translate => &self.endpoints.translate_url,
            AiService::Summarize => &self.endpoints.summarize_url,
        }
    }

    async fn post_json<B, R>(&self, service: AiService, body: &B) -> Result<R, VerseError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!(
            "{}/{}",
            self.base_url(service).as_str().trim_end_matches('/'),
            service.path()
        );

        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| VerseError::upstream(service.name(), format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(VerseError::upstream(
                service.name(),
                format!("HTTP {} {}", status.as_u16(), body.trim()),
            ));
        }

        resp.json::<R>()
            .await
            .map_err(|e| VerseError::upstream(service.name(), format!("invalid response: {e}")))
    }

    /// 챗봇 질문
    pub async fn ask(&self, request: &AskRequest) -> Result<String, VerseError> {
        let resp: AskResponse = self.post_json(AiService::Chat, request).await?;
        Ok(non_empty(resp.answer).unwrap_or_else(|| fallback::CHAT_EMPTY.to_string()))
    }

    /// 번역
    pub async fn translate(&self, request: &TranslateRequest) -> Result<String, VerseError> {
        let resp: TranslateResponse = self.post_json(AiService::Translate, request).await?;
        Ok(non_empty(resp.translation).unwrap_or_else(|| fallback::TRANSLATION_EMPTY.to_string()))
    }

    /// 요약
    pub async fn summarize(&self, request: &SummarizeRequest) -> Result<String, VerseError> {
        let resp: SummarizeResponse = self.post_json(AiService::Summarize, request).await?;
        Ok(non_empty(resp.summary).unwrap_or_else(|| fallback::SUMMARY_EMPTY.to_string()))
    }

    pub async fn ask_or_fallback(&self, request: &AskRequest) -> AiReply {
        match self.ask(request).await {
            Ok(text) => AiReply::answered(text),
            Err(e) => {
                warn!("Chatbot error: {e}");
                AiReply::fallback(fallback::CHAT_UNAVAILABLE.to_string())
            }
        }
    }

    pub async fn translate_or_fallback(&self, request: &TranslateRequest) -> AiReply {
        match self.translate(request).await {
            Ok(text) => AiReply::answered(text),
            Err(e) => {
                warn!("Translation error: {e}");
                AiReply::fallback(fallback::translation_unavailable(&request.target_lang))
            }
        }
    }

    pub async fn summarize_or_fallback(&self, request: &SummarizeRequest) -> AiReply {
        match self.summarize(request).await {
            Ok(text) => AiReply::answered(text),
            Err(e) => {
                warn!("Summarization error: {e}");
                AiReply::fallback(fallback::SUMMARY_UNAVAILABLE.to_string())
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
