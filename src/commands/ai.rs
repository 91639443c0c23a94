//! AI Proxy Commands
//!
//! 챗봇/번역/요약 서비스 호출을 백엔드에서 대신 수행합니다.
//! - 브라우저에서 직접 호출하면 CORS로 막힐 수 있으므로 프록시를 제공합니다.
//! - 서비스 장애 시에도 200 + `fallback: true` 로 대체 문구를 반환합니다.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde::de::DeserializeOwned;

use crate::ai::types::{
    AskReply, AskRequest, SummarizeReply, SummarizeRequest, TranslateReply, TranslateRequest,
};
use crate::error::{ApiResult, VerseError};
use crate::state::AppState;

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, VerseError> {
    serde_json::from_slice(body).map_err(|e| VerseError::Validation(format!("invalid request body: {e}")))
}

fn require_text(field: &str, value: &str) -> Result<(), VerseError> {
    if value.trim().is_empty() {
        return Err(VerseError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// `POST /ai/ask`
pub async fn ask(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<Json<AskReply>> {
    let request: AskRequest = parse_body(&body)?;
    require_text("question", &request.question)?;

    let reply = state.ai.ask_or_fallback(&request).await;
    Ok(Json(reply.into()))
}

/// `POST /ai/translate`
pub async fn translate(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<TranslateReply>> {
    let request: TranslateRequest = parse_body(&body)?;
    require_text("text", &request.text)?;
    require_text("target_lang", &request.target_lang)?;

    let reply = state.ai.translate_or_fallback(&request).await;
    Ok(Json(reply.into()))
}

/// `POST /ai/summarize`
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<SummarizeReply>> {
    let request: SummarizeRequest = parse_body(&body)?;
    require_text("text", &request.text)?;
    if request.min_length > request.max_length {
        return Err(VerseError::Validation(format!(
            "min_length ({}) must not exceed max_length ({})",
            request.min_length, request.max_length
        ))
        .into());
    }

    let reply = state.ai.summarize_or_fallback(&request).await;
    Ok(Json(reply.into()))
}
