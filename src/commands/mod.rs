//! HTTP Commands Module
//!
//! 프론트엔드에서 호출 가능한 HTTP 엔드포인트 정의

pub mod ai;
pub mod entries;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// 라우터 구성
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/entries", get(entries::list_entries).post(entries::create_entry))
        .route("/ai/ask", post(ai::ask))
        .route("/ai/translate", post(ai::translate))
        .route("/ai/summarize", post(ai::summarize))
        .layer(cors)
        .with_state(state)
}
