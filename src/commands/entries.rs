//! Entry Commands
//!
//! 구절 목록 조회 / 단건 추가 HTTP 핸들러

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info, warn};

use crate::error::{ApiResult, VerseError};
use crate::models::{NewVerse, Verse, VerseFilter};
use crate::state::AppState;

/// `GET /entries?book=&chapter=&verse=`
///
/// 쿼리 파싱 실패(`?chapter=1&chapter=2` 등)도 JSON 에러 본문으로 응답합니다.
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    query: Result<Query<VerseFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<Verse>>> {
    let Query(filter) = query.map_err(|e| {
        warn!("Rejected entries query: {e}");
        VerseError::Validation(e.body_text())
    })?;
    let filter = filter.normalized();

    let query_filter = filter.clone();
    let result = state
        .with_store(move |db| db.list_verses(&query_filter))
        .await;

    match result {
        Ok(verses) => Ok(Json(verses)),
        Err(e) => {
            error!("Failed to list entries {filter:?}: {e}");
            Err(e.into())
        }
    }
}

/// `POST /entries` (본문 = 구절 레코드 1개)
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Verse>)> {
    let record = NewVerse::from_slice(&body).inspect_err(|e| warn!("Rejected entry: {e}"))?;
    let key = record.key();

    let result = state.with_store(move |db| db.create_verse(&record)).await;

    match result {
        Ok(verse) => {
            info!("Created entry {}", verse.key());
            Ok((StatusCode::CREATED, Json(verse)))
        }
        Err(e @ VerseError::DuplicateKey { .. }) => {
            warn!("Rejected entry: {e}");
            Err(e.into())
        }
        Err(e) => {
            error!("Failed to create entry {key}: {e}");
            Err(e.into())
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::{body::Body, http::Request, Router};
    use serde_json::{json, Value};
    use std::time::{Duration, Instant};
    use tempfile::tempdir;
    use tower::ServiceExt;

    use crate::ai::AiClient;
    use crate::commands::build_router;
    use crate::db::Database;
    use crate::seed::{seed, SeedInput, SeedOptions};

    /// AI 서비스는 닫힌 포트를 가리키는 테스트 상태
    pub(crate) async fn test_state(seeded: bool) -> Arc<AppState> {
        let db = Database::open(":memory:").unwrap();
        if seeded {
            seed(&db, SeedInput::sample().unwrap(), &SeedOptions::default()).unwrap();
        }
        state_with(db).await
    }

    async fn state_with(db: Database) -> Arc<AppState> {
        let url = crate::ai::client::tests::closed_url().await;
        let ai = AiClient::new(crate::ai::client::tests::endpoints(&url, Duration::from_secs(2))).unwrap();
        AppState::new(db, ai)
    }

    pub(crate) async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(request).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub(crate) fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn new_entry(verse: &str) -> Value {
        json!({
            "Book_id": "2",
            "Chapter_id": "3",
            "Verse_id": verse,
            "Content_eng": "Arjuna strung the great bow.",
            "Content_hin": "अर्जुन ने महान धनुष पर प्रत्यंचा चढ़ाई।",
            "Content_chi": "阿周那为大弓上弦。",
            "Summary": "Arjuna strings the bow."
        })
    }

    #[tokio::test]
    async fn test_list_empty_collection_returns_empty_array() {
        let app = build_router(test_state(false).await);
        let (status, body) = send(app, get("/entries")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_list_chapter_is_sorted_by_string_key() {
        let app = build_router(test_state(true).await);
        let (status, body) = send(app, get("/entries?chapter=1")).await;
        assert_eq!(status, StatusCode::OK);

        let verses = body.as_array().unwrap();
        assert_eq!(verses.len(), 100);
        let ids: Vec<&str> = verses.iter().map(|v| v["Verse_id"].as_str().unwrap()).collect();
        assert_eq!(&ids[..3], ["1", "10", "100"]);
        assert!(verses[0]["_id"].is_string());
    }

    #[tokio::test]
    async fn test_list_with_full_key_and_empty_params() {
        let state = test_state(true).await;

        let (_, body) = send(build_router(state.clone()), get("/entries?book=1&chapter=1&verse=42")).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["Verse_id"], "42");

        // 빈 파라미터는 필터 없음
        let (_, body) = send(build_router(state.clone()), get("/entries?book=&verse=7")).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = send(build_router(state), get("/entries?book=18")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_create_then_fetch_round_trip() {
        let state = test_state(false).await;
        let input = new_entry("11");

        let (status, created) = send(build_router(state.clone()), post_json("/entries", &input)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(created["_id"].is_string());

        let (_, fetched) = send(
            build_router(state),
            get("/entries?book=2&chapter=3&verse=11"),
        )
        .await;
        assert_eq!(fetched.as_array().unwrap().len(), 1);
        for (field, value) in input.as_object().unwrap() {
            assert_eq!(&fetched[0][field], value, "field {field}");
        }
        assert_eq!(fetched[0]["_id"], created["_id"]);
    }

    #[tokio::test]
    async fn test_duplicate_create_is_400_and_keeps_original() {
        let state = test_state(false).await;
        let (status, _) = send(build_router(state.clone()), post_json("/entries", &new_entry("1"))).await;
        assert_eq!(status, StatusCode::CREATED);

        let mut changed = new_entry("1");
        changed["Content_eng"] = json!("changed");
        let (status, body) = send(build_router(state.clone()), post_json("/entries", &changed)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "DUPLICATE_KEY");

        let (_, fetched) = send(build_router(state), get("/entries?book=2")).await;
        assert_eq!(fetched.as_array().unwrap().len(), 1);
        assert_eq!(fetched[0]["Content_eng"], "Arjuna strung the great bow.");
    }

    #[tokio::test]
    async fn test_malformed_body_is_validation_error() {
        let state = test_state(false).await;

        let mut missing = new_entry("1");
        missing.as_object_mut().unwrap().remove("Chapter_id");
        let (status, body) = send(build_router(state.clone()), post_json("/entries", &missing)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let request = Request::builder()
            .method("POST")
            .uri("/entries")
            .header("content-type", "application/json")
            .body(Body::from("{broken"))
            .unwrap();
        let (status, body) = send(build_router(state), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_repeated_query_param_is_json_validation_error() {
        let app = build_router(test_state(true).await);
        let (status, body) = send(app, get("/entries?chapter=1&chapter=2")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("chapter"));
    }

    #[tokio::test]
    async fn test_storage_failure_is_500_store_error() {
        let dir = tempdir().unwrap();
        let location = dir.path().join("verses.db").to_string_lossy().to_string();
        let state = state_with(Database::open(&location).unwrap()).await;

        let other = rusqlite::Connection::open(&location).unwrap();
        other.execute_batch("DROP TABLE verses").unwrap();

        let (status, body) = send(build_router(state.clone()), get("/entries")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "STORE_ERROR");

        let (status, body) = send(build_router(state), post_json("/entries", &new_entry("1"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "STORE_ERROR");
    }

    #[tokio::test]
    async fn test_locked_store_does_not_stall_other_tasks() {
        let dir = tempdir().unwrap();
        let location = dir.path().join("verses.db").to_string_lossy().to_string();
        let state = state_with(Database::open(&location).unwrap()).await;

        // 다른 연결이 쓰기 잠금을 쥔 채로 유지
        let other = rusqlite::Connection::open(&location).unwrap();
        other.execute_batch("BEGIN EXCLUSIVE").unwrap();

        let started = Instant::now();
        let (ticked, (status, body)) = tokio::join!(
            async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                started.elapsed()
            },
            send(build_router(state), post_json("/entries", &new_entry("1"))),
        );

        assert!(ticked < Duration::from_secs(1), "ticker fired after {ticked:?}");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "STORE_ERROR");
        other.execute_batch("ROLLBACK").unwrap();
    }
}
