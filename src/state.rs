use std::sync::Arc;

use crate::ai::AiClient;
use crate::db::{Database, StoreState};
use crate::error::VerseError;

/// 핸들러 공유 상태
pub struct AppState {
    pub store: StoreState,
    pub ai: AiClient,
}

impl AppState {
    pub fn new(db: Database, ai: AiClient) -> Arc<Self> {
        Arc::new(Self {
            store: StoreState::new(db),
            ai,
        })
    }

    /// 저장소 작업을 blocking 스레드에서 실행
    ///
    /// SQLite 호출은 busy timeout 동안 스레드를 점유하므로 런타임 워커에서 돌리지 않습니다.
    pub async fn with_store<T, F>(self: &Arc<Self>, f: F) -> Result<T, VerseError>
    where
        F: FnOnce(&Database) -> Result<T, VerseError> + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            let db = state.store.lock()?;
            f(&db)
        })
        .await?
    }
}
