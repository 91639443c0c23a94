//! Content Client
//!
//! Verse Store Service를 읽기 전용으로 호출하는 HTTP 클라이언트.
//! 챕터를 처음 펼칠 때 `chapter_verses`로 해당 챕터의 구절만 지연 로드합니다.

use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::error::VerseError;
use crate::models::{Verse, VerseFilter};

const SERVICE_NAME: &str = "verse-store";

pub struct VerseStoreClient {
    http: reqwest::Client,
    base_url: Url,
}

impl VerseStoreClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, VerseError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VerseError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http, base_url })
    }

    fn entries_url(&self) -> String {
        format!("{}/entries", self.base_url.as_str().trim_end_matches('/'))
    }

    /// `GET /entries` 호출
    pub async fn list_verses(&self, filter: &VerseFilter) -> Result<Vec<Verse>, VerseError> {
        let resp = self
            .http
            .get(self.entries_url())
            .query(filter)
            .send()
            .await
            .map_err(|e| VerseError::upstream(SERVICE_NAME, format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(VerseError::upstream(
                SERVICE_NAME,
                format!("HTTP {} {}", status.as_u16(), body.trim()),
            ));
        }

        resp.json::<Vec<Verse>>()
            .await
            .map_err(|e| VerseError::upstream(SERVICE_NAME, format!("invalid response: {e}")))
    }

    /// 챕터 구절 로드. 실패 시 빈 목록 (빈 상태로 표시)
    pub async fn chapter_verses(&self, chapter: &str) -> Vec<Verse> {
        match self.list_verses(&VerseFilter::chapter(chapter)).await {
            Ok(verses) => verses,
            Err(e) => {
                warn!("Error loading chapter {chapter}: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::client::tests::{closed_url, spawn};
    use crate::commands::build_router;
    use crate::commands::entries::tests::test_state;

    #[tokio::test]
    async fn test_chapter_verses_from_running_service() {
        let url = spawn(build_router(test_state(true).await)).await;
        let client = VerseStoreClient::new(url, Duration::from_secs(5)).unwrap();

        let verses = client.chapter_verses("1").await;
        assert_eq!(verses.len(), 100);
        assert_eq!(verses[1].verse_id, "10");

        assert!(client.chapter_verses("2").await.is_empty());

        let filter = VerseFilter {
            verse: Some("61".into()),
            ..VerseFilter::default()
        };
        let single = client.list_verses(&filter).await.unwrap();
        assert_eq!(single.len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_service_degrades_to_empty() {
        let client = VerseStoreClient::new(closed_url().await, Duration::from_secs(2)).unwrap();

        assert!(client.list_verses(&VerseFilter::default()).await.is_err());
        assert!(client.chapter_verses("1").await.is_empty());
    }
}
