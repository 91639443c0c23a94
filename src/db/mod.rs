//! Database Module
//!
//! SQLite 기반 구절 저장소

mod schema;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::VerseError;
use crate::models::{NewVerse, Verse, VerseFilter, VerseKey};
use crate::seed::RecordOutcome;

/// 저장소 잠금 대기 한도 (초과 시 StoreError)
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_COLUMNS: &str =
    "id, book_id, chapter_id, verse_id, content_eng, content_hin, content_chi, summary";

/// 데이터베이스 상태 (axum 앱 상태로 공유)
pub struct StoreState(pub Mutex<Database>);

impl StoreState {
    pub fn new(db: Database) -> Self {
        Self(Mutex::new(db))
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, Database>, VerseError> {
        self.0.lock().map_err(|_| VerseError::LockPoisoned)
    }
}

/// 데이터베이스 래퍼
pub struct Database {
    conn: Connection,
}

impl Database {
    /// 새 데이터베이스 연결 생성
    pub fn new(path: &Path) -> Result<Self, VerseError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(Self { conn })
    }

    /// 메모리 데이터베이스 (테스트 / 임시 실행용)
    pub fn in_memory() -> Result<Self, VerseError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// 연결 문자열로 열고 스키마까지 초기화
    ///
    /// 어떤 단계든 실패하면 `StoreUnavailable` (시작 시 치명적 오류)
    pub fn open(location: &str) -> Result<Self, VerseError> {
        let unavailable = |e: VerseError| VerseError::StoreUnavailable(format!("{location}: {e}"));

        let db = if location == ":memory:" {
            Self::in_memory().map_err(unavailable)?
        } else {
            let path = crate::utils::resolve_db_path(location).map_err(unavailable)?;
            Self::new(&path).map_err(unavailable)?
        };
        db.initialize().map_err(unavailable)?;
        Ok(db)
    }

    /// 데이터베이스 스키마 초기화
    pub fn initialize(&self) -> Result<(), VerseError> {
        self.conn.execute_batch(schema::CREATE_SCHEMA)?;
        Ok(())
    }

    /// 필터에 맞는 구절 목록 (자연 키 오름차순, 문자열 비교)
    pub fn list_verses(&self, filter: &VerseFilter) -> Result<Vec<Verse>, VerseError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM verses
             WHERE (?1 IS NULL OR book_id = ?1)
               AND (?2 IS NULL OR chapter_id = ?2)
               AND (?3 IS NULL OR verse_id = ?3)
             ORDER BY book_id, chapter_id, verse_id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let iter = stmt.query_map(
            params![filter.book, filter.chapter, filter.verse],
            row_to_verse,
        )?;

        let mut verses = Vec::new();
        for verse in iter {
            verses.push(verse?);
        }
        Ok(verses)
    }

    /// 상위 N개 (시드 로그 샘플용)
    pub fn first_verses(&self, limit: usize) -> Result<Vec<Verse>, VerseError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM verses
             ORDER BY book_id, chapter_id, verse_id LIMIT ?1"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let iter = stmt.query_map([limit as i64], row_to_verse)?;

        let mut out = Vec::new();
        for verse in iter {
            out.push(verse?);
        }
        Ok(out)
    }

    /// 자연 키로 단건 조회
    pub fn find_by_key(&self, key: &VerseKey) -> Result<Option<Verse>, VerseError> {
        find_by_key(&self.conn, key)
    }

    /// 구절 추가 (자연 키 충돌 시 DuplicateKey)
    pub fn create_verse(&self, record: &NewVerse) -> Result<Verse, VerseError> {
        let id = insert_row(&self.conn, record)?;
        Ok(record.clone().with_id(id))
    }

    pub fn count(&self) -> Result<usize, VerseError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM verses", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// 전체 삭제 후 best-effort 일괄 삽입 (unordered insert)
    ///
    /// 레코드별 중복/검증 실패는 결과에 기록하고 계속 진행합니다.
    /// 저장소 자체 오류만 전체를 중단시킵니다.
    pub fn replace_all(
        &self,
        records: &[Result<NewVerse, VerseError>],
    ) -> Result<Vec<RecordOutcome>, VerseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM verses", [])?;

        let mut outcomes = Vec::with_capacity(records.len());
        for record in records {
            let outcome = match record {
                Err(e) => RecordOutcome::FailedValidation(e.to_string()),
                Ok(verse) => match insert_row(&tx, verse) {
                    Ok(_) => RecordOutcome::Inserted,
                    Err(VerseError::DuplicateKey { .. }) => RecordOutcome::SkippedDuplicate,
                    Err(e) => return Err(e),
                },
            };
            outcomes.push(outcome);
        }

        tx.commit()?;
        Ok(outcomes)
    }

    /// 자연 키 기준 upsert (기존 데이터 유지)
    pub fn upsert_all(
        &self,
        records: &[Result<NewVerse, VerseError>],
    ) -> Result<Vec<RecordOutcome>, VerseError> {
        let tx = self.conn.unchecked_transaction()?;

        let mut outcomes = Vec::with_capacity(records.len());
        for record in records {
            let outcome = match record {
                Err(e) => RecordOutcome::FailedValidation(e.to_string()),
                Ok(verse) => match find_by_key(&tx, &verse.key())? {
                    None => {
                        insert_row(&tx, verse)?;
                        RecordOutcome::Inserted
                    }
                    Some(existing) => {
                        // Summary가 없는 레코드는 기존 요약을 유지
                        let merged = NewVerse {
                            summary: Some(
                                verse.summary.clone().unwrap_or_else(|| existing.summary.clone()),
                            ),
                            ..verse.clone()
                        };
                        if existing.content() == merged {
                            RecordOutcome::Unchanged
                        } else {
                            tx.execute(
                                "UPDATE verses
                                 SET content_eng = ?1, content_hin = ?2, content_chi = ?3, summary = ?4
                                 WHERE id = ?5",
                                params![
                                    merged.content_eng,
                                    merged.content_hin,
                                    merged.content_chi,
                                    merged.summary,
                                    existing.id,
                                ],
                            )?;
                            RecordOutcome::Updated
                        }
                    }
                },
            };
            outcomes.push(outcome);
        }

        tx.commit()?;
        Ok(outcomes)
    }
}

fn row_to_verse(row: &Row<'_>) -> rusqlite::Result<Verse> {
    Ok(Verse {
        id: row.get(0)?,
        book_id: row.get(1)?,
        chapter_id: row.get(2)?,
        verse_id: row.get(3)?,
        content_eng: row.get(4)?,
        content_hin: row.get(5)?,
        content_chi: row.get(6)?,
        summary: row.get(7)?,
    })
}

fn find_by_key(conn: &Connection, key: &VerseKey) -> Result<Option<Verse>, VerseError> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM verses
         WHERE book_id = ?1 AND chapter_id = ?2 AND verse_id = ?3"
    );
    let verse = conn
        .query_row(&sql, params![key.book, key.chapter, key.verse], row_to_verse)
        .optional()?;
    Ok(verse)
}

/// 행 삽입 후 부여된 `_id` 반환
fn insert_row(conn: &Connection, record: &NewVerse) -> Result<String, VerseError> {
    let id = uuid::Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO verses (id, book_id, chapter_id, verse_id, content_eng, content_hin, content_chi, summary)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            record.book_id,
            record.chapter_id,
            record.verse_id,
            record.content_eng,
            record.content_hin,
            record.content_chi,
            record.summary.as_deref().unwrap_or_default(),
        ],
    )
    .map_err(|e| map_insert_error(e, record))?;
    Ok(id)
}

fn map_insert_error(err: rusqlite::Error, record: &NewVerse) -> VerseError {
    if let rusqlite::Error::SqliteFailure(ref e, _) = err {
        if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            return VerseError::DuplicateKey {
                book: record.book_id.clone(),
                chapter: record.chapter_id.clone(),
                verse: record.verse_id.clone(),
            };
        }
    }
    VerseError::Store(err)
}
