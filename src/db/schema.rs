//! Database Schema
//!
//! SQLite 테이블 스키마 정의

/// 데이터베이스 스키마 생성 SQL
pub const CREATE_SCHEMA: &str = r#"
-- 구절 테이블 (문자열 정렬은 BINARY collation = 바이트 순서)
CREATE TABLE IF NOT EXISTS verses (
    id TEXT PRIMARY KEY,
    book_id TEXT NOT NULL,
    chapter_id TEXT NOT NULL,
    verse_id TEXT NOT NULL,
    content_eng TEXT NOT NULL,
    content_hin TEXT NOT NULL,
    content_chi TEXT NOT NULL,
    summary TEXT NOT NULL
);

-- 자연 키 유일성 (Book_id, Chapter_id, Verse_id)
CREATE UNIQUE INDEX IF NOT EXISTS idx_verses_natural_key
    ON verses(book_id, chapter_id, verse_id);

-- 챕터 단위 조회 인덱스
CREATE INDEX IF NOT EXISTS idx_verses_chapter ON verses(chapter_id, verse_id);
"#;
