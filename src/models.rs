//! Verse Data Models
//!
//! 프론트엔드 JSON 형식(`Book_id`, `Content_eng` ...)과 매핑되는 Rust 데이터 모델

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::VerseError;

/// 저장된 구절 (store가 부여한 `_id` 포함)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "Book_id")]
    pub book_id: String,
    #[serde(rename = "Chapter_id")]
    pub chapter_id: String,
    #[serde(rename = "Verse_id")]
    pub verse_id: String,
    #[serde(rename = "Content_eng")]
    pub content_eng: String,
    #[serde(rename = "Content_hin")]
    pub content_hin: String,
    #[serde(rename = "Content_chi")]
    pub content_chi: String,
    #[serde(rename = "Summary")]
    pub summary: String,
}

impl Verse {
    pub fn key(&self) -> VerseKey {
        VerseKey::new(&self.book_id, &self.chapter_id, &self.verse_id)
    }

    /// 저장 전 레코드 부분만 추출 (`_id` 제외)
    pub fn content(&self) -> NewVerse {
        NewVerse {
            book_id: self.book_id.clone(),
            chapter_id: self.chapter_id.clone(),
            verse_id: self.verse_id.clone(),
            content_eng: self.content_eng.clone(),
            content_hin: self.content_hin.clone(),
            content_chi: self.content_chi.clone(),
            summary: Some(self.summary.clone()),
        }
    }
}

/// 아직 저장되지 않은 구절 레코드 (POST 본문 / 시드 데이터)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVerse {
    #[serde(rename = "Book_id")]
    pub book_id: String,
    #[serde(rename = "Chapter_id")]
    pub chapter_id: String,
    #[serde(rename = "Verse_id")]
    pub verse_id: String,
    #[serde(rename = "Content_eng")]
    pub content_eng: String,
    #[serde(rename = "Content_hin")]
    pub content_hin: String,
    #[serde(rename = "Content_chi")]
    pub content_chi: String,
    /// 생략 시 새 레코드는 빈 문자열, upsert는 기존 값 유지
    #[serde(rename = "Summary", default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl NewVerse {
    /// JSON 값에서 레코드를 검증하며 추출
    ///
    /// - 키 필드(`Book_id`, `Chapter_id`, `Verse_id`)는 비어있지 않은 문자열이어야 함
    /// - 본문 필드는 문자열이어야 함 (빈 문자열 허용)
    /// - `Summary`는 생략 가능
    /// - 알 수 없는 필드는 무시
    pub fn from_value(value: &Value) -> Result<Self, VerseError> {
        let obj = value.as_object().ok_or_else(|| {
            VerseError::Validation(format!(
                "verse record must be a JSON object, got {}",
                json_type_name(value)
            ))
        })?;

        Ok(Self {
            book_id: key_field(obj, "Book_id")?,
            chapter_id: key_field(obj, "Chapter_id")?,
            verse_id: key_field(obj, "Verse_id")?,
            content_eng: text_field(obj, "Content_eng")?,
            content_hin: text_field(obj, "Content_hin")?,
            content_chi: text_field(obj, "Content_chi")?,
            summary: optional_text_field(obj, "Summary")?,
        })
    }

    /// HTTP 본문 바이트에서 레코드 추출
    pub fn from_slice(bytes: &[u8]) -> Result<Self, VerseError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| VerseError::Validation(format!("invalid JSON body: {e}")))?;
        Self::from_value(&value)
    }

    pub fn key(&self) -> VerseKey {
        VerseKey::new(&self.book_id, &self.chapter_id, &self.verse_id)
    }

    pub fn with_id(self, id: String) -> Verse {
        Verse {
            id,
            book_id: self.book_id,
            chapter_id: self.chapter_id,
            verse_id: self.verse_id,
            content_eng: self.content_eng,
            content_hin: self.content_hin,
            content_chi: self.content_chi,
            summary: self.summary.unwrap_or_default(),
        }
    }
}

fn key_field(obj: &Map<String, Value>, name: &str) -> Result<String, VerseError> {
    match obj.get(name) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(VerseError::Validation(format!("{name} must not be empty"))),
        Some(other) => Err(VerseError::Validation(format!(
            "{name} must be a string, got {}",
            json_type_name(other)
        ))),
        None => Err(VerseError::Validation(format!("{name} is required"))),
    }
}

fn text_field(obj: &Map<String, Value>, name: &str) -> Result<String, VerseError> {
    optional_text_field(obj, name)?
        .ok_or_else(|| VerseError::Validation(format!("{name} is required")))
}

fn optional_text_field(obj: &Map<String, Value>, name: &str) -> Result<Option<String>, VerseError> {
    match obj.get(name) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(VerseError::Validation(format!(
            "{name} must be a string, got {}",
            json_type_name(other)
        ))),
        None => Ok(None),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 자연 키 (Book_id, Chapter_id, Verse_id)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VerseKey {
    pub book: String,
    pub chapter: String,
    pub verse: String,
}

impl VerseKey {
    pub fn new(book: &str, chapter: &str, verse: &str) -> Self {
        Self {
            book: book.to_string(),
            chapter: chapter.to_string(),
            verse: verse.to_string(),
        }
    }
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.book, self.chapter, self.verse)
    }
}

/// 목록 조회 필터 (`GET /entries?book=&chapter=&verse=`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse: Option<String>,
}

impl VerseFilter {
    pub fn chapter(chapter: &str) -> Self {
        Self {
            chapter: Some(chapter.to_string()),
            ..Self::default()
        }
    }

    pub fn key(key: &VerseKey) -> Self {
        Self {
            book: Some(key.book.clone()),
            chapter: Some(key.chapter.clone()),
            verse: Some(key.verse.clone()),
        }
    }

    /// 빈 문자열 파라미터(`?book=`)는 필터 없음으로 취급
    pub fn normalized(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            book: keep(self.book),
            chapter: keep(self.chapter),
            verse: keep(self.verse),
        }
    }
}

/// 시드 로그용 요약 레코드
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseSummary {
    #[serde(rename = "Book_id")]
    pub book_id: String,
    #[serde(rename = "Chapter_id")]
    pub chapter_id: String,
    #[serde(rename = "Verse_id")]
    pub verse_id: String,
    #[serde(rename = "Summary")]
    pub summary: String,
}

impl From<&Verse> for VerseSummary {
    fn from(v: &Verse) -> Self {
        Self {
            book_id: v.book_id.clone(),
            chapter_id: v.chapter_id.clone(),
            verse_id: v.verse_id.clone(),
            summary: v.summary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Value {
        json!({
            "Book_id": "1",
            "Chapter_id": "1",
            "Verse_id": "7",
            "Content_eng": "Sauti described how Vyasa composed the Mahabharata.",
            "Content_hin": "सौति ने बताया",
            "Content_chi": "索提叙述",
            "Summary": "Vyasa composes the epic."
        })
    }

    #[test]
    fn test_valid_record_is_accepted_unmodified() {
        let verse = NewVerse::from_value(&record()).unwrap();
        assert_eq!(verse.key(), VerseKey::new("1", "1", "7"));
        assert_eq!(verse.content_hin, "सौति ने बताया");
        assert_eq!(verse.summary.as_deref(), Some("Vyasa composes the epic."));
    }

    #[test]
    fn test_missing_summary_defaults_to_empty() {
        let mut value = record();
        value.as_object_mut().unwrap().remove("Summary");
        let verse = NewVerse::from_value(&value).unwrap();
        assert_eq!(verse.summary, None);
        assert_eq!(verse.with_id("abc".into()).summary, "");
    }

    #[test]
    fn test_missing_key_field_is_validation_error() {
        let mut value = record();
        value.as_object_mut().unwrap().remove("Verse_id");
        let err = NewVerse::from_value(&value).unwrap_err();
        assert!(matches!(err, VerseError::Validation(ref m) if m.contains("Verse_id")));
    }

    #[test]
    fn test_numeric_key_is_validation_error() {
        let mut value = record();
        value["Book_id"] = json!(1);
        let err = NewVerse::from_value(&value).unwrap_err();
        assert!(matches!(err, VerseError::Validation(ref m) if m.contains("number")));
    }

    #[test]
    fn test_blank_key_and_non_object_are_rejected() {
        let mut value = record();
        value["Chapter_id"] = json!("  ");
        assert!(NewVerse::from_value(&value).is_err());
        assert!(NewVerse::from_value(&json!(["not", "an", "object"])).is_err());
        assert!(NewVerse::from_slice(b"{not json").is_err());
    }

    #[test]
    fn test_filter_normalizes_empty_params() {
        let filter = VerseFilter {
            book: Some(String::new()),
            chapter: Some("1".into()),
            verse: None,
        }
        .normalized();
        assert_eq!(filter, VerseFilter::chapter("1"));
    }

    #[test]
    fn test_verse_serializes_with_original_field_names() {
        let verse = NewVerse::from_value(&record()).unwrap().with_id("abc".into());
        let value = serde_json::to_value(&verse).unwrap();
        assert_eq!(value["_id"], "abc");
        assert_eq!(value["Book_id"], "1");
        assert_eq!(value["Content_eng"], record()["Content_eng"]);
    }
}
