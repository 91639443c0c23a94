//! Seed Module
//!
//! 구절 컬렉션 초기 적재.
//! - `reset = true` : 전체 삭제 후 best-effort 일괄 삽입 (중복은 건너뜀)
//! - `reset = false`: 자연 키 기준 upsert
//!
//! 결과는 레코드별 outcome을 담은 `SeedReport`로 호출자에게 반환됩니다.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::db::Database;
use crate::error::VerseError;
use crate::models::{NewVerse, VerseSummary};

/// 번들된 샘플 데이터셋 (1권 1장, 120개 원본 레코드)
pub const SAMPLE_DATASET: &str = include_str!("../data/mahabharata_sample.json");

/// 로그/리포트에 포함할 샘플 개수
const SAMPLE_SIZE: usize = 10;

/// 시드 입력 형태: 평탄 배열 또는 한 단계 중첩 배열
#[derive(Debug, Clone, PartialEq)]
pub enum SeedInput {
    Flat(Vec<Value>),
    Nested(Vec<Vec<Value>>),
}

impl SeedInput {
    /// 입력 경계에서 형태를 판별
    ///
    /// - `[ {..}, {..} ]`        → Flat
    /// - `[ [ {..} ], [ {..} ] ]` → Nested
    /// - 그 외(배열 아님, 혼합, 2단계 이상 중첩) → ValidationError
    pub fn from_value(value: Value) -> Result<Self, VerseError> {
        let Value::Array(items) = value else {
            return Err(VerseError::Validation("seed data must be a JSON array".into()));
        };

        if items.is_empty() || items.iter().all(Value::is_object) {
            return Ok(SeedInput::Flat(items));
        }

        if items.iter().all(Value::is_array) {
            let groups: Vec<Vec<Value>> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Array(group) => Some(group),
                    _ => None,
                })
                .collect();
            if groups.iter().flatten().any(Value::is_array) {
                return Err(VerseError::Validation(
                    "seed data may be nested at most one level".into(),
                ));
            }
            return Ok(SeedInput::Nested(groups));
        }

        Err(VerseError::Validation(
            "seed data must contain either records or arrays of records, not both".into(),
        ))
    }

    pub fn from_json_str(text: &str) -> Result<Self, VerseError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| VerseError::Validation(format!("invalid seed JSON: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_file(path: &Path) -> Result<Self, VerseError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// 번들 샘플 데이터셋
    pub fn sample() -> Result<Self, VerseError> {
        Self::from_json_str(SAMPLE_DATASET)
    }

    /// 단일 시퀀스로 평탄화
    pub fn into_records(self) -> Vec<Value> {
        match self {
            SeedInput::Flat(items) => items,
            SeedInput::Nested(groups) => groups.into_iter().flatten().collect(),
        }
    }
}

/// 시드 옵션
#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub reset: bool,
    pub sample_size: usize,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            reset: true,
            sample_size: SAMPLE_SIZE,
        }
    }
}

impl SeedOptions {
    pub fn reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    pub fn sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SeedMode {
    Reset,
    Upsert,
}

/// 레코드별 처리 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "camelCase")]
pub enum RecordOutcome {
    Inserted,
    Updated,
    Unchanged,
    SkippedDuplicate,
    FailedValidation(String),
}

/// 시드 결과 리포트
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub mode: SeedMode,
    pub outcomes: Vec<RecordOutcome>,
    pub total_after: usize,
    pub sample: Vec<VerseSummary>,
    pub finished_at: DateTime<Utc>,
}

impl SeedReport {
    fn count(&self, pred: impl Fn(&RecordOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }

    pub fn inserted(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Inserted))
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Updated))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Unchanged))
    }

    pub fn skipped_duplicates(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::SkippedDuplicate))
    }

    pub fn failed_validation(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::FailedValidation(_)))
    }
}

/// 시드 실행
pub fn seed(db: &Database, input: SeedInput, options: &SeedOptions) -> Result<SeedReport, VerseError> {
    let records: Vec<Result<NewVerse, VerseError>> = input
        .into_records()
        .iter()
        .map(NewVerse::from_value)
        .collect();

    let (mode, outcomes) = if options.reset {
        info!("Clearing existing verses before seeding");
        (SeedMode::Reset, db.replace_all(&records)?)
    } else {
        (SeedMode::Upsert, db.upsert_all(&records)?)
    };

    let total_after = db.count()?;
    let sample = db
        .first_verses(options.sample_size)?
        .iter()
        .map(VerseSummary::from)
        .collect();

    let report = SeedReport {
        mode,
        outcomes,
        total_after,
        sample,
        finished_at: Utc::now(),
    };
    log_report(&report);
    Ok(report)
}

fn log_report(report: &SeedReport) {
    match report.mode {
        SeedMode::Reset => info!(
            inserted = report.inserted(),
            skipped_duplicates = report.skipped_duplicates(),
            failed_validation = report.failed_validation(),
            "Seeded {} of {} records (fresh)",
            report.inserted(),
            report.outcomes.len()
        ),
        SeedMode::Upsert => info!(
            created = report.inserted(),
            updated = report.updated(),
            unchanged = report.unchanged(),
            failed_validation = report.failed_validation(),
            "Upserted {} of {} records",
            report.inserted() + report.updated(),
            report.outcomes.len()
        ),
    }
    info!("Collection now has {} verses", report.total_after);

    let sample = serde_json::to_string(&report.sample).unwrap_or_default();
    info!("First {} (summary): {sample}", report.sample.len());
}
