//! Configuration
//!
//! 환경 변수 기반 설정. `.env.local` / `.env` 파일을 먼저 로드하되
//! 이미 설정된 변수는 덮어쓰지 않습니다.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::ai::AiEndpoints;
use crate::error::VerseError;

pub const DEFAULT_DATABASE_URL: &str = "verses.db";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_CHATBOT_URL: &str = "http://localhost:8000";
pub const DEFAULT_SUMMARIZE_URL: &str = "http://localhost:8001";
pub const DEFAULT_TRANSLATE_URL: &str = "http://localhost:8002";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 경로 또는 `:memory:`
    pub database_url: String,
    pub port: u16,
    /// 시작 시 시드에서 전체 삭제 여부
    pub always_reset: bool,
    pub seed_on_start: bool,
    /// None이면 번들 샘플 데이터셋 사용
    pub seed_file: Option<PathBuf>,
    pub ai: AiEndpoints,
}

impl Config {
    /// 프로세스 환경 변수에서 로드 (`load_env_files` 이후 호출)
    pub fn load() -> Result<Self, VerseError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 key → value 조회 함수로부터 로드
    pub fn from_lookup<F>(lookup: F) -> Result<Self, VerseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let ai = AiEndpoints {
            chat_url: parse_url("CHATBOT_API_URL", get("CHATBOT_API_URL"), DEFAULT_CHATBOT_URL)?,
            translate_url: parse_url(
                "TRANSLATE_API_URL",
                get("TRANSLATE_API_URL"),
                DEFAULT_TRANSLATE_URL,
            )?,
            summarize_url: parse_url(
                "SUMMARIZE_API_URL",
                get("SUMMARIZE_API_URL"),
                DEFAULT_SUMMARIZE_URL,
            )?,
            timeout: Duration::from_secs(parse_or(
                "AI_TIMEOUT_SECS",
                get("AI_TIMEOUT_SECS"),
                DEFAULT_AI_TIMEOUT_SECS,
            )?),
        };

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            port: parse_or("PORT", get("PORT"), DEFAULT_PORT)?,
            always_reset: parse_bool("ALWAYS_RESET", get("ALWAYS_RESET"), true)?,
            seed_on_start: parse_bool("SEED_ON_START", get("SEED_ON_START"), true)?,
            seed_file: get("SEED_FILE").map(PathBuf::from),
            ai,
        })
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T, VerseError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match raw {
        None => {
            debug!("{key} not set, using default: {default}");
            Ok(default)
        }
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e| VerseError::Config(format!("invalid {key} value {v:?}: {e}"))),
    }
}

/// `1/true/yes`, `0/false/no` (대소문자 무시)
fn parse_bool(key: &str, raw: Option<String>, default: bool) -> Result<bool, VerseError> {
    let Some(v) = raw else {
        return Ok(default);
    };
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(VerseError::Config(format!("invalid {key} value {v:?}: expected a boolean"))),
    }
}

fn parse_url(key: &str, raw: Option<String>, default: &str) -> Result<Url, VerseError> {
    let text = raw.unwrap_or_else(|| default.to_string());
    Url::parse(text.trim()).map_err(|e| VerseError::Config(format!("invalid {key} value {text:?}: {e}")))
}

fn find_upwards(start: PathBuf, filename: &str, max_hops: usize) -> Option<PathBuf> {
    let mut cur = start;
    for _ in 0..=max_hops {
        let candidate = cur.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }
        if !cur.pop() {
            break;
        }
    }
    None
}

/// `.env.local` 우선, 다음 `.env` (CWD에서 상위로 탐색)
///
/// 로깅 초기화 전에 호출되므로 로드한 파일 경로를 반환만 합니다.
pub fn load_env_files() -> Vec<PathBuf> {
    let Ok(cwd) = env::current_dir() else {
        return Vec::new();
    };

    let mut loaded = Vec::new();
    for name in [".env.local", ".env"] {
        if let Some(path) = find_upwards(cwd.clone(), name, 4) {
            // 형식 오류가 있는 파일은 건너뜀
            if dotenvy::from_path(&path).is_ok() {
                loaded.push(path);
            }
        }
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, VerseError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.database_url, "verses.db");
        assert_eq!(cfg.port, 3001);
        assert!(cfg.always_reset);
        assert!(cfg.seed_on_start);
        assert!(cfg.seed_file.is_none());
        assert_eq!(cfg.ai.chat_url.as_str(), "http://localhost:8000/");
        assert_eq!(cfg.ai.summarize_url.port(), Some(8001));
        assert_eq!(cfg.ai.translate_url.port(), Some(8002));
        assert_eq!(cfg.ai.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("DATABASE_URL", ":memory:"),
            ("PORT", "8080"),
            ("ALWAYS_RESET", "False"),
            ("SEED_FILE", "/tmp/seed.json"),
            ("TRANSLATE_API_URL", "http://translate.internal:9000"),
            ("AI_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(cfg.database_url, ":memory:");
        assert_eq!(cfg.port, 8080);
        assert!(!cfg.always_reset);
        assert_eq!(cfg.seed_file, Some(PathBuf::from("/tmp/seed.json")));
        assert_eq!(cfg.ai.translate_url.host_str(), Some("translate.internal"));
        assert_eq!(cfg.ai.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let cfg = config(&[("PORT", "  "), ("ALWAYS_RESET", "")]).unwrap();
        assert_eq!(cfg.port, 3001);
        assert!(cfg.always_reset);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        assert!(matches!(config(&[("PORT", "http")]), Err(VerseError::Config(_))));
        assert!(matches!(config(&[("ALWAYS_RESET", "maybe")]), Err(VerseError::Config(_))));
        assert!(matches!(
            config(&[("CHATBOT_API_URL", "not a url")]),
            Err(VerseError::Config(_))
        ));
    }
}
