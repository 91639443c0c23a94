use std::path::{Path, PathBuf};

use crate::error::VerseError;

/// SQLite 파일 경로 검증 및 정규화
/// - 디렉토리를 가리키면 거부
/// - 부모 디렉토리가 없으면 생성 후 canonicalize
pub fn resolve_db_path(path_str: &str) -> Result<PathBuf, VerseError> {
    let path = Path::new(path_str);

    if path.is_dir() {
        return Err(VerseError::Config(format!(
            "database path {path_str:?} is a directory"
        )));
    }

    if path.exists() {
        return Ok(path.canonicalize()?);
    }

    // 새 파일: 부모 디렉토리를 준비한 뒤 파일명만 붙임
    let file_name = path
        .file_name()
        .ok_or_else(|| VerseError::Config(format!("database path {path_str:?} has no file name")))?;

    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent)?;
            Ok(parent.canonicalize()?.join(file_name))
        }
        None => Ok(PathBuf::from(path_str)),
    }
}
