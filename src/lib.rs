//! Verse Store - 마하바라타 구절 저장소 백엔드 라이브러리
//!
//! SQLite에 구절을 시드/저장하고 HTTP로 제공합니다.
//! 챗봇/번역/요약 AI 서비스는 외부 협력자로 취급하며 프록시만 제공합니다.

pub mod ai;
pub mod commands;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod models;
pub mod seed;
pub mod state;
pub mod utils;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::ai::AiClient;
use crate::config::Config;
use crate::db::Database;
use crate::error::VerseError;
use crate::seed::{SeedInput, SeedOptions, SeedReport};
use crate::state::AppState;

/// 설정된 시드 데이터 (파일 지정이 없으면 번들 샘플)
pub fn seed_input(config: &Config) -> Result<SeedInput, VerseError> {
    match &config.seed_file {
        Some(path) => {
            info!("Loading seed data from {}", path.display());
            SeedInput::from_file(path)
        }
        None => SeedInput::sample(),
    }
}

fn seed_store(db: &Database, config: &Config) -> Result<SeedReport, VerseError> {
    let input = seed_input(config)?;
    let options = SeedOptions::default().reset(config.always_reset);
    seed::seed(db, input, &options)
}

/// 시드 1회 실행 (관리용)
pub fn run_seed(config: &Config) -> Result<SeedReport, VerseError> {
    let db = Database::open(&config.database_url)?;
    seed_store(&db, config)
}

/// 저장소 연결 → 시드 → HTTP 서버 실행
///
/// 저장소를 열 수 없으면 `StoreUnavailable`로 즉시 실패합니다.
/// 시드는 리스너가 연결을 받기 전에 완료됩니다.
pub async fn start_server(config: Config) -> Result<(), VerseError> {
    info!("Opening verse store at {}", config.database_url);
    let db = Database::open(&config.database_url)?;

    if config.seed_on_start {
        // 시드 실패는 관리 편의 기능의 실패일 뿐, 서버는 계속 기동
        if let Err(e) = seed_store(&db, &config) {
            error!("Error during seed: {e}");
        }
    }

    let ai = AiClient::new(config.ai.clone())?;
    let state = AppState::new(db, ai);
    let app = commands::build_router(state);

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running at http://localhost:{}", config.port);
    info!("Try: http://localhost:{}/entries", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
