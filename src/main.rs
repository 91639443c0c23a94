use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use verse_store_lib::config::{self, Config};
use verse_store_lib::{run_seed, start_server};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// SQLite 경로 (`:memory:` 가능). DATABASE_URL보다 우선
    #[arg(long, global = true)]
    database: Option<String>,

    /// 시드 데이터 JSON 파일. SEED_FILE보다 우선
    #[arg(long, global = true)]
    seed_file: Option<PathBuf>,

    /// 기존 데이터를 유지하고 upsert (ALWAYS_RESET=false 와 동일)
    #[arg(long, global = true)]
    no_reset: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 시드 후 HTTP 서버 실행 (기본)
    Serve {
        #[arg(long)]
        port: Option<u16>,

        /// 시작 시 시드를 건너뜀
        #[arg(long)]
        no_seed: bool,
    },
    /// 시드만 1회 실행하고 결과 리포트(JSON) 출력
    Seed,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(database) = &self.database {
            config.database_url = database.clone();
        }
        if let Some(seed_file) = &self.seed_file {
            config.seed_file = Some(seed_file.clone());
        }
        if self.no_reset {
            config.always_reset = false;
        }
        if let Some(Command::Serve { port, no_seed }) = &self.command {
            if let Some(port) = port {
                config.port = *port;
            }
            if *no_seed {
                config.seed_on_start = false;
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let env_files = config::load_env_files();

    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    for path in env_files {
        info!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    cli.apply(&mut config);

    let result = match cli.command {
        Some(Command::Seed) => run_seed(&config).and_then(|report| {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }),
        Some(Command::Serve { .. }) | None => start_server(config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
