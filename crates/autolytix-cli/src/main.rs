//! Autolytix CLI - vehicle maintenance tracking from the terminal.
//!
//! Talks to the Autolytix backend with a persistent local session: log in
//! once, then list vehicles, record mileage and read maintenance history
//! until the token expires.

mod commands;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use autolytix_core::{ApiClient, Config, FileStore, Navigator, Route, RouteGuard, SessionManager};

use commands::Cli;

/// Directory for daily rolling log files. Unset means stderr only.
const LOG_DIR_ENV: &str = "AUTOLYTIX_LOG_DIR";

/// Initialize the tracing subscriber for logging.
///
/// The returned guard must live until exit so buffered file logs are flushed.
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::env::var_os(LOG_DIR_ENV).map(PathBuf::from) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "autolytix.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

/// Reports screen changes requested by the session on the terminal.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route, replace_history: bool) {
        debug!(%route, replace_history, "Navigation requested");
        if route == Route::Login {
            eprintln!("Inicia sesión con `autolytix login` para continuar.");
        }
    }
}

/// Everything a command needs, wired together once per run.
pub struct Context {
    pub config: Config,
    pub session: Arc<SessionManager>,
    pub guard: RouteGuard,
    pub client: ApiClient,
}

impl Context {
    fn build(config: Config) -> Result<Self> {
        let storage = Arc::new(FileStore::new(config.storage_path()?));
        let session = Arc::new(SessionManager::new(storage, Arc::new(TerminalNavigator)));
        let base_url = config.api_base_url()?;
        info!(api_url = %base_url, "Using backend");

        Ok(Self {
            guard: RouteGuard::new(session.clone()),
            client: ApiClient::new(&base_url, session.clone())?,
            session,
            config,
        })
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing();

    let cli = Cli::parse();

    let ctx = Context::build(Config::load()?)?;
    commands::run(&ctx, cli.command).await
}
