//! # Tavola CLI
//!
//! The `tavola` command: browse restaurants, fill a cart, check out and
//! rate orders from the terminal.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Command Startup                                   │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter, written to stderr             │
//! │     • Default: info,tavola=debug,sqlx=warn; override with RUST_LOG     │
//! │                                                                         │
//! │  2. Load Configuration ───────────────────────────────────────────────► │
//! │     • defaults ──► config.toml ──► TAVOLA_* env                         │
//! │     • `config show|init` stop here                                      │
//! │                                                                         │
//! │  3. Open Local Store ─────────────────────────────────────────────────► │
//! │     • SQLite with WAL mode, pending migrations applied                  │
//! │                                                                         │
//! │  4. Initialize State Objects ─────────────────────────────────────────► │
//! │     • CartState: persisted cart                                         │
//! │     • SessionState: stored token restored, expiry scheduled             │
//! │                                                                         │
//! │  5. Dispatch the command, render text or JSON                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod render;
pub mod state;

use std::path::PathBuf;

use clap::Parser;
use tavola_client::{ApiClient, AuthSession};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use commands::Command;
use error::CliResult;
use render::Rendered;
use state::{CartState, ConfigState, SessionState, StoreState};

#[derive(Debug, Parser)]
#[command(name = "tavola", version, about = "Order food from your terminal")]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true, env = "TAVOLA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Everything a command may need, wired once per invocation.
#[derive(Debug)]
pub struct App {
    pub config: ConfigState,
    pub store: StoreState,
    pub cart: CartState,
    pub session: SessionState,
    pub api: ApiClient,
}

impl App {
    /// Opens the local store named by the config and wires the state.
    pub async fn init(config: ConfigState) -> CliResult<Self> {
        let db_path = config.config().database_path()?;
        debug!(?db_path, "Database path determined");
        let store = StoreState::open(&db_path).await?;
        Self::with_store(config, store).await
    }

    pub async fn with_store(config: ConfigState, store: StoreState) -> CliResult<Self> {
        if !store.inner().health_check().await {
            warn!("Local store did not answer a health check");
        }

        let api = ApiClient::from_config(config.config())?;
        let cart = CartState::load(store.inner().cart()).await?;
        let session = SessionState::new(AuthSession::new(api.clone()), store.inner().session());

        if let Some(user) = session.restore().await? {
            debug!(user_id = %user.id, "Signed in from stored session");
        }

        info!(base_url = %api.base_url(), "State initialized");
        Ok(App {
            config,
            store,
            cart,
            session,
            api,
        })
    }

    pub async fn shutdown(&self) {
        self.store.inner().close().await;
    }
}

/// Runs one parsed command line.
pub async fn run(cli: Cli) -> CliResult<Rendered> {
    let config = ConfigState::load(cli.config)?;

    if let Command::Config(cmd) = cli.command {
        return commands::config::run(&config, cmd);
    }

    let app = App::init(config).await?;
    let result = commands::dispatch(&app, cli.command).await;
    app.shutdown().await;
    result
}

/// Initializes the tracing subscriber. Logs go to stderr so stdout stays
/// clean for `--json`.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tavola=trace` - Show trace for tavola crates only
/// - Default: `info,tavola=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tavola=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
