//! `tavola config show|init`. These run before the app is wired, so a
//! broken database path can still be inspected and fixed.

use serde::Serialize;
use tavola_client::ClientConfig;

use crate::commands::ConfigCommand;
use crate::error::{CliError, CliResult, ErrorCode};
use crate::render::{Render, Rendered};
use crate::state::ConfigState;

#[derive(Debug, Serialize)]
pub struct ConfigView {
    pub path: Option<String>,
    pub config: ClientConfig,
}

impl Render for ConfigView {
    fn render(&self) -> String {
        let c = &self.config;
        let database = c
            .database_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|e| format!("<{}>", e));

        format!(
            "Config file:   {}\n\
             Backend:       {}\n\
             Timeout:       {}s\n\
             Retries:       {} (backoff {}ms to {}s)\n\
             Page size:     {}\n\
             Sort:          {}\n\
             Database:      {}",
            self.path.as_deref().unwrap_or("(none)"),
            c.api.base_url,
            c.api.timeout_secs,
            c.api.max_retries,
            c.api.initial_backoff_ms,
            c.api.max_backoff_secs,
            c.listing.per_page,
            c.listing.sort.label(),
            database
        )
    }
}

pub fn run(state: &ConfigState, command: ConfigCommand) -> CliResult<Rendered> {
    match command {
        ConfigCommand::Show => show(state),
        ConfigCommand::Init { force } => init(state, force),
    }
}

pub fn show(state: &ConfigState) -> CliResult<Rendered> {
    Rendered::view(&ConfigView {
        path: state.path().map(|p| p.display().to_string()),
        config: state.config().clone(),
    })
}

/// Writes the effective settings (file, then env overrides) to the config
/// file so they can be edited.
pub fn init(state: &ConfigState, force: bool) -> CliResult<Rendered> {
    let Some(path) = state.path() else {
        return Err(CliError::new(
            ErrorCode::ConfigError,
            "No config path available; pass --config",
        ));
    };
    if path.exists() && !force {
        return Err(CliError::new(
            ErrorCode::ConfigError,
            format!("{} already exists (use --force to overwrite)", path.display()),
        ));
    }

    state.save()?;
    Ok(Rendered::message(format!("Wrote {}", path.display())))
}
