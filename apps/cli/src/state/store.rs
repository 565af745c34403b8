//! # Store State
//!
//! Wraps the local [`Database`]. The pool inside is already thread-safe.

use std::path::Path;

use tavola_store::{Database, StoreConfig};
use tracing::info;

use crate::error::CliResult;

#[derive(Debug, Clone)]
pub struct StoreState {
    db: Database,
}

impl StoreState {
    pub fn new(db: Database) -> Self {
        StoreState { db }
    }

    /// Opens (creating if needed) the database file and applies migrations.
    pub async fn open(path: &Path) -> CliResult<Self> {
        let db = Database::new(StoreConfig::new(path)).await?;
        info!(?path, "Local store ready");
        Ok(StoreState::new(db))
    }

    pub async fn in_memory() -> CliResult<Self> {
        Ok(StoreState::new(Database::new(StoreConfig::in_memory()).await?))
    }

    pub fn inner(&self) -> &Database {
        &self.db
    }
}
