//! # tavola-store: Local Persistence for Tavola
//!
//! Keeps the client state that has to outlive a single `tavola` invocation:
//! the cart and the bearer token. Everything else belongs to the backend.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tavola Local State                               │
//! │                                                                         │
//! │  `tavola cart add 42`                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   tavola-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌───────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations   │  │   │
//! │  │   │   (pool.rs)   │◄───│  cart, session │   │  (embedded)   │  │   │
//! │  │   └───────────────┘    └────────────────┘   └───────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ~/.local/share/tavola/tavola.db (platform data dir)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tavola_store::{Database, StoreConfig};
//!
//! let db = Database::new(StoreConfig::new("tavola.db")).await?;
//! let cart = db.cart().load().await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{StoreError, StoreResult};
pub use pool::{Database, StoreConfig};
pub use repository::cart::CartRepository;
pub use repository::session::SessionRepository;
