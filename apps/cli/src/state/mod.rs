//! # State Module
//!
//! Application state for the CLI, split into one small type per concern.
//! Commands take only the state they need.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌─────────────┐ │
//! │  │  StoreState  │  │  CartState   │  │ SessionState │  │ ConfigState │ │
//! │  │              │  │              │  │              │  │             │ │
//! │  │  Database    │  │  Arc<Mutex<  │  │  AuthSession │  │ ClientConfig│ │
//! │  │  (SQLite     │  │    Cart>>    │  │  + stored    │  │ + its path  │ │
//! │  │   pool)      │  │  + repo      │  │    token     │  │             │ │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └─────────────┘ │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • StoreState: pool is internally synchronised                         │
//! │  • CartState: Mutex held only for synchronous edits, never across I/O  │
//! │  • SessionState: AuthSession guards itself with an RwLock              │
//! │  • ConfigState: read-only after load                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod session;
mod store;

pub use cart::CartState;
pub use config::ConfigState;
pub use session::SessionState;
pub use store::StoreState;
