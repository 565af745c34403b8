//! # Repository Module
//!
//! Repositories over the local SQLite store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartState (CLI)                  SessionState (CLI)                    │
//! │       │                                  │                              │
//! │       │ db.cart().save(&cart)            │ db.session().save_token(t)   │
//! │       ▼                                  ▼                              │
//! │  CartRepository                    SessionRepository                    │
//! │  ├── load()                        ├── load_token()                     │
//! │  ├── save(&Cart)                   ├── save_token(&str)                 │
//! │  └── clear()                       └── clear_token()                    │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  cart_lines                        session                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`cart::CartRepository`] - Cart snapshot persistence
//! - [`session::SessionRepository`] - Bearer token persistence

pub mod cart;
pub mod session;
