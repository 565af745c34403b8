//! # tavola-client: Backend Client for Tavola
//!
//! Everything that talks to the ordering backend: the REST transport, the
//! signed-in session, the restaurant listing controller, order history and
//! checkout.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ ListingControl │  │   OrderBook    │  │   place_order()        │    │
//! │  │                │  │                │  │                        │    │
//! │  │ filters, sort, │  │ history,       │  │ cart ──► order,        │    │
//! │  │ paging, stale  │  │ detail, rating │  │ confirmation           │    │
//! │  │ responses      │  │                │  │                        │    │
//! │  └───────┬────────┘  └───────┬────────┘  └───────────┬────────────┘    │
//! │          │                   │                       │                  │
//! │          │           ┌───────▼───────────────────────▼──────────┐      │
//! │          │           │   AuthSession (token, user, expiry)      │      │
//! │          │           └───────────────────┬──────────────────────┘      │
//! │          │                               │                              │
//! │  ┌───────▼───────────────────────────────▼──────────────────────────┐  │
//! │  │   ApiClient (reqwest + backoff)   ──►   services/* endpoints      │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ClientConfig: defaults ──► config.toml ──► TAVOLA_* env                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Client configuration (base URL, timeouts, listing defaults)
//! - [`error`] - Client error types
//! - [`http`] - `ApiClient` transport with retries
//! - [`services`] - One file per backend resource
//! - [`session`] - `AuthSession` with client-side claim decoding
//! - [`listing`] - `ListingController` over a `RestaurantCatalog`
//! - [`orders`] - `OrderBook` for history and ratings
//! - [`checkout`] - `place_order` and `OrderConfirmation`

pub mod checkout;
pub mod config;
pub mod error;
pub mod http;
pub mod listing;
pub mod orders;
pub mod services;
pub mod session;

pub use checkout::{build_order_request, place_order, OrderConfirmation};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{ApiClient, RetryPolicy};
pub use listing::{ListingController, RestaurantCatalog};
pub use orders::OrderBook;
pub use session::{decode_claims, AuthSession, Claims};
