//! # tavola-core: Pure Client Logic for Tavola
//!
//! This crate holds the stateful heart of the Tavola ordering client as pure
//! data structures and functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tavola Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (`tavola`)                          │   │
//! │  │    restaurants ──► cart ──► checkout ──► orders / rate          │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────┐  ┌────────────▼────────────────────┐  │
//! │  │  tavola-store (SQLite)      │  │  tavola-client (REST + JWT)     │  │
//! │  │  cart lines, auth token     │  │  session, listing, checkout     │  │
//! │  └──────────────┬──────────────┘  └────────────┬────────────────────┘  │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────────────────────▼───────────────────┐   │
//! │  │               ★ tavola-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  money  │ │  types  │ │  cart   │ │ listing │ │validate │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic
//! - [`types`] - Backend DTOs (Restaurant, MenuItem, OrderDetail, ...)
//! - [`cart`] - Restaurant-scoped cart
//! - [`listing`] - Filter / sort / pagination state machine
//! - [`validation`] - Field rules for user input
//! - [`format`] - Display helpers
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tavola_core::{Cart, MenuItem, Money};
//!
//! let pizza = MenuItem {
//!     id: "m1".into(),
//!     restaurant_id: Some("r1".into()),
//!     name: "Margherita".into(),
//!     description: None,
//!     price: Money::from_cents(1250),
//! };
//!
//! let mut cart = Cart::new();
//! cart.add_item(&pizza).unwrap();
//! cart.add_item(&pizza).unwrap();
//!
//! assert_eq!(cart.total_items(), 2);
//! assert_eq!(cart.total_price().to_string(), "$25.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod format;
pub mod listing;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{AddOutcome, Cart, CartLine, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use listing::{FilterSet, ListingQuery, ListingState, PageSlot, Reconciliation, SortOption};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines in a cart.
pub const MAX_CART_ITEMS: usize = 50;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Catches fat-finger orders (typing 100 instead of 10).
pub const MAX_ITEM_QUANTITY: u32 = 99;

/// Page sizes the restaurant list offers.
pub const PER_PAGE_OPTIONS: [u32; 5] = [6, 9, 12, 18, 24];

/// Page size used until the customer picks another.
pub const DEFAULT_PER_PAGE: u32 = 9;
