//! # Error Types
//!
//! Domain-specific error types for tavola-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tavola-core errors (this file)                                        │
//! │  ├── CoreError        - Cart and listing rule violations               │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tavola-store errors  → StoreError  (SQLite failures)                  │
//! │  tavola-client errors → ClientError (HTTP, session, config)            │
//! │  CLI errors           → CliError    (what the terminal prints)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → CliError            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core client logic errors.
///
/// These represent rule violations in the cart or listing state. They leave
/// the state they were raised from unchanged.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A menu item arrived without the restaurant it belongs to.
    ///
    /// ## When This Occurs
    /// - Menu payload from the backend is missing `restaurant_id`
    /// - A caller constructed an item by hand and forgot the scope
    #[error("Menu item {item_id} has no restaurant and cannot be added to the cart")]
    MissingRestaurant { item_id: String },

    /// The item is not in the cart.
    #[error("Item {0} is not in the cart")]
    ItemNotInCart(String),

    /// Cart has exceeded maximum allowed distinct lines.
    #[error("Cart cannot have more than {max} different items")]
    CartTooLarge { max: usize },

    /// Line quantity would exceed the maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: u32, max: u32 },

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Page size is not one of the offered options.
    #[error("{requested} items per page is not supported (choose one of {allowed:?})")]
    UnsupportedPageSize { requested: u32, allowed: Vec<u32> },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before a request leaves the client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., malformed email, bad amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
