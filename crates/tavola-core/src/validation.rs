//! # Validation Module
//!
//! Input validation for everything the customer types before it is sent.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end (CLI arguments)                                    │
//! │  ├── Type validation (clap parsing)                                    │
//! │  └── THIS MODULE: field rules before any request                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Backend                                                      │
//! │  ├── Authoritative checks (unique email, order totals)                 │
//! │  └── Errors surface through ClientError::Api { message }               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Length limits count characters, not bytes.
//!
//! ## Usage
//! ```rust
//! use tavola_core::validation::{validate_email, validate_rating};
//!
//! validate_email("ana@example.com").unwrap();
//! assert!(validate_rating(6).is_err());
//! ```

use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn max_chars(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

// =============================================================================
// Account Fields
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty, at most 254 characters
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a dot that is neither first nor last
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    required("email", email)?;
    max_chars("email", email, 254)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    match domain.find('.') {
        Some(i) if i > 0 && !domain.ends_with('.') => Ok(()),
        _ => Err(invalid()),
    }
}

/// Validates a password: 6 to 128 characters.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    if password.chars().count() < 6 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        });
    }
    max_chars("password", password, 128)
}

/// Validates a display name: 1 to 100 characters after trimming.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();
    required("name", name)?;
    max_chars("name", name, 100)
}

/// Validates a phone number.
///
/// ## Rules
/// - 7 to 20 characters
/// - Digits, spaces and `+ - ( )` only, with at least 7 digits
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    required("phone_number", phone)?;

    if phone.chars().count() < 7 {
        return Err(ValidationError::TooShort {
            field: "phone_number".to_string(),
            min: 7,
        });
    }
    max_chars("phone_number", phone, 20)?;

    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'));
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !allowed || digits < 7 {
        return Err(ValidationError::InvalidFormat {
            field: "phone_number".to_string(),
            reason: "must contain at least 7 digits and only + - ( ) as separators".to_string(),
        });
    }
    Ok(())
}

/// Validates a delivery address: required, at most 300 characters.
pub fn validate_address(address: &str) -> ValidationResult<()> {
    let address = address.trim();
    required("address", address)?;
    max_chars("address", address, 300)
}

/// Validates the login pair. Only presence is checked; the backend decides.
pub fn validate_credentials(email: &str, password: &str) -> ValidationResult<()> {
    required("email", email)?;
    required("password", password)
}

// =============================================================================
// Ordering Fields
// =============================================================================

/// Validates a star rating (1 to 5).
pub fn validate_rating(rating: u8) -> ValidationResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 1,
            max: 5,
        });
    }
    Ok(())
}

/// Validates an optional review comment.
///
/// ## Returns
/// The trimmed comment, or `None` when it was blank.
pub fn validate_comment(comment: Option<&str>) -> ValidationResult<Option<String>> {
    match comment.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => {
            max_chars("comment", text, 500)?;
            Ok(Some(text.to_string()))
        }
    }
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (no search)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();
    max_chars("query", query, 100)?;
    Ok(query.to_string())
}

/// Validates a line quantity typed by the customer (1 to 99).
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 || qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_ITEM_QUANTITY),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
