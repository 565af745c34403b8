//! # Backend Endpoints
//!
//! One file per backend resource, each adding methods to [`ApiClient`](crate::http::ApiClient).
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  auth.rs         POST /api/auth/login, /api/auth/signup              │
//! │  profile.rs      GET  /api/auth/profile                              │
//! │  restaurants.rs  GET  /api/restaurants[/{id}[/menu|/cuisines]]       │
//! │                  GET  /api/restaurants/search?q=, /api/cuisines      │
//! │  orders.rs       POST /api/orders                                    │
//! │                  GET  /api/orders/user/{user_id}, /api/orders/{id}   │
//! │  ratings.rs      POST /api/rating/{order_id}/rating                  │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each operation carries the message shown when the backend fails without
//! saying why.

pub mod auth;
pub mod orders;
pub mod profile;
pub mod ratings;
pub mod restaurants;

use serde::Deserialize;

/// A single resource, bare or wrapped in a named field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped {
        #[serde(alias = "order", alias = "user", alias = "restaurant")]
        data: T,
    },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(inner) => inner,
        }
    }
}

/// A list, bare or wrapped in a named field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(
            alias = "menu",
            alias = "cuisines",
            alias = "restaurants",
            alias = "orders",
            alias = "items"
        )]
        data: Vec<T>,
    },
}

impl<T> ListEnvelope<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) | ListEnvelope::Wrapped { data: items } => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tavola_core::{Cuisine, UserProfile};

    #[test]
    fn test_envelope_accepts_both_shapes() {
        let wrapped: Envelope<UserProfile> = serde_json::from_value(json!({
            "user": { "id": 1, "name": "Ana", "email": "ana@example.com" }
        }))
        .unwrap();
        assert_eq!(wrapped.into_inner().name, "Ana");

        let bare: Envelope<UserProfile> = serde_json::from_value(json!({
            "id": 1, "name": "Ana", "email": "ana@example.com"
        }))
        .unwrap();
        assert_eq!(bare.into_inner().id, "1");
    }

    #[test]
    fn test_list_envelope_accepts_both_shapes() {
        let bare: ListEnvelope<Cuisine> =
            serde_json::from_value(json!([{ "id": 1, "name": "Thai" }])).unwrap();
        assert_eq!(bare.into_vec().len(), 1);

        let wrapped: ListEnvelope<Cuisine> =
            serde_json::from_value(json!({ "cuisines": ["Thai", "Greek"] })).unwrap();
        assert_eq!(wrapped.into_vec()[1].name, "Greek");
    }
}
