//! # Domain Types
//!
//! Data transfer types exchanged with the ordering backend.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Restaurant    │   │    MenuItem     │   │     Cuisine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  restaurant_id  │   │  id             │       │
//! │  │  name, rating   │   │  name, price    │   │  name           │       │
//! │  │  is_available   │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  OrderSummary   │   │  OrderDetail    │   │     Rating      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, status     │   │  items[]        │   │  rating 1..5    │       │
//! │  │  total_amount   │   │  payment_*      │   │  comment        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tolerant Decoding
//! The backend owns these shapes. Identifiers arrive as numbers or strings,
//! ratings as numbers or numeric strings, and some fields in either
//! snake_case or camelCase. Decoding accepts all of those forms and
//! normalises them (ids become `String`, prices become [`Money`]).

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tolerant field decoders
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Int(i64),
}

impl From<IdRepr> for String {
    fn from(repr: IdRepr) -> Self {
        match repr {
            IdRepr::Text(s) => s,
            IdRepr::Int(n) => n.to_string(),
        }
    }
}

pub(crate) fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    IdRepr::deserialize(d).map(String::from)
}

pub(crate) fn de_opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Option::<IdRepr>::deserialize(d).map(|o| o.map(String::from))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Num(f64),
    Text(String),
}

fn de_opt_f32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f32>, D::Error> {
    match Option::<NumberRepr>::deserialize(d)? {
        None => Ok(None),
        Some(NumberRepr::Num(n)) => Ok(Some(n as f32)),
        Some(NumberRepr::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberRepr::Text(s)) => s
            .trim()
            .parse::<f32>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid rating '{}'", s))),
    }
}

// =============================================================================
// Restaurant
// =============================================================================

/// Contact details shown on the restaurant page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Contact {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Opening state and human-readable hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Availability {
    #[serde(default, alias = "isOpen")]
    pub is_open: bool,
    #[serde(default)]
    pub hours: Option<String>,
}

/// A restaurant as returned by the listing and detail endpoints.
///
/// The listing endpoint returns the short form (no menu, no contact); the
/// detail endpoint fills in the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Restaurant {
    #[serde(deserialize_with = "de_id")]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, alias = "image", alias = "imageUrl")]
    pub image_url: Option<String>,

    /// Open-now flag from the listing endpoint.
    #[serde(default, alias = "isAvailable", alias = "is_open")]
    pub is_available: Option<bool>,

    /// Average rating (0.0 - 5.0), absent for unrated restaurants.
    #[serde(default, deserialize_with = "de_opt_f32")]
    pub rating: Option<f32>,

    #[serde(default)]
    pub cuisines: Vec<Cuisine>,

    #[serde(default)]
    pub contact: Option<Contact>,

    #[serde(default)]
    pub availability: Option<Availability>,

    /// Present on the detail endpoint only.
    #[serde(default)]
    pub menu: Vec<MenuItem>,
}

impl Restaurant {
    /// Resolves the open flag from whichever field the backend filled in.
    pub fn is_open(&self) -> bool {
        self.availability
            .as_ref()
            .map(|a| a.is_open)
            .or(self.is_available)
            .unwrap_or(false)
    }
}

// =============================================================================
// Cuisine
// =============================================================================

/// A cuisine tag.
///
/// Restaurant payloads sometimes carry cuisines as bare names
/// (`["Italian"]`); the catalogue endpoint returns `{id, name}` objects.
/// A bare name decodes with the name doubling as id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export)]
pub struct Cuisine {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CuisineRepr {
    Name(String),
    Full {
        #[serde(deserialize_with = "de_id")]
        id: String,
        name: String,
    },
}

impl<'de> Deserialize<'de> for Cuisine {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match CuisineRepr::deserialize(d)? {
            CuisineRepr::Name(name) => Cuisine {
                id: name.clone(),
                name,
            },
            CuisineRepr::Full { id, name } => Cuisine { id, name },
        })
    }
}

// =============================================================================
// Menu
// =============================================================================

/// A menu item.
///
/// `restaurant_id` is optional on the wire: the menu endpoint is already
/// scoped to a restaurant and some backends omit it. The client fills it in
/// with [`MenuItem::with_restaurant`] before the item can reach a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItem {
    #[serde(deserialize_with = "de_id")]
    pub id: String,

    #[serde(default, alias = "restaurantId", deserialize_with = "de_opt_id")]
    pub restaurant_id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[ts(type = "number")]
    pub price: Money,
}

impl MenuItem {
    /// Scopes the item to a restaurant unless it already carries one.
    pub fn with_restaurant(mut self, restaurant_id: &str) -> Self {
        if self.restaurant_id.is_none() {
            self.restaurant_id = Some(restaurant_id.to_string());
        }
        self
    }
}

// =============================================================================
// User
// =============================================================================

/// The signed-in customer's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserProfile {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, alias = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer will pay. Payment itself happens outside this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Credit/debit card.
    #[default]
    Card,
    /// Cash handed to the courier.
    CashOnDelivery,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::CashOnDelivery => "cash_on_delivery",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "card" => Ok(PaymentMethod::Card),
            "cash_on_delivery" | "cash-on-delivery" | "cod" | "cash" => {
                Ok(PaymentMethod::CashOnDelivery)
            }
            _ => Err(crate::error::ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                allowed: vec!["card".to_string(), "cash_on_delivery".to_string()],
            }),
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Backend order status.
///
/// Unknown statuses are preserved verbatim so a newer backend never breaks
/// order history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Delivered,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Other(s) => s,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "pending" => OrderStatus::Pending,
            "confirmed" => OrderStatus::Confirmed,
            "preparing" => OrderStatus::Preparing,
            "delivered" | "completed" => OrderStatus::Delivered,
            "cancelled" | "canceled" => OrderStatus::Cancelled,
            _ => OrderStatus::Other(s),
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        String::deserialize(d).map(OrderStatus::from)
    }
}

// =============================================================================
// Orders
// =============================================================================

/// One row of the order history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderSummary {
    #[serde(deserialize_with = "de_id")]
    pub id: String,

    #[serde(default, alias = "restaurantName")]
    pub restaurant_name: Option<String>,

    #[serde(default, alias = "createdAt")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(alias = "totalAmount")]
    #[ts(type = "number")]
    pub total_amount: Money,

    #[serde(default)]
    #[ts(type = "string")]
    pub status: OrderStatus,
}

/// A line inside an order detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    #[serde(default, alias = "menuItemId", deserialize_with = "de_opt_id")]
    pub menu_item_id: Option<String>,

    #[serde(alias = "name", alias = "menuItemName")]
    pub menu_item_name: String,

    #[serde(alias = "price", alias = "menuItemPrice")]
    #[ts(type = "number")]
    pub menu_item_price: Money,

    pub quantity: u32,
}

impl OrderLine {
    pub fn line_total(&self) -> Money {
        self.menu_item_price * self.quantity
    }
}

/// Full order detail including items and rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderDetail {
    #[serde(deserialize_with = "de_id")]
    pub id: String,

    #[serde(default, alias = "restaurantName")]
    pub restaurant_name: Option<String>,

    #[serde(default, alias = "restaurantAddress")]
    pub restaurant_address: Option<String>,

    #[serde(default, alias = "createdAt")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    #[ts(type = "string")]
    pub status: OrderStatus,

    #[serde(default)]
    pub items: Vec<OrderLine>,

    #[serde(default, alias = "paymentMethod")]
    pub payment_method: Option<String>,

    #[serde(default, alias = "paymentStatus")]
    pub payment_status: Option<String>,

    #[serde(alias = "totalAmount")]
    #[ts(type = "number")]
    pub total_amount: Money,

    #[serde(default, alias = "orderRating")]
    pub order_rating: Option<u8>,

    #[serde(default, alias = "orderComment")]
    pub order_comment: Option<String>,
}

impl OrderDetail {
    pub fn is_rated(&self) -> bool {
        self.order_rating.is_some()
    }
}

/// The order echoed back by `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedOrder {
    #[serde(deserialize_with = "de_id")]
    pub id: String,

    #[serde(default)]
    pub status: OrderStatus,
}

/// A rating left on a completed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rating {
    #[serde(default, alias = "orderId", deserialize_with = "de_opt_id")]
    pub order_id: Option<String>,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

// =============================================================================
// Pagination
// =============================================================================

/// Pagination block returned next to a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PageMeta {
    #[serde(alias = "currentPage", alias = "page")]
    pub current_page: u32,

    #[serde(alias = "totalPages")]
    pub total_pages: u32,

    #[serde(alias = "totalItems", alias = "total")]
    pub total_items: u64,

    #[serde(alias = "itemsPerPage", alias = "limit")]
    pub items_per_page: u32,
}

impl PageMeta {
    /// Metadata for an unpaginated response holding `len` items.
    pub fn single_page(len: usize) -> Self {
        PageMeta {
            current_page: 1,
            total_pages: if len == 0 { 0 } else { 1 },
            total_items: len as u64,
            items_per_page: len as u32,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(alias = "restaurants", alias = "items")]
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

// =============================================================================
// Request / Response Bodies
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub address: String,
}

/// `{token, user}` returned by login and signup.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub restaurant_id: String,
    pub total_amount: Money,
    pub payment_method: PaymentMethod,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub menu_item_id: String,
    pub quantity: u32,
    pub price: Money,
}

/// Body of `POST /api/rating/{order_id}/rating`.
#[derive(Debug, Clone, Serialize)]
pub struct RatingRequest {
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_restaurant_accepts_numeric_id_and_string_rating() {
        let r: Restaurant = serde_json::from_value(json!({
            "id": 7,
            "name": "Trattoria",
            "rating": "4.6",
            "is_available": true,
            "cuisines": ["Italian"]
        }))
        .unwrap();

        assert_eq!(r.id, "7");
        assert_eq!(r.rating, Some(4.6));
        assert!(r.is_open());
        assert_eq!(r.cuisines[0].name, "Italian");
        assert!(r.menu.is_empty());
    }

    #[test]
    fn test_restaurant_availability_block_wins() {
        let r: Restaurant = serde_json::from_value(json!({
            "id": "r1",
            "name": "Noodle Bar",
            "is_available": true,
            "availability": { "isOpen": false, "hours": "11:00 - 22:00" }
        }))
        .unwrap();

        assert!(!r.is_open());
    }

    #[test]
    fn test_cuisine_object_form() {
        let c: Cuisine = serde_json::from_value(json!({ "id": 3, "name": "Thai" })).unwrap();
        assert_eq!(c.id, "3");
        assert_eq!(c.name, "Thai");
    }

    #[test]
    fn test_menu_item_scoping() {
        let item: MenuItem =
            serde_json::from_value(json!({ "id": 1, "name": "Pizza", "price": "9.50" })).unwrap();
        assert_eq!(item.restaurant_id, None);

        let item = item.with_restaurant("r1");
        assert_eq!(item.restaurant_id.as_deref(), Some("r1"));
        assert_eq!(item.price.cents(), 950);

        let item = item.with_restaurant("other");
        assert_eq!(item.restaurant_id.as_deref(), Some("r1"));
    }

    #[test]
    fn test_order_status_preserves_unknown() {
        let s: OrderStatus = serde_json::from_value(json!("out_for_delivery")).unwrap();
        assert_eq!(s, OrderStatus::Other("out_for_delivery".to_string()));
        assert_eq!(serde_json::to_value(&s).unwrap(), json!("out_for_delivery"));

        let s: OrderStatus = serde_json::from_value(json!("Pending")).unwrap();
        assert_eq!(s, OrderStatus::Pending);
    }

    #[test]
    fn test_order_detail_decodes_backend_shape() {
        let detail: OrderDetail = serde_json::from_value(json!({
            "id": "5f2b8c1e-aaaa-bbbb-cccc-000000000000",
            "restaurant_name": "Trattoria",
            "created_at": "2026-10-19T12:00:00Z",
            "status": "pending",
            "payment_method": "card",
            "total_amount": "25.00",
            "items": [
                { "menu_item_name": "Pizza", "menu_item_price": "12.50", "quantity": 2 }
            ]
        }))
        .unwrap();

        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].line_total().cents(), 2500);
        assert!(!detail.is_rated());
    }

    #[test]
    fn test_create_order_request_wire_shape() {
        let req = CreateOrderRequest {
            restaurant_id: "r1".to_string(),
            total_amount: Money::from_cents(2500),
            payment_method: PaymentMethod::CashOnDelivery,
            items: vec![OrderItemRequest {
                menu_item_id: "m1".to_string(),
                quantity: 2,
                price: Money::from_cents(1250),
            }],
        };

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "restaurantId": "r1",
                "totalAmount": 25.0,
                "paymentMethod": "cash_on_delivery",
                "items": [{ "menuItemId": "m1", "quantity": 2, "price": 12.5 }]
            })
        );
    }

    #[test]
    fn test_page_meta_aliases() {
        let meta: PageMeta = serde_json::from_value(json!({
            "currentPage": 2, "totalPages": 5, "totalItems": 43, "itemsPerPage": 9
        }))
        .unwrap();
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.total_items, 43);
    }

    #[test]
    fn test_bindings_use_field_names_not_aliases() {
        let decl = OrderDetail::decl();
        assert!(decl.contains("restaurant_name"));
        assert!(!decl.contains("restaurantName"));
        assert!(PaymentMethod::inline().contains("\"cash_on_delivery\""));

        let detail: OrderDetail = serde_json::from_value(json!({
            "id": 7,
            "restaurantName": "Trattoria",
            "paymentMethod": "card",
            "totalAmount": 12.5,
            "orderRating": 4,
            "items": [{ "menuItemName": "Pizza", "menuItemPrice": 12.5, "quantity": 1 }]
        }))
        .unwrap();
        assert_eq!(detail.restaurant_name.as_deref(), Some("Trattoria"));
        assert_eq!(detail.order_rating, Some(4));
        assert_eq!(detail.items[0].menu_item_name, "Pizza");
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(
            "cash-on-delivery".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::CashOnDelivery
        );
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }
}
