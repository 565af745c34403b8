//! # Checkout
//!
//! Turns the cart into an order.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  require token ──► cart non-empty? ──► CreateOrderRequest           │
//! │                                             │                        │
//! │                                    POST /api/orders                  │
//! │                                             │ ok                     │
//! │                                             ▼                        │
//! │                        snapshot lines, clear cart, confirmation      │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart is only cleared once the backend has accepted the order. Saving
//! the cleared cart is left to the caller.

use serde::Serialize;
use tavola_core::format::format_order_id;
use tavola_core::{
    Cart, CartLine, CoreError, CreateOrderRequest, Money, OrderItemRequest, OrderStatus,
    PaymentMethod,
};
use tracing::{info, warn};

use crate::error::ClientResult;
use crate::session::AuthSession;

/// What the customer sees after placing an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: String,
    /// `ORD-` plus the first eight characters of the id.
    pub display_id: String,
    pub status: OrderStatus,
    pub customer_name: String,
    pub delivery_address: Option<String>,
    pub phone_number: Option<String>,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub lines: Vec<CartLine>,
}

/// Builds the order body for the cart's current contents.
pub fn build_order_request(
    cart: &Cart,
    payment_method: PaymentMethod,
) -> ClientResult<CreateOrderRequest> {
    let Some(restaurant_id) = cart.restaurant_id() else {
        return Err(CoreError::EmptyCart.into());
    };

    let items = cart
        .lines()
        .iter()
        .map(|line| OrderItemRequest {
            menu_item_id: line.menu_item_id.clone(),
            quantity: line.quantity,
            price: line.unit_price,
        })
        .collect();

    Ok(CreateOrderRequest {
        restaurant_id: restaurant_id.to_string(),
        total_amount: cart.total_price(),
        payment_method,
        items,
    })
}

/// Places an order for everything in the cart and empties it.
pub async fn place_order(
    session: &AuthSession,
    cart: &mut Cart,
    payment_method: PaymentMethod,
) -> ClientResult<OrderConfirmation> {
    let token = session.require_token().await?;
    let request = build_order_request(cart, payment_method)?;

    let created = session.api().create_order(&token, &request).await?;
    info!(
        order_id = %created.id,
        restaurant_id = %request.restaurant_id,
        total = %request.total_amount,
        payment = payment_method.as_str(),
        "Order placed"
    );

    let lines = cart.lines().to_vec();
    cart.clear();

    let mut user = session.user().await;
    if user.as_ref().is_some_and(|u| u.address.is_none()) {
        match session.refresh_profile().await {
            Ok(profile) => user = Some(profile),
            Err(err) => warn!(error = %err, "Could not load delivery details"),
        }
    }
    let (customer_name, delivery_address, phone_number) = match user {
        Some(u) => (u.name, u.address, u.phone_number),
        None => (String::new(), None, None),
    };

    Ok(OrderConfirmation {
        display_id: format_order_id(&created.id),
        order_id: created.id,
        status: created.status,
        customer_name,
        delivery_address,
        phone_number,
        total: request.total_amount,
        payment_method,
        lines,
    })
}
