//! Cart commands. The cart is local; only `add` talks to the backend, to
//! look the menu item up.

use serde::Serialize;
use tavola_core::{AddOutcome, Cart, CartLine, CartTotals};
use tracing::info;

use crate::error::{CliError, CliResult};
use crate::render::{Render, Rendered};
use crate::App;

#[derive(Debug, Serialize)]
pub struct CartView {
    pub restaurant_id: Option<String>,
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
    /// Set when the last change did something the customer should notice.
    pub notice: Option<String>,
}

impl CartView {
    pub fn new(cart: &Cart) -> Self {
        CartView {
            restaurant_id: cart.restaurant_id().map(String::from),
            lines: cart.lines().to_vec(),
            totals: CartTotals::from(cart),
            notice: None,
        }
    }

    fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }
}

impl Render for CartView {
    fn render(&self) -> String {
        let mut out = String::new();
        if let Some(notice) = &self.notice {
            out.push_str(notice);
            out.push_str("\n\n");
        }
        let Some(restaurant_id) = &self.restaurant_id else {
            out.push_str("Your cart is empty.");
            return out;
        };

        out.push_str(&format!("Cart for restaurant {}\n", restaurant_id));
        for line in &self.lines {
            out.push_str(&format!(
                "{:<10} {:<28} {:>3} x {:>9} = {:>10}\n",
                line.menu_item_id,
                line.name,
                line.quantity,
                line.unit_price,
                line.line_total()
            ));
        }
        out.push_str(&format!(
            "{} items, total {}",
            self.totals.total_items, self.totals.total_price
        ));
        out
    }
}

fn view(app: &App, notice: Option<String>) -> CliResult<Rendered> {
    let view = app.cart.with_cart(CartView::new).with_notice(notice);
    Rendered::view(&view)
}

pub fn show(app: &App) -> CliResult<Rendered> {
    view(app, None)
}

/// Adds one of `menu_item_id` from `restaurant_id`'s menu.
pub async fn add(app: &App, restaurant_id: &str, menu_item_id: &str) -> CliResult<Rendered> {
    let menu = app.api.restaurant_menu(restaurant_id).await?;
    let item = menu
        .into_iter()
        .find(|item| item.id == menu_item_id)
        .ok_or_else(|| CliError::not_found("Menu item", menu_item_id))?;

    let outcome = app.cart.update(|cart| cart.add_item(&item)).await?;

    let notice = match outcome {
        AddOutcome::ReplacedRestaurant {
            previous_restaurant,
        } => {
            info!(%previous_restaurant, restaurant_id, "Cart switched restaurant");
            Some(format!(
                "Started a new cart for restaurant {}. Items from restaurant {} were removed.",
                restaurant_id, previous_restaurant
            ))
        }
        AddOutcome::Added | AddOutcome::Incremented { .. } => None,
    };
    view(app, notice)
}

/// Removes one unit. An item that is not in the cart leaves it unchanged.
pub async fn remove(app: &App, menu_item_id: &str) -> CliResult<Rendered> {
    let remaining = app
        .cart
        .update(|cart| Ok(cart.remove_item(menu_item_id)))
        .await?;

    let notice = remaining
        .is_none()
        .then(|| format!("{} was not in your cart.", menu_item_id));
    view(app, notice)
}

pub async fn set(app: &App, menu_item_id: &str, quantity: u32) -> CliResult<Rendered> {
    app.cart
        .update(|cart| cart.set_quantity(menu_item_id, quantity))
        .await?;
    view(app, None)
}

pub async fn clear(app: &App) -> CliResult<Rendered> {
    app.cart.clear().await?;
    view(app, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tavola_core::{MenuItem, Money};

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::new(&Cart::new());
        assert_eq!(view.render(), "Your cart is empty.");
        assert_eq!(view.totals.total_items, 0);
    }

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::new();
        let item = MenuItem {
            id: "m1".into(),
            restaurant_id: Some("r7".into()),
            name: "Margherita".into(),
            description: None,
            price: Money::from_cents(1250),
        };
        cart.add_item(&item).unwrap();
        cart.add_item(&item).unwrap();

        let view = CartView::new(&cart).with_notice(Some("Heads up".into()));
        let text = view.render();

        assert!(text.starts_with("Heads up\n\nCart for restaurant r7"));
        assert!(text.ends_with("2 items, total $25.00"));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["totals"]["total_items"], 2);
        assert_eq!(json["lines"][0]["menu_item_id"], "m1");
    }
}
