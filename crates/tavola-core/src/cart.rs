//! # Cart
//!
//! The customer's cart: menu items with quantities, scoped to one restaurant.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Action                   Method                  Cart Change           │
//! │  ──────                   ──────                  ───────────           │
//! │                                                                         │
//! │  Add (same restaurant) ──► add_item() ──────────► qty += 1 / push line │
//! │                                                                         │
//! │  Add (other restaurant) ─► add_item() ──────────► clear, push qty 1    │
//! │                                                                         │
//! │  Minus button ───────────► remove_item() ───────► qty -= 1 / drop line │
//! │                                                                         │
//! │  Type a quantity ────────► set_quantity() ──────► qty = clamp(n)       │
//! │                                                                         │
//! │  Empty cart / checkout ──► clear() ─────────────► lines.clear()        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Every line shares the same `restaurant_id`
//! - No line has quantity 0
//! - Lines are unique by `menu_item_id`
//! - At most [`MAX_CART_ITEMS`] lines, each at most [`MAX_ITEM_QUANTITY`]
//!
//! A failing operation leaves the cart exactly as it was.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::MenuItem;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the cart.
///
/// ## Design Notes
/// `name` and `unit_price` are frozen when the line is created. The cart
/// keeps showing (and checks out at) the price the customer saw even if the
/// menu changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub menu_item_id: String,
    pub restaurant_id: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    fn from_menu_item(item: &MenuItem, restaurant_id: &str) -> Self {
        CartLine {
            menu_item_id: item.id.clone(),
            restaurant_id: restaurant_id.to_string(),
            name: item.name.clone(),
            unit_price: item.price,
            quantity: 1,
            added_at: Utc::now(),
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

// =============================================================================
// Add Outcome
// =============================================================================

/// What `add_item` did to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was created with quantity 1.
    Added,
    /// An existing line was incremented to `quantity`.
    Incremented { quantity: u32 },
    /// The cart held items from `previous_restaurant`; they were discarded
    /// and the new item is now the only line.
    ReplacedRestaurant { previous_restaurant: String },
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Rebuilds a cart from persisted lines.
    ///
    /// Lines that would break an invariant are dropped rather than rejected:
    /// zero quantities, duplicates, lines from a second restaurant, and
    /// anything past the line limit. Quantities above the cap are clamped.
    pub fn restore(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Cart::new();
        for mut line in lines {
            if line.quantity == 0 || cart.find(&line.menu_item_id).is_some() {
                continue;
            }
            if let Some(scope) = cart.restaurant_id() {
                if scope != line.restaurant_id {
                    continue;
                }
            }
            if cart.lines.len() >= MAX_CART_ITEMS {
                break;
            }
            line.quantity = line.quantity.min(MAX_ITEM_QUANTITY);
            cart.lines.push(line);
        }
        cart
    }

    /// Adds one unit of a menu item.
    ///
    /// ## Behavior
    /// - Item without a restaurant: `MissingRestaurant`
    /// - Cart scoped to another restaurant: cart is replaced by this item
    /// - Item already in cart: quantity + 1 (capped at [`MAX_ITEM_QUANTITY`])
    /// - Otherwise: new line with quantity 1 (at most [`MAX_CART_ITEMS`] lines)
    pub fn add_item(&mut self, item: &MenuItem) -> CoreResult<AddOutcome> {
        let restaurant_id =
            item.restaurant_id
                .as_deref()
                .ok_or_else(|| CoreError::MissingRestaurant {
                    item_id: item.id.clone(),
                })?;

        if let Some(previous) = self.restaurant_id() {
            if previous != restaurant_id {
                let previous_restaurant = previous.to_string();
                self.lines.clear();
                self.lines
                    .push(CartLine::from_menu_item(item, restaurant_id));
                return Ok(AddOutcome::ReplacedRestaurant {
                    previous_restaurant,
                });
            }
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.menu_item_id == item.id) {
            let requested = line.quantity + 1;
            if requested > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = requested;
            return Ok(AddOutcome::Incremented {
                quantity: requested,
            });
        }

        if self.lines.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.lines
            .push(CartLine::from_menu_item(item, restaurant_id));
        Ok(AddOutcome::Added)
    }

    /// Removes one unit of an item.
    ///
    /// Returns the remaining quantity (0 when the line was dropped), or
    /// `None` when the item was not in the cart.
    pub fn remove_item(&mut self, menu_item_id: &str) -> Option<u32> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.menu_item_id == menu_item_id)?;

        if self.lines[idx].quantity <= 1 {
            self.lines.remove(idx);
            Some(0)
        } else {
            self.lines[idx].quantity -= 1;
            Some(self.lines[idx].quantity)
        }
    }

    /// Sets a line's quantity, clamped to `[0, MAX_ITEM_QUANTITY]`.
    ///
    /// Zero removes the line. Returns the quantity actually stored.
    pub fn set_quantity(&mut self, menu_item_id: &str, quantity: u32) -> CoreResult<u32> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.menu_item_id == menu_item_id)
            .ok_or_else(|| CoreError::ItemNotInCart(menu_item_id.to_string()))?;

        let quantity = quantity.min(MAX_ITEM_QUANTITY);
        if quantity == 0 {
            self.lines.remove(idx);
        } else {
            self.lines[idx].quantity = quantity;
        }
        Ok(quantity)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn find(&self, menu_item_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.menu_item_id == menu_item_id)
    }

    /// Quantity of an item, 0 when absent.
    pub fn quantity_of(&self, menu_item_id: &str) -> u32 {
        self.find(menu_item_id).map(|l| l.quantity).unwrap_or(0)
    }

    /// The restaurant every line belongs to, `None` for an empty cart.
    pub fn restaurant_id(&self) -> Option<&str> {
        self.lines.first().map(|l| l.restaurant_id.as_str())
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all quantities.
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of unit price × quantity.
    pub fn total_price(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Cart totals summary for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub line_count: usize,
    pub total_items: u32,
    pub total_price: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn menu_item(id: &str, restaurant: &str, cents: i64) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            restaurant_id: Some(restaurant.to_string()),
            name: format!("Dish {}", id),
            description: None,
            price: Money::from_cents(cents),
        }
    }

    #[test]
    fn test_add_new_item() {
        let mut cart = Cart::new();
        let outcome = cart.add_item(&menu_item("m1", "r1", 999)).unwrap();

        assert_eq!(outcome, AddOutcome::Added);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_items(), 1);
        assert_eq!(cart.restaurant_id(), Some("r1"));
    }

    #[test]
    fn test_add_same_item_increments() {
        let mut cart = Cart::new();
        let item = menu_item("m1", "r1", 999);

        cart.add_item(&item).unwrap();
        let outcome = cart.add_item(&item).unwrap();

        assert_eq!(outcome, AddOutcome::Incremented { quantity: 2 });
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_price().cents(), 1998);
    }

    #[test]
    fn test_add_from_other_restaurant_replaces_cart() {
        let mut cart = Cart::new();
        cart.add_item(&menu_item("m1", "r1", 500)).unwrap();
        cart.add_item(&menu_item("m1", "r1", 500)).unwrap();
        cart.add_item(&menu_item("m2", "r1", 700)).unwrap();

        let outcome = cart.add_item(&menu_item("x1", "r2", 1200)).unwrap();

        assert_eq!(
            outcome,
            AddOutcome::ReplacedRestaurant {
                previous_restaurant: "r1".to_string()
            }
        );
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.quantity_of("x1"), 1);
        assert_eq!(cart.restaurant_id(), Some("r2"));
    }

    #[test]
    fn test_add_without_restaurant_fails() {
        let mut cart = Cart::new();
        let mut item = menu_item("m1", "r1", 500);
        item.restaurant_id = None;

        let err = cart.add_item(&item).unwrap_err();
        assert!(matches!(err, CoreError::MissingRestaurant { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_cap_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        let item = menu_item("m1", "r1", 100);
        cart.add_item(&item).unwrap();
        cart.set_quantity("m1", MAX_ITEM_QUANTITY).unwrap();

        let err = cart.add_item(&item).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { requested: 100, max: 99 }));
        assert_eq!(cart.quantity_of("m1"), MAX_ITEM_QUANTITY);
    }

    #[test]
    fn test_line_limit() {
        let mut cart = Cart::new();
        for i in 0..MAX_CART_ITEMS {
            cart.add_item(&menu_item(&format!("m{}", i), "r1", 100)).unwrap();
        }

        let err = cart.add_item(&menu_item("one-more", "r1", 100)).unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { .. }));
        assert_eq!(cart.line_count(), MAX_CART_ITEMS);
    }

    #[test]
    fn test_remove_decrements_then_drops() {
        let mut cart = Cart::new();
        let item = menu_item("m1", "r1", 250);
        cart.add_item(&item).unwrap();
        cart.add_item(&item).unwrap();

        assert_eq!(cart.remove_item("m1"), Some(1));
        assert_eq!(cart.remove_item("m1"), Some(0));
        assert!(cart.is_empty());
        assert_eq!(cart.restaurant_id(), None);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&menu_item("m1", "r1", 250)).unwrap();

        assert_eq!(cart.remove_item("nope"), None);
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_set_quantity_clamps_and_removes() {
        let mut cart = Cart::new();
        cart.add_item(&menu_item("m1", "r1", 250)).unwrap();

        assert_eq!(cart.set_quantity("m1", 500).unwrap(), MAX_ITEM_QUANTITY);
        assert_eq!(cart.set_quantity("m1", 3).unwrap(), 3);
        assert_eq!(cart.total_price().cents(), 750);

        assert_eq!(cart.set_quantity("m1", 0).unwrap(), 0);
        assert!(cart.is_empty());

        assert!(matches!(
            cart.set_quantity("m1", 2),
            Err(CoreError::ItemNotInCart(_))
        ));
    }

    #[test]
    fn test_totals_use_frozen_price() {
        let mut cart = Cart::new();
        let mut item = menu_item("m1", "r1", 1210);
        cart.add_item(&item).unwrap();

        item.price = Money::from_cents(9999);
        cart.add_item(&item).unwrap();
        cart.add_item(&item).unwrap();

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.total_items, 3);
        assert_eq!(totals.total_price.cents(), 3630);
    }

    #[test]
    fn test_restore_repairs_invariants() {
        let line = |id: &str, restaurant: &str, qty: u32| CartLine {
            menu_item_id: id.to_string(),
            restaurant_id: restaurant.to_string(),
            name: id.to_string(),
            unit_price: Money::from_cents(100),
            quantity: qty,
            added_at: Utc::now(),
        };

        let cart = Cart::restore(vec![
            line("a", "r1", 2),
            line("b", "r1", 0),
            line("c", "r2", 1),
            line("a", "r1", 5),
            line("d", "r1", 250),
        ]);

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.quantity_of("a"), 2);
        assert_eq!(cart.quantity_of("d"), MAX_ITEM_QUANTITY);
        assert_eq!(cart.restaurant_id(), Some("r1"));
    }
}
