//! # Cart Repository
//!
//! Persists the cart so it survives restarts.
//!
//! ## Save Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   SINGLE TRANSACTION                                    │
//! │                                                                         │
//! │  1. DELETE FROM cart_lines                                              │
//! │  2. INSERT INTO cart_lines (...) for each line, position = index        │
//! │                                                                         │
//! │  COMMIT ← the stored cart is always one complete snapshot               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Loading goes through [`Cart::restore`], so a hand-edited or stale file can
//! never produce a cart that breaks the single-restaurant rule.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use tavola_core::{Cart, CartLine, Money};

#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    menu_item_id: String,
    restaurant_id: String,
    name: String,
    unit_price_cents: i64,
    quantity: i64,
    added_at: DateTime<Utc>,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        CartLine {
            menu_item_id: row.menu_item_id,
            restaurant_id: row.restaurant_id,
            name: row.name,
            unit_price: Money::from_cents(row.unit_price_cents),
            quantity: u32::try_from(row.quantity).unwrap_or(0),
            added_at: row.added_at,
        }
    }
}

/// Repository for the persisted cart.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Loads the stored cart (empty when nothing was saved).
    pub async fn load(&self) -> StoreResult<Cart> {
        let rows: Vec<CartLineRow> = sqlx::query_as(
            r#"
            SELECT menu_item_id, restaurant_id, name, unit_price_cents, quantity, added_at
            FROM cart_lines
            ORDER BY position ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let cart = Cart::restore(rows.into_iter().map(CartLine::from));
        debug!(lines = cart.line_count(), "Cart loaded");
        Ok(cart)
    }

    /// Replaces the stored cart with `cart`.
    pub async fn save(&self, cart: &Cart) -> StoreResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::TransactionFailed(e.to_string()))?;

        sqlx::query("DELETE FROM cart_lines")
            .execute(&mut *tx)
            .await?;

        for (position, line) in cart.lines().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO cart_lines (
                    menu_item_id, restaurant_id, name, unit_price_cents,
                    quantity, position, added_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&line.menu_item_id)
            .bind(&line.restaurant_id)
            .bind(&line.name)
            .bind(line.unit_price.cents())
            .bind(i64::from(line.quantity))
            .bind(position as i64)
            .bind(line.added_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::TransactionFailed(e.to_string()))?;

        debug!(
            lines = cart.line_count(),
            restaurant_id = ?cart.restaurant_id(),
            "Cart saved"
        );
        Ok(())
    }

    /// Removes every stored line.
    pub async fn clear(&self) -> StoreResult<()> {
        sqlx::query("DELETE FROM cart_lines")
            .execute(&self.pool)
            .await?;
        debug!("Stored cart cleared");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
