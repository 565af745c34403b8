//! # Cart State
//!
//! The customer's cart, mirrored to the local store after every change.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Command              CartState               Cart change               │
//! │  ───────              ─────────               ───────────               │
//! │                                                                         │
//! │  cart add ──────────► update(add_item) ─────► push line / qty + 1      │
//! │  cart remove ───────► update(remove_item) ──► qty - 1 / drop line      │
//! │  cart set ──────────► update(set_quantity) ─► qty = n (0 drops)        │
//! │  cart clear ────────► clear() ──────────────► no lines                 │
//! │  checkout ──────────► update_async(...) ────► cleared on success       │
//! │                                                                         │
//! │  Every write: lock, edit, snapshot, unlock, then save the snapshot.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tavola_core::{Cart, CoreResult};
use tavola_store::CartRepository;
use tracing::debug;

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
    repo: CartRepository,
}

impl CartState {
    /// Loads the persisted cart.
    pub async fn load(repo: CartRepository) -> CliResult<Self> {
        let cart = repo.load().await?;
        debug!(lines = cart.line_count(), "Cart loaded");
        Ok(CartState {
            cart: Arc::new(Mutex::new(cart)),
            repo,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read-only access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&*self.lock())
    }

    /// Applies an edit and saves the result. A failed edit saves nothing.
    pub async fn update<F, R>(&self, f: F) -> CliResult<R>
    where
        F: FnOnce(&mut Cart) -> CoreResult<R>,
    {
        let (result, snapshot) = {
            let mut cart = self.lock();
            let result = f(&mut *cart)?;
            (result, cart.clone())
        };
        self.repo.save(&snapshot).await?;
        Ok(result)
    }

    /// Runs an async operation against a working copy of the cart and
    /// adopts the copy only if the operation succeeds.
    pub async fn update_async<F, Fut, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(Cart) -> Fut,
        Fut: Future<Output = Result<(R, Cart), E>>,
        E: From<CliError>,
    {
        let working = self.with_cart(Cart::clone);
        let (result, updated) = f(working).await?;

        *self.lock() = updated.clone();
        self.repo
            .save(&updated)
            .await
            .map_err(|e| E::from(CliError::from(e)))?;
        Ok(result)
    }

    pub async fn clear(&self) -> CliResult<()> {
        self.lock().clear();
        self.repo.clear().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::StoreState;
    use tavola_core::{AddOutcome, MenuItem, Money};

    fn item(id: &str, restaurant: &str) -> MenuItem {
        MenuItem {
            id: id.into(),
            restaurant_id: Some(restaurant.into()),
            name: format!("Dish {id}"),
            description: None,
            price: Money::from_cents(900),
        }
    }

    #[tokio::test]
    async fn test_updates_are_persisted() {
        let store = StoreState::in_memory().await.unwrap();
        let state = CartState::load(store.inner().cart()).await.unwrap();

        state.update(|c| c.add_item(&item("m1", "r1"))).await.unwrap();
        state.update(|c| c.add_item(&item("m1", "r1"))).await.unwrap();

        let reloaded = CartState::load(store.inner().cart()).await.unwrap();
        assert_eq!(reloaded.with_cart(|c| c.quantity_of("m1")), 2);
    }

    #[tokio::test]
    async fn test_failed_update_is_not_saved() {
        let store = StoreState::in_memory().await.unwrap();
        let state = CartState::load(store.inner().cart()).await.unwrap();
        state.update(|c| c.add_item(&item("m1", "r1"))).await.unwrap();

        let err = state
            .update(|c| c.set_quantity("missing", 3))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let reloaded = CartState::load(store.inner().cart()).await.unwrap();
        assert_eq!(reloaded.with_cart(|c| c.line_count()), 1);
    }

    #[tokio::test]
    async fn test_switching_restaurant_replaces_cart() {
        let store = StoreState::in_memory().await.unwrap();
        let state = CartState::load(store.inner().cart()).await.unwrap();
        state.update(|c| c.add_item(&item("m1", "r1"))).await.unwrap();

        let outcome = state.update(|c| c.add_item(&item("m7", "r2"))).await.unwrap();

        assert_eq!(
            outcome,
            AddOutcome::ReplacedRestaurant {
                previous_restaurant: "r1".into()
            }
        );
        assert_eq!(state.with_cart(|c| c.restaurant_id().map(String::from)), Some("r2".into()));
    }

    #[tokio::test]
    async fn test_async_update_discards_copy_on_error() {
        let store = StoreState::in_memory().await.unwrap();
        let state = CartState::load(store.inner().cart()).await.unwrap();
        state.update(|c| c.add_item(&item("m1", "r1"))).await.unwrap();

        let result: Result<(), CliError> = state
            .update_async(|mut cart| async move {
                cart.clear();
                Err::<((), Cart), _>(CliError::validation("declined"))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(state.with_cart(|c| c.total_items()), 1);
    }
}
