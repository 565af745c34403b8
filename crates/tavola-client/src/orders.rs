//! # Order Book
//!
//! The signed-in user's order history, the order currently opened in
//! detail, and ratings left on it.

use tavola_core::validation::{validate_comment, validate_rating};
use tavola_core::{OrderDetail, OrderSummary, Rating, RatingRequest};
use tracing::{debug, info};

use crate::error::{ClientError, ClientResult};
use crate::session::AuthSession;

#[derive(Debug, Default)]
pub struct OrderBook {
    orders: Vec<OrderSummary>,
    selected: Option<OrderDetail>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> &[OrderSummary] {
        &self.orders
    }

    pub fn selected(&self) -> Option<&OrderDetail> {
        self.selected.as_ref()
    }

    /// Loads the user's order history. A failed load leaves the list empty.
    pub async fn fetch_orders(&mut self, session: &AuthSession) -> ClientResult<&[OrderSummary]> {
        let token = session.require_token().await?;
        let user_id = session
            .user_id()
            .await
            .filter(|id| !id.is_empty())
            .ok_or(ClientError::Unauthenticated)?;

        match session.api().orders_for_user(&token, &user_id).await {
            Ok(orders) => {
                debug!(%user_id, count = orders.len(), "Order history loaded");
                self.orders = orders;
                Ok(&self.orders)
            }
            Err(err) => {
                self.orders.clear();
                Err(err)
            }
        }
    }

    /// Opens one order in detail. A failed load clears the selection.
    pub async fn fetch_order_details(
        &mut self,
        session: &AuthSession,
        order_id: &str,
    ) -> ClientResult<&OrderDetail> {
        let token = session.require_token().await?;

        match session.api().order_detail(&token, order_id).await {
            Ok(detail) => Ok(&*self.selected.insert(detail)),
            Err(err) => {
                self.selected = None;
                Err(err)
            }
        }
    }

    pub fn clear_selected(&mut self) {
        self.selected = None;
    }

    /// Rates an order. When that order is the one open in detail, its rating
    /// and comment are updated in place.
    pub async fn submit_rating(
        &mut self,
        session: &AuthSession,
        order_id: &str,
        rating: u8,
        comment: Option<&str>,
    ) -> ClientResult<Rating> {
        validate_rating(rating)?;
        let comment = validate_comment(comment)?;
        let token = session.require_token().await?;

        let request = RatingRequest {
            rating,
            comment: comment.clone(),
        };
        session
            .api()
            .create_rating(&token, order_id, &request)
            .await?;
        info!(order_id, rating, "Order rated");

        if let Some(selected) = self.selected.as_mut().filter(|o| o.id == order_id) {
            selected.order_rating = Some(rating);
            selected.order_comment = comment.clone();
        }

        Ok(Rating {
            order_id: Some(order_id.to_string()),
            rating,
            comment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ApiClient, RetryPolicy};
    use std::time::Duration;
    use tavola_core::{CoreError, ValidationError};

    fn offline_session() -> AuthSession {
        let api = ApiClient::new(
            "http://127.0.0.1:9/".parse().unwrap(),
            Duration::from_secs(1),
            RetryPolicy::none(),
        )
        .unwrap();
        AuthSession::new(api)
    }

    #[tokio::test]
    async fn test_fetch_requires_login() {
        let mut book = OrderBook::new();
        let err = book.fetch_orders(&offline_session()).await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_rating_validated_before_login_check() {
        let mut book = OrderBook::new();
        let err = book
            .submit_rating(&offline_session(), "o1", 6, None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ClientError::Core(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_clear_selected() {
        let mut book = OrderBook::new();
        book.selected = Some(
            serde_json::from_value(serde_json::json!({ "id": "o1", "total_amount": 10 }))
                .unwrap(),
        );
        book.clear_selected();
        assert!(book.selected().is_none());
    }
}
