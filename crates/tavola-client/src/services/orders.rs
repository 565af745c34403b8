//! Order placement and history.

use tavola_core::{CreateOrderRequest, CreatedOrder, OrderDetail, OrderSummary};

use super::{Envelope, ListEnvelope};
use crate::error::ClientResult;
use crate::http::ApiClient;

const CREATE_ORDER_ERROR: &str = "Failed to create the order. Please try again.";
const FETCH_ORDERS_ERROR: &str = "Failed to fetch orders.";
const FETCH_ORDER_DETAIL_ERROR: &str = "Failed to fetch order details.";

impl ApiClient {
    /// `POST /api/orders`
    pub async fn create_order(
        &self,
        token: &str,
        request: &CreateOrderRequest,
    ) -> ClientResult<CreatedOrder> {
        let body: Envelope<CreatedOrder> = self
            .post_json(&["api", "orders"], request, Some(token), CREATE_ORDER_ERROR)
            .await?;
        Ok(body.into_inner())
    }

    /// `GET /api/orders/user/{user_id}`
    pub async fn orders_for_user(
        &self,
        token: &str,
        user_id: &str,
    ) -> ClientResult<Vec<OrderSummary>> {
        let path = ["api", "orders", "user", user_id];
        let body: ListEnvelope<OrderSummary> = self
            .get_json(&path, &[], Some(token), FETCH_ORDERS_ERROR)
            .await?;
        Ok(body.into_vec())
    }

    /// `GET /api/orders/{id}`
    pub async fn order_detail(&self, token: &str, order_id: &str) -> ClientResult<OrderDetail> {
        let path = ["api", "orders", order_id];
        let body: Envelope<OrderDetail> = self
            .get_json(&path, &[], Some(token), FETCH_ORDER_DETAIL_ERROR)
            .await?;
        Ok(body.into_inner())
    }
}
