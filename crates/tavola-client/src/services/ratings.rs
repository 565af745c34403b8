//! Order ratings.

use tavola_core::RatingRequest;

use crate::error::ClientResult;
use crate::http::ApiClient;

const RATING_ERROR: &str = "Failed to create rating, Please try again.";

impl ApiClient {
    /// `POST /api/rating/{order_id}/rating`
    ///
    /// The response body is not relied on; callers keep what they sent.
    pub async fn create_rating(
        &self,
        token: &str,
        order_id: &str,
        request: &RatingRequest,
    ) -> ClientResult<()> {
        let path = ["api", "rating", order_id, "rating"];
        let _: serde_json::Value = self
            .post_json(&path, request, Some(token), RATING_ERROR)
            .await?;
        Ok(())
    }
}
