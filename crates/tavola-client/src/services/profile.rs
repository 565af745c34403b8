//! The signed-in user's profile.

use tavola_core::UserProfile;

use super::Envelope;
use crate::error::ClientResult;
use crate::http::ApiClient;

const PROFILE_ERROR: &str = "Failed to fetch profile data.";

impl ApiClient {
    /// `GET /api/auth/profile`, unwrapping the `{user}` envelope.
    pub async fn fetch_profile(&self, token: &str) -> ClientResult<UserProfile> {
        let body: Envelope<UserProfile> = self
            .get_json(&["api", "auth", "profile"], &[], Some(token), PROFILE_ERROR)
            .await?;
        Ok(body.into_inner())
    }
}
