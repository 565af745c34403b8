//! Login and signup.

use tavola_core::{AuthPayload, LoginRequest, SignupRequest};

use crate::error::ClientResult;
use crate::http::ApiClient;

const LOGIN_ERROR: &str = "Invalid credentials.";
const SIGNUP_ERROR: &str = "Signup failed. Please try again.";

impl ApiClient {
    /// `POST /api/auth/login`
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<AuthPayload> {
        self.post_json(&["api", "auth", "login"], request, None, LOGIN_ERROR)
            .await
    }

    /// `POST /api/auth/signup`
    pub async fn signup(&self, request: &SignupRequest) -> ClientResult<AuthPayload> {
        self.post_json(&["api", "auth", "signup"], request, None, SIGNUP_ERROR)
            .await
    }
}
