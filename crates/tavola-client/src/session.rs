//! # Auth Session
//!
//! Holds the bearer token issued by the backend and the user it belongs to.
//!
//! The token's claims are decoded on the client for display and expiry
//! only. The signature is never checked here: the backend verifies it on
//! every authenticated request.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   stored token ──► restore() ──► claims carry name + email? ──┐        │
//! │                                   and not expired?             │        │
//! │                                         │ no                   │ yes    │
//! │                                         ▼                      ▼        │
//! │                                   Err (caller drops      ┌──────────┐   │
//! │                                    the stored token)     │  Active  │   │
//! │                                                          └────┬─────┘   │
//! │   login() / signup() ─────────────────────────────────────────┘  │     │
//! │                                                                   │     │
//! │   schedule_logout() ── sleep until exp ──► same token? ──► clear  │     │
//! │   logout() ──────────────────────────────────────────────► clear ◄┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tavola_core::validation::{
    validate_address, validate_credentials, validate_email, validate_name, validate_password,
    validate_phone,
};
use tavola_core::{AuthPayload, LoginRequest, SignupRequest, UserProfile};
use tokio::sync::RwLock;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};
use crate::http::ApiClient;

// =============================================================================
// Claims
// =============================================================================

/// Claims the backend puts in its tokens. Everything is optional on the
/// wire; [`Claims::into_profile`] decides what is required.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Expiry, seconds since the epoch.
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// Builds the session user. Tokens without both a name and an email are
    /// not usable.
    pub fn into_profile(self) -> ClientResult<UserProfile> {
        let (Some(name), Some(email)) = (self.name, self.email) else {
            return Err(ClientError::InvalidToken(
                "token does not carry a name and email".into(),
            ));
        };

        let id = match self.id {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        Ok(UserProfile {
            id,
            name,
            email,
            phone_number: self.phone_number,
            address: self.address,
        })
    }
}

/// Decodes a token's claims without verifying its signature.
pub fn decode_claims(token: &str) -> ClientResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

// =============================================================================
// Session
// =============================================================================

#[derive(Debug, Clone)]
struct SessionData {
    token: String,
    user: UserProfile,
    expires_at: Option<DateTime<Utc>>,
}

impl SessionData {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }
}

/// The signed-in user, shared between commands.
///
/// Cheap to clone: clones share one session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    api: ApiClient,
    data: Arc<RwLock<Option<SessionData>>>,
    expiry_task: Arc<Mutex<Option<AbortHandle>>>,
}

impl AuthSession {
    pub fn new(api: ApiClient) -> Self {
        AuthSession {
            api,
            data: Arc::new(RwLock::new(None)),
            expiry_task: Arc::new(Mutex::new(None)),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // -------------------------------------------------------------------------
    // Establishing a session
    // -------------------------------------------------------------------------

    /// Adopts a previously stored token.
    ///
    /// Fails when the claims lack a name or email, or the token has expired.
    /// The session stays signed out in that case and the caller should
    /// discard the stored token.
    pub async fn restore(&self, token: &str) -> ClientResult<UserProfile> {
        let claims = decode_claims(token)?;
        let expires_at = claims.expires_at();
        let user = claims.into_profile()?;

        if expires_at.is_some_and(|at| at <= Utc::now()) {
            debug!(user_id = %user.id, "Stored token has expired");
            return Err(ClientError::SessionExpired);
        }

        self.install(token.to_string(), user.clone(), expires_at).await;
        debug!(user_id = %user.id, "Session restored");
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<UserProfile> {
        validate_credentials(email, password)?;

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let payload = self.api.login(&request).await?;
        let user = self.adopt(payload).await?;

        info!(user_id = %user.id, "Logged in");
        Ok(user)
    }

    pub async fn signup(&self, request: SignupRequest) -> ClientResult<UserProfile> {
        validate_name(&request.name)?;
        validate_email(&request.email)?;
        validate_password(&request.password)?;
        validate_phone(&request.phone_number)?;
        validate_address(&request.address)?;

        let payload = self.api.signup(&request).await?;
        let user = self.adopt(payload).await?;

        info!(user_id = %user.id, "Signed up");
        Ok(user)
    }

    /// Installs a freshly issued token. The payload's `user` wins over the
    /// claims; expiry always comes from the claims.
    async fn adopt(&self, payload: AuthPayload) -> ClientResult<UserProfile> {
        let claims = decode_claims(&payload.token);
        let expires_at = claims.as_ref().ok().and_then(Claims::expires_at);

        let user = match payload.user {
            Some(user) => user,
            None => claims?.into_profile()?,
        };

        self.install(payload.token, user.clone(), expires_at).await;
        Ok(user)
    }

    async fn install(&self, token: String, user: UserProfile, expires_at: Option<DateTime<Utc>>) {
        self.cancel_expiry();
        *self.data.write().await = Some(SessionData {
            token,
            user,
            expires_at,
        });
    }

    /// Clears the token and user and cancels any scheduled expiry.
    pub async fn logout(&self) {
        self.cancel_expiry();
        if self.data.write().await.take().is_some() {
            info!("Logged out");
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub async fn token(&self) -> Option<String> {
        self.data.read().await.as_ref().map(|d| d.token.clone())
    }

    pub async fn user(&self) -> Option<UserProfile> {
        self.data.read().await.as_ref().map(|d| d.user.clone())
    }

    pub async fn user_id(&self) -> Option<String> {
        self.data.read().await.as_ref().map(|d| d.user.id.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.data
            .read()
            .await
            .as_ref()
            .is_some_and(|d| !d.is_expired())
    }

    /// The token for an authenticated request.
    ///
    /// An expired session is cleared on the way out.
    pub async fn require_token(&self) -> ClientResult<String> {
        match self.data.read().await.as_ref() {
            None => return Err(ClientError::Unauthenticated),
            Some(d) if !d.is_expired() => return Ok(d.token.clone()),
            Some(_) => {}
        }

        warn!("Session expired, signing out");
        self.logout().await;
        Err(ClientError::SessionExpired)
    }

    // -------------------------------------------------------------------------
    // Expiry
    // -------------------------------------------------------------------------

    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.data.read().await.as_ref().and_then(|d| d.expires_at)
    }

    /// Time left before the token expires. Zero once it has.
    pub async fn time_remaining(&self) -> Option<Duration> {
        let at = self.expires_at().await?;
        Some((at - Utc::now()).to_std().unwrap_or(Duration::ZERO))
    }

    pub async fn is_expired(&self) -> bool {
        self.data
            .read()
            .await
            .as_ref()
            .is_some_and(SessionData::is_expired)
    }

    /// Spawns a task that signs the session out when the token expires.
    ///
    /// Replaces any earlier schedule. The task does nothing if the session
    /// has moved on to another token by the time it wakes. Returns `false`
    /// when there is nothing to schedule.
    pub async fn schedule_logout(&self) -> bool {
        let (token, delay) = {
            let guard = self.data.read().await;
            let Some(data) = guard.as_ref() else {
                return false;
            };
            let Some(at) = data.expires_at else {
                return false;
            };
            let delay = (at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            (data.token.clone(), delay)
        };

        let data = Arc::clone(&self.data);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut guard = data.write().await;
            if guard.as_ref().is_some_and(|d| d.token == token) {
                *guard = None;
                info!("Session expired, logged out");
            }
        });

        debug!(delay_secs = delay.as_secs(), "Scheduled logout at token expiry");
        let previous = self
            .expiry_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle.abort_handle());
        if let Some(previous) = previous {
            previous.abort();
        }
        true
    }

    fn cancel_expiry(&self) {
        let handle = self
            .expiry_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }

    // -------------------------------------------------------------------------
    // Profile
    // -------------------------------------------------------------------------

    /// Reloads the user from `GET /api/auth/profile`.
    pub async fn refresh_profile(&self) -> ClientResult<UserProfile> {
        let token = self.require_token().await?;
        let user = self.api.fetch_profile(&token).await?;

        if let Some(data) = self.data.write().await.as_mut() {
            if data.token == token {
                data.user = user.clone();
            }
        }
        Ok(user)
    }
}
