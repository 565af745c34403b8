//! # Session State
//!
//! The [`AuthSession`] plus the token kept in the local store between runs.
//!
//! ```text
//! startup ──► load_token ──► AuthSession::restore ──► ok ──► schedule_logout
//!                                    │
//!                                    └── rejected ──► clear_token
//! ```

use tavola_client::{AuthSession, ClientError};
use tavola_core::{SignupRequest, UserProfile};
use tavola_store::SessionRepository;
use tracing::{info, warn};

use crate::error::CliResult;

#[derive(Debug, Clone)]
pub struct SessionState {
    session: AuthSession,
    tokens: SessionRepository,
}

impl SessionState {
    pub fn new(session: AuthSession, tokens: SessionRepository) -> Self {
        SessionState { session, tokens }
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Restores the stored token, if any. Tokens the session rejects are
    /// deleted so the next run starts signed out.
    pub async fn restore(&self) -> CliResult<Option<UserProfile>> {
        let Some(token) = self.tokens.load_token().await? else {
            return Ok(None);
        };

        match self.session.restore(&token).await {
            Ok(user) => {
                self.session.schedule_logout().await;
                Ok(Some(user))
            }
            Err(err @ (ClientError::SessionExpired | ClientError::InvalidToken(_))) => {
                warn!(error = %err, "Discarding stored session");
                self.tokens.clear_token().await?;
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> CliResult<UserProfile> {
        let user = self.session.login(email, password).await?;
        self.remember().await?;
        Ok(user)
    }

    pub async fn signup(&self, request: SignupRequest) -> CliResult<UserProfile> {
        let user = self.session.signup(request).await?;
        self.remember().await?;
        Ok(user)
    }

    async fn remember(&self) -> CliResult<()> {
        if let Some(token) = self.session.token().await {
            self.tokens.save_token(&token).await?;
        }
        self.session.schedule_logout().await;
        Ok(())
    }

    pub async fn logout(&self) -> CliResult<()> {
        self.session.logout().await;
        self.tokens.clear_token().await?;
        info!("Stored session cleared");
        Ok(())
    }
}
