//! Authentication session lifecycle.
//!
//! [`AuthSession`] owns the credentials and the current [`Session`]. It is
//! the single place where tokens are acquired and renewed, so every
//! consumer shares the same renewal rule: a token is refreshed on the first
//! call at or after `expires_at - RENEWAL_MARGIN`.
//!
//! # Example
//!
//! ```no_run
//! use harvia_core::auth::AuthSession;
//! use harvia_core::client::{ApiClient, DEFAULT_TIMEOUT};
//! use harvia_core::endpoints::{self, DEFAULT_DISCOVERY_URL};
//! use harvia_types::Credentials;
//! use time::OffsetDateTime;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(DEFAULT_TIMEOUT)?;
//! let endpoints = endpoints::resolve(&client, DEFAULT_DISCOVERY_URL).await?;
//! let credentials = Credentials::new("user@example.com", "secret")?;
//!
//! let mut auth = AuthSession::acquire(client, &endpoints, credentials).await?;
//! let session = auth.refresh_if_needed(OffsetDateTime::now_utc()).await?;
//! println!("token valid until {}", session.expires_at);
//! # Ok(())
//! # }
//! ```

use harvia_types::{Credentials, Endpoints, Session};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::error::{ApiError, Error, Result};
use crate::wire::{RefreshRequest, TokenRequest, TokenResponse};

/// Owner of the authentication state for one account.
#[derive(Debug)]
pub struct AuthSession {
    client: ApiClient,
    generics_url: String,
    credentials: Credentials,
    session: Session,
}

impl AuthSession {
    /// Authenticate with username and password.
    ///
    /// Fails with [`Error::Auth`] when the API rejects the credentials or
    /// cannot be reached.
    pub async fn acquire(
        client: ApiClient,
        endpoints: &Endpoints,
        credentials: Credentials,
    ) -> Result<Self> {
        Self::acquire_at(client, endpoints, credentials, OffsetDateTime::now_utc()).await
    }

    /// Authenticate, computing the expiry relative to `now`.
    pub async fn acquire_at(
        client: ApiClient,
        endpoints: &Endpoints,
        credentials: Credentials,
        now: OffsetDateTime,
    ) -> Result<Self> {
        let url = format!("{}/auth/token", endpoints.generics);
        debug!("Authenticating as {}", credentials.username);

        let tokens: TokenResponse = client
            .post_json(
                &url,
                &TokenRequest {
                    username: &credentials.username,
                    password: &credentials.password,
                },
            )
            .await
            .map_err(Error::Auth)?;

        let refresh_token = tokens
            .refresh_token
            .clone()
            .ok_or(Error::Auth(ApiError::MissingField("refreshToken")))?;
        let expires_at = token_expiry(now, tokens.expires_in).map_err(Error::Auth)?;

        let session = Session {
            id_token: tokens.id_token,
            access_token: tokens.access_token,
            refresh_token,
            expires_at,
        };
        info!("Authenticated (token expires in {}s)", tokens.expires_in);

        Ok(Self {
            client,
            generics_url: endpoints.generics.clone(),
            credentials,
            session,
        })
    }

    /// The current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The account username.
    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    /// Return a usable session, refreshing first if it is stale at `now`.
    ///
    /// A fresh session is returned as-is without any network call. On
    /// failure the previous session is kept untouched and
    /// [`Error::Refresh`] is returned.
    pub async fn refresh_if_needed(&mut self, now: OffsetDateTime) -> Result<&Session> {
        if self.session.is_stale(now) {
            debug!(
                "Session stale ({}s remaining), refreshing",
                self.session.remaining(now).whole_seconds()
            );
            self.refresh(now).await?;
        }
        Ok(&self.session)
    }

    /// Unconditionally refresh the id token.
    pub async fn refresh(&mut self, now: OffsetDateTime) -> Result<&Session> {
        let url = format!("{}/auth/refresh", self.generics_url);
        let tokens: TokenResponse = self
            .client
            .post_json(
                &url,
                &RefreshRequest {
                    refresh_token: &self.session.refresh_token,
                    email: &self.credentials.username,
                },
            )
            .await
            .map_err(Error::Refresh)?;
        let expires_at = token_expiry(now, tokens.expires_in).map_err(Error::Refresh)?;

        self.session.id_token = tokens.id_token;
        if !tokens.access_token.is_empty() {
            self.session.access_token = tokens.access_token;
        }
        if let Some(refresh_token) = tokens.refresh_token {
            self.session.refresh_token = refresh_token;
        }
        self.session.expires_at = expires_at;

        info!("Session refreshed (token expires in {}s)", tokens.expires_in);
        Ok(&self.session)
    }
}

/// Absolute expiry of a token issued at `now` with the given lifetime.
fn token_expiry(
    now: OffsetDateTime,
    expires_in: i64,
) -> std::result::Result<OffsetDateTime, ApiError> {
    if expires_in <= 0 {
        return Err(ApiError::InvalidField {
            field: "expiresIn",
            reason: format!("lifetime must be positive, got {}", expires_in),
        });
    }
    now.checked_add(Duration::seconds(expires_in))
        .ok_or_else(|| ApiError::InvalidField {
            field: "expiresIn",
            reason: format!("lifetime of {}s is out of range", expires_in),
        })
}
