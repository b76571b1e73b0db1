//! OAuth client-credentials flow and bearer token caching.

use std::time::Duration;

use super::payload::{AuthRequest, AuthResponse};
use super::ApiStrategy;
use crate::error::{Error, Result};
use crate::http::Request;

/// Cache key of the bearer token inside the plugin's cache namespace.
pub const BEARER_TOKEN_KEY: &str = "bearer_token";

/// Token lifetime assumed when the server does not send `expires_in`.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// A freshly issued token and how long it may be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub access_token: String,
    pub expires_in: Duration,
}

impl ApiStrategy<'_> {
    pub fn auth_url(&self) -> String {
        format!("{}oauth/token/", self.base_url)
    }

    /// Requests a new token from the OAuth endpoint.
    pub fn get_auth_token(&self) -> Result<AuthToken> {
        let url = self.auth_url();
        let body = AuthRequest {
            grant_type: "client_credentials",
            client_id: &self.credentials.client_id,
            client_secret: &self.credentials.client_secret,
        };
        tracing::debug!(
            "fetching OAuth token for client {:?}",
            self.credentials.client_id
        );
        let response = self.session.send(&Request::post_json(&url, &body)?)?;
        if !response.is_success() {
            return Err(Error::Auth(format!(
                "request for bearer token to {} returned HTTP {}",
                url, response.status
            )));
        }

        let auth: AuthResponse = response
            .json()
            .map_err(|e| Error::Auth(format!("invalid token payload from {}: {}", url, e)))?;
        let access_token = auth
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Auth(format!("{} returned no access token", url)))?;

        Ok(AuthToken {
            access_token,
            expires_in: auth
                .expires_in
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TOKEN_TTL),
        })
    }

    /// Cached bearer token, authenticating on a cache miss.
    ///
    /// Concurrent callers racing on an empty cache may each authenticate; the
    /// last one to store its token wins.
    pub fn get_bearer_token(&self) -> Result<String> {
        if let Some(token) = self.cache.get(BEARER_TOKEN_KEY) {
            tracing::debug!("using cached OAuth token {:?}", BEARER_TOKEN_KEY);
            return Ok(token);
        }

        let token = self.get_auth_token()?;
        tracing::debug!(
            "fetched OAuth token for client {:?}, caching for {}s",
            self.credentials.client_id,
            token.expires_in.as_secs()
        );
        if let Err(e) = self
            .cache
            .set(BEARER_TOKEN_KEY, &token.access_token, token.expires_in)
        {
            tracing::warn!("could not cache bearer token: {}", e);
        }
        Ok(token.access_token)
    }
}
