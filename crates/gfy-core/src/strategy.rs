//! Chooses between the API and guesswork strategies for an extraction.
//!
//! The choice is made once per call from a [`StrategyConfig`] fixed at
//! construction; there is no fallback from one strategy to the other.

use url::Url;

use crate::api::{ApiStrategy, Credentials, DEFAULT_API_BASE};
use crate::cache::TokenCache;
use crate::error::{Error, Result};
use crate::guesswork::{GuessworkStrategy, DEFAULT_VIDEO_SELECTOR};
use crate::http::HttpSession;
use crate::model::ContentStream;

pub const ENV_API_ENABLED: &str = "MEGU_GFYCAT_API_ENABLED";
pub const ENV_API_TOKEN: &str = "MEGU_GFYCAT_API_TOKEN";
pub const ENV_API_SECRET: &str = "MEGU_GFYCAT_API_SECRET";

/// Truthy values are `1` and `true`, case-insensitive. Anything else, including
/// padded values and an unset variable, is false.
pub fn is_api_enabled(value: Option<&str>) -> bool {
    value
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true"))
        .unwrap_or(false)
}

/// Credentials only when both halves are present.
pub fn api_credentials(client_id: Option<String>, client_secret: Option<String>) -> Option<Credentials> {
    match (client_id, client_secret) {
        (Some(id), Some(secret)) => Some(Credentials::new(id, secret)),
        _ => None,
    }
}

/// Everything the selector needs to route and run an extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub api_enabled: bool,
    pub credentials: Option<Credentials>,
    /// API base URL ending in `/`.
    pub api_base: String,
    pub video_selector: String,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            api_enabled: false,
            credentials: None,
            api_base: DEFAULT_API_BASE.to_string(),
            video_selector: DEFAULT_VIDEO_SELECTOR.to_string(),
        }
    }
}

impl StrategyConfig {
    /// Reads the `MEGU_GFYCAT_API_*` variables of the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`StrategyConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_enabled: is_api_enabled(lookup(ENV_API_ENABLED).as_deref()),
            credentials: api_credentials(lookup(ENV_API_TOKEN), lookup(ENV_API_SECRET)),
            ..Default::default()
        }
    }
}

/// Which strategy an extraction will use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Api,
    Guesswork,
}

/// Routes extractions to a strategy, owning the shared session and token cache.
pub struct StrategySelector<S, C> {
    config: StrategyConfig,
    session: S,
    cache: C,
}

impl<S: HttpSession, C: TokenCache> StrategySelector<S, C> {
    pub fn new(config: StrategyConfig, session: S, cache: C) -> Self {
        Self {
            config,
            session,
            cache,
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// The strategy [`StrategySelector::select_strategy`] would use.
    pub fn kind(&self) -> Result<StrategyKind> {
        if !self.config.api_enabled {
            return Ok(StrategyKind::Guesswork);
        }
        if self.config.credentials.is_none() {
            return Err(Error::Config(format!(
                "missing token/secret: expected {} and {} to be defined",
                ENV_API_TOKEN, ENV_API_SECRET
            )));
        }
        Ok(StrategyKind::Api)
    }

    /// Runs the configured strategy for `url`.
    pub fn select_strategy(&self, url: &Url) -> Result<ContentStream<'_>> {
        match (self.kind()?, &self.config.credentials) {
            (StrategyKind::Api, Some(credentials)) => {
                tracing::debug!("using the API logic for fetching gfycat items for {}", url);
                ApiStrategy::new(&self.session, &self.cache, &self.config.api_base, credentials)
                    .resolve_content(url)
            }
            _ => {
                tracing::debug!("using the guesswork logic for fetching gfycat items for {}", url);
                GuessworkStrategy::new(&self.session, &self.config.video_selector)
                    .resolve_content(url)
            }
        }
    }
}
