//! Content resolution through the authenticated Gfycat API.
//!
//! Authenticates with client credentials, fetches the item once and maps its
//! `content_urls` onto the variant table. Nothing is probed: the API already
//! knows which renditions exist and how large they are.

mod auth;
mod payload;

pub use auth::{AuthToken, BEARER_TOKEN_KEY, DEFAULT_TOKEN_TTL};
pub use payload::{AuthResponse, ContentUrl, GfyItem, ItemResponse};

use chrono::DateTime;
use std::fmt;
use url::Url;

use crate::cache::TokenCache;
use crate::error::{Error, Result};
use crate::http::{HttpSession, Request};
use crate::id;
use crate::model::{Content, ContentStream, HttpResource, Meta};
use crate::variants::CONTENT_VARIANTS;

pub const DEFAULT_API_BASE: &str = "https://api.gfycat.com/v1/";

/// Namespace of the plugin's token cache.
pub const CACHE_NAMESPACE: &str = "gfycat";

/// Canonical item page, used as the logical URL of API contents.
pub fn page_url(id: &str) -> String {
    format!("https://gfycat.com/{}", id)
}

/// Client id/secret of a registered Gfycat application.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// One extraction through the API; borrows its collaborators for the call.
pub struct ApiStrategy<'a> {
    session: &'a dyn HttpSession,
    cache: &'a dyn TokenCache,
    /// Base URL ending in `/`.
    base_url: &'a str,
    credentials: &'a Credentials,
}

impl<'a> ApiStrategy<'a> {
    pub fn new(
        session: &'a dyn HttpSession,
        cache: &'a dyn TokenCache,
        base_url: &'a str,
        credentials: &'a Credentials,
    ) -> Self {
        Self {
            session,
            cache,
            base_url,
            credentials,
        }
    }

    pub fn item_url(&self, id: &str) -> String {
        format!("{}gfycats/{}", self.base_url, id)
    }

    /// Fetches the item payload, returning it both typed and raw.
    pub fn fetch_item(&self, id: &str) -> Result<(ItemResponse, serde_json::Value)> {
        let url = self.item_url(id);
        let token = self.get_bearer_token()?;
        let request = Request::get(&url).with_header("Authorization", format!("Bearer {}", token));

        tracing::debug!(
            "fetching gfycat data from {} using client {:?}",
            url,
            self.credentials.client_id
        );
        let response = self.session.send(&request)?;
        if !response.is_success() {
            return Err(Error::Fetch(format!(
                "request for gfycat item {:?} returned HTTP {}",
                id, response.status
            )));
        }

        let raw: serde_json::Value = response.json()?;
        if raw.get("error").is_some() {
            return Err(Error::Fetch(format!(
                "request for gfycat item {:?} returned error payload {}",
                id, raw
            )));
        }
        let item: ItemResponse = serde_json::from_value(raw.clone())?;
        Ok((item, raw))
    }

    /// Contents for every variant the item lists in `content_urls`, in table order.
    ///
    /// The item is fetched before this returns; iterating performs no I/O.
    pub fn resolve_content(&self, url: &Url) -> Result<ContentStream<'static>> {
        let gfycat_id = id::resolve_id(url)?;
        let (response, raw) = self.fetch_item(&gfycat_id)?;
        let item = response.gfy_item;

        let logical_url = page_url(&item.gfy_id);
        let meta = Meta {
            id: item.gfy_id.clone(),
            description: item.description.clone(),
            publisher: item.username.clone(),
            published_at: item
                .create_date
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            thumbnail: item.poster_url.clone(),
        };
        let content_urls = item.content_urls;

        tracing::debug!(
            "gfycat {:?} lists {} renditions",
            gfycat_id,
            content_urls.len()
        );

        Ok(Box::new(CONTENT_VARIANTS.iter().filter_map(move |variant| {
            let entry = content_urls.get(variant.kind)?;
            Some(Content {
                id: variant.content_id(&gfycat_id),
                url: logical_url.clone(),
                size: entry.size,
                mimetype: variant.mimetype.to_string(),
                quality: variant.quality,
                resources: vec![HttpResource::get(&entry.url)],
                meta: meta.clone(),
                extra: Some(raw.clone()),
            })
        })))
    }
}
