//! JSON payloads of the Gfycat v1 API.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of the client-credentials token request.
#[derive(Debug, Serialize)]
pub struct AuthRequest<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

/// Response of `oauth/token/`. Every field is optional on the wire; an empty or
/// missing `access_token` is rejected by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Response of `gfycats/<id>`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemResponse {
    #[serde(rename = "gfyItem")]
    pub gfy_item: GfyItem,
}

/// The fields of an item we use.
///
/// The top-level `mp4Url`/`webmUrl` fields are unreliable; only
/// `content_urls` is used to locate renditions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GfyItem {
    pub gfy_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    /// Unix seconds.
    #[serde(default)]
    pub create_date: Option<i64>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "content_urls", default)]
    pub content_urls: HashMap<String, ContentUrl>,
}

/// One rendition entry of `content_urls`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentUrl {
    pub url: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}
