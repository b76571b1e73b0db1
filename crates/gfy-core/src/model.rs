//! Values handed to the host: one [`Content`] per downloadable variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::http::HttpMethod;

/// One request the host must perform to fetch (part of) a content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResource {
    pub method: HttpMethod,
    pub url: String,
}

impl HttpResource {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
        }
    }
}

/// Descriptive metadata of an item.
///
/// The API strategy fills every field; guesswork only knows the `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub id: String,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail: Option<String>,
}

impl Meta {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// A fetchable unit: one variant of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// `gfycat-<variant kind>-<item id>`.
    pub id: String,
    /// Logical page URL of the item.
    pub url: String,
    /// Size in bytes; 0 when unknown.
    pub size: u64,
    pub mimetype: String,
    pub quality: f64,
    pub resources: Vec<HttpResource>,
    pub meta: Meta,
    /// Raw item payload when the content came from the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

/// Lazy, pull-based sequence of contents. Dropping it stops any further I/O.
pub type ContentStream<'a> = Box<dyn Iterator<Item = Content> + 'a>;
