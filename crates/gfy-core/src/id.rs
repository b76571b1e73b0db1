//! Gfycat item identifier extraction.
//!
//! Two sources of IDs: the URL the user gave (item page or raw CDN link) and the
//! first path segment of a URL whose file name starts with the ID, such as the
//! poster image of the page's video element.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::{Error, Result};

/// Item pages: `gfycat.com/<id>`, `gfycat.com/<id>-some-title`, `gfycat.com/gifs/detail/<id>`.
static BASIC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://(?:www\.)?gfycat\.com/(?:gifs/detail/)?(?P<id>[a-zA-Z]+)[a-zA-Z0-9-]*/?$",
    )
    .unwrap()
});

/// Raw CDN links: `giant.gfycat.com/<id>.mp4`, `thumbs.gfycat.com/<id>-small.gif`.
static RAW_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[a-z]+\.gfycat\.com/(?P<id>[a-zA-Z]+)[a-zA-Z0-9_-]*\.[a-zA-Z0-9]+$")
        .unwrap()
});

/// Extracts the item ID if `url` is an item page or raw CDN link.
///
/// Pure string matching; never touches the network.
pub fn id_from_url(url: &Url) -> Option<String> {
    [&*BASIC_PATTERN, &*RAW_PATTERN]
        .into_iter()
        .find_map(|pattern| pattern.captures(url.as_str()))
        .and_then(|caps| caps.name("id"))
        .map(|m| m.as_str().to_string())
}

/// First path segment of `url`, up to the first `-`.
pub fn id_from_path(url: &Url) -> Result<String> {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::InvalidInput(format!("url {} appears to have no path", url)))?;

    let id = segment.split('-').next().unwrap_or_default();
    if id.is_empty() {
        return Err(Error::InvalidInput(format!(
            "url {} has no id in its first path segment",
            url
        )));
    }
    Ok(id.to_string())
}

/// ID referenced by a poster/thumbnail URL (`thumbs.gfycat.com/<id>-poster.jpg`).
pub fn id_from_poster_url(poster_url: &Url) -> Result<String> {
    id_from_path(poster_url)
}

/// Item ID of a user-supplied URL: pattern match first, first path segment otherwise.
pub fn resolve_id(url: &Url) -> Result<String> {
    match id_from_url(url) {
        Some(id) => Ok(id),
        None => id_from_path(url),
    }
}
