//! Content resolution without API credentials.
//!
//! Scrapes the item page for the ID referenced by the video poster, then
//! probes each CDN URL template with a HEAD request. Only renditions that
//! answer with a 2xx are reported.

mod scrape;

pub use scrape::{poster_from_html, DEFAULT_VIDEO_SELECTOR};

use url::Url;

use crate::error::{Error, Result};
use crate::http::{HttpSession, Request};
use crate::id;
use crate::model::{Content, ContentStream, HttpResource, Meta};
use crate::variants::{ContentVariant, CONTENT_VARIANTS};

/// One extraction by page scraping and CDN probing.
pub struct GuessworkStrategy<'a> {
    session: &'a dyn HttpSession,
    video_selector: &'a str,
}

impl<'a> GuessworkStrategy<'a> {
    pub fn new(session: &'a dyn HttpSession, video_selector: &'a str) -> Self {
        Self {
            session,
            video_selector,
        }
    }

    /// Best guess at the internal item ID, read from the page's video poster.
    pub fn find_id(&self, url: &Url) -> Result<String> {
        tracing::debug!("fetching HTML page content from {}", url);
        let response = self.session.send(&Request::get(url.as_str()))?;
        if !response.is_success() {
            return Err(Error::Fetch(format!(
                "request for page {} returned HTTP {}",
                url, response.status
            )));
        }

        let poster = poster_from_html(&response.text(), self.video_selector)?;
        tracing::debug!("extracting gfycat id from poster {:?}", poster);
        let poster_url = url
            .join(&poster)
            .map_err(|e| Error::InvalidInput(format!("poster url {:?}: {}", poster, e)))?;
        id::id_from_poster_url(&poster_url)
    }

    /// Lazily probes every variant in table order.
    ///
    /// The page is fetched before this returns. Each pull issues HEAD requests
    /// until a variant answers; a variant that fails is logged and skipped.
    /// Draining the stream probes all five templates, dropping it probes no more.
    pub fn resolve_content(&self, url: &Url) -> Result<ContentStream<'a>> {
        let gfycat_id = self.find_id(url)?;
        let meta = Meta::with_id(&gfycat_id);
        let page_url = url.to_string();
        let session = self.session;

        Ok(Box::new(CONTENT_VARIANTS.iter().filter_map(move |variant| {
            probe_variant(session, variant, &gfycat_id, &page_url, &meta)
        })))
    }
}

fn probe_variant(
    session: &dyn HttpSession,
    variant: &ContentVariant,
    gfycat_id: &str,
    page_url: &str,
    meta: &Meta,
) -> Option<Content> {
    let content_url = variant.url_for(gfycat_id);
    let response = match session.send(&Request::head(&content_url)) {
        Ok(r) if r.is_success() => r,
        Ok(r) => {
            tracing::warn!(
                "{} doesn't appear to exist for gfycat {:?} (HTTP {}), skipping",
                variant.name,
                gfycat_id,
                r.status
            );
            return None;
        }
        Err(e) => {
            tracing::warn!(
                "{} probe failed for gfycat {:?}: {}, skipping",
                variant.name,
                gfycat_id,
                e
            );
            return None;
        }
    };

    Some(Content {
        id: variant.content_id(gfycat_id),
        url: page_url.to_string(),
        size: response.content_length().unwrap_or(0),
        mimetype: variant.mimetype.to_string(),
        quality: variant.quality,
        resources: vec![HttpResource::get(content_url)],
        meta: meta.clone(),
        extra: None,
    })
}
