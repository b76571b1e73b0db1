//! The static table of renditions Gfycat serves for every item.
//!
//! Order matters twice: it is the preference order reported to the host
//! (highest quality first) and the order in which guesswork probes the CDN.

/// One downloadable rendition of an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentVariant {
    pub name: &'static str,
    /// Key used by the API in `content_urls`.
    pub kind: &'static str,
    pub extension: &'static str,
    pub mimetype: &'static str,
    pub quality: f64,
    /// CDN URL with an `{id}` placeholder.
    pub url_template: &'static str,
}

impl ContentVariant {
    /// Direct CDN URL of this rendition for `id`.
    pub fn url_for(&self, id: &str) -> String {
        self.url_template.replace("{id}", id)
    }

    /// Stable content identifier for this rendition of `id`.
    pub fn content_id(&self, id: &str) -> String {
        build_content_id(id, self.kind)
    }
}

pub static CONTENT_VARIANTS: [ContentVariant; 5] = [
    ContentVariant {
        name: "MP4 Video",
        kind: "mp4",
        extension: ".mp4",
        mimetype: "video/mp4",
        quality: 1.0,
        url_template: "https://giant.gfycat.com/{id}.mp4",
    },
    ContentVariant {
        name: "WEBM Video",
        kind: "webm",
        extension: ".webm",
        mimetype: "video/webm",
        quality: 0.5,
        url_template: "https://giant.gfycat.com/{id}.webm",
    },
    ContentVariant {
        name: "5MB Gif Image",
        kind: "max5mbGif",
        extension: ".gif",
        mimetype: "image/gif",
        quality: 0.25,
        url_template: "https://thumbs.gfycat.com/{id}-size_restricted.gif",
    },
    ContentVariant {
        name: "2MB Gif Image",
        kind: "max2mbGif",
        extension: ".gif",
        mimetype: "image/gif",
        quality: 0.10,
        url_template: "https://thumbs.gfycat.com/{id}-small.gif",
    },
    ContentVariant {
        name: "1MB Gif Image",
        kind: "max1mbGif",
        extension: ".gif",
        mimetype: "image/gif",
        quality: 0.05,
        url_template: "https://thumbs.gfycat.com/{id}-max-1mb.gif",
    },
];

/// Prefix shared by every content identifier this plugin emits.
pub const CONTENT_ID_PREFIX: &str = "gfycat";

pub fn build_content_id(id: &str, kind: &str) -> String {
    format!("{}-{}-{}", CONTENT_ID_PREFIX, kind, id)
}

/// Looks up a variant by its API key.
pub fn variant_by_kind(kind: &str) -> Option<&'static ContentVariant> {
    CONTENT_VARIANTS.iter().find(|v| v.kind == kind)
}

/// Looks up the variant a content identifier was built from.
pub fn variant_for_content_id(content_id: &str) -> Option<&'static ContentVariant> {
    let rest = content_id.strip_prefix(CONTENT_ID_PREFIX)?.strip_prefix('-')?;
    let (kind, _) = rest.split_once('-')?;
    variant_by_kind(kind)
}
