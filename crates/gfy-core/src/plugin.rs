//! Host-facing plugin contract and the Gfycat plugin.
//!
//! A host asks every registered plugin whether it can handle a URL (cheap, no
//! I/O), extracts contents with the first that can, downloads the resources of
//! the chosen content, and hands the resulting manifest back for merging.

use std::path::{Path, PathBuf};
use url::Url;

use crate::cache::TokenCache;
use crate::error::Result;
use crate::http::HttpSession;
use crate::id;
use crate::manifest::{self, Manifest};
use crate::model::ContentStream;
use crate::strategy::{StrategyConfig, StrategySelector};

/// Contract between a download host and a site plugin.
pub trait Plugin {
    /// Human-readable plugin name.
    fn name(&self) -> &'static str;

    /// Domains this plugin is registered for.
    fn domains(&self) -> &'static [&'static str];

    /// True if the plugin recognizes `url`. Must not perform network I/O.
    fn can_handle(&self, url: &Url) -> bool;

    /// Contents available for `url`, best quality first.
    fn extract_content(&self, url: &Url) -> Result<ContentStream<'_>>;

    /// Assembles the downloaded artifacts into `to_path`, returning the final path.
    fn merge_manifest(&self, manifest: &Manifest, to_path: &Path) -> Result<PathBuf>;
}

/// Handles single items on gfycat.com (`gfycat.com/<id>`) and their raw CDN links.
///
/// Does not iterate over collections or user pages.
pub struct GfycatPlugin<S, C> {
    selector: StrategySelector<S, C>,
}

impl<S: HttpSession, C: TokenCache> GfycatPlugin<S, C> {
    pub const NAME: &'static str = "Gfycat Plugin";
    pub const DOMAINS: &'static [&'static str] = &["gfycat.com"];

    pub fn new(config: StrategyConfig, session: S, cache: C) -> Self {
        Self {
            selector: StrategySelector::new(config, session, cache),
        }
    }

    pub fn selector(&self) -> &StrategySelector<S, C> {
        &self.selector
    }
}

impl<S: HttpSession, C: TokenCache> Plugin for GfycatPlugin<S, C> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn domains(&self) -> &'static [&'static str] {
        Self::DOMAINS
    }

    fn can_handle(&self, url: &Url) -> bool {
        id::id_from_url(url).is_some()
    }

    fn extract_content(&self, url: &Url) -> Result<ContentStream<'_>> {
        self.selector.select_strategy(url)
    }

    /// Gfycat contents are a single file, so merging is a move.
    fn merge_manifest(&self, manifest: &Manifest, to_path: &Path) -> Result<PathBuf> {
        manifest::merge_single_artifact(manifest, to_path)
    }
}
