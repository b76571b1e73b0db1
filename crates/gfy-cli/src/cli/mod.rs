//! CLI host for the Gfycat plugin.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gfy_core::api::CACHE_NAMESPACE;
use gfy_core::cache::{DiskCache, MemoryCache, TokenCache};
use gfy_core::config::{self, GfyConfig};
use gfy_core::http::CurlSession;
use gfy_core::GfycatPlugin;
use std::path::PathBuf;
use url::Url;

use commands::{run_cache_clear, run_check, run_download, run_extract};

/// The plugin as the CLI runs it: curl session, disk or in-memory token cache.
pub type CliPlugin = GfycatPlugin<CurlSession, Box<dyn TokenCache>>;

/// Top-level CLI for the gfy extractor.
#[derive(Debug, Parser)]
#[command(name = "gfy")]
#[command(about = "gfy: resolve and download Gfycat items", long_about = None)]
pub struct Cli {
    /// Keep the API bearer token in memory only (no disk cache).
    #[arg(long, global = true)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Report whether a URL is a Gfycat item this plugin handles.
    Check {
        /// Item page or raw CDN URL.
        url: String,
    },

    /// List the downloadable renditions of an item.
    Extract {
        /// Item page or raw CDN URL.
        url: String,

        /// Print contents as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Download the best rendition (or the one named by --kind).
    Download {
        /// Item page or raw CDN URL.
        url: String,

        /// Output file (default: <item id><extension> in the current directory).
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Rendition to download: mp4, webm, max5mbGif, max2mbGif or max1mbGif.
        #[arg(long, value_name = "KIND")]
        kind: Option<String>,
    },

    /// Manage the cached API bearer token.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Forget the cached bearer token.
    Clear,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        cfg.apply_env();
        tracing::debug!("loaded config: {:?}", cfg.strategy_config());

        match cli.command {
            CliCommand::Check { url } => {
                // Only matches the URL; no token is ever needed.
                let plugin = build_plugin(&cfg, true)?;
                run_check(&plugin, &parse_url(&url)?)?;
            }
            CliCommand::Extract { url, json } => {
                let plugin = build_plugin(&cfg, cli.no_cache)?;
                run_extract(&plugin, &parse_url(&url)?, json)?;
            }
            CliCommand::Download { url, output, kind } => {
                let plugin = build_plugin(&cfg, cli.no_cache)?;
                let download_dir = std::env::current_dir()?;
                run_download(
                    &plugin,
                    plugin.selector().session(),
                    &parse_url(&url)?,
                    output.as_deref(),
                    kind.as_deref(),
                    &download_dir,
                )?;
            }
            CliCommand::Cache {
                action: CacheAction::Clear,
            } => run_cache_clear(&DiskCache::open(CACHE_NAMESPACE)?)?,
        }

        Ok(())
    }
}

fn build_plugin(cfg: &GfyConfig, no_cache: bool) -> Result<CliPlugin> {
    let cache: Box<dyn TokenCache> = if no_cache {
        Box::new(MemoryCache::new())
    } else {
        Box::new(DiskCache::open(CACHE_NAMESPACE)?)
    };
    let session = CurlSession::new(cfg.session_options());
    Ok(GfycatPlugin::new(cfg.strategy_config(), session, cache))
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).with_context(|| format!("invalid URL: {}", url))
}

#[cfg(test)]
mod tests;
