//! Gfycat content extraction plugin.
//!
//! Resolves a gfycat.com item URL to the renditions a host can download,
//! either through the authenticated API or by scraping the page and probing
//! the CDN.

pub mod config;
pub mod logging;

pub mod api;
pub mod cache;
pub mod error;
pub mod guesswork;
pub mod http;
pub mod id;
pub mod manifest;
pub mod model;
pub mod plugin;
pub mod strategy;
pub mod variants;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use manifest::Manifest;
pub use model::{Content, ContentStream, HttpResource, Meta};
pub use plugin::{GfycatPlugin, Plugin};
