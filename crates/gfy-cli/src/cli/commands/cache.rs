//! `gfy cache clear` – drop the cached bearer token.

use anyhow::Result;
use gfy_core::api::BEARER_TOKEN_KEY;
use gfy_core::cache::{DiskCache, TokenCache};

pub fn run_cache_clear(cache: &DiskCache) -> Result<()> {
    cache.remove(BEARER_TOKEN_KEY)?;
    println!("Cleared bearer token from {}", cache.path().display());
    Ok(())
}
