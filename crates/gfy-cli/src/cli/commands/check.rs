//! `gfy check <url>` – does the plugin handle this URL.

use anyhow::Result;
use gfy_core::{id, Plugin};
use url::Url;

pub fn run_check(plugin: &dyn Plugin, url: &Url) -> Result<()> {
    if plugin.can_handle(url) {
        let item = id::id_from_url(url).unwrap_or_default();
        println!("{}: handled by {} (id {})", url, plugin.name(), item);
    } else {
        println!(
            "{}: not handled by {} (domains: {})",
            url,
            plugin.name(),
            plugin.domains().join(", ")
        );
    }
    Ok(())
}
