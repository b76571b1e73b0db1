//! `gfy extract <url>` – list renditions.

use anyhow::{Context, Result};
use gfy_core::{Content, Plugin};
use url::Url;

fn print_contents(contents: &[Content]) {
    println!("{:<28} {:<11} {:>7} {:>10}  {}", "ID", "TYPE", "QUALITY", "SIZE", "URL");
    for c in contents {
        let resource = c
            .resources
            .first()
            .map(|r| r.url.as_str())
            .unwrap_or("-");
        println!(
            "{:<28} {:<11} {:>7.2} {:>10}  {}",
            c.id, c.mimetype, c.quality, c.size, resource
        );
    }
}

pub fn run_extract(plugin: &dyn Plugin, url: &Url, json: bool) -> Result<()> {
    if !plugin.can_handle(url) {
        anyhow::bail!("{} cannot handle {}", plugin.name(), url);
    }
    let contents: Vec<Content> = plugin
        .extract_content(url)
        .with_context(|| format!("extract {}", url))?
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&contents)?);
    } else if contents.is_empty() {
        println!("No content found for {}", url);
    } else {
        print_contents(&contents);
    }
    Ok(())
}
