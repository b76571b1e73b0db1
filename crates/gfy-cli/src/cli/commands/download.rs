//! `gfy download <url>` – fetch one rendition and merge it into place.

use anyhow::{Context, Result};
use gfy_core::http::{CurlSession, HttpMethod};
use gfy_core::manifest::{self, Manifest};
use gfy_core::variants;
use gfy_core::{Content, Plugin};
use std::path::{Path, PathBuf};
use url::Url;

/// First content in the stream, or the first of the requested kind.
///
/// Stops pulling from the stream once a match is found.
pub(crate) fn choose_content<I>(contents: I, kind: Option<&str>) -> Option<Content>
where
    I: IntoIterator<Item = Content>,
{
    let mut contents = contents.into_iter();
    match kind {
        None => contents.next(),
        Some(kind) => contents.find(|c| {
            variants::variant_for_content_id(&c.id).is_some_and(|v| v.kind == kind)
        }),
    }
}

/// `<item id><extension>` inside `dir`.
pub(crate) fn default_output(content: &Content, dir: &Path) -> PathBuf {
    let extension = variants::variant_for_content_id(&content.id)
        .map(|v| v.extension)
        .unwrap_or("");
    dir.join(format!("{}{}", content.meta.id, extension))
}

/// Temp file for the `index`-th resource of a content.
fn part_path(output: &Path, index: usize) -> PathBuf {
    if index == 0 {
        manifest::temp_path(output)
    } else {
        manifest::temp_path(&output.with_extension(index.to_string()))
    }
}

pub fn run_download(
    plugin: &dyn Plugin,
    session: &CurlSession,
    url: &Url,
    output: Option<&Path>,
    kind: Option<&str>,
    download_dir: &Path,
) -> Result<()> {
    if let Some(kind) = kind {
        if variants::variant_by_kind(kind).is_none() {
            anyhow::bail!("unknown rendition kind: {}", kind);
        }
    }
    if !plugin.can_handle(url) {
        anyhow::bail!("{} cannot handle {}", plugin.name(), url);
    }

    let stream = plugin
        .extract_content(url)
        .with_context(|| format!("extract {}", url))?;
    let content = match choose_content(stream, kind) {
        Some(c) => c,
        None => anyhow::bail!("no downloadable content for {}", url),
    };
    let output = match output {
        Some(p) => p.to_path_buf(),
        None => default_output(&content, download_dir),
    };

    tracing::info!("downloading {} to {}", content.id, output.display());
    let mut manifest = Manifest::new(content.id.clone());
    for (index, resource) in content.resources.iter().enumerate() {
        if resource.method != HttpMethod::Get {
            anyhow::bail!("unsupported method {} for {}", resource.method, resource.url);
        }
        let part = part_path(&output, index);
        let bytes = session
            .download_to(&resource.url, &part)
            .with_context(|| format!("download {}", resource.url))?;
        tracing::debug!("{}: {} bytes", part.display(), bytes);
        manifest = manifest.with_artifact(resource.clone(), part);
    }

    let merged = plugin
        .merge_manifest(&manifest, &output)
        .with_context(|| format!("merge {}", content.id))?;
    println!("Saved {} to {}", content.id, merged.display());
    Ok(())
}
