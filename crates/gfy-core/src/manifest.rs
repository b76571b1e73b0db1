//! Downloaded artifacts awaiting final assembly, and the single-artifact merge.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::HttpResource;

/// Suffix of files still being written by the host.
pub const TEMP_SUFFIX: &str = ".part";

/// Result of downloading every resource of one content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    /// Id of the content the artifacts belong to.
    pub content_id: String,
    /// (resource, local file) pairs in resource order.
    pub artifacts: Vec<(HttpResource, PathBuf)>,
}

impl Manifest {
    pub fn new(content_id: impl Into<String>) -> Self {
        Self {
            content_id: content_id.into(),
            artifacts: Vec::new(),
        }
    }

    pub fn with_artifact(mut self, resource: HttpResource, path: impl Into<PathBuf>) -> Self {
        self.artifacts.push((resource, path.into()));
        self
    }
}

/// Path for the temp file: appends `.part` to the final path (e.g. `x.mp4` → `x.mp4.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Moves the manifest's only artifact to `to_path` and returns `to_path`.
///
/// Falls back to copy + remove when a rename is not possible (e.g. the
/// destination is on another filesystem).
pub fn merge_single_artifact(manifest: &Manifest, to_path: &Path) -> Result<PathBuf> {
    let [(_, artifact_path)] = manifest.artifacts.as_slice() else {
        return Err(Error::Validation(format!(
            "expected exactly 1 artifact in manifest for {:?}, received {}",
            manifest.content_id,
            manifest.artifacts.len()
        )));
    };

    tracing::debug!(
        "moving {} to {}",
        artifact_path.display(),
        to_path.display()
    );
    if let Err(e) = fs::rename(artifact_path, to_path) {
        if e.kind() == io::ErrorKind::NotFound {
            return Err(Error::Io(e));
        }
        tracing::debug!("rename failed ({}), copying instead", e);
        copy_then_remove(artifact_path, to_path, |p| fs::remove_file(p))?;
    }
    Ok(to_path.to_path_buf())
}

/// Copies `from` to `to`, then deletes `from` with `remove`.
///
/// Once the copy succeeded the merge has succeeded; a leftover source file is
/// only logged.
fn copy_then_remove<F>(from: &Path, to: &Path, remove: F) -> Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    fs::copy(from, to)?;
    if let Err(e) = remove(from) {
        tracing::warn!(
            "merged into {} but could not remove {}: {}",
            to.display(),
            from.display(),
            e
        );
    }
    Ok(())
}
