/*!
 * Resolution of untrusted relative paths against the media root
 */

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::warn;

use crate::error::{MediaError, Result};
use crate::utils::to_url_path;
use crate::{bail, ensure};

/// Resolves user-supplied relative paths to canonical paths under a fixed root
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Canonical media root
    root: PathBuf,
}

impl PathResolver {
    /// Create a resolver, canonicalizing the media root once
    pub fn new(media_root: &Path) -> Result<Self> {
        let root = fs::canonicalize(media_root).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                crate::error!(Config, "Media root not found: {}", media_root.display())
            }
            _ => MediaError::Io(e),
        })?;
        ensure!(
            root.is_dir(),
            Config,
            "Media root is not a directory: {}",
            root.display()
        );

        Ok(Self { root })
    }

    /// Canonical media root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Convert backslashes to `/` and strip leading slashes
    pub fn normalize(relative: &str) -> String {
        relative.replace('\\', "/").trim_start_matches('/').to_string()
    }

    /// Resolve a relative path to a canonical path inside the media root.
    ///
    /// Fails with [`MediaError::Forbidden`] when the path escapes the root and
    /// [`MediaError::NotFound`] when it does not exist. An empty path resolves
    /// to the root itself.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let rel = Self::normalize(relative);
        if rel.is_empty() {
            return Ok(self.root.clone());
        }

        let joined = self.root.join(&rel);
        let canonical = match fs::canonicalize(&joined) {
            Ok(path) => path,
            Err(e) if e.kind() == io::ErrorKind::NotFound || !joined.exists() => {
                // Nothing to canonicalize; still refuse paths that climb out.
                if escapes_lexically(&rel) {
                    warn!(path = %rel, "Rejected path outside media root");
                    return Err(MediaError::Forbidden);
                }
                bail!(NotFound, "{}", rel);
            }
            Err(e) => return Err(e.into()),
        };

        if !canonical.starts_with(&self.root) {
            warn!(path = %rel, "Rejected path outside media root");
            return Err(MediaError::Forbidden);
        }

        Ok(canonical)
    }

    /// Forward-slash path of a resolved location relative to the root
    pub fn relative_of(&self, resolved: &Path) -> Result<String> {
        resolved
            .strip_prefix(&self.root)
            .map(to_url_path)
            .map_err(|_| MediaError::Forbidden)
    }
}

/// Whether a normalized relative path climbs above its starting point
fn escapes_lexically(rel: &str) -> bool {
    let mut depth: isize = 0;
    for component in Path::new(rel).components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return true;
                }
            }
            Component::RootDir | Component::Prefix(_) => return true,
        }
    }
    false
}
