/*!
 * Request-level operations composed from the resolver, lister, navigator,
 * cleaner and caches
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::cleaner::cleanup_empty_ancestors;
use crate::config::Config;
use crate::error::Result;
use crate::lister::{filter_by_name, DirectoryLister};
use crate::navigator::SequenceNavigator;
use crate::pagination::{paginate, parse_page};
use crate::resolver::PathResolver;
use crate::settings::SettingsStore;
use crate::size_cache::SizeCache;
use crate::types::{
    BrowseView, DeleteOutcome, MediaTarget, SizeCacheRecord, StorageView, WatchView,
};
use crate::utils::{breadcrumbs, file_name, format_size, parent_path};
use crate::{bail, ensure};

/// Prefix of the internal location a fronting proxy serves media from
pub const PROTECTED_MEDIA_PREFIX: &str = "/_protected_media";

/// Entry point for browse, watch, media and delete requests
#[derive(Debug, Clone)]
pub struct MediaBrowser {
    config: Config,
    resolver: PathResolver,
    lister: DirectoryLister,
    navigator: SequenceNavigator,
    size_cache: SizeCache,
    settings: SettingsStore,
}

impl MediaBrowser {
    /// Build all components from a configuration
    pub fn new(config: Config) -> Result<Self> {
        let resolver = PathResolver::new(&config.media_root)?;
        let root = resolver.root().to_path_buf();

        debug!(root = %root.display(), "Media browser initialized");

        Ok(Self {
            lister: DirectoryLister::new(config.clone(), root.clone()),
            navigator: SequenceNavigator::new(config.clone(), root.clone()),
            size_cache: SizeCache::new(root, config.size_cache_path()),
            settings: SettingsStore::new(config.settings_path()),
            resolver,
            config,
        })
    }

    /// Path resolver bound to the media root
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Settings store
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Size cache
    pub fn size_cache(&self) -> &SizeCache {
        &self.size_cache
    }

    /// List a directory, optionally filtered by name, and return one page of it
    pub fn browse(&self, rel_path: &str, raw_page: Option<&str>, query: Option<&str>) -> Result<BrowseView> {
        debug!("Browse request for path: {}", display_rel(rel_path));

        let page = parse_page(raw_page);
        let query = query.unwrap_or_default().trim().to_string();
        let per_page = self.settings.default_per_page()?;

        let dir = self.resolver.resolve(rel_path)?;
        let current = self.resolver.relative_of(&dir)?;
        let listing = filter_by_name(self.lister.list(&dir)?, &query);
        let total_items = listing.len();
        let page = paginate(&listing, page, per_page);

        debug!(
            "Listed {} items in {} (page {}/{}, per_page={})",
            page.total,
            display_rel(&current),
            page.page,
            page.page_count,
            page.per_page
        );

        Ok(BrowseView {
            parent: parent_path(&current),
            breadcrumbs: breadcrumbs(&current),
            current,
            page,
            total_items,
            query,
        })
    }

    /// Describe a video for playback, including the next episode
    pub fn watch(&self, rel_path: &str) -> Result<WatchView> {
        debug!("Watch request for video: {}", rel_path);

        if !self.config.is_video_extension(Path::new(rel_path)) {
            warn!("Attempt to watch unsupported file type: {}", rel_path);
            bail!(Validation, "Unsupported file type");
        }

        let path = self.resolver.resolve(rel_path)?;
        ensure!(path.is_file(), NotFound, "{}", rel_path);

        let video = self.resolver.relative_of(&path)?;
        let next_video = self.navigator.next_video(&path)?;
        let parent = parent_path(&video);

        Ok(WatchView {
            filename: file_name(&video),
            breadcrumbs: breadcrumbs(&parent),
            parent,
            next_video,
            video,
        })
    }

    /// Validate a file for serving and compute its internal redirect URI
    pub fn media(&self, rel_path: &str) -> Result<MediaTarget> {
        debug!("Media file request: {}", rel_path);

        let path = self.resolver.resolve(rel_path)?;

        let rel = PathResolver::normalize(rel_path);
        let has_dot_segment = rel.split('/').any(|seg| seg == "." || seg == "..");
        ensure!(!rel.is_empty() && !has_dot_segment, NotFound, "{}", rel_path);
        ensure!(path.is_file(), NotFound, "{}", rel_path);

        let rel = self.resolver.relative_of(&path)?;
        info!("Serving media file: {}", rel);

        Ok(MediaTarget {
            accel_uri: format!("{}/{}", PROTECTED_MEDIA_PREFIX, rel),
            path,
        })
    }

    /// Delete a video and, when enabled, the directories it leaves empty
    pub fn delete_video(&self, rel_path: &str) -> Result<DeleteOutcome> {
        if rel_path.trim().is_empty() {
            warn!("Delete attempt with empty path");
            bail!(Validation, "No file given");
        }

        let path = self.resolver.resolve(rel_path)?;
        if !path.is_file() {
            warn!("Delete attempt for non-existent file: {}", rel_path);
            bail!(NotFound, "{}", rel_path);
        }
        if !self.config.is_video_extension(&path) {
            warn!("Delete attempt for non-video file: {}", rel_path);
            bail!(Validation, "Only video files can be deleted");
        }

        // Read before touching the filesystem so a missing setting changes nothing
        let cleanup = self.settings.cleanup_empty_directories()?;
        let video = self.resolver.relative_of(&path)?;
        let mut redirect = parent_path(&video);

        info!("Deleting video: {}", video);
        let (deleted, message) = match fs::remove_file(&path) {
            Ok(()) => {
                info!("Successfully deleted: {}", video);
                (true, "File deleted")
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                error!("Permission denied when deleting: {}", video);
                (false, "No permission to delete the file")
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                error!("File not found during deletion: {}", video);
                (false, "File not found")
            }
            Err(e) => {
                error!("Error deleting file '{}': {}", video, e);
                (false, "Error deleting the file")
            }
        };

        let mut removed_dirs = 0;
        if deleted && cleanup {
            if let Some(parent) = path.parent() {
                removed_dirs = cleanup_empty_ancestors(parent, self.resolver.root());
                if removed_dirs > 0 {
                    info!("Cleanup removed {} empty directories", removed_dirs);
                    redirect = self.nearest_existing(parent);
                }
            }
        }

        Ok(DeleteOutcome {
            deleted,
            message: message.to_string(),
            removed_dirs,
            redirect,
        })
    }

    /// Closest existing directory at or above `start`, relative to the root
    fn nearest_existing(&self, start: &Path) -> String {
        let root = self.resolver.root();
        let mut current: PathBuf = start.to_path_buf();

        while current != root && !current.is_dir() {
            match current.parent() {
                Some(parent) if parent.starts_with(root) => current = parent.to_path_buf(),
                _ => return String::new(),
            }
        }

        self.resolver.relative_of(&current).unwrap_or_default()
    }

    /// Cached library size for the settings view; never walks the library
    pub fn storage(&self) -> StorageView {
        let record = self.size_cache.read();
        StorageView {
            formatted: record.as_ref().map(|r| format_size(r.bytes)),
            record,
        }
    }

    /// Recompute and persist the library size
    pub fn recalculate_storage(&self) -> Result<SizeCacheRecord> {
        info!("Recalculating media size");
        self.size_cache.refresh()
    }
}

fn display_rel(rel_path: &str) -> &str {
    if rel_path.is_empty() {
        "root"
    } else {
        rel_path
    }
}
