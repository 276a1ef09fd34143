/*!
 * Core types and data structures for the mediabrowse application
 */

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name
    pub name: String,
    /// Whether the entry is a directory
    pub is_dir: bool,
    /// Whether the entry is a file with a whitelisted video extension
    pub is_video: bool,
    /// Forward-slash path relative to the media root
    pub path: String,
}

/// Ordered directory contents: directories first, then files
pub type Listing = Vec<DirEntry>;

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Effective (clamped) page number, 1-based
    pub page: usize,
    /// Page size
    pub per_page: usize,
    /// Number of items across all pages
    pub total: usize,
    /// Number of pages, at least 1
    pub page_count: usize,
    /// Whether a previous page exists
    pub has_prev: bool,
    /// Whether a next page exists
    pub has_next: bool,
    /// Previous page number
    pub prev_page: Option<usize>,
    /// Next page number
    pub next_page: Option<usize>,
}

/// Persisted result of the last media size computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeCacheRecord {
    /// Total size of all regular files under the media root
    pub bytes: u64,
    /// When the value was computed
    pub updated_at: DateTime<Utc>,
}

/// Result of a browse request
#[derive(Debug, Clone, Serialize)]
pub struct BrowseView {
    /// Relative path of the listed directory
    pub current: String,
    /// Relative path of its parent (empty for the root)
    pub parent: String,
    /// Path components of `current`
    pub breadcrumbs: Vec<String>,
    /// Requested page of the (filtered) listing
    pub page: Page<DirEntry>,
    /// Number of entries after filtering
    pub total_items: usize,
    /// Applied name filter
    pub query: String,
}

/// Result of a watch request
#[derive(Debug, Clone, Serialize)]
pub struct WatchView {
    /// Relative path of the video
    pub video: String,
    /// File name of the video
    pub filename: String,
    /// Directory containing the video
    pub parent: String,
    /// Path components of `parent`
    pub breadcrumbs: Vec<String>,
    /// Next episode in natural order
    pub next_video: Option<String>,
}

/// A validated file handed to the file-serving layer
#[derive(Debug, Clone, Serialize)]
pub struct MediaTarget {
    /// Canonical absolute path of the file
    pub path: PathBuf,
    /// Internal redirect URI for a fronting reverse proxy
    pub accel_uri: String,
}

/// Result of a delete request
#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    /// Whether the file was removed
    pub deleted: bool,
    /// User-facing status message
    pub message: String,
    /// Number of empty directories removed afterwards
    pub removed_dirs: usize,
    /// Directory (relative) the user should be sent back to
    pub redirect: String,
}

/// Result of a storage/settings view
#[derive(Debug, Clone, Serialize)]
pub struct StorageView {
    /// Last persisted size, if any
    pub record: Option<SizeCacheRecord>,
    /// Human-readable size, if known
    pub formatted: Option<String>,
}
