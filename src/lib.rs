/*!
 * mediabrowse - Safe browsing of a self-hosted video library
 *
 * This library resolves untrusted relative paths against a fixed media root,
 * lists and paginates directories, finds the next episode of a series,
 * prunes directories left empty by deletes and keeps a persisted cache of the
 * total library size.
 */

pub mod browser;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod lister;
pub mod navigator;
pub mod pagination;
pub mod report;
pub mod resolver;
pub mod settings;
pub mod size_cache;
pub mod types;
pub mod utils;


// Re-export main components for easier access
pub use browser::MediaBrowser;
pub use cleaner::cleanup_empty_ancestors;
pub use config::Config;
pub use error::{MediaError, Result};
pub use lister::{casefold_order, filter_by_name, DirectoryLister};
pub use navigator::{natural_order, SequenceNavigator};
pub use pagination::{paginate, parse_page};
pub use report::Reporter;
pub use resolver::PathResolver;
pub use settings::{SettingKey, SettingsStore};
pub use size_cache::SizeCache;
pub use types::{
    BrowseView, DeleteOutcome, DirEntry, Listing, MediaTarget, Page, SizeCacheRecord,
    StorageView, WatchView,
};
pub use utils::format_size;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
