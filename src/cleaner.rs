/*!
 * Removal of directories left empty after a delete
 */

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

/// Remove empty directories from `start` upward, never touching `stop_at`.
///
/// Stops at the first directory that is missing, not a directory, non-empty,
/// or cannot be removed. Concurrent changes to the tree end the walk early
/// instead of failing. Returns the number of directories removed.
pub fn cleanup_empty_ancestors(start: &Path, stop_at: &Path) -> usize {
    let mut removed = 0;
    let mut current = start.to_path_buf();

    while current != stop_at && current.starts_with(stop_at) {
        if !current.is_dir() {
            break;
        }

        match fs::read_dir(&current) {
            Ok(mut entries) => {
                if entries.next().is_some() {
                    break;
                }
            }
            Err(e) => {
                debug!(dir = %current.display(), "Cleanup stopped: {}", e);
                break;
            }
        }

        if let Err(e) = fs::remove_dir(&current) {
            warn!(dir = %current.display(), "Could not remove empty directory: {}", e);
            break;
        }

        debug!(dir = %current.display(), "Removed empty directory");
        removed += 1;

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    removed
}
