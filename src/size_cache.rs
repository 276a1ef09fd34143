/*!
 * Persisted total size of the media library
 */

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::ensure;
use crate::error::Result;
use crate::types::SizeCacheRecord;
use crate::utils::write_json_atomic;

/// On-disk shape, read leniently so bad values can be rejected
#[derive(Debug, Deserialize)]
struct StoredRecord {
    bytes: i64,
    updated_at: DateTime<Utc>,
}

/// Write-through cache of the library size.
///
/// The size is only computed when [`SizeCache::recompute`] or
/// [`SizeCache::refresh`] is called; reads never walk the library.
#[derive(Debug, Clone)]
pub struct SizeCache {
    /// Canonical media root
    root: PathBuf,
    /// Location of the cache record
    path: PathBuf,
}

impl SizeCache {
    /// Create a cache for `root` persisted at `path`
    pub fn new(root: PathBuf, path: PathBuf) -> Self {
        Self { root, path }
    }

    /// Sum the length of every regular file under the media root
    pub fn recompute(&self) -> Result<u64> {
        let files: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();

        let total = files
            .par_iter()
            .filter_map(|path| fs::symlink_metadata(path).ok())
            .map(|metadata| metadata.len())
            .sum::<u64>();

        debug!(files = files.len(), bytes = total, "Computed media size");
        Ok(total)
    }

    /// Last persisted record; `None` if absent, malformed or negative
    pub fn read(&self) -> Option<SizeCacheRecord> {
        let content = fs::read_to_string(&self.path).ok()?;

        let stored: StoredRecord = match serde_json::from_str(&content) {
            Ok(stored) => stored,
            Err(e) => {
                debug!(path = %self.path.display(), "Ignoring corrupt size cache: {}", e);
                return None;
            }
        };

        let bytes = u64::try_from(stored.bytes).ok()?;
        Some(SizeCacheRecord {
            bytes,
            updated_at: stored.updated_at,
        })
    }

    /// Persist `total_bytes` stamped with the current time
    pub fn write(&self, total_bytes: i64) -> Result<SizeCacheRecord> {
        ensure!(
            total_bytes >= 0,
            Validation,
            "Size must be non-negative, got {}",
            total_bytes
        );

        let record = SizeCacheRecord {
            bytes: total_bytes as u64,
            updated_at: Utc::now(),
        };
        write_json_atomic(&self.path, &record)?;

        Ok(record)
    }

    /// Recompute the size and persist it
    pub fn refresh(&self) -> Result<SizeCacheRecord> {
        let total = self.recompute()?;
        let total = i64::try_from(total).unwrap_or(i64::MAX);
        let record = self.write(total)?;

        info!(bytes = record.bytes, "Media size cache updated");
        Ok(record)
    }
}
