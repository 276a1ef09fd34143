/*!
 * Utility functions for mediabrowse
 */

use std::fs;
use std::io::Write;
use std::path::{Component, Path};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{Result, ResultExt};

/// Format a human-readable size using base-1024 units
pub fn format_size(num_bytes: u64) -> String {
    const STEP: f64 = 1024.0;
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut size = num_bytes as f64;
    for (i, unit) in UNITS.iter().enumerate() {
        if size < STEP || i == UNITS.len() - 1 {
            return format!("{:.2} {}", size, unit);
        }
        size /= STEP;
    }

    unreachable!("the last unit always returns")
}

/// Join the normal components of a path with `/`
pub fn to_url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Parent of a forward-slash relative path; empty for top-level entries
pub fn parent_path(rel_path: &str) -> String {
    let trimmed = rel_path.trim_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => trimmed[..idx].to_string(),
        None => String::new(),
    }
}

/// Path components of a relative path, for breadcrumb navigation
pub fn breadcrumbs(rel_path: &str) -> Vec<String> {
    rel_path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Last component of a forward-slash relative path
pub fn file_name(rel_path: &str) -> String {
    breadcrumbs(rel_path).pop().unwrap_or_default()
}

/// Serialize `value` as JSON and atomically replace `path` with it.
///
/// The data goes to a temporary file in the same directory which is then
/// renamed over the target, so readers see either the old or the new file.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    serde_json::to_writer_pretty(&mut tmp, value)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.00 B");
        assert_eq!(format_size(1023), "1023.00 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size(3 * 1024_u64.pow(3)), "3.00 GB");
        assert_eq!(format_size(2048 * 1024_u64.pow(4)), "2048.00 TB");
    }

    #[test]
    fn test_to_url_path() {
        let path: PathBuf = ["Shows", "Season 1", "Episode 1.mp4"].iter().collect();
        assert_eq!(to_url_path(&path), "Shows/Season 1/Episode 1.mp4");
        assert_eq!(to_url_path(Path::new("")), "");
    }

    #[test]
    fn test_parent_and_breadcrumbs() {
        assert_eq!(parent_path("Shows/Season 1/Episode 1.mp4"), "Shows/Season 1");
        assert_eq!(parent_path("Episode 1.mp4"), "");
        assert_eq!(parent_path(""), "");

        assert_eq!(breadcrumbs("Shows/Season 1"), vec!["Shows", "Season 1"]);
        assert!(breadcrumbs("").is_empty());

        assert_eq!(file_name("Shows/Season 1/Episode 1.mp4"), "Episode 1.mp4");
    }

    #[test]
    fn test_write_json_atomic_replaces() -> Result<()> {
        let temp_dir = tempdir()?;
        let target = temp_dir.path().join("nested").join("state.json");

        write_json_atomic(&target, &serde_json::json!({ "v": 1 }))?;
        write_json_atomic(&target, &serde_json::json!({ "v": 2 }))?;

        let content = fs::read_to_string(&target)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        assert_eq!(value["v"], 2);

        // Only the target remains; temporary files were renamed away
        let entries = fs::read_dir(target.parent().unwrap())?.count();
        assert_eq!(entries, 1);
        Ok(())
    }
}
