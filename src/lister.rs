/*!
 * Directory listing for the browse view
 */

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::bail;
use crate::config::Config;
use crate::error::Result;
use crate::types::{DirEntry, Listing};
use crate::utils::to_url_path;

/// Lists the immediate children of directories under the media root
#[derive(Debug, Clone)]
pub struct DirectoryLister {
    /// Lister configuration
    config: Config,
    /// Canonical media root
    root: PathBuf,
}

impl DirectoryLister {
    /// Create a new lister for a canonical media root
    pub fn new(config: Config, root: PathBuf) -> Self {
        Self { config, root }
    }

    /// List a directory already validated by the resolver.
    ///
    /// Directories come first, then files, each group in case-insensitive
    /// name order.
    pub fn list(&self, dir: &Path) -> Result<Listing> {
        if !dir.is_dir() {
            bail!(NotFound, "{}", dir.display());
        }

        let mut entries: Listing = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter_map(|entry| {
                let file_type = entry.file_type();
                if !file_type.is_dir() && !file_type.is_file() {
                    return None;
                }

                let is_dir = file_type.is_dir();
                Some(DirEntry {
                    name: entry.file_name().to_string_lossy().to_string(),
                    is_dir,
                    is_video: !is_dir && self.config.is_video_extension(entry.path()),
                    path: self.relative(entry.path()),
                })
            })
            .collect();

        entries.sort_by(casefold_order);
        Ok(entries)
    }

    fn relative(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => to_url_path(rel),
            Err(_) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Directories before files, then a locale-independent case fold of the name
pub fn casefold_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Keep entries whose name contains `query`, ignoring case
pub fn filter_by_name(listing: Listing, query: &str) -> Listing {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return listing;
    }

    listing
        .into_iter()
        .filter(|entry| entry.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaError;
    use std::fs::{self, File};
    use std::io;
    use tempfile::tempdir;

    fn lister_for(root: &Path) -> io::Result<DirectoryLister> {
        let root = fs::canonicalize(root)?;
        Ok(DirectoryLister::new(Config::new(&root, &root), root))
    }

    fn names(listing: &Listing) -> Vec<&str> {
        listing.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_directories_first_then_casefold() -> io::Result<()> {
        let temp_dir = tempdir()?;
        File::create(temp_dir.path().join("b.mp4"))?;
        fs::create_dir(temp_dir.path().join("A"))?;
        File::create(temp_dir.path().join("a.mp4"))?;

        let lister = lister_for(temp_dir.path())?;
        let listing = lister.list(&fs::canonicalize(temp_dir.path())?).unwrap();

        assert_eq!(names(&listing), vec!["A", "a.mp4", "b.mp4"]);
        assert!(listing[0].is_dir);
        assert!(!listing[0].is_video);
        assert!(listing[1].is_video);
        Ok(())
    }

    #[test]
    fn test_casefold_is_not_natural() -> io::Result<()> {
        let temp_dir = tempdir()?;
        for name in ["Episode 10.mp4", "episode 2.mp4", "Episode 1.mp4"] {
            File::create(temp_dir.path().join(name))?;
        }

        let lister = lister_for(temp_dir.path())?;
        let listing = lister.list(&fs::canonicalize(temp_dir.path())?).unwrap();

        assert_eq!(
            names(&listing),
            vec!["Episode 1.mp4", "Episode 10.mp4", "episode 2.mp4"]
        );
        Ok(())
    }

    #[test]
    fn test_classifies_videos_and_paths() -> io::Result<()> {
        let temp_dir = tempdir()?;
        let show = temp_dir.path().join("Show");
        fs::create_dir_all(show.join("extras.mp4"))?;
        File::create(show.join("Pilot.MP4"))?;
        File::create(show.join("notes.txt"))?;

        let lister = lister_for(temp_dir.path())?;
        let listing = lister.list(&fs::canonicalize(&show)?).unwrap();

        // A directory named like a video is still a directory
        assert_eq!(listing[0].name, "extras.mp4");
        assert!(listing[0].is_dir && !listing[0].is_video);

        let pilot = listing.iter().find(|e| e.name == "Pilot.MP4").unwrap();
        assert!(pilot.is_video);
        assert_eq!(pilot.path, "Show/Pilot.MP4");

        let notes = listing.iter().find(|e| e.name == "notes.txt").unwrap();
        assert!(!notes.is_video);
        Ok(())
    }

    #[test]
    fn test_missing_or_file_is_not_found() -> io::Result<()> {
        let temp_dir = tempdir()?;
        File::create(temp_dir.path().join("a.mp4"))?;
        let lister = lister_for(temp_dir.path())?;

        assert!(matches!(
            lister.list(&temp_dir.path().join("nope")),
            Err(MediaError::NotFound(_))
        ));
        assert!(matches!(
            lister.list(&temp_dir.path().join("a.mp4")),
            Err(MediaError::NotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn test_filter_by_name() {
        let entry = |name: &str| DirEntry {
            name: name.to_string(),
            is_dir: false,
            is_video: true,
            path: name.to_string(),
        };
        let listing = vec![entry("The Wire.mp4"), entry("Wired.mp4"), entry("Lost.mp4")];

        assert_eq!(names(&filter_by_name(listing.clone(), "  WIRE ")).len(), 2);
        assert_eq!(filter_by_name(listing.clone(), "").len(), 3);
        assert!(filter_by_name(listing, "xyz").is_empty());
    }
}
