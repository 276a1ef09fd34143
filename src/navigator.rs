/*!
 * Next-episode lookup in natural order
 */

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Result;
use crate::utils::to_url_path;

/// Finds the video following a given one among its siblings
#[derive(Debug, Clone)]
pub struct SequenceNavigator {
    config: Config,
    root: PathBuf,
}

impl SequenceNavigator {
    /// Create a navigator for a canonical media root
    pub fn new(config: Config, root: PathBuf) -> Self {
        Self { config, root }
    }

    /// Relative path of the video after `video` in its directory, if any.
    ///
    /// Returns `None` when `video` is the last one or is not among the
    /// directory's videos (for instance because it was just deleted).
    pub fn next_video(&self, video: &Path) -> Result<Option<String>> {
        let (Some(parent), Some(current)) = (video.parent(), video.file_name()) else {
            return Ok(None);
        };
        let current = current.to_string_lossy();

        let siblings = self.sorted_videos(parent);
        let next = siblings
            .iter()
            .position(|name| *name == current)
            .and_then(|idx| siblings.get(idx + 1));

        Ok(next.map(|name| {
            let rel = parent.strip_prefix(&self.root).unwrap_or(Path::new(""));
            to_url_path(&rel.join(name))
        }))
    }

    /// Video file names in `dir`, naturally ordered
    fn sorted_videos(&self, dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| self.config.is_video_extension(entry.path()))
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();

        names.sort_by(|a, b| natural_order(a, b));
        names
    }
}

/// Compare names with embedded numbers by value, so "Episode 9" < "Episode 10"
pub fn natural_order(a: &str, b: &str) -> Ordering {
    alphanumeric_sort::compare_str(a.to_lowercase(), b.to_lowercase()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io;
    use tempfile::tempdir;

    fn setup_season() -> io::Result<(tempfile::TempDir, SequenceNavigator, PathBuf)> {
        let temp_dir = tempdir()?;
        let root = fs::canonicalize(temp_dir.path())?;
        let season = root.join("Show").join("Season 1");
        fs::create_dir_all(&season)?;

        for i in 1..=11 {
            File::create(season.join(format!("Episode {}.mp4", i)))?;
        }
        File::create(season.join("Episode 9.nfo"))?;
        fs::create_dir(season.join("Episode 9b.mp4"))?;

        let navigator = SequenceNavigator::new(Config::new(&root, &root), root);
        Ok((temp_dir, navigator, season))
    }

    #[test]
    fn test_natural_order() {
        assert_eq!(natural_order("Episode 9.mp4", "Episode 10.mp4"), Ordering::Less);
        assert_eq!(natural_order("episode 2.mp4", "Episode 10.mp4"), Ordering::Less);
        assert_eq!(natural_order("a.mp4", "B.mp4"), Ordering::Less);
        assert_eq!(natural_order("x.mp4", "x.mp4"), Ordering::Equal);
    }

    #[test]
    fn test_next_uses_numeric_order() -> io::Result<()> {
        let (_temp_dir, navigator, season) = setup_season()?;

        let next = navigator.next_video(&season.join("Episode 9.mp4")).unwrap();
        assert_eq!(next.as_deref(), Some("Show/Season 1/Episode 10.mp4"));

        let next = navigator.next_video(&season.join("Episode 1.mp4")).unwrap();
        assert_eq!(next.as_deref(), Some("Show/Season 1/Episode 2.mp4"));
        Ok(())
    }

    #[test]
    fn test_last_video_has_no_next() -> io::Result<()> {
        let (_temp_dir, navigator, season) = setup_season()?;
        assert_eq!(navigator.next_video(&season.join("Episode 11.mp4")).unwrap(), None);
        Ok(())
    }

    #[test]
    fn test_missing_video_has_no_next() -> io::Result<()> {
        let (_temp_dir, navigator, season) = setup_season()?;
        fs::remove_file(season.join("Episode 5.mp4"))?;

        assert_eq!(navigator.next_video(&season.join("Episode 5.mp4")).unwrap(), None);
        Ok(())
    }

    #[test]
    fn test_top_level_paths() -> io::Result<()> {
        let temp_dir = tempdir()?;
        let root = fs::canonicalize(temp_dir.path())?;
        File::create(root.join("b.mp4"))?;
        File::create(root.join("a.mp4"))?;

        let navigator = SequenceNavigator::new(Config::new(&root, &root), root.clone());
        assert_eq!(
            navigator.next_video(&root.join("a.mp4")).unwrap().as_deref(),
            Some("b.mp4")
        );
        Ok(())
    }
}
