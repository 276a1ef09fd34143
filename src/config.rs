/*!
 * Configuration handling for mediabrowse
 */

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use once_cell::sync::Lazy;

use crate::ensure;
use crate::error::Result;

/// File name of the persisted size cache inside the data directory
pub const SIZE_CACHE_FILE: &str = "size_cache.json";

/// File name of the settings store inside the data directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Video extensions recognised when none are given on the command line
pub static DEFAULT_VIDEO_EXTENSIONS: Lazy<Vec<&'static str>> = Lazy::new(|| vec!["mp4"]);

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables (default)
    Table,
    /// Pretty-printed JSON
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Table
    }
}

/// Command-line arguments for mediabrowse
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "mediabrowse",
    version = env!("CARGO_PKG_VERSION"),
    about = "Browse, watch and prune a self-hosted video library",
    long_about = "Lists directories of video files under a fixed media root, finds the next episode, deletes watched files and tracks the total library size."
)]
pub struct Args {
    /// Media root directory every path is resolved against
    #[clap(long, global = true, env = "MEDIA_ROOT", default_value = "media")]
    pub media_root: PathBuf,

    /// Directory holding the size cache and settings files
    #[clap(long, global = true, env = "MEDIABROWSE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Comma-separated list of video extensions (default: mp4)
    #[clap(long = "video-ext", global = true, value_delimiter = ',')]
    pub video_extensions: Vec<String>,

    /// Number of threads to use when summing the library size
    #[clap(long, global = true, default_value = "4")]
    pub threads: usize,

    /// Output format
    #[clap(long, global = true, value_enum, default_value_t = OutputFormat::default())]
    pub format: OutputFormat,

    /// Log level used when RUST_LOG is not set
    #[clap(long, global = true, default_value = "info")]
    pub log_level: String,

    #[clap(subcommand)]
    pub command: Command,
}

/// Operations exposed by the command-line front end
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List a directory under the media root
    Browse {
        /// Directory relative to the media root
        #[clap(default_value = "")]
        path: String,

        /// Page number (invalid values fall back to 1)
        #[clap(long, allow_hyphen_values = true)]
        page: Option<String>,

        /// Only show entries whose name contains this text
        #[clap(long, short = 'q')]
        query: Option<String>,
    },

    /// Show a video and the next episode after it
    Watch {
        /// Video relative to the media root
        path: String,
    },

    /// Resolve a file for serving
    Media {
        /// File relative to the media root
        path: String,
    },

    /// Delete a video, pruning directories left empty
    Delete {
        /// Video relative to the media root
        path: String,
    },

    /// Show the cached library size
    Size {
        /// Walk the whole library and refresh the cached size
        #[clap(long)]
        recalculate: bool,
    },

    /// Inspect or change persisted settings
    Settings {
        #[clap(subcommand)]
        action: SettingsAction,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[clap(value_enum)]
        shell: Shell,
    },
}

/// Settings sub-operations
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsAction {
    /// Print all settings
    Show,
    /// Change a setting
    Set {
        /// DEFAULT_PER_PAGE or CLEANUP_EMPTY_DIRECTORIES
        key: String,
        /// New value
        value: String,
    },
    /// Write defaults for settings that are not yet present
    Init,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Media root as configured (canonicalized by the resolver)
    pub media_root: PathBuf,

    /// Directory for persisted state
    pub data_dir: PathBuf,

    /// Lowercased video extensions without the leading dot
    pub video_extensions: Vec<String>,

    /// Number of threads to use for size computation
    pub num_threads: usize,
}

impl Config {
    /// Create a configuration with default extensions and data directory
    pub fn new(media_root: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
            data_dir: data_dir.into(),
            video_extensions: normalize_extensions(&[]),
            num_threads: 4,
        }
    }

    /// Create configuration from command-line arguments
    pub fn from_args(args: &Args) -> Self {
        let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);

        Self {
            media_root: args.media_root.clone(),
            data_dir,
            video_extensions: normalize_extensions(&args.video_extensions),
            num_threads: args.threads,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.media_root.is_dir(),
            Config,
            "Media root not found: {}",
            self.media_root.display()
        );
        ensure!(self.num_threads > 0, Config, "Thread count must be positive");
        ensure!(
            !self.video_extensions.is_empty(),
            Config,
            "At least one video extension is required"
        );

        Ok(())
    }

    /// Whether a path carries a whitelisted video extension
    pub fn is_video_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .map_or(false, |ext| self.video_extensions.iter().any(|v| *v == ext))
    }

    /// Location of the persisted size cache
    pub fn size_cache_path(&self) -> PathBuf {
        self.data_dir.join(SIZE_CACHE_FILE)
    }

    /// Location of the settings store
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mediabrowse")
}

fn normalize_extensions(raw: &[String]) -> Vec<String> {
    let source: Vec<String> = if raw.is_empty() {
        DEFAULT_VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect()
    } else {
        raw.to_vec()
    };

    source
        .iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}
