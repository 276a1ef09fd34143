/*!
 * Persisted key/value settings
 *
 * Only a fixed set of keys is accepted. Reading a key that has never been set
 * is a [`MediaError::MissingSetting`], which callers should treat as a
 * deployment problem rather than a user error.
 */

use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::info;

use crate::error::{MediaError, Result};
use crate::utils::write_json_atomic;
use crate::{ensure, error};

/// Smallest accepted page size
pub const MIN_PER_PAGE: i64 = 1;

/// Largest accepted page size
pub const MAX_PER_PAGE: i64 = 200;

/// Page size written by [`SettingsStore::seed_defaults`]
pub const DEFAULT_PER_PAGE: usize = 20;

/// Whitelisted setting keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SettingKey {
    /// Listing page size
    DefaultPerPage,
    /// Whether deleting a file prunes directories left empty
    CleanupEmptyDirectories,
}

impl SettingKey {
    /// Parse a key name, rejecting anything outside the whitelist
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_str(name.trim())
            .map_err(|_| error!(Validation, "Setting {:?} is not allowed", name))
    }
}

/// Interpret a loosely typed boolean; only `1`, `true`, `yes` and `on` are true
pub fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// JSON file backed settings table
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store persisted at `path`
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<Map<String, Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(error!(
                Config,
                "Settings file is not a JSON object: {}",
                self.path.display()
            )),
        }
    }

    fn store(&self, key: SettingKey, value: Value) -> Result<()> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value);
        write_json_atomic(&self.path, &map)
    }

    fn require(&self, key: SettingKey) -> Result<Value> {
        self.load()?
            .remove(key.as_ref())
            .filter(|v| !v.is_null())
            .ok_or_else(|| MediaError::MissingSetting(key.to_string()))
    }

    /// Current listing page size
    pub fn default_per_page(&self) -> Result<usize> {
        let key = SettingKey::DefaultPerPage;
        self.require(key)?
            .as_u64()
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| MediaError::MissingSetting(format!("{} is not an integer", key)))
    }

    /// Change the listing page size
    pub fn set_default_per_page(&self, value: i64) -> Result<usize> {
        ensure!(
            value >= MIN_PER_PAGE,
            Validation,
            "DEFAULT_PER_PAGE must be >= {}",
            MIN_PER_PAGE
        );
        ensure!(
            value <= MAX_PER_PAGE,
            Validation,
            "DEFAULT_PER_PAGE must be <= {}",
            MAX_PER_PAGE
        );

        self.store(SettingKey::DefaultPerPage, Value::from(value))?;
        info!(value, "DEFAULT_PER_PAGE updated");
        Ok(value as usize)
    }

    /// Whether deletes prune empty directories
    pub fn cleanup_empty_directories(&self) -> Result<bool> {
        let key = SettingKey::CleanupEmptyDirectories;
        self.require(key)?
            .as_bool()
            .ok_or_else(|| MediaError::MissingSetting(format!("{} is not a boolean", key)))
    }

    /// Enable or disable pruning of empty directories
    pub fn set_cleanup_empty_directories(&self, value: bool) -> Result<bool> {
        self.store(SettingKey::CleanupEmptyDirectories, Value::Bool(value))?;
        info!(value, "CLEANUP_EMPTY_DIRECTORIES updated");
        Ok(value)
    }

    /// Set a setting from its textual form
    pub fn set_raw(&self, key: &str, value: &str) -> Result<Value> {
        match SettingKey::parse(key)? {
            SettingKey::DefaultPerPage => {
                let parsed: i64 = value
                    .trim()
                    .parse()
                    .map_err(|_| error!(Validation, "DEFAULT_PER_PAGE must be a whole number"))?;
                self.set_default_per_page(parsed).map(Value::from)
            }
            SettingKey::CleanupEmptyDirectories => self
                .set_cleanup_empty_directories(parse_bool(value))
                .map(Value::Bool),
        }
    }

    /// Every known key with its stored value, if any
    pub fn all(&self) -> Result<Vec<(SettingKey, Option<Value>)>> {
        let map = self.load()?;
        Ok(SettingKey::iter()
            .map(|key| (key, map.get(key.as_ref()).cloned()))
            .collect())
    }

    /// Write defaults for keys that are not present; returns the keys written
    pub fn seed_defaults(&self) -> Result<Vec<SettingKey>> {
        let mut map = self.load()?;
        let mut seeded = Vec::new();

        for key in SettingKey::iter() {
            if map.get(key.as_ref()).map_or(false, |v| !v.is_null()) {
                continue;
            }
            let value = match key {
                SettingKey::DefaultPerPage => Value::from(DEFAULT_PER_PAGE),
                SettingKey::CleanupEmptyDirectories => Value::Bool(false),
            };
            map.insert(key.to_string(), value);
            seeded.push(key);
        }

        if !seeded.is_empty() {
            write_json_atomic(&self.path, &map)?;
        }
        Ok(seeded)
    }
}
