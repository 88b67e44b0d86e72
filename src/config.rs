// Configuration file parsing. Everything has a default, so an empty file (or none at all) works.

use std::{fs, path::{Path, PathBuf}, str::FromStr, time::Duration};

use serde::Deserialize;
use tracing::warn;

use crate::{
    browser::collector::CollectorSettings,
    error::ConfigError,
    models::web::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZES, MAX_SAFE_PAGE_SIZE, PAGE_DELAY, SOFT_BLOCK_DELAY},
};

pub const DEFAULT_CONFIG_FILE: &str = "cs2multisell.toml";
pub const DEFAULT_PREFS_FILE: &str = "cs2multisell.sqlite";

// =============================================================================
// Configuration Types
// =============================================================================

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Used when RUST_LOG is not set
    pub log_level: Option<String>,
    /// Where the last used SteamID64 is kept
    pub prefs_path: PathBuf,
    pub inventory: InventoryConfig,
    pub steam: SteamConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Counts to try, largest first
    pub page_sizes: Vec<u32>,
    pub max_pages: u32,
    pub page_delay_ms: u64,
    pub soft_block_delay_ms: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SteamConfig {
    /// Value of the steamLoginSecure cookie
    pub login_secure: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: None,
            prefs_path: PathBuf::from(DEFAULT_PREFS_FILE),
            inventory: InventoryConfig::default(),
            steam: SteamConfig::default(),
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        InventoryConfig {
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
            max_pages: DEFAULT_MAX_PAGES,
            page_delay_ms: PAGE_DELAY.as_millis() as u64,
            soft_block_delay_ms: SOFT_BLOCK_DELAY.as_millis() as u64,
        }
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path)
            .map_err(|source| ConfigError::Read { path: path.as_ref().to_path_buf(), source })?;
        contents.parse()
    }

    /// Explicit path if given, otherwise `cs2multisell.toml` in the working directory when it exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Config::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let settings = self.collector_settings();
        let usable = settings.normalized_page_sizes();

        if usable.is_empty() {
            return Err( ConfigError::Invalid(format!(
                "page_sizes {:?} has no count between 1 and {}", self.inventory.page_sizes, MAX_SAFE_PAGE_SIZE
            )) );
        }
        if usable.len() < self.inventory.page_sizes.len() {
            warn!(configured = ?self.inventory.page_sizes, using = ?usable, "skipping unsafe, zero or repeated page sizes");
        }
        if self.inventory.max_pages == 0 {
            return Err( ConfigError::Invalid(String::from("max_pages has to be at least 1")) );
        }
        Ok(())
    }

    pub fn collector_settings(&self) -> CollectorSettings {
        CollectorSettings {
            page_sizes: self.inventory.page_sizes.clone(),
            max_pages: self.inventory.max_pages,
            page_delay: Duration::from_millis(self.inventory.page_delay_ms),
            soft_block_delay: Duration::from_millis(self.inventory.soft_block_delay_ms),
        }
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    /// Parse configuration from a TOML string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok( toml::from_str(s)? )
    }
}
