//! Playground configuration.
//!
//! Loaded from `<config dir>/shrub/config.toml`. Every section uses
//! `#[serde(default)]`, so a partial file (or none at all) still yields a
//! complete config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::playground::EditorTheme;

/// Main playground configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editor widget settings
    pub editor: EditorConfig,

    /// Preview settings
    pub preview: PreviewConfig,

    /// Starting file set
    pub files: FileConfig,
}

impl Config {
    /// Loads config from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring unreadable config: {}", e);
                Self::default()
            }
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("shrub").join("config.toml"))
    }

    /// Saves the config to the given path, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Saves the config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path()?)
    }
}

/// Editor widget configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Starting theme
    pub theme: EditorTheme,

    /// Tab width in spaces
    pub tab_size: usize,

    /// Soft-wrap long lines
    pub word_wrap: bool,

    /// Viewport width (px) below which the compact layout is used
    pub compact_breakpoint: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            theme: EditorTheme::Dark,
            tab_size: 2,
            word_wrap: true,
            compact_breakpoint: 768,
        }
    }
}

impl EditorConfig {
    /// Returns true if a viewport of `width` pixels should use compact layout.
    pub fn is_compact(&self, width: u32) -> bool {
        width < self.compact_breakpoint
    }
}

/// Preview configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Title of the page hosting the sandboxed preview
    pub title: String,

    /// Push every changed document to the sink (otherwise only on refresh)
    pub auto_refresh: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            title: "Preview".to_string(),
            auto_refresh: true,
        }
    }
}

/// Starting file set configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Seed `index.html`, `styles.css` and `script.js` in a new playground
    pub seed_defaults: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            seed_defaults: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
