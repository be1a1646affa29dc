use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tui: TuiConfig,
    pub data: DataConfig,
    pub search: SearchConfig,
    pub shelf: ShelfConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
    /// Enable mouse support in the terminal.
    pub mouse_enabled: bool,
}

/// Data directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

/// Book lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Google Books API root.
    pub base_url: String,
    /// Results requested per lookup.
    pub max_results: u32,
    /// Shortest trimmed query that triggers a lookup.
    pub min_query_chars: usize,
    /// Quiet period after the last keystroke, in milliseconds.
    pub debounce_ms: u64,
}

/// Shelf display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    /// Initial sort key: `title`, `author`, `pages`, `added` or `updated`,
    /// prefixed with `-` for descending.
    pub order: String,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            order: "-updated".to_string(),
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            mouse_enabled: false,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com".to_string(),
            max_results: 8,
            min_query_chars: 1,
            debounce_ms: 300,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/pagetrail/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Self {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}; using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}; using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("pagetrail"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    /// Where the reading library is persisted.
    pub fn library_path(&self) -> PathBuf {
        self.data_dir().join("library.json")
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("pagetrail").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
