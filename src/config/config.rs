use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::data::view_state::PageSize;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub table: TableDefaults,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode glyphs for sort arrows and checkboxes
    pub use_glyphs: bool,

    /// Markers (can be overridden)
    pub icons: IconConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    pub sort_ascending: String,
    pub sort_descending: String,
    pub checked: String,
    pub unchecked: String,
    pub indeterminate: String,
    pub loading: String,
}

/// Defaults applied to every table the CLI builds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDefaults {
    pub searchable: bool,
    pub selectable: bool,
    pub pagination: bool,
    pub sortable: bool,

    /// One of 5, 10, 25, 50
    pub page_size: usize,

    /// Shown when the current page has no rows
    pub empty_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Used when RUST_LOG is not set
    pub level: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            icons: IconConfig::default(),
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            sort_ascending: "▲".to_string(),
            sort_descending: "▼".to_string(),
            checked: "☑".to_string(),
            unchecked: "☐".to_string(),
            indeterminate: "◩".to_string(),
            loading: "⏳".to_string(),
        }
    }
}

impl IconConfig {
    /// Get simple ASCII alternatives for terminals without glyph support
    pub fn simple() -> Self {
        Self {
            sort_ascending: "^".to_string(),
            sort_descending: "v".to_string(),
            checked: "[x]".to_string(),
            unchecked: "[ ]".to_string(),
            indeterminate: "[-]".to_string(),
            loading: "...".to_string(),
        }
    }
}

impl Default for TableDefaults {
    fn default() -> Self {
        Self {
            searchable: true,
            selectable: false,
            pagination: true,
            sortable: true,
            page_size: PageSize::default().as_usize(),
            empty_message: "No data available".to_string(),
        }
    }
}

impl TableDefaults {
    /// Configured page size, falling back to the default for unsupported values
    pub fn page_size(&self) -> PageSize {
        PageSize::try_from(self.page_size).unwrap_or_else(|e| {
            warn!(target: "config", "{}; using {}", e, PageSize::default());
            PageSize::default()
        })
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            // Create default config if it doesn't exist
            let default_config = Self::default();
            default_config.save_to_path(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from_path(&config_path)
    }

    /// Load config from an explicit file
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {:?}", path.as_ref()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config: {:?}", path.as_ref()))?;

        // Apply simple mode if glyphs are disabled
        if !config.display.use_glyphs {
            config.display.icons = IconConfig::simple();
        }

        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to_path(Self::get_config_path()?)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("procto-table").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# procto-table configuration
# Location: ~/.config/procto-table/config.toml (Linux)
#           %APPDATA%\procto-table\config.toml (Windows)

[display]
# Use Unicode glyphs for sort arrows and checkboxes
# Set to false for ASCII-only mode
use_glyphs = true

[table]
# Show the search box and filter rows by free text
searchable = true

# Show selection checkboxes and the select-all checkbox
selectable = false

# Split rows into pages
pagination = true

# Allow sorting by clicking column headers
sortable = true

# Rows per page: 5, 10, 25 or 50
page_size = 10

# Message shown when there is nothing to display
empty_message = "No data available"

[logging]
# Log level used when RUST_LOG is not set
level = "info"
"#
        .to_string()
    }
}
