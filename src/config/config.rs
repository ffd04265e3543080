use crate::data::column_registry::{DEFAULT_COLUMN_WIDTH, MIN_COLUMN_WIDTH};
use crate::data::data_view::DEFAULT_PAGE_SIZE;
use crate::utils::app_paths::AppPaths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub view: ViewConfig,
    pub display: DisplayConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Rows per page when a table is first shown
    pub default_page_size: usize,

    /// Page sizes offered by the page-size selector
    pub page_size_options: Vec<usize>,

    /// Width given to columns that do not set one (pixels)
    pub default_column_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode glyphs for sort indicators
    pub use_glyphs: bool,

    /// Show row numbers in the first column
    pub show_row_numbers: bool,

    /// Icons for sort state (can be overridden)
    pub icons: IconConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    pub sort_ascending: String,
    pub sort_descending: String,
    pub unsorted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name prefix for exports without an explicit path
    pub file_prefix: String,

    /// Append a timestamp to generated export file names
    pub timestamp_filenames: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: vec![10, 20, 30, 40, 50],
            default_column_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            show_row_numbers: false,
            icons: IconConfig::default(),
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            sort_ascending: "▲".to_string(),
            sort_descending: "▼".to_string(),
            unsorted: "↕".to_string(),
        }
    }
}

impl IconConfig {
    /// ASCII alternatives for terminals without glyph support
    pub fn simple() -> Self {
        Self {
            sort_ascending: "^".to_string(),
            sort_descending: "v".to_string(),
            unsorted: "-".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: "table_export".to_string(),
            timestamp_filenames: true,
        }
    }
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load config from `path`, writing the defaults there if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config: {}", path.display()))?;

        if !config.display.use_glyphs {
            config.display.icons = IconConfig::simple();
        }
        config.normalize();

        debug!(target: "config", "Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        Ok(AppPaths::config_dir()?.join("config.toml"))
    }

    // Hand-edited files can hold values the engine would reject or clamp anyway
    fn normalize(&mut self) {
        if self.view.default_page_size == 0 {
            warn!(target: "config", "default_page_size = 0, using {}", DEFAULT_PAGE_SIZE);
            self.view.default_page_size = DEFAULT_PAGE_SIZE;
        }
        self.view.page_size_options.retain(|&size| size > 0);
        self.view.page_size_options.sort_unstable();
        self.view.page_size_options.dedup();
        self.view.default_column_width = self.view.default_column_width.max(MIN_COLUMN_WIDTH);
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# table-view configuration file
# Location: ~/.config/table-view/config.toml (Linux)
#           ~/Library/Application Support/table-view/config.toml (macOS)
#           %APPDATA%\table-view\config.toml (Windows)

[view]
# Rows per page when a table is first shown
default_page_size = 10

# Page sizes offered by the page-size selector
page_size_options = [10, 20, 30, 40, 50]

# Width given to columns that do not set one (pixels, minimum 50)
default_column_width = 150

[display]
# Use Unicode glyphs for sort indicators
# Set to false for ASCII-only mode (better compatibility)
use_glyphs = true

# Show row numbers in the first column
show_row_numbers = false

[display.icons]
sort_ascending = "▲"
sort_descending = "▼"
unsorted = "↕"

[export]
# File name prefix for exports without an explicit path
file_prefix = "table_export"

# Append a timestamp to generated export file names
timestamp_filenames = true
"#
        .to_string()
    }
}
