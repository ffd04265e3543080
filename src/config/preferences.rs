//! Persisted user preferences
//!
//! Only the colour theme outlives a session. It is stored as a single string
//! under [`THEME_KEY`] in a small TOML file.

use crate::utils::app_paths::AppPaths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Key the theme is stored under
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(anyhow::anyhow!("Unknown theme '{}'", other)),
        }
    }
}

/// Key/value preference file
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform config directory
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(AppPaths::preferences_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences: {}", self.path.display()))?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    /// Set one key, keeping any others already in the file
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        // An unreadable file is replaced rather than blocking the write
        let mut values = self.read_all().unwrap_or_default();
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string(&values)?)?;
        debug!(target: "preferences", "Saved {} = {}", key, value);
        Ok(())
    }

    /// Stored theme, falling back to light when missing or unreadable
    pub fn theme(&self) -> Theme {
        match self.get(THEME_KEY) {
            Ok(Some(value)) => value.parse().unwrap_or_else(|e| {
                warn!(target: "preferences", "{}; using light theme", e);
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                warn!(target: "preferences", "Could not read theme: {}", e);
                Theme::default()
            }
        }
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.set(THEME_KEY, theme.as_str())
    }

    /// Flip the stored theme and return the new one
    pub fn toggle_theme(&self) -> Result<Theme> {
        let theme = self.theme().toggle();
        self.set_theme(theme)?;
        Ok(theme)
    }
}
