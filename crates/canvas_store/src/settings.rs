//! Designer settings management
//!
//! Persists the defaults used when creating, exporting and paginating
//! layouts. A missing or unreadable settings file falls back to defaults.

use crate::{Result, FORMAT_VERSION};
use canvas_model::FREE_PAGE_KEY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Number of table rows placed on one printed page
pub const DEFAULT_ROWS_PER_PAGE: usize = 40;

/// Main designer settings container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DesignerSettings {
    /// Page and report layout defaults
    pub layout: LayoutSettings,
    /// Canvas export options
    pub export: ExportSettings,
}

/// Page and report layout defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    /// Page preset key for new canvases
    pub default_page_key: String,
    /// Table rows per printed page
    pub rows_per_page: usize,
    /// Preferred language for column labels
    pub language: String,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            default_page_key: FREE_PAGE_KEY.to_string(),
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportSettings {
    /// Indent exported canvas JSON
    pub pretty: bool,
    pub format_version: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            pretty: true,
            format_version: FORMAT_VERSION.to_string(),
        }
    }
}

/// Settings manager for loading, saving, and updating designer settings
pub struct SettingsManager {
    settings_path: PathBuf,
    current: DesignerSettings,
}

impl SettingsManager {
    /// Create a settings manager storing `settings.json` in the given directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let settings_path = data_dir.into().join("settings.json");
        Self {
            settings_path,
            current: DesignerSettings::default(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk, or defaults if the file is absent or unreadable
    pub fn load_sync(&mut self) -> Result<&DesignerSettings> {
        if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            match serde_json::from_str::<DesignerSettings>(&content) {
                Ok(settings) => {
                    self.current = settings;
                }
                Err(e) => {
                    tracing::warn!("Failed to parse settings file, using defaults: {}", e);
                    self.current = DesignerSettings::default();
                }
            }
        } else {
            self.current = DesignerSettings::default();
        }
        Ok(&self.current)
    }

    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    pub fn get(&self) -> &DesignerSettings {
        &self.current
    }

    /// Replace settings and save to disk
    pub fn update_sync(&mut self, settings: DesignerSettings) -> Result<()> {
        self.current = settings;
        self.save_sync()
    }

    /// Reset settings to defaults and save
    pub fn reset_sync(&mut self) -> Result<&DesignerSettings> {
        self.current = DesignerSettings::default();
        self.save_sync()?;
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = DesignerSettings::default();
        assert_eq!(settings.layout.default_page_key, "free");
        assert_eq!(settings.layout.rows_per_page, 40);
        assert_eq!(settings.layout.language, "en");
        assert!(settings.export.pretty);
        assert_eq!(settings.export.format_version, "1.0");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: DesignerSettings =
            serde_json::from_str(r#"{"layout":{"rows_per_page":25}}"#).unwrap();
        assert_eq!(parsed.layout.rows_per_page, 25);
        assert_eq!(parsed.layout.language, "en");
        assert!(parsed.export.pretty);
    }

    #[test]
    fn test_settings_manager_load_save_sync() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path());

        let settings = manager.load_sync().unwrap();
        assert_eq!(settings, &DesignerSettings::default());

        let mut new_settings = DesignerSettings::default();
        new_settings.layout.language = "ar".to_string();
        new_settings.export.pretty = false;
        manager.update_sync(new_settings).unwrap();

        let mut manager2 = SettingsManager::new(temp_dir.path());
        let loaded = manager2.load_sync().unwrap();
        assert_eq!(loaded.layout.language, "ar");
        assert!(!loaded.export.pretty);
    }

    #[test]
    fn test_unparseable_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("settings.json"), "{not json").unwrap();

        let mut manager = SettingsManager::new(temp_dir.path());
        assert_eq!(manager.load_sync().unwrap(), &DesignerSettings::default());
    }

    #[test]
    fn test_reset_sync() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path());

        let mut changed = DesignerSettings::default();
        changed.layout.rows_per_page = 10;
        manager.update_sync(changed).unwrap();

        let settings = manager.reset_sync().unwrap();
        assert_eq!(settings.layout.rows_per_page, 40);
    }
}
