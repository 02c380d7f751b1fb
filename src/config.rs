//! Application settings, persisted as `settings.json` in the data
//! directory so they survive restarts.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// UI color scheme preference. Stored, not interpreted, by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Runtime configuration for the archive service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Directory holding the database, uploads, and this settings file.
    #[serde(skip)]
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    /// Base URL prefixed to generated file links.
    pub public_url: String,
    pub page_size: usize,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            host: "127.0.0.1".to_string(),
            port: 3000,
            public_url: "http://127.0.0.1:3000".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            theme: Theme::default(),
        }
    }
}

impl Settings {
    /// Load settings from `data_dir`, falling back to defaults when the
    /// file does not exist yet.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(SETTINGS_FILE);
        let mut settings = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Settings::default()
        };
        settings.data_dir = data_dir.to_path_buf();
        Ok(settings)
    }

    /// Write settings to `settings.json` in the data directory.
    pub fn save(&self) -> Result<()> {
        let path = self.data_dir.join(SETTINGS_FILE);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Directory where uploaded attachments are stored.
    pub fn upload_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(settings.theme, Theme::System);
        assert_eq!(settings.data_dir, dir.path());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::load(dir.path()).unwrap();
        settings.port = 8080;
        settings.theme = Theme::Dark;
        settings.save().unwrap();

        let reloaded = Settings::load(dir.path()).unwrap();
        assert_eq!(reloaded.port, 8080);
        assert_eq!(reloaded.theme, Theme::Dark);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), r#"{"port": 4000}"#).unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.port, 4000);
        assert_eq!(settings.host, "127.0.0.1");
    }

    #[test]
    fn test_theme_wire_format() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
    }
}
