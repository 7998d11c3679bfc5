//! Category list persisted as `{"categories": [...]}`.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "Food",
    "Transport",
    "Rent",
    "Utilities",
    "Shopping",
    "Health",
    "Other",
];

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
        }
    }
}

impl CategoryConfig {
    /// Read the config, falling back to the defaults when it is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        Self::try_load(path).unwrap_or_else(|e| {
            warn!("Using default categories: {}", e);
            Self::default()
        })
    }

    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Overwrite the config file with the full list.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("Saved {} categories to {}", self.categories.len(), path.display());
        Ok(())
    }

    /// Add a label; blank and duplicate labels are ignored. Returns whether it was added.
    pub fn add(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() || self.categories.iter().any(|c| c == label) {
            return false;
        }
        self.categories.push(label.to_string());
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.categories.len()).then(|| self.categories.remove(index))
    }

    /// Preselected category in the form.
    pub fn first(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_broken_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(CategoryConfig::load(&path), CategoryConfig::default());

        fs::write(&path, "{not json").unwrap();
        assert_eq!(CategoryConfig::load(&path).first(), Some("Food"));

        fs::write(&path, "{}").unwrap();
        assert_eq!(CategoryConfig::load(&path).categories.len(), 7);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = CategoryConfig {
            categories: vec!["Travel".into(), "Books".into()],
        };
        config.save(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"categories\""));
        assert_eq!(CategoryConfig::load(&path), config);
    }

    #[test]
    fn test_add_and_remove() {
        let mut config = CategoryConfig::default();
        assert!(config.add("  Gifts "));
        assert!(!config.add("Gifts"));
        assert!(!config.add("   "));
        assert_eq!(config.categories.last().map(String::as_str), Some("Gifts"));
        assert_eq!(config.remove(0), Some("Food".to_string()));
        assert_eq!(config.remove(99), None);
        assert_eq!(config.first(), Some("Transport"));
    }
}
