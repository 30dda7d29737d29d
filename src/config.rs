use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const MIN_GOAL_DAYS: u32 = 1;
pub const MAX_GOAL_DAYS: u32 = 3650;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_goal_days")]
    pub goal_days: u32,
    #[serde(default = "default_persist")]
    pub persist: bool,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_goal_days() -> u32 {
    30
}
fn default_persist() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            goal_days: default_goal_days(),
            persist: default_persist(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Load `path`, apply `edit`, and write the result back.
    ///
    /// A file that fails to parse is left untouched and the error returned.
    pub fn update_file(path: &Path, edit: impl FnOnce(&mut Config)) -> Result<Self> {
        let mut config = Self::load_from(path)
            .with_context(|| format!("refusing to overwrite {}", path.display()))?;
        edit(&mut config);
        config.validate();
        config.save_to(path)?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("streakr")
            .join("config.toml")
    }

    /// Clamp out-of-range values read from disk or passed on the command line.
    pub fn validate(&mut self) {
        self.goal_days = self.goal_days.clamp(MIN_GOAL_DAYS, MAX_GOAL_DAYS);
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.goal_days, 30);
        assert!(config.persist);
    }

    #[test]
    fn test_config_partial_file_keeps_defaults() {
        let toml_str = r#"
goal_days = 90
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.goal_days, 90);
        assert_eq!(config.theme, "catppuccin-mocha");
        assert!(config.persist);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            theme: "terminal-default".to_string(),
            goal_days: 66,
            persist: false,
        };
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.theme, "terminal-default");
        assert_eq!(deserialized.goal_days, 66);
        assert!(!deserialized.persist);
    }

    #[test]
    fn test_validate_clamps_goal() {
        let mut config = Config::default();
        config.goal_days = 0;
        config.validate();
        assert_eq!(config.goal_days, MIN_GOAL_DAYS);

        config.goal_days = 100_000;
        config.validate();
        assert_eq!(config.goal_days, MAX_GOAL_DAYS);
    }

    #[test]
    fn test_validate_blank_theme_resets() {
        let mut config = Config::default();
        config.theme = "  ".to_string();
        config.validate();
        assert_eq!(config.theme, "catppuccin-mocha");
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.goal_days, 30);
    }

    #[test]
    fn test_load_from_validates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "goal_days = 0\npersist = false\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.goal_days, 1);
        assert!(!config.persist);
    }

    #[test]
    fn test_load_from_malformed_file_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "goal_days = \"lots\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_update_file_applies_edit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("streakr").join("config.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "theme = \"dusk-purple\"\n").unwrap();

        let config = Config::update_file(&path, |c| c.goal_days = 0).unwrap();
        assert_eq!(config.goal_days, MIN_GOAL_DAYS);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.theme, "dusk-purple");
        assert_eq!(reloaded.goal_days, MIN_GOAL_DAYS);
    }

    #[test]
    fn test_update_file_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        Config::update_file(&path, |c| c.persist = false).unwrap();
        assert!(!Config::load_from(&path).unwrap().persist);
    }

    #[test]
    fn test_update_file_leaves_malformed_file_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let original = "goal_days = \"lots\"\ntheme = \"mine\"\n";
        fs::write(&path, original).unwrap();

        let err = Config::update_file(&path, |c| c.goal_days = 45).unwrap_err();
        assert!(err.to_string().contains("refusing to overwrite"));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }
}
