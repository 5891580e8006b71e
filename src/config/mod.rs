// Configuration module: TOML file -> GlobalConfig
// Missing sections fall back to defaults

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod chart_config;
pub mod system_config;

pub use chart_config::*;
pub use system_config::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration manager bound to one TOML file
pub struct ConfigManager {
    config_path: PathBuf,
    global_config: GlobalConfig,
    loaded: bool,
}

impl ConfigManager {
    /// Create new configuration manager with default path
    pub fn new() -> Self {
        Self::with_path("spread_sight.toml")
    }

    /// Create configuration manager with custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
            global_config: GlobalConfig::default(),
            loaded: false,
        }
    }

    /// Load and validate the configuration file
    pub fn load(&mut self) -> Result<(), ConfigError> {
        let content = fs::read_to_string(&self.config_path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::FileNotFound(self.config_path.display().to_string()),
            _ => ConfigError::Io(e),
        })?;
        let config = Self::parse(&content)?;

        self.global_config = config;
        self.loaded = true;
        log::info!("✓ Configuration loaded from {}", self.config_path.display());
        Ok(())
    }

    /// Load with fallback to defaults if the file is missing or invalid
    pub fn load_or_default(&mut self) -> &Self {
        if let Err(e) = self.load() {
            log::warn!("Failed to load config, using defaults: {}", e);
            self.global_config = GlobalConfig::default();
            self.loaded = true;
        }
        self
    }

    /// Parse TOML content and validate it
    pub fn parse(content: &str) -> Result<GlobalConfig, ConfigError> {
        let config: GlobalConfig = toml::from_str(content)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Get global configuration
    pub fn global(&self) -> &GlobalConfig {
        &self.global_config
    }

    /// Get mutable global configuration
    pub fn global_mut(&mut self) -> &mut GlobalConfig {
        &mut self.global_config
    }

    /// Save current configuration
    pub fn save(&self) -> Result<(), ConfigError> {
        let toml_str = toml::to_string_pretty(&self.global_config)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.config_path, toml_str)?;
        Ok(())
    }

    /// Check if configuration is loaded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::GapPolicy;

    #[test]
    fn test_config_manager_creation() {
        let manager = ConfigManager::new();
        assert!(!manager.is_loaded());
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let mut manager = ConfigManager::with_path("/nonexistent/spread_sight.toml");
        assert!(matches!(manager.load(), Err(ConfigError::FileNotFound(_))));

        manager.load_or_default();
        assert!(manager.is_loaded());
        assert_eq!(manager.global(), &GlobalConfig::default());
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        let mut manager = ConfigManager::with_path(std::env::temp_dir());
        assert!(matches!(manager.load(), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_invalid_tick_format_rejected() {
        let result = ConfigManager::parse("[chart]\nx_tick_format = \"%Q\"\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = ConfigManager::parse(
            r#"
            [chart]
            gap_policy = "break"
            y_tick_count = 5

            [chart.layout]
            width = 1000.0
            "#,
        )
        .unwrap();

        assert_eq!(config.chart.gap_policy, GapPolicy::Break);
        assert_eq!(config.chart.y_tick_count, 5);
        assert_eq!(config.chart.layout.width, 1000.0);
        assert_eq!(config.chart.layout.height, 140.0);
        assert_eq!(config.chart.x_tick_minutes, 5);
        assert_eq!(config.client, ClientConfig::default());
    }

    #[test]
    fn test_parse_rejects_invalid_layout() {
        let result = ConfigManager::parse(
            r#"
            [chart.layout]
            height = 40.0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join(format!("spread_sight_cfg_{}.toml", std::process::id()));
        let mut manager = ConfigManager::with_path(&path);
        manager.global_mut().chart.gap_policy = GapPolicy::Break;
        manager.save().unwrap();

        let mut reloaded = ConfigManager::with_path(&path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.global().chart.gap_policy, GapPolicy::Break);

        let _ = fs::remove_file(&path);
    }
}
