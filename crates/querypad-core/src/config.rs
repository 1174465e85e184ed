use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{QuerypadError, Result};

/// Root application configuration, loaded from `~/.config/querypad/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub widget: WidgetConfig,
    pub log: LogConfig,
}

/// Where suggestions come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub search_path: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub user_agent: String,
}

/// Timing and rendering knobs of the lookup widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub debounce_ms: u64,
    pub blur_grace_ms: u64,
    pub tick_ms: u64,
    pub typeset_math: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub file: String,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            search_path: "/search/".to_string(),
            timeout_secs: 10,
            max_retries: 2,
            user_agent: format!("querypad/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 400,
            blur_grace_ms: 200,
            tick_ms: 100,
            typeset_math: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        let file = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("querypad")
            .join("querypad.log");

        Self {
            level: "info".to_string(),
            file: file.to_string_lossy().to_string(),
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl WidgetConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn blur_grace(&self) -> Duration {
        Duration::from_millis(self.blur_grace_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/querypad/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("QUERYPAD_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("querypad")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        Self::load_from(&path)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard path.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        self.save_to(&path)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.base_url.trim().is_empty() {
            return Err(QuerypadError::ConfigError("server.base_url is empty".to_string()));
        }
        if !self.server.search_path.starts_with('/') {
            return Err(QuerypadError::ConfigError(format!(
                "server.search_path must start with '/': {}",
                self.server.search_path
            )));
        }
        if self.server.timeout_secs == 0 {
            return Err(QuerypadError::ConfigError(
                "server.timeout_secs must be positive".to_string(),
            ));
        }
        if self.widget.tick_ms == 0 {
            return Err(QuerypadError::ConfigError("widget.tick_ms must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.widget.debounce(), Duration::from_millis(400));
        assert_eq!(cfg.widget.blur_grace(), Duration::from_millis(200));
        assert_eq!(cfg.server.search_path, "/search/");
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = AppConfig::default();
        cfg.server.base_url = "https://ackrep.org".to_string();
        cfg.widget.debounce_ms = 250;
        cfg.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.server.base_url, "https://ackrep.org");
        assert_eq!(loaded.widget.debounce_ms, 250);
        assert_eq!(loaded.log.level, cfg.log.level);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[widget]\ndebounce_ms = 50\n").unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.widget.debounce_ms, 50);
        assert_eq!(loaded.widget.blur_grace_ms, 200);
        assert_eq!(loaded.server.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let cfg = AppConfig::load_from(Path::new("/tmp/nonexistent_querypad_config.toml")).unwrap();
        assert_eq!(cfg.widget.debounce_ms, 400);
    }

    #[test]
    fn test_invalid_search_path_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nsearch_path = \"search\"\n").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, QuerypadError::ConfigError(_)));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\ntimeout_secs = 0\n").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));

        let mut cfg = AppConfig::default();
        cfg.server.timeout_secs = 1;
        assert!(cfg.validate().is_ok());
    }
}
