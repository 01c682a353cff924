use crate::error::{PrepError, Result, ResultExt as _};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_HOST: &str = "DATAPREPPER_HOST";
pub const ENV_PORT: &str = "DATAPREPPER_PORT";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by the CORS layer (the local frontend by default)
    pub cors_origins: Vec<String>,
    /// Upper bound on a request body, uploads included
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8000,
            cors_origins: vec![
                "http://localhost:3000".to_owned(),
                "http://127.0.0.1:3000".to_owned(),
            ],
            max_upload_bytes: 100 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PreviewConfig {
    /// Rows returned when the caller does not pass `rows`
    pub default_rows: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { default_rows: 5 }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    pub session_ttl_secs: u64,
    pub max_sessions: usize,
    pub drop_cache_ttl_secs: u64,
    pub max_cached_drops: usize,
    /// How often the server sweeps idle sessions and cache entries
    pub purge_interval_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 3600,
            max_sessions: 256,
            drop_cache_ttl_secs: 3600,
            max_cached_drops: 1024,
            purge_interval_secs: 60,
        }
    }
}

impl StorageConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn drop_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.drop_cache_ttl_secs)
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_secs)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
    pub log_to_file: bool,
    /// Defaults to `<data dir>/dataprepper/logs`
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            log_to_file: false,
            log_dir: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub preview: PreviewConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from an optional JSON file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the file cannot be read or parsed, or if an
    /// environment override is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PrepError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| PrepError::Config(format!("{}: {e}", path.display())))
    }

    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .parse()
                .map_err(|e| PrepError::Config(format!("{ENV_PORT}={port}: {e}")))?;
        }
        Ok(())
    }

    /// Reject settings that would make the service unusable.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            (self.preview.default_rows == 0, "preview.default_rows"),
            (self.storage.max_sessions == 0, "storage.max_sessions"),
            (self.storage.max_cached_drops == 0, "storage.max_cached_drops"),
            (self.storage.purge_interval_secs == 0, "storage.purge_interval_secs"),
            (self.server.max_upload_bytes == 0, "server.max_upload_bytes"),
        ];
        match checks.iter().find(|(bad, _)| *bad) {
            Some((_, field)) => Err(PrepError::Config(format!("{field} must be greater than zero"))),
            None => Ok(()),
        }
    }

    /// Write as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to encode config")?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]

    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"server": {"port": 9100}, "preview": {"default_rows": 10}}"#)?;

        let config = AppConfig::from_file(&path)?;
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.preview.default_rows, 10);
        assert_eq!(config.storage, StorageConfig::default());
        Ok(())
    }

    #[test]
    fn test_env_overrides() -> Result<()> {
        let env: HashMap<&str, &str> = [(ENV_HOST, "0.0.0.0"), (ENV_PORT, "8080")].into();
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| (*v).to_owned()))?;
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        Ok(())
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = AppConfig::default();
        let result = config.apply_env_overrides(|key| (key == ENV_PORT).then(|| "http".to_owned()));
        assert!(matches!(result, Err(PrepError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_rows() {
        let mut config = AppConfig::default();
        config.preview.default_rows = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("preview.default_rows"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/dataprepper.json")));
        assert!(matches!(result, Err(PrepError::Config(_))));
    }

    #[test]
    fn test_save_and_reload() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("nested").join("config.json");
        let mut config = AppConfig::default();
        config.storage.max_sessions = 8;
        config.save(&path)?;
        assert_eq!(AppConfig::from_file(&path)?, config);
        Ok(())
    }
}
