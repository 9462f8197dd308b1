//! # Configuration State
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`RODEO_*`)
//! 2. Config file (`config.toml` in the platform config directory,
//!    or the path in `RODEO_CONFIG`)
//! 3. Defaults (this file)
//!
//! ## Example `config.toml`
//! ```toml
//! [api]
//! base_url = "http://192.168.0.10:5002"
//! timeout_secs = 10
//!
//! [session]
//! token_path = "/home/rodeo/.local/share/rodeo/token"
//!
//! [settlement]
//! allocation = "reconciled"
//!
//! [store]
//! name = "로데오 본점"
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after loading, so no mutex needed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use rodeo_client::ClientConfig;
use rodeo_core::settlement::AllocationPolicy;

/// Configuration load failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("설정 파일을 읽을 수 없습니다 ({path}): {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("설정 파일 형식이 올바르지 않습니다: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("설정 값이 올바르지 않습니다 ({key}): {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiSection,
    pub session: SessionSection,
    pub settlement: SettlementSection,
    pub store: StoreSection,
}

/// Shop API connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    /// Default: `http://localhost:5002`
    pub base_url: String,

    /// Default: 10
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Where the bearer token is kept between runs.
    /// Default: `token` in the platform data directory
    pub token_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementSection {
    /// How a transaction total is split over its lines.
    pub allocation: AllocationPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Shown in report headers.
    pub name: String,
}

impl Default for ApiSection {
    fn default() -> Self {
        ApiSection {
            base_url: "http://localhost:5002".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for StoreSection {
    fn default() -> Self {
        StoreSection {
            name: "로데오".to_string(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("kr", "rodeo", "ledger")
}

impl AppConfig {
    /// Loads defaults, then the config file, then `RODEO_*` overrides.
    ///
    /// A missing config file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os("RODEO_CONFIG")
            .map(PathBuf::from)
            .or_else(|| project_dirs().map(|d| d.config_dir().join("config.toml")));

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => {
                debug!("No config file, using defaults");
                AppConfig::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;

        info!(
            base_url = %config.api.base_url,
            allocation = %config.settlement.allocation,
            "Configuration loaded"
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Reading config file");
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Applies environment overrides through `lookup`.
    ///
    /// ## Environment Variables
    /// - `RODEO_API_URL`: Shop API base URL
    /// - `RODEO_API_TIMEOUT_SECS`: Request timeout
    /// - `RODEO_TOKEN_PATH`: Token file
    /// - `RODEO_ALLOCATION`: `reconciled` or `independent`
    /// - `RODEO_STORE_NAME`: Store name
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("RODEO_API_URL") {
            self.api.base_url = url;
        }

        if let Some(secs) = lookup("RODEO_API_TIMEOUT_SECS") {
            self.api.timeout_secs = secs
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("RODEO_API_TIMEOUT_SECS", secs.clone()))?;
        }

        if let Some(path) = lookup("RODEO_TOKEN_PATH") {
            self.session.token_path = Some(PathBuf::from(path));
        }

        if let Some(policy) = lookup("RODEO_ALLOCATION") {
            self.settlement.allocation = policy
                .parse()
                .map_err(|_| ConfigError::invalid("RODEO_ALLOCATION", policy.clone()))?;
        }

        if let Some(name) = lookup("RODEO_STORE_NAME") {
            self.store.name = name;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ClientConfig::new(&self.api.base_url)
            .map_err(|e| ConfigError::invalid("api.base_url", e.to_string()))?;

        if !(1..=300).contains(&self.api.timeout_secs) {
            return Err(ConfigError::invalid(
                "api.timeout_secs",
                format!("{} (1-300)", self.api.timeout_secs),
            ));
        }

        Ok(())
    }

    /// Client settings derived from the `[api]` section.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        ClientConfig::new(&self.api.base_url)
            .map(|c| c.timeout(Duration::from_secs(self.api.timeout_secs)))
            .map_err(|e| ConfigError::invalid("api.base_url", e.to_string()))
    }

    /// Token file location: configured path, else the platform data
    /// directory, else the working directory.
    pub fn token_path(&self) -> PathBuf {
        if let Some(path) = &self.session.token_path {
            return path.clone();
        }
        project_dirs()
            .map(|d| d.data_dir().join("token"))
            .unwrap_or_else(|| PathBuf::from(".rodeo-token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [api]
            base_url = "http://192.168.0.10:5002"

            [settlement]
            allocation = "independent"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://192.168.0.10:5002");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.settlement.allocation, AllocationPolicy::Independent);
        assert_eq!(config.store.name, "로데오");
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            AppConfig::from_toml("[api\nbase_url ="),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                ("RODEO_API_URL", "http://shop.local"),
                ("RODEO_API_TIMEOUT_SECS", "30"),
                ("RODEO_ALLOCATION", "independent"),
                ("RODEO_TOKEN_PATH", "/tmp/rodeo-token"),
            ]))
            .unwrap();

        assert_eq!(config.api.base_url, "http://shop.local");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.settlement.allocation, AllocationPolicy::Independent);
        assert_eq!(config.token_path(), PathBuf::from("/tmp/rodeo-token"));
    }

    #[test]
    fn test_bad_env_values() {
        let mut config = AppConfig::default();
        assert!(matches!(
            config.apply_env(env(&[("RODEO_API_TIMEOUT_SECS", "soon")])),
            Err(ConfigError::Invalid { key: "RODEO_API_TIMEOUT_SECS", .. })
        ));
        assert!(matches!(
            config.apply_env(env(&[("RODEO_ALLOCATION", "evenly")])),
            Err(ConfigError::Invalid { key: "RODEO_ALLOCATION", .. })
        ));
    }

    #[test]
    fn test_validate() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.api.timeout_secs = 10;
        config.api.base_url = "localhost 5002".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "api.base_url", .. })
        ));
    }

    #[test]
    fn test_client_config_timeout() {
        let mut config = AppConfig::default();
        config.api.timeout_secs = 4;
        let client = config.client_config().unwrap();
        assert_eq!(client.timeout, Duration::from_secs(4));
        assert_eq!(client.base_url.as_str(), "http://localhost:5002/");
    }
}
