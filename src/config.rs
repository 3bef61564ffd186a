//! Configuration management module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Admin role stored with the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    /// Full access, including the department filter and admin accounts.
    Admin,
    /// Scoped to one department; no department selector offered.
    #[default]
    Department,
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub ui: UiConfig,
}

/// Backend REST API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Stored admin session.
///
/// The console does not own a login flow; the bearer token is obtained from
/// the backend's `/admin/login` endpoint and pasted into settings once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub token: String,
    pub role: AdminRole,
    pub department: Option<i32>,
}

/// UI preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub confirm_deletes: bool,
    /// Default row limit for the attendance records table.
    pub checkin_limit: u32,
}

impl AppConfig {
    /// Get config file path (same directory as executable).
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.url.trim().is_empty() {
            return Err(ConfigError::Validation("Server URL cannot be empty".to_string()));
        }
        if !self.server.url.starts_with("http") {
            return Err(ConfigError::Validation(
                "Server URL must start with http:// or https://".to_string(),
            ));
        }
        if self.server.timeout_secs < 5 {
            return Err(ConfigError::Validation(
                "Request timeout must be at least 5 seconds".to_string(),
            ));
        }
        if self.session.role == AdminRole::Department && self.session.department.is_none() {
            return Err(ConfigError::Validation(
                "Department role requires a department code".to_string(),
            ));
        }
        if self.ui.checkin_limit == 0 {
            return Err(ConfigError::Validation(
                "Checkin row limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            confirm_deletes: true,
            checkin_limit: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.session.role = AdminRole::Admin;
        config
    }

    #[test]
    fn test_admin_config_validates() {
        assert!(admin_config().validate().is_ok());
    }

    #[test]
    fn test_validation_empty_url() {
        let mut config = admin_config();
        config.server.url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_non_http_url() {
        let mut config = admin_config();
        config.server.url = "ftp://invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_timeout_bounds() {
        let mut config = admin_config();

        config.server.timeout_secs = 2;
        assert!(config.validate().is_err());

        config.server.timeout_secs = 30;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_department_role_requires_department() {
        let mut config = AppConfig::default();
        config.session.role = AdminRole::Department;
        config.session.department = None;
        assert!(config.validate().is_err());

        config.session.department = Some(3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_role_roundtrip() {
        let config = admin_config();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.session.role, AdminRole::Admin);
    }
}
