//! Configuration management for the portal
//!
//! This module provides file and environment based configuration with
//! defaults that reproduce the stock site: `admin`/`admin123`, the six seed
//! invite codes and `CHW-NNN` generated codes.

use crate::admin::AdminPolicy;
use crate::auth::{AuthPolicy, PasswordScheme};
use crate::data::SeedData;
use crate::logging::LogLevel;
use crate::model::{DEFAULT_CODE_PREFIX, MAX_SEQUENTIAL_CODE, SEED_INVITE_CODES};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

mod error;

pub use error::ConfigError;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where state is kept
    pub storage: StorageConfig,

    /// Login and registration rules
    pub auth: AuthConfig,

    /// Invite code generation
    pub invites: InviteConfig,

    /// First-run records
    pub seed: SeedConfig,

    /// Presentation timings and limits
    pub ui: UiConfig,

    /// Server status probe
    pub status: StatusConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Lost when the process exits
    Memory,
    /// One JSON file per key under `data_dir`
    File,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Data directory for the file backend
    pub data_dir: PathBuf,
}

/// Auth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub username_min_len: usize,
    pub username_max_len: usize,
    pub password_min_len: usize,

    /// `plaintext` keeps stored passwords readable by existing deployments
    pub password_scheme: PasswordScheme,

    /// Delay before leaving the register page after success
    #[serde(with = "humantime_serde")]
    pub register_redirect_delay: Duration,
}

/// Invite code configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InviteConfig {
    /// Prefix for generated codes
    pub prefix: String,

    /// Upper bound for one generate request
    pub max_batch: usize,
}

/// Seed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub admin_username: String,
    pub admin_password: String,
    pub invite_codes: Vec<String>,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long inline notices stay visible
    #[serde(with = "humantime_serde")]
    pub notice_clear_after: Duration,

    /// Delay before leaving a page the user may not see
    #[serde(with = "humantime_serde")]
    pub denied_redirect_delay: Duration,

    /// Announcements shown on the home page
    pub home_announcement_limit: usize,

    /// Announcements shown on the admin page
    pub admin_announcement_limit: usize,
}

/// Status probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// `host:port` of the game server
    pub address: String,

    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Shown when the probe fails
    pub fallback: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include timestamps
    pub with_timestamp: bool,

    /// Include target module
    pub with_target: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from("./portal-data"),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username_min_len: 3,
            username_max_len: 20,
            password_min_len: 6,
            password_scheme: PasswordScheme::Plaintext,
            register_redirect_delay: Duration::from_secs(2),
        }
    }
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_CODE_PREFIX.to_string(),
            max_batch: 10,
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            invite_codes: SEED_INVITE_CODES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notice_clear_after: Duration::from_secs(5),
            denied_redirect_delay: Duration::from_secs(2),
            home_announcement_limit: 3,
            admin_announcement_limit: 5,
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:25565".to_string(),
            timeout: Duration::from_secs(5),
            fallback: "Status unavailable".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamp: true,
            with_target: true,
        }
    }
}

fn parse_env<T>(name: &str, what: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue(format!("Invalid {}: {}", what, e))),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// Load configuration from environment variables on top of the defaults
    ///
    /// Environment variables follow the pattern: PORTAL_<SECTION>_<KEY>
    /// Example: PORTAL_STORAGE_DATA_DIR=/var/lib/portal
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `PORTAL_*` environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        // Storage config
        if let Ok(backend) = env::var("PORTAL_STORAGE_BACKEND") {
            self.storage.backend = match backend.to_lowercase().as_str() {
                "memory" => StorageBackend::Memory,
                "file" => StorageBackend::File,
                other => {
                    return Err(ConfigError::InvalidValue(format!(
                        "Invalid storage backend: {}",
                        other
                    )))
                }
            };
        }
        if let Ok(data_dir) = env::var("PORTAL_STORAGE_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(data_dir);
        }

        // Auth config
        if let Some(scheme) = parse_env("PORTAL_AUTH_PASSWORD_SCHEME", "password scheme")? {
            self.auth.password_scheme = scheme;
        }

        // Invite config
        if let Ok(prefix) = env::var("PORTAL_INVITES_PREFIX") {
            self.invites.prefix = prefix;
        }
        if let Some(max_batch) = parse_env("PORTAL_INVITES_MAX_BATCH", "max batch")? {
            self.invites.max_batch = max_batch;
        }

        // Seed config
        if let Ok(username) = env::var("PORTAL_SEED_ADMIN_USERNAME") {
            self.seed.admin_username = username;
        }
        if let Ok(password) = env::var("PORTAL_SEED_ADMIN_PASSWORD") {
            self.seed.admin_password = password;
        }

        // Status config
        if let Ok(address) = env::var("PORTAL_STATUS_ADDRESS") {
            self.status.address = address;
        }

        // Logging config
        if let Ok(level) = env::var("PORTAL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = parse_env("PORTAL_LOG_JSON", "JSON flag")? {
            self.logging.json_format = json;
        }

        Ok(())
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate storage config
        if self.storage.backend == StorageBackend::File
            && self.storage.data_dir.as_os_str().is_empty()
        {
            return Err(ConfigError::ValidationFailed(
                "file storage requires a data_dir".to_string(),
            ));
        }

        // Validate auth config
        if self.auth.username_min_len == 0 {
            return Err(ConfigError::ValidationFailed(
                "username_min_len must be greater than 0".to_string(),
            ));
        }
        if self.auth.username_min_len > self.auth.username_max_len {
            return Err(ConfigError::ValidationFailed(
                "username_min_len must not exceed username_max_len".to_string(),
            ));
        }
        if self.auth.password_min_len == 0 {
            return Err(ConfigError::ValidationFailed(
                "password_min_len must be greater than 0".to_string(),
            ));
        }

        // Validate invite config
        if self.invites.prefix.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "invite prefix must not be empty".to_string(),
            ));
        }
        if self.invites.max_batch == 0 || self.invites.max_batch > MAX_SEQUENTIAL_CODE as usize {
            return Err(ConfigError::ValidationFailed(format!(
                "max_batch must be between 1 and {}",
                MAX_SEQUENTIAL_CODE
            )));
        }

        // Validate seed config
        if self.seed.admin_username.trim().is_empty() || self.seed.admin_password.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "seed admin credentials must not be empty".to_string(),
            ));
        }

        // Validate status config
        if self.status.timeout.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "status timeout must be greater than 0".to_string(),
            ));
        }

        // Validate logging config
        if self.logging.level.parse::<LogLevel>().is_err() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        let path = path.as_ref();
        std::fs::write(path, contents).map_err(|e| ConfigError::FileWriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    pub fn auth_policy(&self) -> AuthPolicy {
        AuthPolicy {
            username_min_len: self.auth.username_min_len,
            username_max_len: self.auth.username_max_len,
            password_min_len: self.auth.password_min_len,
            password_scheme: self.auth.password_scheme,
            register_redirect_delay: self.auth.register_redirect_delay,
            denied_redirect_delay: self.ui.denied_redirect_delay,
        }
    }

    pub fn admin_policy(&self) -> AdminPolicy {
        AdminPolicy {
            code_prefix: self.invites.prefix.clone(),
            max_batch: self.invites.max_batch,
        }
    }

    /// Seed records; `admin_password` is stored as given, so encode it first
    pub fn seed_data(&self, admin_password: String) -> SeedData {
        SeedData {
            admin_username: self.seed.admin_username.clone(),
            admin_password,
            invite_codes: self.seed.invite_codes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.invites.prefix, "CHW-");
        assert_eq!(config.seed.invite_codes.len(), 6);
        assert_eq!(config.auth.password_scheme, PasswordScheme::Plaintext);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.auth.username_min_len = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.auth.username_min_len = 30;
        assert!(config.validate().is_err());

        config = Config::default();
        config.invites.max_batch = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.invites.prefix.clear();
        assert!(config.validate().is_err());

        config = Config::default();
        config.storage.data_dir = PathBuf::new();
        assert!(config.validate().is_err());
        config.storage.backend = StorageBackend::Memory;
        assert!(config.validate().is_ok());

        config = Config::default();
        config.status.timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level_validation() {
        let mut config = Config::default();

        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "debug".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("portal.toml");
        std::fs::write(
            &path,
            r#"
[auth]
password_scheme = "argon2"

[invites]
prefix = "SRV-"

[ui]
notice_clear_after = "3s"
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.auth.password_scheme, PasswordScheme::Argon2);
        assert_eq!(config.auth.username_max_len, 20);
        assert_eq!(config.invites.prefix, "SRV-");
        assert_eq!(config.invites.max_batch, 10);
        assert_eq!(config.ui.notice_clear_after, Duration::from_secs(3));
        assert_eq!(config.seed.admin_username, "admin");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("portal.toml");

        let mut config = Config::default();
        config.storage.backend = StorageBackend::Memory;
        config.ui.home_announcement_limit = 7;
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.storage.backend, StorageBackend::Memory);
        assert_eq!(loaded.ui.home_announcement_limit, 7);
        assert_eq!(loaded.auth.register_redirect_delay, Duration::from_secs(2));
    }

    #[test]
    fn test_bad_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[auth\n").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            Config::from_file(dir.path().join("missing.toml")),
            Err(ConfigError::FileReadError { .. })
        ));
    }

    #[test]
    fn test_policies_follow_config() {
        let mut config = Config::default();
        config.auth.password_min_len = 8;
        config.ui.denied_redirect_delay = Duration::from_secs(4);
        config.invites.prefix = "X-".to_string();

        let auth = config.auth_policy();
        assert_eq!(auth.password_min_len, 8);
        assert_eq!(auth.denied_redirect_delay, Duration::from_secs(4));
        assert_eq!(config.admin_policy().code_prefix, "X-");

        let seed = config.seed_data("hashed".to_string());
        assert_eq!(seed.admin_password, "hashed");
        assert_eq!(seed.admin_username, "admin");
    }
}
