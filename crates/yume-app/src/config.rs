//! Application configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use yume_ingest::IngestConfig;
use yume_presence::{LoopConfig, RetryPolicy};

use crate::error::{AppError, AppResult};

/// Environment variable holding the Discord application id.
pub const CLIENT_ID_ENV: &str = "CLIENT_ID";

/// Presence loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// Seconds between update cycles. Default: 15.
    #[serde(default = "default_update_interval_secs")]
    pub update_interval_secs: u64,
    /// Fixed delay between connect attempts (seconds). Default: 30.
    #[serde(default = "default_connect_retry_delay_secs")]
    pub connect_retry_delay_secs: u64,
    /// Consecutive failed connects before giving up (0 = retry forever). Default: 3.
    #[serde(default = "default_max_connect_attempts")]
    pub max_connect_attempts: u32,
    /// Restart the elapsed-time counter when going back to the hub. Default: true.
    #[serde(default = "default_reset_session_on_hub")]
    pub reset_session_on_hub: bool,
    /// Discord handshake timeout (seconds). Default: 10.
    #[serde(default = "default_handshake_timeout_secs")]
    pub handshake_timeout_secs: u64,
}

fn default_update_interval_secs() -> u64 {
    15
}

fn default_connect_retry_delay_secs() -> u64 {
    30
}

fn default_max_connect_attempts() -> u32 {
    3
}

fn default_reset_session_on_hub() -> bool {
    true
}

fn default_handshake_timeout_secs() -> u64 {
    10
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            update_interval_secs: default_update_interval_secs(),
            connect_retry_delay_secs: default_connect_retry_delay_secs(),
            max_connect_attempts: default_max_connect_attempts(),
            reset_session_on_hub: default_reset_session_on_hub(),
            handshake_timeout_secs: default_handshake_timeout_secs(),
        }
    }
}

impl PresenceConfig {
    /// Loop settings derived from this section.
    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            interval: Duration::from_secs(self.update_interval_secs),
            retry: RetryPolicy::from_max_attempts(
                self.max_connect_attempts,
                Duration::from_secs(self.connect_retry_delay_secs),
            ),
            reset_session_on_hub: self.reset_session_on_hub,
        }
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }
}

/// Room image lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Upper bound on one lookup (ms). Default: 5000.
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
    /// User agent sent to the wiki.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_lookup_timeout_ms() -> u64 {
    5_000
}

fn default_user_agent() -> String {
    format!("yume-rp/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: default_lookup_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl ImagesConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

/// Location of the preference documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Directory holding `preferences.toml` and `presence.toml`. Default: ".".
    #[serde(default = "default_preferences_dir")]
    pub dir: PathBuf,
}

fn default_preferences_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            dir: default_preferences_dir(),
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level used when `RUST_LOG` is unset. Default: "info".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// Default path missing; built-in defaults in use.
    Defaults,
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Ingestion server.
    #[serde(default)]
    pub server: IngestConfig,
    /// Presence loop.
    #[serde(default)]
    pub presence: PresenceConfig,
    /// Room image lookup.
    #[serde(default)]
    pub images: ImagesConfig,
    /// Preference documents.
    #[serde(default)]
    pub preferences: PreferencesConfig,
    /// Logging.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration text.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`. A missing file is an error only when `explicit`;
    /// otherwise built-in defaults are used.
    pub fn load(path: impl AsRef<Path>, explicit: bool) -> AppResult<(Self, ConfigSource)> {
        let path = path.as_ref();
        if !explicit && !path.exists() {
            return Ok((Self::default(), ConfigSource::Defaults));
        }
        let config = Self::from_file(path)?;
        Ok((config, ConfigSource::File(path.to_path_buf())))
    }

    /// Reject settings that would make the loop spin.
    pub fn validate(&self) -> AppResult<()> {
        if self.presence.update_interval_secs == 0 {
            return Err(AppError::Config(
                "presence.update_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.presence.connect_retry_delay_secs == 0 {
            return Err(AppError::Config(
                "presence.connect_retry_delay_secs must be at least 1".to_string(),
            ));
        }
        if self.images.lookup_timeout_ms == 0 {
            return Err(AppError::Config(
                "images.lookup_timeout_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse a Discord application id.
pub fn parse_client_id(raw: Option<&str>) -> AppResult<i64> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let Some(raw) = raw else {
        return Err(AppError::MissingClientId);
    };
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::InvalidClientId(raw.to_string())),
    }
}

/// Read the Discord application id from [`CLIENT_ID_ENV`].
pub fn client_id_from_env() -> AppResult<i64> {
    parse_client_id(std::env::var(CLIENT_ID_ENV).ok().as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.presence.update_interval_secs, 15);
        assert_eq!(config.preferences.dir, PathBuf::from("."));
        assert!(config.validate().is_ok());

        let loop_config = config.presence.loop_config();
        assert_eq!(loop_config.interval, Duration::from_secs(15));
        assert_eq!(
            loop_config.retry,
            RetryPolicy::bounded(3, Duration::from_secs(30))
        );
        assert!(loop_config.reset_session_on_hub);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 4000

            [presence]
            max_connect_attempts = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.presence.loop_config().retry.max_attempts, None);
        assert_eq!(config.images.lookup_timeout_ms, 5_000);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = AppConfig::from_toml("[presence]\nupdate_interval_secs = 0\n").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_load_missing_default_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.toml");

        let (config, source) = AppConfig::load(&path, false).unwrap();
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(config.server.port, 3000);

        assert!(AppConfig::load(&path, true).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[telemetry]\nlog_level = \"debug\"\n").unwrap();

        let (config, source) = AppConfig::load(&path, true).unwrap();
        assert_eq!(source, ConfigSource::File(path));
        assert_eq!(config.telemetry.log_level, "debug");
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = toml::to_string(&AppConfig::default()).unwrap();
        assert!(toml_str.contains("update_interval_secs"));
        assert!(toml_str.contains("lookup_timeout_ms"));
    }

    #[test]
    fn test_client_id_parsing() {
        assert_eq!(parse_client_id(Some("1234567890")).unwrap(), 1234567890);
        assert_eq!(parse_client_id(Some(" 42 ")).unwrap(), 42);
        assert!(matches!(parse_client_id(None), Err(AppError::MissingClientId)));
        assert!(matches!(parse_client_id(Some("")), Err(AppError::MissingClientId)));
        assert!(matches!(
            parse_client_id(Some("abc")),
            Err(AppError::InvalidClientId(_))
        ));
        assert!(matches!(
            parse_client_id(Some("-5")),
            Err(AppError::InvalidClientId(_))
        ));
    }
}
