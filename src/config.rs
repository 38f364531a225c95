use serde::{Deserialize, Serialize};

use crate::utils::constants::{DEFAULT_BACKEND_URL, DEFAULT_NOTIFICATION_TIMEOUT_MS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url: String,
    pub notification_timeout_ms: u32,
    pub enable_logging: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            notification_timeout_ms: DEFAULT_NOTIFICATION_TIMEOUT_MS,
            enable_logging: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from compile-time environment variables
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("BACKEND_URL"),
            option_env!("NOTIFICATION_TIMEOUT_MS"),
            option_env!("ENABLE_LOGGING"),
        )
    }

    fn from_values(
        backend_url: Option<&str>,
        notification_timeout_ms: Option<&str>,
        enable_logging: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            backend_url: backend_url
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.backend_url),
            notification_timeout_ms: notification_timeout_ms
                .and_then(|ms| ms.parse().ok())
                .unwrap_or(defaults.notification_timeout_ms),
            enable_logging: enable_logging
                .and_then(|flag| flag.parse().ok())
                .unwrap_or(defaults.enable_logging),
        }
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }

    /// Console level for the browser logger
    pub fn log_level(&self) -> log::Level {
        if self.enable_logging {
            log::Level::Debug
        } else {
            log::Level::Warn
        }
    }
}

// Global static configuration
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_fall_back_to_defaults() {
        assert_eq!(AppConfig::from_values(None, None, None), AppConfig::default());
    }

    #[test]
    fn unparsable_values_fall_back_per_field() {
        let config = AppConfig::from_values(Some("https://school.example/"), Some("soon"), Some("no"));
        assert_eq!(config.backend_url(), "https://school.example");
        assert_eq!(config.notification_timeout_ms, DEFAULT_NOTIFICATION_TIMEOUT_MS);
        assert!(config.is_logging_enabled());
    }

    #[test]
    fn logging_switch_selects_console_level() {
        let quiet = AppConfig::from_values(None, Some("2500"), Some("false"));
        assert_eq!(quiet.notification_timeout_ms, 2_500);
        assert_eq!(quiet.log_level(), log::Level::Warn);
    }
}
