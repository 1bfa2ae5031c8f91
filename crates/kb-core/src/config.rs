//! Configuration types and loading

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AppConfig {
    /// Backend API configuration
    pub api: ApiConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL every REST path is resolved against
    pub base_url: String,
    /// Bearer token attached to every request
    pub token: Option<String>,
    pub timeout_seconds: u64,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub filter: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:3000/api/".to_string(),
                token: None,
                timeout_seconds: 30,
                user_agent: None,
            },
            logging: LoggingConfig {
                filter: "info,kb_store=debug,kb_client=debug".to_string(),
                format: LogFormat::Pretty,
            },
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // API
        if let Some(url) = lookup("KANBAN_API_URL") {
            if url.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "KANBAN_API_URL".into(),
                    message: "must not be empty".into(),
                });
            }
            config.api.base_url = url;
        }
        if let Some(token) = lookup("KANBAN_API_TOKEN") {
            config.api.token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(timeout) = lookup("KANBAN_API_TIMEOUT_SECONDS") {
            config.api.timeout_seconds = timeout
                .parse()
                .ok()
                .filter(|seconds: &u64| *seconds > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "KANBAN_API_TIMEOUT_SECONDS".into(),
                    message: format!("expected a positive number of seconds, got {:?}", timeout),
                })?;
        }
        if let Some(agent) = lookup("KANBAN_USER_AGENT") {
            config.api.user_agent = Some(agent);
        }

        // Logging
        if let Some(filter) = lookup("KANBAN_LOG") {
            config.logging.filter = filter;
        }
        if let Some(format) = lookup("KANBAN_LOG_FORMAT") {
            config.logging.format = match format.to_ascii_lowercase().as_str() {
                "pretty" | "text" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                other => {
                    return Err(ConfigError::InvalidValue {
                        key: "KANBAN_LOG_FORMAT".into(),
                        message: format!("unknown format {:?}", other),
                    })
                }
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.api.token.is_none());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("KANBAN_API_URL", "https://tracker.example.com/api/"),
            ("KANBAN_API_TOKEN", "secret"),
            ("KANBAN_API_TIMEOUT_SECONDS", "5"),
            ("KANBAN_LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.api.base_url, "https://tracker.example.com/api/");
        assert_eq!(config.api.token.as_deref(), Some("secret"));
        assert_eq!(config.api.request_timeout(), std::time::Duration::from_secs(5));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("KANBAN_API_TIMEOUT_SECONDS", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == "KANBAN_API_TIMEOUT_SECONDS"
        ));
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let config = AppConfig::from_lookup(lookup(&[("KANBAN_API_TOKEN", "")])).unwrap();
        assert!(config.api.token.is_none());
    }

    #[test]
    fn test_invalid_timeout() {
        let err = AppConfig::from_lookup(lookup(&[("KANBAN_API_TIMEOUT_SECONDS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "KANBAN_API_TIMEOUT_SECONDS"));
    }

    #[test]
    fn test_invalid_log_format() {
        let err = AppConfig::from_lookup(lookup(&[("KANBAN_LOG_FORMAT", "xml")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
