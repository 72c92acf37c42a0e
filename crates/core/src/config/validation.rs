//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_max_entries` or `rate_limit_max` is 0
    /// - `rate_limit_window_ms` is 0
    /// - `max_query_length` is 0 or exceeds 10,000 characters
    /// - `max_response_length` is less than 100 characters
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `provider` is empty
    ///
    /// Injection patterns are validated when the filter is compiled at
    /// startup, not here, since regex compilation lives with the sanitizer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_max_entries == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_max_entries".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.rate_limit_max == 0 {
            return Err(ConfigError::Invalid { field: "rate_limit_max".into(), reason: "must be greater than 0".into() });
        }
        if self.rate_limit_window_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "rate_limit_window_ms".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.max_query_length == 0 {
            return Err(ConfigError::Invalid {
                field: "max_query_length".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.max_query_length > 10_000 {
            return Err(ConfigError::Invalid {
                field: "max_query_length".into(),
                reason: "must not exceed 10000 characters".into(),
            });
        }

        if self.max_response_length < 100 {
            return Err(ConfigError::Invalid {
                field: "max_response_length".into(),
                reason: "must be at least 100 characters".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.provider.is_empty() {
            return Err(ConfigError::Invalid { field: "provider".into(), reason: "must not be empty".into() });
        }

        if self.injection_patterns.is_empty() {
            tracing::warn!("injection_patterns is empty; the content filter will never reject a query");
        }

        Ok(())
    }
}
