//! Executor defaults and their resolution against per-query overrides.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{QueryError, QueryOptions};

/// Default execution parameters, usually loaded from the `[execution]` table
/// of the client configuration file.
///
/// Durations are expressed in milliseconds so the file stays plain TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Maximum dispatches per execution.
    pub max_attempts: u32,
    /// First back-off delay.
    pub min_backoff_ms: u64,
    /// Back-off cap.
    pub max_backoff_ms: u64,
    /// Overall deadline per execution.
    pub timeout_ms: u64,
    /// Deadline per dispatch.
    pub attempt_timeout_ms: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            min_backoff_ms: 250,
            max_backoff_ms: 8_000,
            timeout_ms: 120_000,
            attempt_timeout_ms: 10_000,
        }
    }
}

impl ExecutionConfig {
    /// Rejects configurations the executor cannot run with.
    pub fn validate(&self) -> Result<(), QueryError> {
        let fail = |message: &str| {
            Err(QueryError::Configuration {
                message: message.to_string(),
            })
        };

        if self.max_attempts == 0 {
            return fail("max_attempts must be at least 1");
        }
        if self.min_backoff_ms > self.max_backoff_ms {
            return fail("min_backoff_ms must not exceed max_backoff_ms");
        }
        if self.timeout_ms == 0 {
            return fail("timeout_ms must be positive");
        }
        if self.attempt_timeout_ms == 0 {
            return fail("attempt_timeout_ms must be positive");
        }
        Ok(())
    }

    /// Layers `options` over these defaults.
    pub fn resolve(&self, options: &QueryOptions) -> Result<ExecutionParams, QueryError> {
        let params = ExecutionParams {
            max_attempts: options.max_attempts().unwrap_or(self.max_attempts),
            min_backoff: options
                .min_backoff()
                .unwrap_or(Duration::from_millis(self.min_backoff_ms)),
            max_backoff: options
                .max_backoff()
                .unwrap_or(Duration::from_millis(self.max_backoff_ms)),
            timeout: options
                .timeout()
                .unwrap_or(Duration::from_millis(self.timeout_ms)),
            attempt_timeout: options
                .attempt_timeout()
                .unwrap_or(Duration::from_millis(self.attempt_timeout_ms)),
        };

        if params.min_backoff > params.max_backoff {
            return Err(QueryError::Configuration {
                message: format!(
                    "query backoff bounds conflict with defaults: min {:?} > max {:?}",
                    params.min_backoff, params.max_backoff
                ),
            });
        }
        Ok(params)
    }
}

/// Fully resolved parameters for one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionParams {
    /// Maximum dispatches.
    pub max_attempts: u32,
    /// First back-off delay.
    pub min_backoff: Duration,
    /// Back-off cap.
    pub max_backoff: Duration,
    /// Overall deadline.
    pub timeout: Duration,
    /// Deadline per dispatch.
    pub attempt_timeout: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ExecutionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_backoff() {
        let config = ExecutionConfig {
            min_backoff_ms: 5_000,
            max_backoff_ms: 1_000,
            ..ExecutionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(QueryError::Configuration { .. })
        ));
    }

    #[test]
    fn test_partial_overrides_fall_back_to_defaults() {
        let mut options = QueryOptions::default();
        options.set_max_attempts(3).unwrap();

        let params = ExecutionConfig::default().resolve(&options).unwrap();
        assert_eq!(params.max_attempts, 3);
        assert_eq!(params.min_backoff, Duration::from_millis(250));
        assert_eq!(params.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_override_conflicting_with_default_cap_is_rejected() {
        let mut options = QueryOptions::default();
        options.set_min_backoff(Duration::from_secs(60)).unwrap();

        let result = ExecutionConfig::default().resolve(&options);
        assert!(matches!(result, Err(QueryError::Configuration { .. })));
    }

    #[test]
    fn test_deserializes_with_missing_fields() {
        let config: ExecutionConfig = serde_json::from_str(r#"{"max_attempts": 4}"#).unwrap();
        assert_eq!(config.max_attempts, 4);
        assert_eq!(config.max_backoff_ms, 8_000);
    }
}
