//! # System configuration.
//!
//! [`SystemConfig`] is read once at process start and handed to
//! [`Supervisor::initialize`](crate::Supervisor::initialize); nothing here is
//! hot-reloadable.
//!
//! The only operator-tunable sizing knob is the log-copy pool:
//!
//! | key | type | default |
//! |---|---|---|
//! | `system.number-of-workflow-log-copy-workers` | positive integer | 10 |
//!
//! The metadata-lookup pool is intentionally **not** configurable and is
//! always [`METADATA_LOOKUP_WORKERS`] workers wide: lookups are cheap
//! idempotent queries bounded by external-API etiquette, while log copying is
//! I/O-bound and should track operator-tunable disk limits.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Effective log-copy pool size when the configuration omits the key.
pub const DEFAULT_LOG_COPY_WORKERS: usize = 10;

/// Fixed size of the metadata-lookup pool. Not configurable.
pub const METADATA_LOOKUP_WORKERS: usize = 25;

/// Property key sizing the log-copy pool.
pub const LOG_COPY_WORKERS_KEY: &str = "system.number-of-workflow-log-copy-workers";

/// Errors produced while reading configuration at process start.
///
/// A bad configuration value is a bootstrap-time problem: the caller is
/// expected to treat it exactly like any other initialization failure and
/// abort instead of guessing a size.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The worker-count property was present but not a positive integer.
    #[error("invalid value for '{LOG_COPY_WORKERS_KEY}': {value:?} (expected a positive integer)")]
    InvalidWorkerCount {
        /// The rejected raw value.
        value: String,
    },
}

/// Process-wide configuration for the supervision runtime.
///
/// ## Field semantics
/// - `log_copy_workers`: size of the log-copy pool (must be ≥ 1; the
///   properties parser rejects anything else)
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by the bus)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Number of log-copy workers.
    pub log_copy_workers: usize,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events will
    /// observe `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl SystemConfig {
    /// Builds a configuration from a flat properties map (`key = value`).
    ///
    /// Unknown keys are ignored. A missing worker-count key yields
    /// [`DEFAULT_LOG_COPY_WORKERS`]; a present but malformed or non-positive
    /// value is rejected.
    pub fn from_properties(props: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        if let Some(raw) = props.get(LOG_COPY_WORKERS_KEY) {
            let parsed: usize = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidWorkerCount { value: raw.clone() })?;
            if parsed == 0 {
                return Err(ConfigError::InvalidWorkerCount { value: raw.clone() });
            }
            cfg.log_copy_workers = parsed;
        }
        Ok(cfg)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SystemConfig {
    /// Default configuration:
    ///
    /// - `log_copy_workers = 10`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            log_copy_workers: DEFAULT_LOG_COPY_WORKERS,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn omitted_key_defaults_to_ten() {
        let cfg = SystemConfig::from_properties(&HashMap::new()).unwrap();
        assert_eq!(cfg.log_copy_workers, 10);
    }

    #[test]
    fn configured_key_overrides_default() {
        let cfg =
            SystemConfig::from_properties(&props(&[(LOG_COPY_WORKERS_KEY, "3")])).unwrap();
        assert_eq!(cfg.log_copy_workers, 3);
    }

    #[test]
    fn zero_workers_is_rejected() {
        let err = SystemConfig::from_properties(&props(&[(LOG_COPY_WORKERS_KEY, "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWorkerCount { .. }));
    }

    #[test]
    fn garbage_value_is_rejected() {
        let err = SystemConfig::from_properties(&props(&[(LOG_COPY_WORKERS_KEY, "many")]))
            .unwrap_err();
        assert!(err.to_string().contains(LOG_COPY_WORKERS_KEY));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let cfg =
            SystemConfig::from_properties(&props(&[("system.unrelated", "7")])).unwrap();
        assert_eq!(cfg.log_copy_workers, DEFAULT_LOG_COPY_WORKERS);
    }

    #[test]
    fn lookup_pool_size_is_a_fixed_constant() {
        assert_eq!(METADATA_LOOKUP_WORKERS, 25);
    }
}
