//! Configuration for fetch orchestration and the simulated provider

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const ENV_FETCH_TIMEOUT_MS: &str = "ORDERED_FETCH_TIMEOUT_MS";
pub const ENV_TIME_UNIT_US: &str = "ORDERED_FETCH_TIME_UNIT_US";
pub const ENV_MIN_DELAY: &str = "ORDERED_FETCH_MIN_DELAY";
pub const ENV_MAX_DELAY: &str = "ORDERED_FETCH_MAX_DELAY";

/// Invalid configuration value
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be an unsigned integer, got {value:?}")]
    NotANumber { var: &'static str, value: String },

    #[error("delay range is empty: min {min} > max {max}")]
    EmptyDelayRange { min: u64, max: u64 },
}

/// Configuration for ordered fetch operations
#[derive(Debug, Clone, Default)]
pub struct FetchConfig {
    /// Upper bound on a single fetch; `None` waits indefinitely.
    pub fetch_timeout: Option<Duration>,
}

impl FetchConfig {
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Defaults overridden by `ORDERED_FETCH_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let fetch_timeout = read_var::<u64>(ENV_FETCH_TIMEOUT_MS)?.map(Duration::from_millis);
        Ok(Self { fetch_timeout })
    }
}

/// Delay settings for the simulated provider.
///
/// Delays are drawn uniformly from `min_delay_units..=max_delay_units` and
/// scaled by `time_unit`.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub time_unit: Duration,
    pub min_delay_units: u64,
    pub max_delay_units: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_unit: Duration::from_millis(1),
            min_delay_units: 1000,
            max_delay_units: 8999,
        }
    }
}

impl SimulationConfig {
    /// Defaults overridden by `ORDERED_FETCH_TIME_UNIT_US`,
    /// `ORDERED_FETCH_MIN_DELAY` and `ORDERED_FETCH_MAX_DELAY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            time_unit: read_var::<u64>(ENV_TIME_UNIT_US)?
                .map_or(defaults.time_unit, Duration::from_micros),
            min_delay_units: read_var(ENV_MIN_DELAY)?.unwrap_or(defaults.min_delay_units),
            max_delay_units: read_var(ENV_MAX_DELAY)?.unwrap_or(defaults.max_delay_units),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_delay_units > self.max_delay_units {
            return Err(ConfigError::EmptyDelayRange {
                min: self.min_delay_units,
                max: self.max_delay_units,
            });
        }
        Ok(())
    }

    /// Scale a delay expressed in time units to a [`Duration`].
    #[must_use]
    pub fn delay(&self, units: u64) -> Duration {
        self.time_unit
            .saturating_mul(u32::try_from(units).unwrap_or(u32::MAX))
    }
}

fn read_var<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    let Ok(value) = env::var(var) else {
        return Ok(None);
    };
    let parsed = value.trim().parse::<T>();
    match parsed {
        Ok(parsed) => Ok(Some(parsed)),
        Err(_) => Err(ConfigError::NotANumber { var, value }),
    }
}
