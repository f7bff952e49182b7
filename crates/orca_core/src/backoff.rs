use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("minimum poll interval must be greater than zero")]
    ZeroInterval,
    #[error("minimum poll interval {min:?} exceeds maximum {max:?}")]
    InvertedBounds { min: Duration, max: Duration },
    #[error("invalid api base url: {0}")]
    BaseUrl(String),
}

/// Bounds for the adaptive poll interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    min_interval: Duration,
    max_interval: Duration,
}

impl PollSettings {
    pub fn new(min_interval: Duration, max_interval: Duration) -> Result<Self, ConfigError> {
        if min_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if min_interval > max_interval {
            return Err(ConfigError::InvertedBounds {
                min: min_interval,
                max: max_interval,
            });
        }
        Ok(Self {
            min_interval,
            max_interval,
        })
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn max_interval(&self) -> Duration {
        self.max_interval
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_secs(2),
            max_interval: Duration::from_secs(64),
        }
    }
}

/// Exponential backoff over `[min_interval, max_interval]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    settings: PollSettings,
    current: Duration,
}

impl Backoff {
    pub fn new(settings: PollSettings) -> Self {
        Self {
            settings,
            current: settings.min_interval,
        }
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    /// Back to the minimum; used after an observed change or a user mutation.
    pub fn reset(&mut self) -> Duration {
        self.current = self.settings.min_interval;
        self.current
    }

    /// Doubles the interval, capped at the maximum.
    pub fn grow(&mut self) -> Duration {
        self.current = self
            .current
            .saturating_mul(2)
            .min(self.settings.max_interval);
        self.current
    }
}
