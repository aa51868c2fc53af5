//! Command router configuration.

use std::env;

/// Configuration for [`CommandRouter`](crate::CommandRouter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// How many times a command is re-executed after losing an
    /// optimistic-concurrency race before giving up.
    pub max_retries: u32,
}

impl RouterConfig {
    /// Loads configuration from environment variables.
    ///
    /// | Variable             | Default |
    /// |----------------------|---------|
    /// | `ROUTER_MAX_RETRIES` | `3`     |
    pub fn from_env() -> Self {
        let max_retries = env::var("ROUTER_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_RETRIES);

        Self { max_retries }
    }

    /// Overrides the retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Total number of attempts a command gets, the first one included.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

const DEFAULT_MAX_RETRIES: u32 = 3;

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = RouterConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.max_attempts(), 4);
    }

    #[test]
    fn with_max_retries_overrides_default() {
        let config = RouterConfig::default().with_max_retries(0);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.max_attempts(), 1);
    }
}
