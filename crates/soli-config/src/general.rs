//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default result limit for list queries.
const fn default_limit() -> u32 {
    50
}

/// Hard cap callers cannot exceed.
const fn max_limit() -> u32 {
    500
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default page size for list queries when the caller passes none.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Upper bound a caller-supplied limit is clamped to.
    #[serde(default = "max_limit")]
    pub max_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: max_limit(),
        }
    }
}

impl GeneralConfig {
    /// Resolves a caller-supplied limit against the defaults.
    #[must_use]
    pub fn clamp_limit(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.default_limit, 50);
        assert_eq!(config.max_limit, 500);
    }

    #[test]
    fn clamps_limits() {
        let config = GeneralConfig::default();
        assert_eq!(config.clamp_limit(None), 50);
        assert_eq!(config.clamp_limit(Some(10)), 10);
        assert_eq!(config.clamp_limit(Some(10_000)), 500);
    }
}
