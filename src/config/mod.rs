//! Configuration Module
//!
//! Centralized configuration for the referral service: view pagination
//! bounds and statistics tunables. All settings ship with sensible
//! defaults and can be overridden from the environment.

/// Environment variable helpers
pub mod env {
    use std::env;

    /// Get environment variable as usize with default
    pub fn get_usize(key: &str, default: usize) -> usize {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

/// Application configuration combining all service configurations
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Paginated view configuration
    pub view: ViewConfig,

    /// Hierarchy statistics configuration
    pub stats: StatsConfig,
}

/// Paginated user view configuration
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Page size applied when a query does not specify one
    pub default_page_size: usize,

    /// Upper bound on caller-supplied page sizes
    pub max_page_size: usize,
}

/// Hierarchy statistics configuration
#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// How many top referrers to surface in the stats payload
    pub top_referrers_limit: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_page_size: 25,
            max_page_size: 100,
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            top_referrers_limit: 5,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            stats: StatsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create configuration from environment variables
    ///
    /// Unset or unparseable variables fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            view: ViewConfig {
                default_page_size: env::get_usize(
                    "REFERRAL_DEFAULT_PAGE_SIZE",
                    defaults.view.default_page_size,
                ),
                max_page_size: env::get_usize(
                    "REFERRAL_MAX_PAGE_SIZE",
                    defaults.view.max_page_size,
                ),
            },
            stats: StatsConfig {
                top_referrers_limit: env::get_usize(
                    "REFERRAL_TOP_REFERRERS_LIMIT",
                    defaults.stats.top_referrers_limit,
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.view.default_page_size, 25);
        assert_eq!(config.view.max_page_size, 100);
        assert_eq!(config.stats.top_referrers_limit, 5);
    }

    #[test]
    fn test_from_env_without_overrides() {
        // None of the REFERRAL_* variables are set under test, so the
        // defaults must come back unchanged.
        let config = AppConfig::from_env();
        assert_eq!(config.view.default_page_size, 25);
        assert_eq!(config.stats.top_referrers_limit, 5);
    }
}
