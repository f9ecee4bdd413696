//! Configuration for exploration sessions.
//!
//! Loaded from (in priority order):
//! 1. Environment variables (GRAPHLENS prefix)
//! 2. Config file (graphlens.toml)
//! 3. Defaults

use serde::Deserialize;

/// Tunables for one exploration session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExploreConfig {
    /// Base URL of the remote query endpoint.
    pub endpoint: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Row cap applied to every expansion query, bounding results on
    /// high-degree nodes.
    pub expansion_limit: u32,
    /// Tables whose name starts with this prefix are internal to the store
    /// and skipped during schema introspection.
    pub reserved_prefix: String,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000".to_string(),
            request_timeout_secs: 30,
            expansion_limit: 20,
            reserved_prefix: "_".to_string(),
        }
    }
}

impl ExploreConfig {
    /// Load configuration from `<file_prefix>.toml` and the environment,
    /// falling back to defaults when neither source is usable.
    pub fn load(file_prefix: &str) -> Self {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("GRAPHLENS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build();

        match cfg.and_then(|c| c.try_deserialize()) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(error = %e, "no usable config source, using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExploreConfig::default();
        assert_eq!(config.endpoint, "http://localhost:8000");
        assert_eq!(config.expansion_limit, 20);
        assert_eq!(config.reserved_prefix, "_");
    }

    #[test]
    fn test_load_without_sources_uses_defaults() {
        let config = ExploreConfig::load("graphlens-nonexistent-test");
        assert_eq!(config.expansion_limit, ExploreConfig::default().expansion_limit);
    }
}
