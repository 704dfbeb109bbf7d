//! Configuration management for the validation API
//!
//! Configuration is layered with figment: compiled-in defaults, an optional
//! `Config.toml`, then environment variables prefixed `MAILGRADE_`.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub engine: EngineSection,
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Validation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    /// Per-lookup DNS timeout in milliseconds
    pub dns_timeout_ms: u64,
    /// DNS lookup attempts
    pub dns_attempts: usize,
    /// Domain-record cache TTL in milliseconds
    pub dns_cache_ttl_ms: u64,
    /// Concurrent workers per bulk batch
    pub worker_concurrency: usize,
    /// Catch-all probe timeout in milliseconds
    pub probe_timeout_ms: u64,
    /// Minimum interval between probes of one domain, in milliseconds
    pub probe_min_interval_ms: u64,
    /// Enable the live SMTP catch-all probe
    pub enable_catch_all_probe: bool,
}

impl Default for EngineSection {
    fn default() -> Self {
        let defaults = mailgrade_core::EngineConfig::default();
        Self {
            dns_timeout_ms: defaults.dns_timeout_ms,
            dns_attempts: defaults.dns_attempts,
            dns_cache_ttl_ms: defaults.dns_cache_ttl_ms,
            worker_concurrency: defaults.worker_concurrency,
            probe_timeout_ms: defaults.probe_timeout_ms,
            probe_min_interval_ms: defaults.probe_min_interval_ms,
            enable_catch_all_probe: defaults.enable_catch_all_probe,
        }
    }
}

impl From<&EngineSection> for mailgrade_core::EngineConfig {
    fn from(section: &EngineSection) -> Self {
        Self {
            dns_timeout_ms: section.dns_timeout_ms,
            dns_attempts: section.dns_attempts,
            dns_cache_ttl_ms: section.dns_cache_ttl_ms,
            worker_concurrency: section.worker_concurrency,
            probe_timeout_ms: section.probe_timeout_ms,
            probe_min_interval_ms: section.probe_min_interval_ms,
            enable_catch_all_probe: section.enable_catch_all_probe,
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Enable JSON structured logging
    pub json_logs: bool,
    /// Log level filter
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            json_logs: false,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.engine.dns_timeout_ms, 3000);
        assert_eq!(config.engine.dns_cache_ttl_ms, 60_000);
        assert_eq!(config.engine.worker_concurrency, 10);
        assert!(!config.engine.enable_catch_all_probe);
        assert!(!config.observability.json_logs);
    }

    #[test]
    fn engine_section_maps_onto_core_config() {
        let section = EngineSection {
            worker_concurrency: 20,
            ..EngineSection::default()
        };
        let core: mailgrade_core::EngineConfig = (&section).into();
        assert_eq!(core.worker_concurrency, 20);
        assert_eq!(core.dns_timeout_ms, section.dns_timeout_ms);
    }
}
