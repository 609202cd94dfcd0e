//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the GitHub proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Forwarding policy (mirror, size ceiling, redirects).
    pub proxy: ForwardingConfig,

    /// Outbound client timeouts and pool settings.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host to listen on.
    pub host: String,

    /// Port to listen on.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` form accepted by `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Forwarding policy applied to every proxied request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Redirect blob URLs to cdn.jsdelivr.net instead of proxying them.
    pub jsdelivr: bool,

    /// Largest upstream `Content-Length` the proxy streams itself, in bytes.
    /// Anything larger is handed back to the client as a redirect.
    pub size_limit: u64,

    /// Maximum number of upstream fetches per request while chasing redirects.
    pub max_redirects: u32,

    /// Inspect upstream redirects (rewrite or chase). When false the first
    /// upstream response is relayed untouched.
    pub follow_redirects: bool,

    /// Maximum inbound request body buffered for forwarding, in bytes.
    pub max_request_body: usize,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            jsdelivr: false,
            size_limit: 1024 * 1024 * 1024 * 999,
            max_redirects: 10,
            follow_redirects: true,
            max_request_body: 64 * 1024 * 1024,
        }
    }
}

/// Outbound client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Maximum idle time between reads of an upstream body, in seconds.
    pub read_timeout_secs: u64,

    /// Time allowed for each hop to produce response headers, in seconds.
    pub request_timeout_secs: u64,

    /// Idle connections kept per upstream host.
    pub pool_max_idle_per_host: usize,

    /// Idle connection expiry in seconds.
    pub pool_idle_timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn pool_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            read_timeout_secs: 60,
            request_timeout_secs: 30,
            pool_max_idle_per_host: 32,
            pool_idle_timeout_secs: 90,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.listener.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.proxy.max_redirects, 10);
        assert_eq!(config.proxy.size_limit, 999 * 1024 * 1024 * 1024);
        assert!(!config.proxy.jsdelivr);
        assert!(config.proxy.follow_redirects);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [listener]
            port = 9000

            [proxy]
            jsdelivr = true
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.host, "0.0.0.0");
        assert_eq!(config.listener.port, 9000);
        assert!(config.proxy.jsdelivr);
        assert_eq!(config.proxy.max_redirects, 10);
        assert_eq!(config.upstream.pool_max_idle_per_host, 32);
    }
}
