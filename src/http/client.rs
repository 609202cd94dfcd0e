//! Outbound HTTP client.
//!
//! One pooled client per process, shared by every forwarding call. Redirects
//! are never followed by the client itself; the forwarder runs its own loop.

use reqwest::{redirect, Client};

use crate::config::UpstreamConfig;
use crate::error::ProxyError;

/// Build the shared upstream client from configuration.
pub fn build_client(config: &UpstreamConfig) -> Result<Client, ProxyError> {
    Client::builder()
        .redirect(redirect::Policy::none())
        .connect_timeout(config.connect_timeout())
        .read_timeout(config.read_timeout())
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .pool_idle_timeout(config.pool_idle_timeout())
        .tcp_nodelay(true)
        .build()
        .map_err(|e| ProxyError::Request {
            url: "<client>".to_string(),
            reason: format!("failed to build upstream client: {}", e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_default_client() {
        assert!(build_client(&UpstreamConfig::default()).is_ok());
    }
}
