//! The forwarding engine.
//!
//! # Responsibilities
//! - Build the outbound request from the inbound one
//! - Hand oversized payloads back to the client as a redirect
//! - Re-validate upstream redirects: rewrite known GitHub locations onto the
//!   proxy, chase everything else server-side
//! - Relay the final response without buffering the body
//!
//! # Design Decisions
//! - Redirect chasing is a bounded loop; hops run strictly in sequence
//! - Every hop waits at most `request_timeout` for response headers
//! - No retries: a failed hop fails the request
//! - Dropping the returned future abandons the in-flight hop

use std::time::Duration;

use axum::http::header;
use reqwest::Client;
use tokio::time;
use url::Url;

use crate::config::{ForwardingConfig, UpstreamConfig};
use crate::error::ProxyError;
use crate::http::client::build_client;
use crate::http::request::ProxyRequest;
use crate::http::response::ProxyResponse;
use crate::observability::metrics;
use crate::routing::classifier::classify;
use crate::routing::rewrite::proxy_relative;

/// Executes proxied fetches against upstream hosts.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client,
    size_limit: u64,
    max_redirects: u32,
    request_timeout: Duration,
}

impl Forwarder {
    /// Create a forwarder with its own pooled client.
    pub fn new(forwarding: &ForwardingConfig, upstream: &UpstreamConfig) -> Result<Self, ProxyError> {
        let client = build_client(upstream)?;
        Ok(Self::with_client(client, forwarding, upstream))
    }

    /// Create a forwarder around an existing client.
    ///
    /// The client must not follow redirects on its own.
    pub fn with_client(client: Client, forwarding: &ForwardingConfig, upstream: &UpstreamConfig) -> Self {
        Self {
            client,
            size_limit: forwarding.size_limit,
            max_redirects: forwarding.max_redirects.max(1),
            request_timeout: upstream.request_timeout(),
        }
    }

    /// Fetch `target` on behalf of `request` and produce the response to relay.
    ///
    /// `target` must already be a classified URL (or the location of a
    /// previous hop).
    pub async fn forward(&self, target: &str, request: &ProxyRequest) -> Result<ProxyResponse, ProxyError> {
        let mut current = Url::parse(target).map_err(|e| ProxyError::Request {
            url: target.to_string(),
            reason: e.to_string(),
        })?;
        let headers = request.outbound_headers();
        let mut hops: u32 = 0;

        loop {
            hops += 1;
            tracing::debug!(target_url = %current, hop = hops, method = %request.method, "Proxy to");

            let upstream = self.fetch(&current, request, &headers).await?;
            metrics::record_redirect_hop(upstream.status().as_u16());

            if let Some(length) = declared_length(&upstream) {
                if length > self.size_limit {
                    tracing::info!(
                        target_url = %current,
                        content_length = length,
                        size_limit = self.size_limit,
                        "Payload above size limit, redirecting client upstream"
                    );
                    metrics::record_size_redirect();
                    return ProxyResponse::redirect(current.as_str());
                }
            }

            if !request.allow_redirects || !upstream.status().is_redirection() {
                return Ok(ProxyResponse::from_upstream(upstream));
            }

            let location = upstream
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let Some(location) = location else {
                return Ok(ProxyResponse::from_upstream(upstream));
            };

            let next = match current.join(&location) {
                Ok(next) => next,
                Err(e) => {
                    tracing::warn!(location = %location, error = %e, "Unparseable upstream Location, relaying as-is");
                    return Ok(ProxyResponse::from_upstream(upstream));
                }
            };

            if let Some(relative) = reentry_location(&next) {
                tracing::debug!(location = %next, rewritten = %relative, "Redirect re-enters proxy");
                let mut response = ProxyResponse::from_upstream(upstream);
                response.set_location(&relative)?;
                return Ok(response);
            }

            if hops >= self.max_redirects {
                tracing::warn!(
                    target_url = %current,
                    location = %next,
                    hops = hops,
                    "Redirect hop limit reached, relaying last response"
                );
                return Ok(ProxyResponse::from_upstream(upstream));
            }

            tracing::debug!(from = %current, to = %next, hop = hops, "Following upstream redirect");
            current = next;
        }
    }

    async fn fetch(
        &self,
        url: &Url,
        request: &ProxyRequest,
        headers: &axum::http::HeaderMap,
    ) -> Result<reqwest::Response, ProxyError> {
        let mut builder = self
            .client
            .request(request.method.clone(), url.clone())
            .headers(headers.clone());
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }
        let outbound = builder.build().map_err(|e| ProxyError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        match time::timeout(self.request_timeout, self.client.execute(outbound)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => {
                tracing::error!(target_url = %url, error = %e, "Upstream error");
                Err(ProxyError::Transport(e))
            }
            Err(_) => {
                tracing::error!(target_url = %url, timeout = ?self.request_timeout, "Upstream timeout");
                Err(ProxyError::Timeout(self.request_timeout.as_secs()))
            }
        }
    }
}

/// The proxy-relative location for a redirect target the proxy itself serves.
fn reentry_location(next: &Url) -> Option<String> {
    classify(next.as_str())
        .is_match()
        .then(|| proxy_relative(next.as_str()))
}

/// The upstream `Content-Length`, when present and numeric.
fn declared_length(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
