//! Request-path errors and their HTTP mapping.
//!
//! Every failure is resolved at the request boundary; none of these are
//! fatal to the process.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors raised while routing or forwarding a single request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The URL matched none of the supported GitHub shapes.
    #[error("URL is not a supported GitHub resource: {0}")]
    Validation(String),

    /// The access policy refused the author/repo.
    #[error("access to {0} is not allowed")]
    Forbidden(String),

    /// The inbound body could not be read or was too large.
    #[error("request body rejected: {0}")]
    Body(String),

    /// The outbound request could not be constructed.
    #[error("invalid upstream request for {url}: {reason}")]
    Request { url: String, reason: String },

    /// Connection or read failure talking to upstream.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream produced no response headers in time.
    #[error("upstream timed out after {0} seconds")]
    Timeout(u64),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Validation(_) | ProxyError::Forbidden(_) => StatusCode::FORBIDDEN,
            ProxyError::Body(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::Request { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Transport(_) => StatusCode::BAD_GATEWAY,
            ProxyError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Label used for metrics and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            ProxyError::Validation(_) => "invalid",
            ProxyError::Forbidden(_) => "forbidden",
            ProxyError::Body(_) => "body_rejected",
            ProxyError::Request { .. } => "bad_request",
            ProxyError::Transport(_) => "transport_error",
            ProxyError::Timeout(_) => "timeout",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = match &self {
            ProxyError::Validation(_) => "Invalid input.".to_string(),
            ProxyError::Forbidden(_) => "Access denied.".to_string(),
            other => other.to_string(),
        };
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ProxyError::Validation("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(ProxyError::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(ProxyError::Body("x".into()).status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(ProxyError::Timeout(5).status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            ProxyError::Request { url: "u".into(), reason: "r".into() }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_response() {
        let response = ProxyError::Validation("https://example.com".into()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
