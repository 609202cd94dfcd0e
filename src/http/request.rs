//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every inbound request
//! - Buffer the inbound body so it can be replayed on each redirect hop
//! - Prepare the header set sent upstream
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - `Host` is never forwarded; the client derives it from the target URL
//! - The request ID stays between the client and the proxy
//! - Framing headers are dropped because the body is re-framed

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::error::ProxyError;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Inbound headers that never travel upstream.
const NOT_FORWARDED: [HeaderName; 5] = [
    header::HOST,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::CONNECTION,
    HeaderName::from_static(X_REQUEST_ID),
];

/// Generates UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request ID stamped by the request-id layer.
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Everything the forwarding engine needs from an inbound request.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Inspect upstream 3xx responses (rewrite or chase the location).
    pub allow_redirects: bool,
}

impl ProxyRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            allow_redirects: true,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn allow_redirects(mut self, allow: bool) -> Self {
        self.allow_redirects = allow;
        self
    }

    /// Take apart an axum request, buffering at most `max_body` bytes.
    pub async fn from_request(
        request: Request<Body>,
        max_body: usize,
        allow_redirects: bool,
    ) -> Result<Self, ProxyError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, max_body)
            .await
            .map_err(|e| ProxyError::Body(e.to_string()))?;

        Ok(Self {
            method: parts.method,
            headers: parts.headers,
            body,
            allow_redirects,
        })
    }

    /// Headers to send upstream: every inbound value except `Host` and framing.
    pub fn outbound_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in self.headers.iter() {
            if !NOT_FORWARDED.contains(name) {
                headers.append(name.clone(), value.clone());
            }
        }
        headers
    }
}
