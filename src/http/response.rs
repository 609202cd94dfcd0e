//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay upstream status, headers and body to the client
//! - Build the proxy's own redirect responses
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Repeated upstream headers are appended, never overwritten
//! - Connection-level headers are left to the server layer

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::ProxyError;

/// Upstream headers that describe the upstream connection, not the payload.
const CONNECTION_HEADERS: [HeaderName; 3] = [
    header::CONNECTION,
    header::TRANSFER_ENCODING,
    HeaderName::from_static("keep-alive"),
];

/// A response ready to relay to the client.
#[derive(Debug)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Body,
}

impl ProxyResponse {
    /// `302 Found` pointing at `location`, with an empty body.
    pub fn redirect(location: &str) -> Result<Self, ProxyError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::LOCATION, location_value(location)?);
        Ok(Self {
            status: StatusCode::FOUND,
            headers,
            body: Body::empty(),
        })
    }

    /// Wrap an upstream response, streaming its body.
    pub fn from_upstream(upstream: reqwest::Response) -> Self {
        let status = upstream.status();
        let headers = relay_headers(upstream.headers());
        let body = Body::from_stream(upstream.bytes_stream());
        Self { status, headers, body }
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Replace the `Location` header.
    pub fn set_location(&mut self, location: &str) -> Result<(), ProxyError> {
        self.headers.insert(header::LOCATION, location_value(location)?);
        Ok(())
    }

    /// Collect the body. Intended for small responses and tests.
    pub async fn into_bytes(self, limit: usize) -> Result<Bytes, axum::Error> {
        axum::body::to_bytes(self.body, limit).await
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(self.body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Copy upstream headers with multimap semantics, minus connection headers.
pub fn relay_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream.iter() {
        if !CONNECTION_HEADERS.contains(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}

fn location_value(location: &str) -> Result<HeaderValue, ProxyError> {
    HeaderValue::from_str(location).map_err(|e| ProxyError::Request {
        url: location.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect() {
        let response = ProxyResponse::redirect("https://cdn.jsdelivr.net/gh/a/b@main/c").unwrap();
        assert_eq!(response.status, StatusCode::FOUND);
        assert_eq!(response.location(), Some("https://cdn.jsdelivr.net/gh/a/b@main/c"));
    }

    #[test]
    fn test_redirect_rejects_control_characters() {
        assert!(ProxyResponse::redirect("https://x/\n").is_err());
    }

    #[test]
    fn test_relay_headers_keeps_repeats() {
        let mut upstream = HeaderMap::new();
        upstream.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        upstream.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));
        upstream.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        upstream.insert("keep-alive", HeaderValue::from_static("timeout=5, max=100"));
        upstream.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let relayed = relay_headers(&upstream);
        let cookies: Vec<_> = relayed.get_all(header::SET_COOKIE).iter().collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
        assert!(relayed.get(header::TRANSFER_ENCODING).is_none());
        assert!(relayed.get("keep-alive").is_none());
        assert_eq!(relayed.get(header::CONTENT_TYPE).unwrap(), "text/plain");
    }

    #[tokio::test]
    async fn test_into_response() {
        let mut proxied = ProxyResponse::redirect("/github.com/a/b/releases/x").unwrap();
        proxied.body = Body::from("moved");
        let response = proxied.into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/github.com/a/b/releases/x"
        );
        let body = axum::body::to_bytes(response.into_body(), 64).await.unwrap();
        assert_eq!(&body[..], b"moved");
    }
}
