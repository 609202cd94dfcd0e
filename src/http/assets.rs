//! Embedded landing page and favicon handlers.

use axum::{
    extract::Query,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::http::response::ProxyResponse;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    q: Option<String>,
}

/// `GET /`: the landing page, or a redirect into the proxy for `?q=<url>`.
pub async fn index(Query(query): Query<IndexQuery>) -> Response {
    if let Some(q) = query.q.filter(|q| !q.trim().is_empty()) {
        let location = format!("/{}", q.trim().trim_start_matches('/'));
        return match ProxyResponse::redirect(&location) {
            Ok(redirect) => redirect.into_response(),
            Err(e) => e.into_response(),
        };
    }

    let mut response = INDEX_HTML.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    response
}

/// `GET /favicon.ico`: no icon is bundled.
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}
