//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;

use ghproxy::config::{ForwardingConfig, ProxyConfig, UpstreamConfig};
use ghproxy::http::{Forwarder, HttpServer};
use ghproxy::lifecycle::Shutdown;

pub const RELEASE_URL: &str = "https://github.com/acme/tool/releases/download/v1/file.bin";

/// Request counters observed by the mock upstream.
#[derive(Clone, Default)]
pub struct Hits {
    pub loop_hops: Arc<AtomicU32>,
}

impl Hits {
    pub fn loop_hops(&self) -> u32 {
        self.loop_hops.load(Ordering::SeqCst)
    }
}

async fn cookies() -> impl IntoResponse {
    (
        AppendHeaders([
            (header::SET_COOKIE, "session=abc"),
            (header::SET_COOKIE, "theme=dark"),
            (header::HeaderName::from_static("keep-alive"), "timeout=5, max=100"),
        ]),
        "hello",
    )
}

async fn big() -> impl IntoResponse {
    vec![b'x'; 4096]
}

async fn moved() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, RELEASE_URL)])
}

async fn hop() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/final")])
}

async fn final_stop() -> impl IntoResponse {
    "done"
}

async fn redirect_loop(State(hits): State<Hits>, Path(n): Path<u32>) -> impl IntoResponse {
    hits.loop_hops.fetch_add(1, Ordering::SeqCst);
    (StatusCode::FOUND, [(header::LOCATION, format!("/loop/{}", n + 1))])
}

/// Echoes what the upstream saw: method and body, selected headers.
async fn echo(method: axum::http::Method, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let seen_host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let seen_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    (
        [
            ("x-seen-method", method.to_string()),
            ("x-seen-host", seen_host),
            ("x-seen-agent", seen_agent),
        ],
        body,
    )
}

async fn slow() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "late"
}

/// Start the mock upstream on an ephemeral port.
pub async fn start_upstream() -> (SocketAddr, Hits) {
    let hits = Hits::default();
    let app = Router::new()
        .route("/cookies", get(cookies))
        .route("/big", get(big))
        .route("/moved", get(moved))
        .route("/hop", get(hop))
        .route("/final", get(final_stop))
        .route("/loop/{n}", get(redirect_loop))
        .route("/echo", any(echo))
        .route("/slow", get(slow))
        .with_state(hits.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, hits)
}

pub fn forwarder(size_limit: u64, max_redirects: u32) -> Forwarder {
    let forwarding = ForwardingConfig {
        size_limit,
        max_redirects,
        ..ForwardingConfig::default()
    };
    let upstream = UpstreamConfig {
        request_timeout_secs: 1,
        ..UpstreamConfig::default()
    };
    Forwarder::with_client(client(), &forwarding, &upstream)
}

/// Start the proxy itself on an ephemeral port.
pub async fn start_proxy(mut config: ProxyConfig) -> (SocketAddr, Shutdown) {
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;

    let listener = TcpListener::bind(config.listener.bind_address()).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    (addr, shutdown)
}

/// A client that never follows redirects, so tests see the proxy's own 3xx.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
