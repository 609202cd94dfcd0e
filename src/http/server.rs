//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, timeout)
//! - Bind server to listener
//! - Dispatch requests to the routing layer and the forwarder

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ForwardingConfig, ProxyConfig};
use crate::error::ProxyError;
use crate::http::assets;
use crate::http::forwarder::Forwarder;
use crate::http::request::{request_id, MakeRequestUuidV4, ProxyRequest};
use crate::http::response::ProxyResponse;
use crate::lifecycle::shutdown_signal;
use crate::observability::metrics;
use crate::routing::{RouteDecision, Router as ProxyRouter};
use crate::security::{AccessPolicy, AllowAll};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub forwarder: Arc<Forwarder>,
    pub forwarding: ForwardingConfig,
}

/// HTTP server for the GitHub proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server that allows every author and repo.
    pub fn new(config: ProxyConfig) -> Result<Self, ProxyError> {
        Self::with_policy(config, Arc::new(AllowAll))
    }

    /// Create a new HTTP server with an access policy.
    pub fn with_policy(config: ProxyConfig, policy: Arc<dyn AccessPolicy>) -> Result<Self, ProxyError> {
        let proxy_router = Arc::new(ProxyRouter::with_policy(config.proxy.jsdelivr, policy));
        let forwarder = Arc::new(Forwarder::new(&config.proxy, &config.upstream)?);

        let state = AppState {
            router: proxy_router,
            forwarder,
            forwarding: config.proxy.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        // Covers body buffering plus every redirect hop.
        let hops = u64::from(config.proxy.max_redirects) + 1;
        let deadline = Duration::from_secs(config.upstream.request_timeout_secs.saturating_mul(hops));

        Router::new()
            .route("/", get(assets::index))
            .route("/favicon.ico", get(assets::favicon))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(StatusCode::GATEWAY_TIMEOUT, deadline))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The router, for embedding or driving with `tower::ServiceExt`.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server until a signal or `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            jsdelivr = self.config.proxy.jsdelivr,
            size_limit = self.config.proxy.size_limit,
            max_redirects = self.config.proxy.max_redirects,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler: route, then mirror or forward.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let method = request.method().to_string();

    log_client_info(&request, &request_id);

    match serve(&state, request).await {
        Ok((response, outcome)) => {
            metrics::record_request(&method, response.status.as_u16(), outcome, start_time);
            response.into_response()
        }
        Err(e) => {
            match e.status() {
                StatusCode::FORBIDDEN => {
                    tracing::warn!(request_id = %request_id, error = %e, "Request rejected")
                }
                _ => tracing::error!(request_id = %request_id, error = %e, "Request failed"),
            }
            metrics::record_request(&method, e.status().as_u16(), e.outcome(), start_time);
            e.into_response()
        }
    }
}

async fn serve(state: &AppState, request: Request<Body>) -> Result<(ProxyResponse, &'static str), ProxyError> {
    let uri = request.uri().clone();
    let decision = state.router.route(uri.path(), uri.query())?;

    match decision {
        RouteDecision::Mirror { location } => {
            tracing::debug!(location = %location, "Redirecting to jsDelivr mirror");
            Ok((ProxyResponse::redirect(&location)?, "mirror"))
        }
        RouteDecision::Forward { target, kind } => {
            tracing::debug!(target_url = %target, kind = %kind, "Forwarding request");
            let proxied = ProxyRequest::from_request(
                request,
                state.forwarding.max_request_body,
                state.forwarding.follow_redirects,
            )
            .await?;
            let response = state.forwarder.forward(&target, &proxied).await?;
            Ok((response, "proxied"))
        }
    }
}

fn log_client_info(request: &Request<Body>, request_id: &str) {
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let forwarded_for = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    tracing::debug!(
        request_id = %request_id,
        remote_addr = %remote_addr,
        x_forwarded_for = %forwarded_for,
        method = %request.method(),
        request_url = %request.uri(),
        "Client info"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;
    use tower::ServiceExt;

    fn router(config: ProxyConfig) -> Router {
        HttpServer::new(config).unwrap().into_router()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_url_forbidden() {
        let response = router(ProxyConfig::default())
            .oneshot(get("/https://gitlab.com/acme/tool/-/raw/main/x"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get("x-request-id").is_some());
    }

    #[tokio::test]
    async fn test_mirror_bypasses_forwarder() {
        let mut config = ProxyConfig::default();
        config.proxy.jsdelivr = true;

        let response = router(config)
            .oneshot(get("/https://github.com/acme/tool/blob/main/x.go"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://cdn.jsdelivr.net/gh/acme/tool@main/x.go"
        );
    }

    #[tokio::test]
    async fn test_denied_by_policy() {
        use crate::security::PolicyFn;

        let policy = PolicyFn(|author: &str, _: Option<&str>| author != "blocked");
        let router = HttpServer::with_policy(ProxyConfig::default(), Arc::new(policy))
            .unwrap()
            .into_router();

        let response = router
            .oneshot(get("/github.com/blocked/tool/releases/download/v1/a.bin"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = axum::body::to_bytes(response.into_body(), 64).await.unwrap();
        assert_eq!(&body[..], b"Access denied.");
    }
}
