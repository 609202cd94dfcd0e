//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, handlers)
//!     → routing layer (normalize, classify, mirror or forward)
//!     → request.rs (buffer body, filter headers)
//!     → forwarder.rs (outbound fetch, size ceiling, redirect loop)
//!     → response.rs (relay status, headers, streamed body)
//!     → Send to client
//! ```

pub mod assets;
pub mod client;
pub mod forwarder;
pub mod request;
pub mod response;
pub mod server;

pub use forwarder::Forwarder;
pub use request::{MakeRequestUuidV4, ProxyRequest, X_REQUEST_ID};
pub use response::ProxyResponse;
pub use server::HttpServer;
