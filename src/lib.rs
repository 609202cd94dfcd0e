//! GitHub resource forwarding proxy library.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use http::{Forwarder, HttpServer, ProxyRequest, ProxyResponse};
pub use lifecycle::Shutdown;
pub use routing::{classify, Classification, PatternKind};
