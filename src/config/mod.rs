//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CLI flag overrides (main.rs)
//!     → ProxyConfig (validated, immutable)
//!     → copied into the router and forwarder at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{ForwardingConfig, ListenerConfig, ObservabilityConfig, ProxyConfig, UpstreamConfig};
pub use validation::{validate_config, ValidationError};
