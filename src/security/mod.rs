//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Classified request (author, repo):
//!     → access_control.rs (injected AccessPolicy)
//!     → Pass to rewrite / forwarding
//! ```
//!
//! # Design Decisions
//! - No built-in allow/deny lists; policy is a trait object
//! - Fail closed: a refused author/repo is rejected with 403

pub mod access_control;

pub use access_control::{AccessPolicy, AllowAll, PolicyFn};
