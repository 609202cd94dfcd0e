//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Raw inbound path (+ query)
//!     → normalize.rs (strip separator, add scheme, repair `https:/`)
//!     → classifier.rs (six GitHub URL shapes, first match wins)
//!     → security::AccessPolicy (author, repo)
//!     → router.rs: Mirror(jsDelivr location) | Forward(target)
//!     → rewrite.rs (blob → raw before forwarding)
//! ```
//!
//! # Design Decisions
//! - Patterns compiled once, immutable at runtime
//! - Deterministic: same input always yields the same decision
//! - First match wins (fixed pattern order)

pub mod classifier;
pub mod normalize;
pub mod rewrite;
pub mod router;

pub use classifier::{classify, Classification, PatternKind};
pub use normalize::normalize_path;
pub use router::{RouteDecision, Router};
