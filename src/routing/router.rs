//! Route decision for an inbound path.
//!
//! # Responsibilities
//! - Normalize the raw path into a candidate URL
//! - Classify it and apply the access policy
//! - Choose between the jsDelivr mirror and forwarding
//! - Apply the blob-to-raw rewrite on the forwarding path
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Pure apart from logging: no I/O
//! - Explicit rejection rather than silent default

use std::sync::Arc;

use crate::error::ProxyError;
use crate::routing::classifier::{classify, Classification, PatternKind};
use crate::routing::normalize::{normalize_path, with_query};
use crate::routing::rewrite::{blob_to_raw, jsdelivr_mirror};
use crate::security::{AccessPolicy, AllowAll};

/// What to do with an accepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Redirect the client to the CDN mirror; nothing is fetched.
    Mirror { location: String },
    /// Hand the target to the forwarding engine.
    Forward { target: String, kind: PatternKind },
}

/// Maps inbound paths to route decisions.
#[derive(Debug, Clone)]
pub struct Router {
    jsdelivr: bool,
    policy: Arc<dyn AccessPolicy>,
}

impl Router {
    pub fn new(jsdelivr: bool) -> Self {
        Self::with_policy(jsdelivr, Arc::new(AllowAll))
    }

    pub fn with_policy(jsdelivr: bool, policy: Arc<dyn AccessPolicy>) -> Self {
        Self { jsdelivr, policy }
    }

    /// Decide how to serve `raw_path` (everything after the proxy host).
    pub fn route(&self, raw_path: &str, query: Option<&str>) -> Result<RouteDecision, ProxyError> {
        let candidate = with_query(normalize_path(raw_path), query);

        let classification = classify(&candidate);
        let (kind, author, repo) = match &classification {
            Classification::Matched { kind, .. } => (
                *kind,
                classification.author().unwrap_or_default(),
                classification.repo(),
            ),
            Classification::NoMatch => {
                tracing::debug!(candidate = %candidate, "URL matched no GitHub pattern");
                return Err(ProxyError::Validation(candidate));
            }
        };

        if !self.policy.is_allowed(author, repo) {
            tracing::warn!(author = %author, repo = ?repo, "Access policy refused request");
            return Err(ProxyError::Forbidden(candidate));
        }

        if kind != PatternKind::BlobRaw {
            return Ok(RouteDecision::Forward { target: candidate, kind });
        }

        if self.jsdelivr {
            if let Some(location) = jsdelivr_mirror(&candidate) {
                return Ok(RouteDecision::Mirror { location });
            }
        }

        Ok(RouteDecision::Forward {
            target: blob_to_raw(&candidate),
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::PolicyFn;

    #[test]
    fn test_blob_is_rewritten_to_raw() {
        let router = Router::new(false);
        let decision = router
            .route("/https://github.com/acme/tool/blob/main/x.go", None)
            .unwrap();
        assert_eq!(
            decision,
            RouteDecision::Forward {
                target: "https://github.com/acme/tool/raw/main/x.go".into(),
                kind: PatternKind::BlobRaw,
            }
        );
    }

    #[test]
    fn test_mirror_shortcut() {
        let router = Router::new(true);
        let decision = router
            .route("/github.com/acme/tool/blob/main/x.go", None)
            .unwrap();
        assert_eq!(
            decision,
            RouteDecision::Mirror {
                location: "https://cdn.jsdelivr.net/gh/acme/tool@main/x.go".into(),
            }
        );
    }

    #[test]
    fn test_mirror_only_applies_to_blobs() {
        let router = Router::new(true);
        let decision = router
            .route("/github.com/acme/tool/releases/download/v1/file.bin", None)
            .unwrap();
        assert_eq!(
            decision,
            RouteDecision::Forward {
                target: "https://github.com/acme/tool/releases/download/v1/file.bin".into(),
                kind: PatternKind::ReleaseArchive,
            }
        );
    }

    #[test]
    fn test_collapsed_scheme_and_query() {
        let router = Router::new(false);
        let decision = router
            .route("/https:/github.com/acme/tool/info/refs", Some("service=git-upload-pack"))
            .unwrap();
        assert_eq!(
            decision,
            RouteDecision::Forward {
                target: "https://github.com/acme/tool/info/refs?service=git-upload-pack".into(),
                kind: PatternKind::GitProtocol,
            }
        );
    }

    #[test]
    fn test_unknown_url_rejected() {
        let router = Router::new(false);
        let err = router.route("/example.com/whatever", None).unwrap_err();
        assert!(matches!(err, ProxyError::Validation(_)));
    }

    #[test]
    fn test_policy_refusal() {
        let policy = PolicyFn(|author: &str, _: Option<&str>| author != "blocked");
        let router = Router::with_policy(false, Arc::new(policy));

        assert!(router.route("/github.com/acme/tool/releases/x", None).is_ok());
        let err = router.route("/github.com/blocked/tool/releases/x", None).unwrap_err();
        assert!(matches!(err, ProxyError::Forbidden(_)));
    }
}
