//! Access control for classified requests.
//!
//! Evaluated after classification with the captured author and repo.
//! The proxy ships only [`AllowAll`]; embedders inject their own policy.

use std::fmt;

/// Decides whether a GitHub author/repo may be proxied.
pub trait AccessPolicy: Send + Sync + fmt::Debug {
    /// `repo` is `None` for families without one (gists, keys).
    fn is_allowed(&self, author: &str, repo: Option<&str>) -> bool;
}

/// Permits every author and repo.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn is_allowed(&self, _author: &str, _repo: Option<&str>) -> bool {
        true
    }
}

/// Adapts a closure into an [`AccessPolicy`].
pub struct PolicyFn<F>(pub F);

impl<F> fmt::Debug for PolicyFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PolicyFn")
    }
}

impl<F> AccessPolicy for PolicyFn<F>
where
    F: Fn(&str, Option<&str>) -> bool + Send + Sync,
{
    fn is_allowed(&self, author: &str, repo: Option<&str>) -> bool {
        (self.0)(author, repo)
    }
}
