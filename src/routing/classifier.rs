//! GitHub resource URL classification.
//!
//! # Responsibilities
//! - Recognize the six supported GitHub URL shapes
//! - Extract author (and repo) captures from the first matching shape
//!
//! # Design Decisions
//! - Patterns compiled once, shared read-only across tasks
//! - Patterns tried in a fixed order; first match wins
//! - Anchored at both ends, scheme optional
//! - No match is a normal outcome, not an error

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// The family a matched URL belongs to, in classification order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// `github.com/<author>/<repo>/(releases|archive)/...`
    ReleaseArchive,
    /// `github.com/<author>/<repo>/(blob|raw)/...`
    BlobRaw,
    /// `github.com/<author>/<repo>/(info|git-)...`
    GitProtocol,
    /// `raw.githubusercontent.com/<author>/<repo>/<ref>/<path>`
    RawContent,
    /// `gist.githubusercontent.com/<author>/<id>/<rest>`
    Gist,
    /// `github.com/<author>.keys`
    Keys,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::ReleaseArchive => "release_archive",
            PatternKind::BlobRaw => "blob_raw",
            PatternKind::GitProtocol => "git_protocol",
            PatternKind::RawContent => "raw_content",
            PatternKind::Gist => "gist",
            PatternKind::Keys => "keys",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled URL shape.
#[derive(Debug)]
pub struct UrlPattern {
    kind: PatternKind,
    regex: Regex,
}

impl UrlPattern {
    fn new(kind: PatternKind, pattern: &str) -> Self {
        Self {
            kind,
            // Patterns are literals below; a failure here is a programming error.
            regex: Regex::new(pattern).expect("invalid built-in URL pattern"),
        }
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    fn captures(&self, candidate: &str) -> Option<Vec<String>> {
        self.regex.captures(candidate).map(|caps| {
            caps.iter()
                .skip(1)
                .flatten()
                .map(|m| m.as_str().to_string())
                .collect()
        })
    }
}

static PATTERNS: LazyLock<[UrlPattern; 6]> = LazyLock::new(|| {
    [
        UrlPattern::new(
            PatternKind::ReleaseArchive,
            r"^(?:https?://)?github\.com/(?P<author>.+?)/(?P<repo>.+?)/(?:releases|archive)/.*$",
        ),
        UrlPattern::new(
            PatternKind::BlobRaw,
            r"^(?:https?://)?github\.com/(?P<author>.+?)/(?P<repo>.+?)/(?:blob|raw)/.*$",
        ),
        UrlPattern::new(
            PatternKind::GitProtocol,
            r"^(?:https?://)?github\.com/(?P<author>.+?)/(?P<repo>.+?)/(?:info|git-).*$",
        ),
        UrlPattern::new(
            PatternKind::RawContent,
            r"^(?:https?://)?raw\.(?:githubusercontent|github)\.com/(?P<author>.+?)/(?P<repo>.+?)/.+?/.+$",
        ),
        UrlPattern::new(
            PatternKind::Gist,
            r"^(?:https?://)?gist\.(?:githubusercontent|github)\.com/(?P<author>.+?)/.+?/.+$",
        ),
        UrlPattern::new(
            PatternKind::Keys,
            r"^(?:https?://)?github\.com/(?P<author>.+?)\.keys$",
        ),
    ]
});

/// The compiled patterns in classification order.
pub fn patterns() -> &'static [UrlPattern] {
    PATTERNS.as_slice()
}

/// Look up the compiled pattern for one family.
pub fn pattern(kind: PatternKind) -> &'static UrlPattern {
    // PATTERNS is laid out in PatternKind declaration order.
    &PATTERNS[kind as usize]
}

/// Outcome of classifying a candidate URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    NoMatch,
    Matched {
        kind: PatternKind,
        /// Author first, then repo where the family has one.
        captures: Vec<String>,
    },
}

impl Classification {
    pub fn is_match(&self) -> bool {
        matches!(self, Classification::Matched { .. })
    }

    pub fn kind(&self) -> Option<PatternKind> {
        match self {
            Classification::Matched { kind, .. } => Some(*kind),
            Classification::NoMatch => None,
        }
    }

    pub fn author(&self) -> Option<&str> {
        self.capture(0)
    }

    pub fn repo(&self) -> Option<&str> {
        self.capture(1)
    }

    fn capture(&self, index: usize) -> Option<&str> {
        match self {
            Classification::Matched { captures, .. } => captures.get(index).map(String::as_str),
            Classification::NoMatch => None,
        }
    }
}

/// Classify an already-normalized URL against the supported GitHub shapes.
pub fn classify(candidate: &str) -> Classification {
    for pattern in patterns() {
        if let Some(captures) = pattern.captures(candidate) {
            return Classification::Matched {
                kind: pattern.kind,
                captures,
            };
        }
    }
    Classification::NoMatch
}
