//! URL rewrites applied around forwarding.

use std::sync::LazyLock;

use regex::Regex;

const JSDELIVR_BASE: &str = "https://cdn.jsdelivr.net/gh";

static BLOB_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?github\.com/(?P<author>.+?)/(?P<repo>.+?)/(?:blob|raw)/(?P<reference>[^/]+)/(?P<path>.*)$",
    )
    .expect("invalid built-in blob pattern")
});

/// Serve "blob" view URLs as raw bytes: first `/blob/` becomes `/raw/`.
pub fn blob_to_raw(url: &str) -> String {
    url.replacen("/blob/", "/raw/", 1)
}

/// Map a blob/raw GitHub URL onto its jsDelivr mirror.
///
/// `github.com/<author>/<repo>/blob/<ref>/<path>` becomes
/// `https://cdn.jsdelivr.net/gh/<author>/<repo>@<ref>/<path>`. Returns `None`
/// when the URL has no `<ref>/<path>` tail to map.
pub fn jsdelivr_mirror(url: &str) -> Option<String> {
    let caps = BLOB_PARTS.captures(url)?;
    Some(format!(
        "{}/{}/{}@{}/{}",
        JSDELIVR_BASE,
        &caps["author"],
        &caps["repo"],
        &caps["reference"],
        &caps["path"],
    ))
}

/// Turn an absolute upstream location into a path on this proxy.
pub fn proxy_relative(location: &str) -> String {
    let bare = location
        .strip_prefix("https://")
        .or_else(|| location.strip_prefix("http://"))
        .unwrap_or(location);
    format!("/{}", bare.trim_start_matches('/'))
}
