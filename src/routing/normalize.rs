//! Inbound path normalization.
//!
//! Turns the raw remainder-of-path (`/github.com/a/b/...`,
//! `/https:/github.com/...`) into an absolute URL the classifier accepts.
//! Runs exactly once per request; the steps are order-sensitive.

/// Normalize a raw inbound path into a candidate URL.
pub fn normalize_path(raw: &str) -> String {
    let path = raw.strip_prefix('/').unwrap_or(raw);

    let mut url = if path.starts_with("http") {
        path.to_string()
    } else {
        format!("https://{}", path)
    };

    // Intermediaries sometimes collapse `https://` into `https:/`.
    for scheme in ["https:", "http:"] {
        if let Some(rest) = url.strip_prefix(scheme) {
            if !rest.starts_with("//") {
                if let Some(rest) = rest.strip_prefix('/') {
                    url = format!("{}//{}", scheme, rest);
                }
            }
            break;
        }
    }

    url
}

/// Append an inbound query string, if any, to a normalized URL.
pub fn with_query(url: String, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{}?{}", url, q),
        _ => url,
    }
}
