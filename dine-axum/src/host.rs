//! Tenant slug from the request host.
//!
//! Hosts look like `<slug>.<base-domain>[:port]`. The base domain itself
//! and the reserved labels `www` / `app` never name a tenant.

use axum::http::{header, HeaderMap};

pub const RESERVED_LABELS: [&str; 2] = ["www", "app"];

pub fn is_reserved_label(label: &str) -> bool {
    RESERVED_LABELS.contains(&label)
}

/// First label of `host` when it sits under `base_domain`.
///
/// Returns `None` for the bare base domain, foreign hosts, empty labels
/// and reserved labels.
pub fn subdomain_from_host(host: &str, base_domain: &str) -> Option<String> {
    let host = strip_port(host.trim()).trim_end_matches('.').to_ascii_lowercase();
    let base = base_domain.trim().trim_end_matches('.').to_ascii_lowercase();

    if host.is_empty() || host == base {
        return None;
    }

    let prefix = host.strip_suffix(&base)?.strip_suffix('.')?;
    let label = prefix.split('.').next()?;

    if label.is_empty() || is_reserved_label(label) {
        return None;
    }
    Some(label.to_string())
}

/// Same as [`subdomain_from_host`], reading the `Host` header.
pub fn subdomain_from_headers(headers: &HeaderMap, base_domain: &str) -> Option<String> {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| subdomain_from_host(h, base_domain))
}

fn strip_port(host: &str) -> &str {
    // Bracketed IPv6 literals carry colons of their own.
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}
