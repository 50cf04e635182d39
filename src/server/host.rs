//! Picking the revision identifier out of a request host
//!
//! Without a base domain the identifier is the first DNS label, as long as the
//! host has at least two labels (`main.example.org` → `main`). With a base
//! domain it is everything in front of it (`v1.0.0.example.org` → `v1.0.0`),
//! which lets dotted tag names through.

/// Remove a `:port` suffix, keeping IPv6 literals intact
pub fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }

    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Revision identifier for `host`, or `None` when the host names no revision
pub fn revision_identifier<'a>(host: &'a str, domain: Option<&str>) -> Option<&'a str> {
    let host = strip_port(host);

    match domain {
        Some(domain) => under_domain(host.trim_end_matches('.'), domain.trim_matches('.')),
        None => {
            let mut labels = host.split('.');
            let first = labels.next()?;
            labels.next()?;
            Some(first)
        }
    }
}

fn under_domain<'a>(host: &'a str, domain: &str) -> Option<&'a str> {
    // host must be "<identifier>.<domain>", compared case-insensitively
    let split = host.len().checked_sub(domain.len() + 1)?;
    if !host.is_char_boundary(split) || !host.is_char_boundary(split + 1) {
        return None;
    }

    let (identifier, suffix) = host.split_at(split);
    let suffix = suffix.strip_prefix('.')?;

    if identifier.is_empty() || !suffix.eq_ignore_ascii_case(domain) {
        return None;
    }

    Some(identifier)
}
