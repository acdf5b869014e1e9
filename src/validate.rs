//! Site name validation.
//!
//! Applied by callers *before* [`crate::Blocker::block`]; the engine
//! itself only checks uniqueness and state, never syntax.

use std::net::Ipv4Addr;

/// Maximum total length of a host name.
const MAX_HOST_LEN: usize = 255;

/// Maximum length of a single domain label.
const MAX_LABEL_LEN: usize = 63;

/// Returns `true` if `candidate` looks like a blockable host name or IPv4
/// literal.
///
/// Accepts dotted domains (at least two labels, alphanumeric/hyphen
/// labels of up to 63 characters, no leading or trailing hyphen, final
/// label at least two characters) and IPv4 literals with in-range octets.
/// URLs with a scheme or path are rejected: the hosts file maps host
/// names, not URLs.
#[must_use]
pub fn is_valid_site(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.len() > MAX_HOST_LEN {
        return false;
    }
    if candidate.parse::<Ipv4Addr>().is_ok() {
        return true;
    }

    let labels: Vec<&str> = candidate.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    if labels.last().is_none_or(|tld| tld.len() < 2) {
        return false;
    }
    labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            && !label.starts_with('-')
            && !label.ends_with('-')
    })
}
