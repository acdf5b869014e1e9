//! Hosts line codec.
//!
//! Parses single hosts-file lines into block records and renders block
//! records back into canonical line text. Pure functions, no state.
//!
//! A managed line looks like:
//!
//! ```text
//! 127.0.0.1 ads.example.com  # blocked by hostblock
//! 127.0.0.1 news.example.com  # blocked by hostblock until 1724900000
//! ```
//!
//! Everything else in the file (localhost entries, user additions,
//! comments) is untouched by this crate.

use chrono::{DateTime, Utc};

use crate::entry::BlockEntry;

/// Marker comment identifying lines owned by this crate.
pub const BLOCK_MARKER: &str = "# blocked by hostblock";

/// Keyword introducing the encoded expiry on a managed line.
const UNTIL_KEYWORD: &str = "until";

/// A hosts line recognized as a redirect entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    /// The redirected domain (second whitespace token).
    pub domain: String,
    /// `true` if the line carries the [`BLOCK_MARKER`] and is therefore
    /// owned by this crate.
    pub managed: bool,
    /// Decoded expiry, when the marker is followed by a parseable
    /// `until <unix-secs>` suffix.
    pub until: Option<DateTime<Utc>>,
}

impl ParsedEntry {
    /// Converts the parsed line into a state entry.
    ///
    /// A managed line without a decodable expiry is indefinite; the
    /// snapshot, not the file, is authoritative for expiry instants.
    #[must_use]
    pub const fn to_entry(&self) -> BlockEntry {
        match self.until {
            Some(unblock_at) => BlockEntry::Temporary { unblock_at },
            None => BlockEntry::Indefinite,
        }
    }
}

/// Parses a single hosts-file line.
///
/// Returns `None` for blank lines, comment-only lines, lines whose first
/// token is not `redirect`, lines with fewer than two tokens, and lines
/// whose domain token contains `#`.
#[must_use]
pub fn parse(line: &str, redirect: &str) -> Option<ParsedEntry> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let mut tokens = trimmed.split_whitespace();
    if tokens.next()? != redirect {
        return None;
    }
    let domain = tokens.next()?;
    if domain.contains('#') {
        return None;
    }

    let (managed, until) = match trimmed.split_once(BLOCK_MARKER) {
        Some((_, suffix)) => (true, parse_until(suffix)),
        None => (false, None),
    };

    Some(ParsedEntry {
        domain: domain.to_string(),
        managed,
        until,
    })
}

/// Decodes an ` until <unix-secs>` suffix following the marker.
fn parse_until(suffix: &str) -> Option<DateTime<Utc>> {
    let mut tokens = suffix.split_whitespace();
    if tokens.next()? != UNTIL_KEYWORD {
        return None;
    }
    let secs: i64 = tokens.next()?.parse().ok()?;
    DateTime::from_timestamp(secs, 0)
}

/// Renders a block entry as canonical managed-line text, newline-terminated.
///
/// Exact inverse of [`parse`] for every line it produces: domain,
/// managedness, and classification round-trip (expiry to second precision).
#[must_use]
pub fn render(domain: &str, entry: BlockEntry, redirect: &str) -> String {
    match entry {
        BlockEntry::Indefinite => format!("{redirect} {domain}  {BLOCK_MARKER}\n"),
        BlockEntry::Temporary { unblock_at } => format!(
            "{redirect} {domain}  {BLOCK_MARKER} {UNTIL_KEYWORD} {}\n",
            unblock_at.timestamp()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REDIRECT: &str = "127.0.0.1";

    #[test]
    fn parses_plain_redirect_line() {
        let parsed = parse("127.0.0.1 facebook.com", REDIRECT).unwrap();
        assert_eq!(parsed.domain, "facebook.com");
        assert!(!parsed.managed);
        assert_eq!(parsed.until, None);
    }

    #[test]
    fn parses_managed_line() {
        let parsed = parse("127.0.0.1 ads.example.com  # blocked by hostblock", REDIRECT).unwrap();
        assert_eq!(parsed.domain, "ads.example.com");
        assert!(parsed.managed);
        assert_eq!(parsed.to_entry(), BlockEntry::Indefinite);
    }

    #[test]
    fn parses_managed_line_with_expiry() {
        let line = "127.0.0.1 news.example.com  # blocked by hostblock until 1724900000";
        let parsed = parse(line, REDIRECT).unwrap();
        assert!(parsed.managed);
        assert_eq!(parsed.until.unwrap().timestamp(), 1_724_900_000);
    }

    #[test]
    fn unparseable_until_falls_back_to_indefinite() {
        let line = "127.0.0.1 news.example.com  # blocked by hostblock until soon";
        let parsed = parse(line, REDIRECT).unwrap();
        assert!(parsed.managed);
        assert_eq!(parsed.until, None);
        assert_eq!(parsed.to_entry(), BlockEntry::Indefinite);
    }

    #[test]
    fn ignores_blank_and_comment_lines() {
        assert_eq!(parse("", REDIRECT), None);
        assert_eq!(parse("   ", REDIRECT), None);
        assert_eq!(parse("# 127.0.0.1 another.com", REDIRECT), None);
    }

    #[test]
    fn ignores_other_addresses() {
        assert_eq!(parse("10.0.0.1 printer.local", REDIRECT), None);
        assert_eq!(parse("127.0.0.2 www.example.com", REDIRECT), None);
    }

    #[test]
    fn requires_a_domain_token() {
        assert_eq!(parse("127.0.0.1", REDIRECT), None);
        assert_eq!(parse("127.0.0.1  # comment", REDIRECT), None);
    }

    #[test]
    fn rejects_hash_in_domain_token() {
        assert_eq!(parse("127.0.0.1 bad#domain", REDIRECT), None);
    }

    #[test]
    fn tolerates_extra_whitespace() {
        let parsed = parse("  127.0.0.1   another.site.com  # comment ", REDIRECT).unwrap();
        assert_eq!(parsed.domain, "another.site.com");
        assert!(!parsed.managed);
    }

    #[test]
    fn render_parse_round_trip_indefinite() {
        let line = render("tracker.io", BlockEntry::Indefinite, REDIRECT);
        assert_eq!(line, "127.0.0.1 tracker.io  # blocked by hostblock\n");

        let parsed = parse(&line, REDIRECT).unwrap();
        assert_eq!(parsed.domain, "tracker.io");
        assert!(parsed.managed);
        assert_eq!(parsed.to_entry(), BlockEntry::Indefinite);
    }

    #[test]
    fn render_parse_round_trip_temporary() {
        let unblock_at = DateTime::from_timestamp(1_724_900_000, 0).unwrap();
        let entry = BlockEntry::Temporary { unblock_at };
        let line = render("tracker.io", entry, REDIRECT);

        let parsed = parse(&line, REDIRECT).unwrap();
        assert!(parsed.managed);
        assert_eq!(parsed.to_entry(), entry);
    }
}
