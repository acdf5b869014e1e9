//! Quote of the day.
//!
//! A small motivational touch shown after a successful block. The quotes
//! ship embedded in the binary (`data/quotes.json` at build time), so
//! display never depends on the working directory. All failures here are
//! soft: a malformed or empty quote list just means no quote is printed.

use chrono::Datelike;
use serde::Deserialize;

/// Default wrap width, in words.
const WORDS_PER_LINE: usize = 10;

/// One entry in the quotes list (a JSON array of these).
#[derive(Debug, Clone, Deserialize)]
pub struct Quote {
    /// The quote text.
    pub quote: String,
    /// The attributed author, if known.
    #[serde(default)]
    pub author: Option<String>,
}

/// Returns today's quote from a JSON array of [`Quote`] records, wrapped
/// for terminal display, or `None` if the JSON is malformed or the list
/// is empty.
#[must_use]
pub fn daily_quote(json: &str) -> Option<String> {
    let quotes: Vec<Quote> = match serde_json::from_str(json) {
        Ok(quotes) => quotes,
        Err(e) => {
            tracing::warn!(error = %e, "Quote list is not valid JSON");
            return None;
        }
    };

    let day = usize::try_from(chrono::Utc::now().date_naive().num_days_from_ce()).ok()?;
    quote_for_day(&quotes, day).map(|q| format_quote(q, WORDS_PER_LINE))
}

/// Selects the quote for a given day ordinal (rotates through the list).
fn quote_for_day(quotes: &[Quote], day: usize) -> Option<&Quote> {
    if quotes.is_empty() {
        return None;
    }
    quotes.get(day % quotes.len())
}

/// Renders a quote with the text wrapped at `words_per_line` words and the
/// author, if any, on a trailing `- author` line.
fn format_quote(quote: &Quote, words_per_line: usize) -> String {
    let words_per_line = words_per_line.max(1);
    let words: Vec<&str> = quote.quote.split_whitespace().collect();
    let body = words
        .chunks(words_per_line)
        .map(|chunk| chunk.join(" "))
        .collect::<Vec<_>>()
        .join("\n");

    let mut out = format!("\"{body}\"");
    match quote.author.as_deref() {
        Some(author) if !author.trim().is_empty() => {
            out.push_str("\n- ");
            out.push_str(author);
        }
        _ => {
            out.push_str("\n- Unknown");
        }
    }
    out
}
