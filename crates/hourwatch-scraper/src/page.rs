//! Reads the handful of explicit signals a listing page exposes.
//!
//! Only named elements are consulted: the first `<h1>`, the first element
//! whose class mentions `Address` or `Timing`, day/time pairs in the page
//! text, and the serviceability status element. There is no guessing from
//! the rest of the body; a page without a status element is reported as
//! [`ScraperError::StatusUnavailable`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use hourwatch_core::{RawHours, ScrapedListing};
use regex::Regex;

use crate::error::ScraperError;

pub const UNKNOWN_NAME: &str = "Unknown Restaurant";
pub const UNKNOWN_ADDRESS: &str = "Unknown Address";

const ADDRESS_PLACEHOLDER: &str = "Setup your precise location";
const MIN_ADDRESS_LEN: usize = 10;

static H1_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(h1)\b[^>]*>").expect("valid regex"));
static ADDRESS_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<([a-z][a-z0-9]*)\b[^>]*\bclass\s*=\s*"[^"]*Address[^"]*"[^>]*>"#)
        .expect("valid regex")
});
static TIMING_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<([a-z][a-z0-9]*)\b[^>]*\bclass\s*=\s*"[^"]*Timing[^"]*"[^>]*>"#)
        .expect("valid regex")
});
static STATUS_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<([a-z][a-z0-9]*)\b[^>]*\bdata-testid\s*=\s*"rdp_serviceability_status_message"[^>]*>"#,
    )
    .expect("valid regex")
});
static WEEKLY_HOURS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday)\b[^0-9]{0,40}?(\d{1,2}(?::\d{2})?\s*[AP]M)\s*-\s*(\d{1,2}(?::\d{2})?\s*[AP]M)",
    )
    .expect("valid regex")
});
static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script>|<style\b.*?</style>").expect("valid regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static LOCATION_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Location\s*").expect("valid regex"));

/// Observed status from the serviceability element's text.
///
/// "close" is checked before "open" so that `"CLOSED, OPENS AT 10AM"` reads
/// as closed. Returns `None` when neither word appears.
#[must_use]
pub fn parse_status_text(text: &str) -> Option<bool> {
    let lower = text.to_lowercase();
    if lower.contains("close") {
        Some(false)
    } else if lower.contains("open") {
        Some(true)
    } else {
        None
    }
}

/// Strips a leading `Location` label from an address.
#[must_use]
pub fn clean_address(address: &str) -> String {
    LOCATION_PREFIX_RE.replace(address.trim(), "").trim().to_string()
}

/// Visible text of an HTML fragment with whitespace collapsed.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let without_scripts = SCRIPT_STYLE_RE.replace_all(html, " ");
    let without_tags = TAG_RE.replace_all(&without_scripts, " ");
    let decoded = decode_entities(&without_tags);
    WHITESPACE_RE.replace_all(&decoded, " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Day → `"open - close"` pairs found in the page text, first match per day.
#[must_use]
pub fn extract_weekly_hours(text: &str) -> BTreeMap<String, String> {
    let mut hours = BTreeMap::new();
    for caps in WEEKLY_HOURS_RE.captures_iter(text) {
        let day = title_case(&caps[1]);
        let open = compact_time(&caps[2]);
        let close = compact_time(&caps[3]);
        hours.entry(day).or_insert_with(|| format!("{open} - {close}"));
    }
    hours
}

fn title_case(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn compact_time(token: &str) -> String {
    token
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Inner HTML of each element whose opening tag matches `open_re`, lazily
/// and in document order. The regex's first capture group must be the tag
/// name. `lower` is `html` with ASCII lowercased, so byte offsets agree.
fn elements<'a>(
    html: &'a str,
    lower: &'a str,
    open_re: &'a Regex,
) -> impl Iterator<Item = &'a str> + 'a {
    open_re.captures_iter(html).filter_map(move |caps| {
        let whole = caps.get(0)?;
        let tag = caps.get(1)?.as_str();
        inner_html(html, lower, whole.end(), tag)
    })
}

/// Slice from `start` up to the `</tag>` that balances the element opened
/// just before `start`. Unbalanced markup yields the rest of the document.
fn inner_html<'a>(html: &'a str, lower: &str, start: usize, tag: &str) -> Option<&'a str> {
    let lower = lower.get(start..)?;
    let tag = tag.to_ascii_lowercase();
    let open = format!("<{tag}");
    let close = format!("</{tag}");

    let mut depth = 0usize;
    let mut pos = 0usize;
    while let Some(offset) = lower[pos..].find('<') {
        let at = pos + offset;
        let rest = &lower[at..];
        if rest.starts_with(&close) && is_tag_boundary(rest, close.len()) {
            if depth == 0 {
                return html.get(start..start + at);
            }
            depth -= 1;
        } else if rest.starts_with(&open) && is_tag_boundary(rest, open.len()) {
            depth += 1;
        }
        pos = at + 1;
    }

    html.get(start..)
}

fn is_tag_boundary(rest: &str, len: usize) -> bool {
    rest[len..]
        .chars()
        .next()
        .is_none_or(|c| c == '>' || c == '/' || c.is_whitespace())
}

/// Extracts a [`ScrapedListing`] from a listing page's HTML.
///
/// # Errors
///
/// Returns [`ScraperError::StatusUnavailable`] when the page has no status
/// element or its text says neither open nor closed.
pub fn parse_listing_page(html: &str, source_url: &str) -> Result<ScrapedListing, ScraperError> {
    let lower = html.to_ascii_lowercase();

    let actual_open = elements(html, &lower, &STATUS_OPEN_RE)
        .next()
        .and_then(|inner| parse_status_text(&html_to_text(inner)))
        .ok_or_else(|| ScraperError::StatusUnavailable {
            url: source_url.to_owned(),
        })?;

    let name = elements(html, &lower, &H1_OPEN_RE)
        .map(html_to_text)
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| UNKNOWN_NAME.to_owned());

    let address = elements(html, &lower, &ADDRESS_OPEN_RE)
        .map(html_to_text)
        .find(|text| text.len() > MIN_ADDRESS_LEN && !text.contains(ADDRESS_PLACEHOLDER))
        .map(|text| clean_address(&text))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| UNKNOWN_ADDRESS.to_owned());

    let weekly = extract_weekly_hours(&html_to_text(html));
    let opening_hours = if weekly.is_empty() {
        elements(html, &lower, &TIMING_OPEN_RE)
            .map(html_to_text)
            .find(|text| !text.is_empty())
            .map(RawHours::Text)
    } else {
        Some(RawHours::Mapping(weekly))
    };

    Ok(ScrapedListing {
        name,
        address,
        opening_hours,
        actual_open,
        source_url: source_url.to_owned(),
    })
}

#[cfg(test)]
#[path = "page_test.rs"]
mod tests;
