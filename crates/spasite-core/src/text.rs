//! Text normalization and classification helpers used by the review filter.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

static NAME_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s-]+$").expect("valid name regex"));

static ISO_DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("valid date prefix regex"));

static MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(january|february|march|april|may|june|july|august|september|october|november|december),?\s+(\d{4})\b",
    )
    .expect("valid month-year regex")
});

/// Returns `true` if `text` contains any code point above U+007F.
#[must_use]
pub fn has_unicode_characters(text: &str) -> bool {
    !text.is_ascii()
}

/// Returns `true` when the trimmed name is NOT made of ASCII letters,
/// whitespace and hyphens only. `true` means the name is rejected.
#[must_use]
pub fn has_special_characters_in_name(name: &str) -> bool {
    !NAME_SHAPE.is_match(name.trim())
}

/// Shortens a reviewer name for public display.
///
/// `"sunicha wong"` becomes `"Sunicha W."`, a single token is capitalized,
/// and anything with more than two tokens (or none) yields `None`.
#[must_use]
pub fn format_short_name(full_name: &str) -> Option<String> {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();
    match tokens.as_slice() {
        [single] => Some(capitalize(single)),
        [first, last] => {
            let initial: String = last.chars().next()?.to_uppercase().collect();
            Some(format!("{} {initial}.", capitalize(first)))
        }
        _ => None,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Builds the `"{Month} {Year}"` label shown next to a review, using the
/// host's local timezone for timestamp inputs.
#[must_use]
pub fn format_date_label(input: &str) -> String {
    format_date_label_in(input, &Local)
}

/// [`format_date_label`] with an explicit timezone.
#[must_use]
pub fn format_date_label_in<Tz: TimeZone>(input: &str, tz: &Tz) -> String {
    let trimmed = input.trim();

    if ISO_DATE_PREFIX.is_match(trimmed) {
        return parse_review_instant(trimmed).map_or_else(
            || "Recent".to_string(),
            |instant| {
                let local = instant.with_timezone(tz);
                month_label(local.month(), local.year())
            },
        );
    }

    if let Some(caps) = MONTH_YEAR.captures(trimmed) {
        let month = capitalize(&caps[1]);
        return format!("{month} {}", &caps[2]);
    }

    "Recent".to_string()
}

fn month_label(month: u32, year: i32) -> String {
    let idx = usize::try_from(month.saturating_sub(1)).unwrap_or(0);
    let name = MONTH_NAMES.get(idx).copied().unwrap_or("January");
    format!("{name} {year}")
}

/// Parses a review timestamp. Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS`
/// (read as UTC), or a bare leading `YYYY-MM-DD` (UTC midnight).
#[must_use]
pub fn parse_review_instant(input: &str) -> Option<DateTime<Utc>> {
    let trimmed = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    let date_part = trimmed.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Replaces typographic quotes, dashes and the ellipsis character with
/// their ASCII equivalents.
#[must_use]
pub fn normalize_smart_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            other => out.push(other),
        }
    }
    out
}

/// Replaces every run of line breaks with a single space.
#[must_use]
pub fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_break = false;
    for c in text.chars() {
        if c == '\n' || c == '\r' {
            if !in_break {
                out.push(' ');
                in_break = true;
            }
        } else {
            out.push(c);
            in_break = false;
        }
    }
    out
}
