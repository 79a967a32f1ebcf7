// Utility helpers for parsing, tokenizing and number formatting.
//
// Exports from the network site are not consistent about date formats, so
// everything forgiving lives here and the rest of the code sees typed values.
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

/// Abbreviated month names indexed by `month - 1`.
pub const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// Two-digit years must be tried before `%Y`, which would read "22" as year 22.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %b %Y", "%m/%d/%y", "%m/%d/%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%y, %I:%M %p",
    "%m/%d/%Y, %I:%M %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse a date cell into a calendar date.
///
/// - Accepts `Option<&str>` so callers can pass optional CSV fields through.
/// - Trims whitespace; empty input is `None`.
/// - Tries plain dates first, then date-times (the time part is dropped),
///   then RFC 3339.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Trim a free-text cell, mapping a missing value to the empty string.
pub fn clean_text(s: Option<String>) -> String {
    s.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Abbreviated label for a 1-based calendar month. Out-of-range input yields "?".
pub fn month_label(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_ABBR[(month - 1) as usize],
        _ => "?",
    }
}

/// Lower-case `text`, then split it on every non-alphanumeric character,
/// dropping empty pieces.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> {
    // Lowering can introduce non-alphanumeric chars (e.g. 'İ' -> "i\u{307}"),
    // so the split runs on the lowered text.
    let lowered = text.to_lowercase();
    let tokens: Vec<String> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    tokens.into_iter()
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` so counts read like `9,855`.
    n.to_formatted_string(&Locale::en)
}
