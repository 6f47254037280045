//! # Date Normalizer
//! Best-effort conversion of scraped review dates into sortable bucket keys.
//!
//! Review pages rarely hand out a clean date field. What arrives is usually a sentence such as
//! "Reviewed in the United States on 5 August 2025", so the normalizer searches for a date
//! substring first and only then tries the whole string as ISO-8601.
//!
//! Rules, first match wins:
//! 1. blank input → [`UNKNOWN_DATE`]
//! 2. `5 August 2025` style (day, month name, year) → `YYYY-MM-DD`
//! 3. `August 5, 2025` style (US) → `YYYY-MM-DD`
//! 4. whole string as ISO date / date-time → `YYYY-MM-DD`
//! 5. the trimmed input itself
//!
//! The function never fails. Unparseable dates keep their own bucket so the review is still
//! counted; how often that happens depends on the scraped data, not on this code.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Bucket for reviews without any date.
pub const UNKNOWN_DATE: &str = "UNKNOWN";

/// Canonical bucket format.
pub const BUCKET_FORMAT: &str = "%Y-%m-%d";

/// A date substring pattern plus the formats tried on the matched text, in order.
struct EmbeddedRule {
    pattern: Regex,
    formats: &'static [&'static str],
}

static EMBEDDED_RULES: Lazy<Vec<EmbeddedRule>> = Lazy::new(|| {
    vec![
        // "Reviewed in the United Kingdom on 5 August 2025"
        EmbeddedRule {
            pattern: Regex::new(r"(\d{1,2}\s+[A-Za-z]+\s+\d{4})").expect("valid day-month regex"),
            formats: &["%d %B %Y", "%d %b %Y"],
        },
        // "Reviewed in the United States on August 5, 2025"
        EmbeddedRule {
            pattern: Regex::new(r"([A-Za-z]+\s+\d{1,2},\s*\d{4})").expect("valid month-day regex"),
            formats: &["%B %d, %Y", "%b %d, %Y"],
        },
    ]
});

/// Date-only ISO shapes, tried on the whole trimmed string.
const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Naive ISO date-time shapes. `%.f` makes the fraction optional.
const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Normalize a raw date string into a bucket key. Total: always returns something.
pub fn normalize(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return UNKNOWN_DATE.to_string();
    }

    for rule in EMBEDDED_RULES.iter() {
        // Only the first match of each pattern is considered.
        if let Some(m) = rule.pattern.find(s) {
            if let Some(d) = parse_with(m.as_str(), rule.formats) {
                return d.format(BUCKET_FORMAT).to_string();
            }
        }
    }

    if let Some(d) = parse_iso(s) {
        return d.format(BUCKET_FORMAT).to_string();
    }

    s.to_string()
}

/// Same as [`normalize`], with a missing date treated as blank.
pub fn normalize_opt(raw: Option<&str>) -> String {
    normalize(raw.unwrap_or_default())
}

fn parse_with(text: &str, formats: &[&str]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// ISO-8601 date or date-time; returns the date portion as written (offset not applied).
fn parse_iso(s: &str) -> Option<NaiveDate> {
    if let Some(d) = parse_with(s, ISO_DATE_FORMATS) {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    ISO_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// Interpret a bucket key as a canonical date, if it is one.
pub fn bucket_date(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, BUCKET_FORMAT).ok()
}

/// Sort key for buckets: dated keys first (chronological), then raw keys (lexicographic).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum BucketKey<'a> {
    Dated(NaiveDate),
    Raw(&'a str),
}

impl<'a> BucketKey<'a> {
    pub fn of(key: &'a str) -> Self {
        match bucket_date(key) {
            Some(d) => Self::Dated(d),
            None => Self::Raw(key),
        }
    }
}

/// Total order over bucket keys used by the time series.
pub fn compare_buckets(a: &str, b: &str) -> Ordering {
    BucketKey::of(a).cmp(&BucketKey::of(b))
}
