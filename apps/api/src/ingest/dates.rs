//! Date-range detection and normalization for experience and education lines.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";
const YEAR: &str = r"(?:19|20)\d{2}";
const ONGOING: &str = r"(?:present|current|now|today|ongoing)";

static DATE_RANGE: Lazy<Regex> = Lazy::new(|| {
    let date = format!(r"(?:{MONTH},?\s+{YEAR}|\d{{1,2}}/{YEAR}|{YEAR})");
    Regex::new(&format!(
        r"(?i)\b({date})\s*(?:-|–|—|\bto\b|\buntil\b)\s*({date}|{ONGOING})\b"
    ))
    .expect("valid regex")
});

static SINGLE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{MONTH},?\s+{YEAR}|\d{{1,2}}/{YEAR}|{YEAR})\b"
    ))
    .expect("valid regex")
});

static ONGOING_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)^{ONGOING}$")).expect("valid regex"));

/// A start/end pair as written in the resume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    /// Empty when the range is ongoing.
    pub end: String,
    pub current: bool,
}

/// Finds the first "start – end" range in `line` and its byte span.
pub fn find_date_range(line: &str) -> Option<(DateRange, Range<usize>)> {
    let caps = DATE_RANGE.captures(line)?;
    let whole = caps.get(0)?;
    let start = caps.get(1)?.as_str().trim().to_string();
    let end_token = caps.get(2)?.as_str().trim();
    let current = ONGOING_TOKEN.is_match(end_token);
    let range = DateRange {
        start,
        end: if current {
            String::new()
        } else {
            end_token.to_string()
        },
        current,
    };
    Some((range, whole.range()))
}

/// Finds the first standalone date ("May 2020", "05/2020", "2020") in `line`.
pub fn find_single_date(line: &str) -> Option<(String, Range<usize>)> {
    let m = SINGLE_DATE.find(line)?;
    Some((m.as_str().to_string(), m.range()))
}
