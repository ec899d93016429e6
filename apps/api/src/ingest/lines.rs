//! Line scanning helpers that keep byte offsets into the original text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::resume::{truncate_chars, MAX_HIGHLIGHT_CHARS};

/// One physical line of the source text, without its line terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub text: &'a str,
    /// Byte offset of the first character of the line in the original text.
    pub start: usize,
    /// Byte offset one past the last character (terminator excluded).
    pub end: usize,
}

impl<'a> Line<'a> {
    pub fn trimmed(&self) -> &'a str {
        self.text.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

pub fn split_lines(text: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for raw in text.split_inclusive('\n') {
        let content = raw.strip_suffix('\n').unwrap_or(raw);
        let content = content.strip_suffix('\r').unwrap_or(content);
        lines.push(Line {
            text: content,
            start: offset,
            end: offset + content.len(),
        });
        offset += raw.len();
    }
    lines
}

const BULLET_MARKERS: &[char] = &['-', '*', '•', '▪', '‣', '◦', '●', '·', '–', '►', '■'];

/// Returns the bullet text with its marker stripped, or `None` if the line is not a bullet.
pub fn strip_bullet(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let mut chars = trimmed.chars();
    let marker = chars.next()?;
    if !BULLET_MARKERS.contains(&marker) {
        return None;
    }
    let rest = chars.as_str();
    // "-5% churn" is text, "- Reduced churn" is a bullet.
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    (!text.is_empty()).then_some(text)
}

/// Highlight text as stored: marker stripped, trimmed, length-capped.
pub fn highlight_text(text: &str) -> String {
    truncate_chars(text.trim(), MAX_HIGHLIGHT_CHARS)
}

static SEGMENT_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[|•·\t]\s*|\s*[—–]\s*|\s+-\s+").expect("valid regex"));

/// Splits a heading-like line on visual separators (`|`, `•`, dashes, tabs).
pub fn split_segments(line: &str) -> Vec<&str> {
    SEGMENT_SPLIT
        .split(line)
        .map(|s| s.trim().trim_matches(|c: char| c == ',' || c == ';'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

static LIST_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*[,;|•·]\s*").expect("valid regex"));

/// Splits an inline list ("Rust, Go; SQL") into trimmed items.
pub fn split_list(text: &str) -> Vec<String> {
    LIST_SPLIT
        .split(text)
        .map(|s| s.trim().trim_end_matches('.').trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Removes a byte range from `line` and tidies the separators left behind.
pub fn remove_span(line: &str, start: usize, end: usize) -> String {
    let joined = format!("{} {}", &line[..start], &line[end..]);
    tidy(&joined)
}

/// Collapses whitespace and trims dangling separators and empty brackets.
pub fn tidy(text: &str) -> String {
    let collapsed = text
        .replace("()", " ")
        .replace("[]", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    collapsed
        .trim_matches(|c: char| {
            c.is_whitespace() || matches!(c, '|' | ',' | ';' | '-' | '–' | '—' | '•' | '·' | ':')
        })
        .to_string()
}

/// Byte span covering the given lines with leading/trailing blank lines removed.
pub fn content_span(lines: &[Line<'_>]) -> Option<(usize, usize)> {
    let first = lines.iter().find(|l| !l.is_blank())?;
    let last = lines.iter().rev().find(|l| !l.is_blank())?;
    Some((first.start, last.end))
}
