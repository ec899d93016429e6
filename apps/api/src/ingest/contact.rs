//! Contact block extraction from the resume preamble.

use std::collections::HashSet;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ingest::lines::{split_segments, Line};
use crate::ingest::sections::classify_header;
use crate::models::resume::ContactData;

pub(crate) static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").expect("valid regex")
});

pub(crate) static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\+\d{1,3}[\s.-]?|\b1[\s.-])?(?:\(\d{2,4}\)\s?|\b\d{2,4}[\s.-])\d{3,4}[\s.-]?\d{3,4}\b",
    )
    .expect("valid regex")
});

static LINKEDIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:https?://)?(?:[a-z]{2,3}\.)?linkedin\.com/[^\s|,;)]+")
        .expect("valid regex")
});

static GITHUB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:https?://)?(?:www\.)?github\.com/[^\s|,;)]+").expect("valid regex")
});

pub(crate) static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:https?://)?(?:www\.)?[a-z0-9][a-z0-9-]*(?:\.[a-z0-9-]+)*\.(?:com|io|dev|net|org|me|co|app|ai|tech|xyz|site|page|info|edu)\b(?:/[^\s|,;)]*)?",
    )
    .expect("valid regex")
});

static LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Z][A-Za-z.'-]+(?:\s+[A-Z][A-Za-z.'-]+){0,2},\s*[A-Z][A-Za-z.'-]+(?:\s+[A-Z][A-Za-z.'-]+){0,2}(?:\s+\d{5})?$",
    )
    .expect("valid regex")
});

const PORTFOLIO_MARKERS: &[&str] = &["portfolio", "behance.net", "dribbble.com"];

/// Words that make a short capitalized line a job title instead of a name.
pub(crate) const TITLE_WORDS: &[&str] = &[
    "engineer", "developer", "manager", "director", "analyst", "intern", "designer", "lead",
    "consultant", "specialist", "coordinator", "assistant", "associate", "architect",
    "scientist", "administrator", "officer", "president", "vp", "head", "executive",
    "representative", "technician", "programmer", "researcher", "teacher", "instructor",
    "accountant", "editor", "writer", "producer", "supervisor", "founder", "co-founder", "cto",
    "ceo", "cfo", "coo", "owner", "partner", "nurse", "advisor", "strategist", "agent", "clerk",
    "fellow", "trainee", "apprentice", "tutor", "principal", "recruiter", "marketer",
    "operator", "sre", "devops",
];

pub(crate) fn has_title_word(text: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric() && c != '-')
        .any(|w| TITLE_WORDS.contains(&w.to_lowercase().as_str()))
}

pub(crate) fn looks_like_location(text: &str) -> bool {
    let t = text.trim();
    LOCATION.is_match(t) || t.eq_ignore_ascii_case("remote")
}

fn has_contact_pattern(text: &str) -> bool {
    EMAIL.is_match(text) || find_phone(text).is_some() || URL.is_match(text)
}

fn find_phone(text: &str) -> Option<regex::Match<'_>> {
    PHONE.find_iter(text).find(|m| {
        let digits = m.as_str().chars().filter(char::is_ascii_digit).count();
        (7..=15).contains(&digits)
    })
}

fn looks_like_name(segment: &str) -> bool {
    let words: Vec<&str> = segment.split_whitespace().collect();
    if words.is_empty() || words.len() > 4 || has_title_word(segment) {
        return false;
    }
    let word_ok = |w: &&str| {
        w.chars().next().map(char::is_alphabetic).unwrap_or(false)
            && w
                .chars()
                .all(|c| c.is_alphabetic() || matches!(c, '.' | '\'' | '-' | ','))
    };
    words.iter().all(word_ok)
        && words
            .iter()
            .any(|w| w.chars().next().map(char::is_uppercase).unwrap_or(false))
}

/// "JANE DOE" becomes "Jane Doe"; mixed-case names are kept as written.
fn normalize_name_case(word: &str) -> String {
    if word.chars().any(char::is_lowercase) {
        return word.to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn clean_url(raw: &str) -> String {
    raw.trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ')'))
        .to_string()
}

/// Contact fields plus the preamble lines they were read from.
#[derive(Debug, Clone, Default)]
pub struct ContactExtraction {
    pub contact: ContactData,
    /// Indices into the preamble slice that were fully accounted for.
    pub consumed: HashSet<usize>,
}

/// Reads contact details from `preamble`, falling back to `full_text` for the
/// pattern-based fields.
pub fn extract_contact(preamble: &[Line<'_>], full_text: &str) -> ContactExtraction {
    let mut out = ContactExtraction::default();
    let contact = &mut out.contact;

    // Name: first of the leading non-empty lines, before any contact pattern.
    let mut name_index = None;
    for (idx, line) in preamble
        .iter()
        .enumerate()
        .filter(|(_, l)| !l.is_blank())
        .take(3)
    {
        let segments = split_segments(line.trimmed());
        if let Some(first) = segments.first() {
            if classify_header(first).is_none() && looks_like_name(first) {
                let mut words = first
                    .split_whitespace()
                    .map(|w| normalize_name_case(w.trim_end_matches(',')));
                contact.first_name = words.next().unwrap_or_default();
                contact.last_name = words.collect::<Vec<_>>().join(" ");
                name_index = Some(idx);
                if segments.len() > 1 && segments[1..].iter().all(|s| has_contact_pattern(s)) {
                    out.consumed.insert(idx);
                } else if segments.len() == 1 {
                    out.consumed.insert(idx);
                }
                break;
            }
        }
        if has_contact_pattern(line.text) {
            break;
        }
    }

    // Title: the short line right after the name.
    if let Some(name_idx) = name_index {
        if let Some((idx, line)) = preamble
            .iter()
            .enumerate()
            .skip(name_idx + 1)
            .find(|(_, l)| !l.is_blank())
        {
            let text = line.trimmed();
            let first = split_segments(text).first().copied().unwrap_or(text);
            let words = first.split_whitespace().count();
            if !has_contact_pattern(first)
                && !looks_like_location(first)
                && !first.chars().any(|c| c.is_ascii_digit())
                && (1..=8).contains(&words)
                && classify_header(first).is_none()
            {
                contact.title = first.to_string();
                if first == text {
                    out.consumed.insert(idx);
                }
            }
        }
    }

    let preamble_text: Vec<&str> = preamble.iter().map(|l| l.text).collect();
    let preamble_text = preamble_text.join("\n");

    let email_spans: Vec<Range<usize>> = EMAIL.find_iter(&preamble_text).map(|m| m.range()).collect();
    if let Some(m) = EMAIL
        .find(&preamble_text)
        .or_else(|| EMAIL.find(full_text))
    {
        contact.email = m.as_str().to_string();
    }
    if let Some(m) = find_phone(&preamble_text).or_else(|| find_phone(full_text)) {
        contact.phone = m.as_str().trim().to_string();
    }
    if let Some(m) = LINKEDIN.find(&preamble_text).or_else(|| LINKEDIN.find(full_text)) {
        contact.linkedin = clean_url(m.as_str());
    }
    if let Some(m) = GITHUB.find(&preamble_text).or_else(|| GITHUB.find(full_text)) {
        contact.github = clean_url(m.as_str());
    }

    // Bare domains count only in the preamble; elsewhere a scheme or www. is required.
    let candidates = URL
        .find_iter(&preamble_text)
        .filter(|m| !email_spans.iter().any(|e| overlaps(e, &m.range())))
        .map(|m| m.as_str())
        .chain(URL.find_iter(full_text).map(|m| m.as_str()).filter(|u| {
            let lower = u.to_lowercase();
            lower.starts_with("http") || lower.starts_with("www.")
        }));
    for raw in candidates {
        let lower = raw.to_lowercase();
        if lower.contains("linkedin.com") || lower.contains("github.com") {
            continue;
        }
        let url = clean_url(raw);
        if PORTFOLIO_MARKERS.iter().any(|m| lower.contains(m)) {
            if contact.portfolio.is_empty() {
                contact.portfolio = url;
            }
        } else if contact.website.is_empty() {
            contact.website = url;
        }
    }

    for (idx, line) in preamble.iter().enumerate() {
        if contact.location.is_empty() {
            if let Some(loc) = split_segments(line.trimmed())
                .into_iter()
                .find(|s| looks_like_location(s))
            {
                contact.location = loc.to_string();
            }
        }
        if line.is_blank() || out.consumed.contains(&idx) {
            continue;
        }
        let fully_contact = split_segments(line.trimmed()).iter().all(|s| {
            has_contact_pattern(s)
                || looks_like_location(s)
                || s.to_lowercase().starts_with("linkedin")
                || s.to_lowercase().starts_with("github")
        });
        if fully_contact || Some(idx) == name_index {
            out.consumed.insert(idx);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::lines::split_lines;

    fn extract(text: &str) -> ContactExtraction {
        let lines = split_lines(text);
        extract_contact(&lines, text)
    }

    #[test]
    fn test_basic_name_email_phone() {
        let out = extract("John Doe\njohn@example.com\n555-123-4567");
        assert_eq!(out.contact.first_name, "John");
        assert_eq!(out.contact.last_name, "Doe");
        assert_eq!(out.contact.email, "john@example.com");
        assert_eq!(out.contact.phone, "555-123-4567");
        assert!(out.contact.website.is_empty());
        assert_eq!(out.consumed.len(), 3);
    }

    #[test]
    fn test_single_line_header_with_links() {
        let text = "Maria Garcia Lopez | maria@mail.dev | (415) 555-0100 | San Francisco, CA\n\
                    linkedin.com/in/mgarcia | github.com/mgarcia | https://mgarcia.dev";
        let out = extract(text);
        assert_eq!(out.contact.first_name, "Maria");
        assert_eq!(out.contact.last_name, "Garcia Lopez");
        assert_eq!(out.contact.phone, "(415) 555-0100");
        assert_eq!(out.contact.location, "San Francisco, CA");
        assert_eq!(out.contact.linkedin, "linkedin.com/in/mgarcia");
        assert_eq!(out.contact.github, "github.com/mgarcia");
        assert_eq!(out.contact.website, "https://mgarcia.dev");
        assert_eq!(out.consumed.len(), 2);
    }

    #[test]
    fn test_title_after_name_and_caps_name() {
        let out = extract("JANE SMITH\nSenior Data Engineer\njane@x.io");
        assert_eq!(out.contact.first_name, "Jane");
        assert_eq!(out.contact.last_name, "Smith");
        assert_eq!(out.contact.title, "Senior Data Engineer");
    }

    #[test]
    fn test_no_name_when_contact_comes_first() {
        let out = extract("jane@example.com\nSome Person");
        assert!(out.contact.first_name.is_empty());
        assert_eq!(out.contact.email, "jane@example.com");
    }

    #[test]
    fn test_portfolio_and_leftover_lines() {
        let text = "Sam Lee\nwww.samlee-portfolio.com\nI build delightful products for people.";
        let out = extract(text);
        assert_eq!(out.contact.portfolio, "www.samlee-portfolio.com");
        assert!(out.contact.website.is_empty());
        assert!(!out.consumed.contains(&2));
    }

    #[test]
    fn test_empty_preamble() {
        let out = extract("");
        assert!(out.contact.is_empty());
    }
}
