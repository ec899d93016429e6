//! JD Parser: splits a pasted job description into labeled sections and extracts
//! structured requirements (years of experience, degree, certifications).
//!
//! Pure and total: every input, including the empty string, yields a populated result.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ingest::lines::strip_bullet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegreeLevel {
    Bachelor,
    Master,
    Phd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JdSection {
    Required,
    Preferred,
    Responsibilities,
    About,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JdSections {
    pub required: String,
    pub preferred: String,
    pub responsibilities: String,
    pub about: String,
    pub full_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRequirements {
    pub years_of_experience: Option<u32>,
    pub degree_level: Option<DegreeLevel>,
    pub degree_field: Option<String>,
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedJobDescription {
    pub title: String,
    pub sections: JdSections,
    pub extracted_requirements: ExtractedRequirements,
}

/// Header vocabulary, checked in order; the first section whose phrase opens the header wins.
const SECTION_HEADERS: &[(JdSection, &[&str])] = &[
    (
        JdSection::Preferred,
        &[
            "preferred",
            "nice to have",
            "nice-to-have",
            "bonus points",
            "pluses",
            "good to have",
        ],
    ),
    (
        JdSection::Responsibilities,
        &[
            "responsibilities",
            "what you'll do",
            "what you will do",
            "duties",
            "the role",
            "your role",
            "day to day",
        ],
    ),
    (
        JdSection::Required,
        &[
            "requirements",
            "qualifications",
            "required",
            "must have",
            "must-have",
            "what you'll need",
            "what you will need",
            "what we're looking for",
            "who you are",
        ],
    ),
    (
        JdSection::About,
        &["about us", "company", "who we are", "about the team", "about"],
    ),
];

const MAX_HEADER_WORDS: usize = 6;

/// Words allowed ahead of a header phrase, as in "Key Responsibilities" or "Our Company".
const HEADER_QUALIFIERS: &[&str] = &[
    "key", "basic", "minimum", "core", "main", "job", "additional", "general", "our", "your",
    "the",
];

/// Words allowed after a header phrase, as in "Preferred Qualifications".
const MAX_TRAILING_HEADER_WORDS: usize = 2;

static TITLE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:job\s+|position\s+)?title\s*:\s*(.+?)\s*$").expect("valid regex")
});

static YEARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2})\s*\+?\s*(?:(?:-|–|—|to)\s*\d{1,2}\s*\+?\s*)?(?:plus\s+)?(?:years?|yrs?)\b",
    )
    .expect("valid regex")
});

/// Degree levels in priority order: the first level with any match wins.
static DEGREE_LEVELS: Lazy<Vec<(DegreeLevel, Regex)>> = Lazy::new(|| {
    [
        (
            DegreeLevel::Phd,
            r"(?i)\b(?:ph\.?\s?d|doctorate|doctoral\s+degree)\b",
        ),
        (
            DegreeLevel::Master,
            r"(?i)\b(?:master(?:'s|’s|s)?\s+(?:degree|of|in)\b|master's|masters\b|mba\b|m\.s\.|m\.sc\b|msc\b|ms\s+(?:degree|in)\b)",
        ),
        (
            DegreeLevel::Bachelor,
            r"(?i)\b(?:bachelor|b\.s\.|b\.a\.|b\.sc\b|bsc\b|bs\s+(?:degree|in)\b|ba\s+(?:degree|in)\b|undergraduate\s+degree)",
        ),
    ]
    .into_iter()
    .map(|(level, pattern)| (level, Regex::new(pattern).expect("valid regex")))
    .collect()
});

static DEGREE_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:bachelor(?:'s|s)?|master(?:'s|s)?|ph\.?\s?d\.?|doctorate|b\.s\.?|m\.s\.?|b\.a\.?|m\.a\.?|bs|ms|ba|degree)(?:\s+of\s+(?:applied\s+science|science|arts|engineering))?(?:\s+degree)?\s+(?:in|of)\s+([a-z][a-z &/-]*?[a-z])\s*(?:,|\.|;|:|\(|\)|\n|\bor\b|\band\b|\bwith\b|\bpreferred\b|\brequired\b|\bis\b|\ba\s+plus\b|$)",
    )
    .expect("valid regex")
});

/// Known certification names and the patterns that detect them.
const CERTIFICATION_PATTERNS: &[(&str, &str)] = &[
    ("PMP", r"\bPMP\b"),
    ("CISSP", r"\bCISSP\b"),
    ("CISA", r"\bCISA\b"),
    ("CISM", r"\bCISM\b"),
    ("CPA", r"\bCPA\b"),
    ("CFA", r"\bCFA\b"),
    ("CKA", r"\bCKA\b"),
    ("CKAD", r"\bCKAD\b"),
    ("CCNA", r"\bCCNA\b"),
    ("CCNP", r"\bCCNP\b"),
    ("CEH", r"\bCEH\b"),
    ("OSCP", r"\bOSCP\b"),
    ("RHCE", r"\bRHCE\b"),
    ("ITIL", r"\b(?:ITIL|Itil)\b"),
    ("PMI-ACP", r"(?i)\bpmi-acp\b"),
    ("SHRM-CP", r"(?i)\bshrm-s?cp\b"),
    ("AWS Certified", r"(?i)\baws[\s-]+certified\b"),
    ("Microsoft Certified", r"(?i)\b(?:microsoft|azure)[\s-]+certified\b"),
    ("Google Cloud Certified", r"(?i)\b(?:google\s+cloud|gcp)[\s-]+certified\b"),
    ("Salesforce Certified", r"(?i)\bsalesforce[\s-]+certified\b"),
    ("CompTIA Security+", r"(?i)\b(?:comptia\s+)?security\+"),
    ("CompTIA Network+", r"(?i)\b(?:comptia\s+)?network\+"),
    ("CompTIA A+", r"(?i)\bcomptia\s+a\+"),
    ("Certified Scrum Master", r"(?i:\bcertified\s+scrum\s*master\b)|\bCSM\b"),
    ("Six Sigma", r"(?i)\bsix\s+sigma\b"),
];

static CERTIFICATIONS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    CERTIFICATION_PATTERNS
        .iter()
        .map(|(name, pattern)| (*name, Regex::new(pattern).expect("valid regex")))
        .collect()
});

fn normalize_whitespace(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace(['\t', '\u{a0}'], " ")
        .replace(['’', '‘'], "'")
}

fn normalize_header(text: &str) -> String {
    text.trim()
        .trim_start_matches(|c: char| matches!(c, '#' | '*' | '='))
        .trim_end_matches(|c: char| matches!(c, ':' | '*' | '=' | '#'))
        .trim()
        .to_lowercase()
}

fn classify_header(candidate: &str) -> Option<JdSection> {
    let normalized = normalize_header(candidate);
    if normalized.is_empty()
        || normalized.ends_with('.')
        || normalized.split_whitespace().count() > MAX_HEADER_WORDS
    {
        return None;
    }
    SECTION_HEADERS.iter().find_map(|(section, phrases)| {
        phrases
            .iter()
            .any(|p| opens_header(&normalized, p))
            .then_some(*section)
    })
}

/// True when `phrase` starts the header, after optional qualifier words, and only a
/// short tail follows it.
fn opens_header(normalized: &str, phrase: &str) -> bool {
    let mut rest = normalized;
    loop {
        if let Some(after) = rest.strip_prefix(phrase) {
            if !after.starts_with(|c: char| c.is_alphanumeric()) {
                return after.split_whitespace().count() <= MAX_TRAILING_HEADER_WORDS;
            }
        }
        match rest.split_once(' ') {
            Some((word, tail)) if HEADER_QUALIFIERS.contains(&word) => rest = tail.trim_start(),
            _ => return false,
        }
    }
}

/// Detects a section header line. A header may carry inline content after a colon,
/// e.g. `Requirements: 5+ years of Rust`.
fn detect_header(line: &str) -> Option<(JdSection, Option<String>)> {
    // Bullets are always body text, even "- Python preferred".
    if strip_bullet(line).is_some() {
        return None;
    }
    if let Some((head, rest)) = line.split_once(':') {
        if let Some(section) = classify_header(head) {
            let rest = rest.trim();
            return Some((section, (!rest.is_empty()).then(|| rest.to_string())));
        }
    }
    classify_header(line).map(|section| (section, None))
}

/// Parses a raw job posting. Never fails; empty input yields an empty result.
pub fn parse_job_description(text: &str) -> ParsedJobDescription {
    let normalized = normalize_whitespace(text);
    let full_text = normalized.trim().to_string();
    if full_text.is_empty() {
        return ParsedJobDescription::default();
    }

    let mut explicit_title: Option<String> = None;
    let mut first_line_title: Option<String> = None;
    let mut seen_content = false;

    let mut buffers: [Vec<String>; 4] = Default::default();
    let mut current: Option<JdSection> = None;
    let mut headers_found = 0usize;

    for raw_line in normalized.lines() {
        let line = raw_line.trim_end();
        if line.trim().is_empty() {
            if let Some(section) = current {
                buffers[section as usize].push(String::new());
            }
            continue;
        }

        if explicit_title.is_none() {
            if let Some(caps) = TITLE_LINE.captures(line) {
                explicit_title = Some(caps[1].to_string());
                seen_content = true;
                continue;
            }
        }

        if let Some((section, inline)) = detect_header(line) {
            headers_found += 1;
            current = Some(section);
            if let Some(inline) = inline {
                buffers[section as usize].push(inline);
            }
            seen_content = true;
            continue;
        }

        if !seen_content {
            first_line_title = Some(line.trim().to_string());
            seen_content = true;
        }

        if let Some(section) = current {
            buffers[section as usize].push(line.to_string());
        }
    }

    let join = |lines: &[String]| lines.join("\n").trim().to_string();
    let sections = JdSections {
        required: join(&buffers[JdSection::Required as usize]),
        preferred: join(&buffers[JdSection::Preferred as usize]),
        responsibilities: join(&buffers[JdSection::Responsibilities as usize]),
        about: join(&buffers[JdSection::About as usize]),
        full_text,
    };

    let requirement_text = format!(
        "{}\n{}\n{}",
        sections.required, sections.preferred, sections.full_text
    );
    let extracted_requirements = extract_requirements(&requirement_text);

    debug!(
        headers_found,
        years = ?extracted_requirements.years_of_experience,
        certifications = extracted_requirements.certifications.len(),
        "parsed job description"
    );

    ParsedJobDescription {
        title: explicit_title.or(first_line_title).unwrap_or_default(),
        sections,
        extracted_requirements,
    }
}

fn extract_requirements(text: &str) -> ExtractedRequirements {
    ExtractedRequirements {
        years_of_experience: extract_years(text),
        degree_level: extract_degree_level(text),
        degree_field: extract_degree_field(text),
        certifications: extract_certifications(text),
    }
}

/// First "N years" / "N-M years" / "N+ years" mention; a range yields its lower bound.
fn extract_years(text: &str) -> Option<u32> {
    YEARS
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn extract_degree_level(text: &str) -> Option<DegreeLevel> {
    DEGREE_LEVELS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(level, _)| *level)
}

fn extract_degree_field(text: &str) -> Option<String> {
    DEGREE_FIELD
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|field| !field.is_empty())
}

fn extract_certifications(text: &str) -> Vec<String> {
    let mut hits: Vec<(usize, &str)> = CERTIFICATIONS
        .iter()
        .filter_map(|(name, re)| re.find(text).map(|m| (m.start(), *name)))
        .collect();
    hits.sort_by_key(|(pos, _)| *pos);
    let mut out: Vec<String> = Vec::new();
    for (_, name) in hits {
        if !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const STARTUP_JD: &str = "Senior Rust Engineer — Core Infrastructure
We move fast and own everything end-to-end.

Responsibilities:
- Architect distributed systems
- Drive reliability from zero to production

Requirements:
- 5+ years of Rust or C++
- Bachelor's degree in Computer Science or related field
- AWS Certified Solutions Architect a plus

Nice to have:
- Kubernetes, Kafka
- PMP or CISSP

About Us
Fast-paced Series B startup disrupting fintech infrastructure.";

    const ENTERPRISE_JD: &str = "Title: Software Engineer, Platform Team
Join our collaborative team to contribute to our microservices platform.
Qualifications: 3-5 years with Java, Spring Boot, SQL. Master's degree in Information Systems preferred.
Preferred Qualifications
Kubernetes, CI/CD experience.";

    #[test]
    fn test_empty_input_returns_empty_result() {
        let parsed = parse_job_description("");
        assert_eq!(parsed, ParsedJobDescription::default());
        assert!(parsed.extracted_requirements.certifications.is_empty());
        assert!(parsed.extracted_requirements.years_of_experience.is_none());

        let blank = parse_job_description("   \n\t\n");
        assert_eq!(blank, ParsedJobDescription::default());
    }

    #[test]
    fn test_short_phrase_is_title_and_full_text() {
        let parsed = parse_job_description("Senior Backend Developer");
        assert_eq!(parsed.title, "Senior Backend Developer");
        assert_eq!(parsed.sections.full_text, "Senior Backend Developer");
        assert!(parsed.sections.required.is_empty());
        assert!(parsed.sections.about.is_empty());
    }

    #[test]
    fn test_years_single_number() {
        let parsed = parse_job_description("5+ years of software engineering experience.");
        assert_eq!(parsed.extracted_requirements.years_of_experience, Some(5));
    }

    #[test]
    fn test_years_range_takes_lower_bound() {
        assert_eq!(extract_years("We want 3-5 years in backend work"), Some(3));
        assert_eq!(extract_years("7 to 10 yrs"), Some(7));
        assert_eq!(extract_years("no numbers here"), None);
    }

    #[test]
    fn test_sections_are_split_on_headers() {
        let parsed = parse_job_description(STARTUP_JD);
        assert_eq!(parsed.title, "Senior Rust Engineer — Core Infrastructure");
        assert!(parsed.sections.responsibilities.contains("Architect distributed systems"));
        assert!(parsed.sections.required.starts_with("- 5+ years of Rust"));
        assert!(parsed.sections.preferred.contains("Kafka"));
        assert!(parsed.sections.about.starts_with("Fast-paced Series B"));
        assert!(!parsed.sections.required.contains("Kafka"));
        assert_eq!(parsed.sections.full_text, STARTUP_JD.trim());
    }

    #[test]
    fn test_section_body_keeps_line_breaks() {
        let parsed = parse_job_description(STARTUP_JD);
        assert_eq!(parsed.sections.preferred, "- Kubernetes, Kafka\n- PMP or CISSP");
    }

    #[test]
    fn test_requirements_from_startup_fixture() {
        let req = parse_job_description(STARTUP_JD).extracted_requirements;
        assert_eq!(req.years_of_experience, Some(5));
        assert_eq!(req.degree_level, Some(DegreeLevel::Bachelor));
        assert_eq!(req.degree_field.as_deref(), Some("Computer Science"));
        assert_eq!(req.certifications, vec!["AWS Certified", "PMP", "CISSP"]);
    }

    #[test]
    fn test_explicit_title_and_inline_header() {
        let parsed = parse_job_description(ENTERPRISE_JD);
        assert_eq!(parsed.title, "Software Engineer, Platform Team");
        assert!(parsed.sections.required.starts_with("3-5 years with Java"));
        assert_eq!(parsed.sections.preferred, "Kubernetes, CI/CD experience.");
        let req = parsed.extracted_requirements;
        assert_eq!(req.years_of_experience, Some(3));
        assert_eq!(req.degree_level, Some(DegreeLevel::Master));
        assert_eq!(req.degree_field.as_deref(), Some("Information Systems"));
    }

    #[test]
    fn test_degree_level_priority() {
        let text = "Bachelor's required, Master's degree preferred, PhD a plus";
        assert_eq!(extract_degree_level(text), Some(DegreeLevel::Phd));
        assert_eq!(
            extract_degree_level("Master's degree or Bachelor's"),
            Some(DegreeLevel::Master)
        );
        assert_eq!(extract_degree_level("Certified Scrum Master"), None);
    }

    #[test]
    fn test_degree_field_after_of_science() {
        assert_eq!(
            extract_degree_field("Bachelor of Science in Mechanical Engineering.").as_deref(),
            Some("Mechanical Engineering")
        );
    }

    #[test]
    fn test_certifications_first_seen_order_without_duplicates() {
        let certs = extract_certifications("CISSP preferred. PMP. Also cissp? CISSP again. six sigma");
        assert_eq!(certs, vec!["CISSP", "PMP", "Six Sigma"]);
    }

    #[test]
    fn test_bullets_mentioning_header_words_stay_in_section() {
        let text = "Backend Engineer\n\nRequirements:\n- Python preferred\n- 5 years of Go\n- Kubernetes\n\nAbout Us\nWe ship developer tools.";
        let parsed = parse_job_description(text);
        assert_eq!(
            parsed.sections.required,
            "- Python preferred\n- 5 years of Go\n- Kubernetes"
        );
        assert!(parsed.sections.preferred.is_empty());
        assert_eq!(parsed.sections.about, "We ship developer tools.");
    }

    #[test]
    fn test_header_phrase_must_open_the_line() {
        assert_eq!(classify_header("Python preferred"), None);
        assert_eq!(classify_header("Company culture is great"), None);
        assert_eq!(classify_header("Key Responsibilities"), Some(JdSection::Responsibilities));
        assert_eq!(classify_header("Preferred Qualifications"), Some(JdSection::Preferred));
        assert_eq!(classify_header("Minimum Qualifications"), Some(JdSection::Required));
        assert_eq!(classify_header("About the Team"), Some(JdSection::About));
        assert_eq!(detect_header("- Required: Rust"), None);
    }

    #[test]
    fn test_no_headers_leaves_sections_empty() {
        let text = "We build rockets.\nYou write software for them.";
        let parsed = parse_job_description(text);
        assert_eq!(parsed.title, "We build rockets.");
        assert!(parsed.sections.required.is_empty());
        assert!(parsed.sections.preferred.is_empty());
        assert!(parsed.sections.responsibilities.is_empty());
        assert!(parsed.sections.about.is_empty());
        assert_eq!(parsed.sections.full_text, text);
    }
}
