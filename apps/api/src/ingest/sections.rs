//! Section header vocabulary and segmentation of resume lines into blocks.

use crate::ingest::lines::{strip_bullet, Line};
use crate::models::resume::SectionKind;

/// Header spellings per section, compared after normalization.
const SECTION_HEADERS: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::Summary,
        &[
            "summary",
            "professional summary",
            "career summary",
            "executive summary",
            "objective",
            "career objective",
            "profile",
            "professional profile",
            "personal profile",
            "about me",
            "about",
            "overview",
        ],
    ),
    (
        SectionKind::Experience,
        &[
            "experience",
            "work experience",
            "professional experience",
            "relevant experience",
            "work history",
            "employment",
            "employment history",
            "career history",
            "professional background",
        ],
    ),
    (
        SectionKind::Education,
        &[
            "education",
            "academic background",
            "academic history",
            "academics",
            "education and training",
            "education & training",
        ],
    ),
    (
        SectionKind::Skills,
        &[
            "skills",
            "technical skills",
            "key skills",
            "core skills",
            "core competencies",
            "competencies",
            "skills & abilities",
            "skills and abilities",
            "technologies",
            "tech stack",
            "areas of expertise",
            "expertise",
        ],
    ),
    (
        SectionKind::Projects,
        &[
            "projects",
            "personal projects",
            "key projects",
            "selected projects",
            "side projects",
            "academic projects",
        ],
    ),
    (
        SectionKind::Certifications,
        &[
            "certifications",
            "certificates",
            "certification",
            "licenses",
            "licenses & certifications",
            "licenses and certifications",
            "certifications & licenses",
            "certifications and licenses",
            "professional certifications",
        ],
    ),
    (
        SectionKind::Languages,
        &["languages", "language skills", "spoken languages"],
    ),
    (
        SectionKind::Volunteer,
        &[
            "volunteer",
            "volunteering",
            "volunteer experience",
            "volunteer work",
            "community service",
            "community involvement",
        ],
    ),
    (
        SectionKind::Awards,
        &[
            "awards",
            "honors",
            "honors & awards",
            "awards & honors",
            "honors and awards",
            "awards and honors",
            "achievements",
            "accomplishments",
        ],
    ),
    (
        SectionKind::Publications,
        &["publications", "research publications", "papers"],
    ),
    (
        SectionKind::References,
        &["references", "professional references"],
    ),
    (
        SectionKind::Hobbies,
        &[
            "hobbies",
            "interests",
            "hobbies & interests",
            "hobbies and interests",
            "personal interests",
        ],
    ),
    (
        SectionKind::Affiliations,
        &[
            "affiliations",
            "professional affiliations",
            "memberships",
            "professional memberships",
            "organizations",
        ],
    ),
    (
        SectionKind::Courses,
        &[
            "courses",
            "coursework",
            "relevant coursework",
            "training",
            "professional development",
        ],
    ),
];

const MAX_HEADER_WORDS: usize = 5;
const MAX_HEADER_CHARS: usize = 40;

/// Words that mark a capitalized line as an organization rather than a heading.
const ORGANIZATION_MARKERS: &[&str] = &[
    "inc", "llc", "ltd", "corp", "corporation", "company", "co", "gmbh", "university", "college",
    "institute", "school", "group", "labs",
];

fn normalize_header(line: &str) -> String {
    let stripped = line
        .trim()
        .trim_matches(|c: char| matches!(c, '#' | '*' | '=' | '_' | '-' | ':' | '|' | '~'))
        .trim();
    let words: Vec<&str> = stripped.split_whitespace().collect();
    // "E X P E R I E N C E" style letter-spaced headings.
    let joined = if words.len() > 3 && words.iter().all(|w| w.chars().count() == 1) {
        words.concat()
    } else {
        words.join(" ")
    };
    joined.to_lowercase()
}

/// Recognizes a section header line.
pub fn classify_header(line: &str) -> Option<SectionKind> {
    if line.trim().chars().count() > MAX_HEADER_CHARS || strip_bullet(line).is_some() {
        return None;
    }
    let normalized = normalize_header(line);
    if normalized.is_empty() || normalized.split_whitespace().count() > MAX_HEADER_WORDS {
        return None;
    }
    SECTION_HEADERS
        .iter()
        .find(|(_, names)| names.contains(&normalized.as_str()))
        .map(|(kind, _)| *kind)
}

/// A short ALL-CAPS line that reads like a heading but names no known section.
fn looks_like_unknown_header(line: &str) -> bool {
    let trimmed = line.trim().trim_end_matches(':').trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_HEADER_CHARS {
        return false;
    }
    let allowed = |c: char| c.is_alphabetic() || c.is_whitespace() || matches!(c, '&' | '/' | '-');
    if !trimmed.chars().all(allowed) {
        return false;
    }
    let letters = trimmed.chars().filter(|c| c.is_alphabetic()).count();
    if letters < 4 || trimmed.chars().any(char::is_lowercase) {
        return false;
    }
    let words: Vec<String> = trimmed
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    words.len() <= 4
        && !words
            .iter()
            .any(|w| ORGANIZATION_MARKERS.contains(&w.trim_matches('.')))
}

/// Lines under one header. `kind` is `None` for headings that name no known section.
#[derive(Debug, Clone)]
pub struct SectionBlock<'a> {
    pub kind: Option<SectionKind>,
    pub header: Line<'a>,
    pub body: Vec<Line<'a>>,
}

/// Everything before the first header, and the header-delimited blocks after it.
#[derive(Debug, Clone, Default)]
pub struct Segmented<'a> {
    pub preamble: Vec<Line<'a>>,
    pub blocks: Vec<SectionBlock<'a>>,
}

/// Splits lines at recognized headers.
///
/// Unknown ALL-CAPS headings open an untyped block once at least one known header has
/// been seen, and only when preceded by a blank line.
pub fn segment<'a>(lines: &[Line<'a>]) -> Segmented<'a> {
    let mut out = Segmented::default();
    let mut previous_blank = true;

    for line in lines {
        let kind = classify_header(line.text);
        let unknown = kind.is_none()
            && !out.blocks.is_empty()
            && previous_blank
            && looks_like_unknown_header(line.text);
        previous_blank = line.is_blank();

        if kind.is_some() || unknown {
            out.blocks.push(SectionBlock {
                kind,
                header: *line,
                body: Vec::new(),
            });
            continue;
        }
        match out.blocks.last_mut() {
            Some(block) => block.body.push(*line),
            None => out.preamble.push(*line),
        }
    }
    out
}
