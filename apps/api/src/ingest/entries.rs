//! Per-section entry parsers.
//!
//! Each parser takes the body lines of one section and returns the entries it could
//! reconcile plus the byte spans of any lines it could not.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::ingest::contact::{has_title_word, looks_like_location, EMAIL, PHONE, URL};
use crate::ingest::dates::{find_date_range, find_single_date, DateRange};
use crate::ingest::lines::{
    content_span, highlight_text, remove_span, split_list, split_segments, strip_bullet, tidy,
    Line,
};
use crate::models::resume::{
    AffiliationEntry, AwardEntry, CertificationEntry, CourseEntry, CustomSection,
    EducationEntry, ExperienceEntry, LanguageEntry, ProjectEntry, PublicationEntry,
    ReferenceEntry, SkillCategory, SkillItem, VolunteerEntry,
};

pub type Span = (usize, usize);

#[derive(Debug, Clone)]
pub struct Parsed<T> {
    pub items: Vec<T>,
    pub leftovers: Vec<Span>,
}

impl<T> Default for Parsed<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            leftovers: Vec::new(),
        }
    }
}

/// Grows an optional span to cover `line`.
fn touch(span: &mut Option<Span>, line: &Line<'_>) {
    *span = Some(match *span {
        Some((start, _)) => (start, line.end),
        None => (line.start, line.end),
    });
}

/// Removes the first date range (or, failing that, a single date) from `text`.
fn take_dates(text: &str) -> (Option<DateRange>, Option<String>, String) {
    if let Some((range, span)) = find_date_range(text) {
        return (Some(range), None, remove_span(text, span.start, span.end));
    }
    if let Some((date, span)) = find_single_date(text) {
        return (None, Some(date), remove_span(text, span.start, span.end));
    }
    (None, None, tidy(text))
}

// ────────────────────────────────────────────────────────────────────────────
// Experience and volunteer roles
// ────────────────────────────────────────────────────────────────────────────

static AT_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s+(?:at|@)\s+(.+)$").expect("valid regex"));

const MAX_HEADING_WORDS: usize = 12;

#[derive(Debug, Clone, Default)]
struct RoleDraft {
    organization: String,
    role: String,
    location: String,
    start_date: String,
    end_date: String,
    current: bool,
    description: Vec<String>,
    highlights: Vec<String>,
    span: Option<Span>,
}

impl RoleDraft {
    fn has_heading(&self) -> bool {
        !self.organization.is_empty() || !self.role.is_empty()
    }

    fn has_dates(&self) -> bool {
        !self.start_date.is_empty() || !self.end_date.is_empty() || self.current
    }

    fn has_body(&self) -> bool {
        !self.highlights.is_empty() || !self.description.is_empty()
    }

    fn is_valid(&self) -> bool {
        self.has_heading() || !self.highlights.is_empty()
    }

    fn set_dates(&mut self, range: Option<DateRange>, single: Option<String>) {
        if let Some(range) = range {
            self.start_date = range.start;
            self.end_date = range.end;
            self.current = range.current;
        } else if let Some(date) = single {
            if self.start_date.is_empty() {
                self.start_date = date;
            }
        }
    }

    fn set_heading(&mut self, organization: &str, role: &str) {
        if self.organization.is_empty() {
            self.organization = organization.to_string();
        }
        if self.role.is_empty() {
            self.role = role.to_string();
        }
    }
}

/// Splits a heading line into (organization, role, location).
fn parse_role_heading(text: &str) -> Option<(String, String, String)> {
    if text.split_whitespace().count() > MAX_HEADING_WORDS || text.ends_with('.') {
        return None;
    }
    if let Some(caps) = AT_HEADING.captures(text) {
        let role = caps.get(1)?.as_str().trim();
        let rest = caps.get(2)?.as_str().trim();
        let mut parts = split_segments(rest).into_iter();
        let organization = parts.next().unwrap_or(rest).to_string();
        let location = parts.find(|p| looks_like_location(p)).unwrap_or_default();
        return Some((organization, role.to_string(), location.to_string()));
    }
    let segments = split_segments(text);
    if segments.len() < 2 {
        return None;
    }
    let mut location = String::new();
    let mut names: Vec<&str> = Vec::new();
    for seg in &segments {
        if location.is_empty() && looks_like_location(seg) {
            location = seg.to_string();
        } else if names.len() < 2 {
            names.push(*seg);
        }
    }
    match names.as_slice() {
        [first, second] => {
            // Default reading is "Company, Position"; flip when only the first side reads as a title.
            if has_title_word(first) && !has_title_word(second) {
                Some((second.to_string(), first.to_string(), location))
            } else {
                Some((first.to_string(), second.to_string(), location))
            }
        }
        _ => None,
    }
}

fn parse_roles(lines: &[Line<'_>]) -> Parsed<RoleDraft> {
    let mut out = Parsed::default();
    let mut current = RoleDraft::default();
    let mut after_blank = false;

    let flush = |draft: &mut RoleDraft, out: &mut Parsed<RoleDraft>| {
        let finished = std::mem::take(draft);
        if finished.span.is_none() {
            return;
        }
        if finished.is_valid() {
            out.items.push(finished);
        } else if let Some(span) = finished.span {
            out.leftovers.push(span);
        }
    };

    for line in lines {
        if line.is_blank() {
            after_blank = current.span.is_some();
            continue;
        }

        if let Some(bullet) = strip_bullet(line.text) {
            if after_blank && !current.has_heading() && current.has_body() {
                flush(&mut current, &mut out);
            }
            current.highlights.push(highlight_text(bullet));
            touch(&mut current.span, line);
            after_blank = false;
            continue;
        }

        let (range, single, rest) = take_dates(line.trimmed());
        let heading = if rest.is_empty() {
            None
        } else {
            parse_role_heading(&rest)
        };
        let dates_only = rest.is_empty() && (range.is_some() || single.is_some());

        let starts_new = if heading.is_some() {
            current.has_heading()
        } else if dates_only {
            current.has_dates() && current.has_body()
        } else if !rest.is_empty() {
            (after_blank && current.has_heading() && current.has_body())
                || (has_title_word(&rest) && !current.highlights.is_empty())
        } else {
            false
        };
        if starts_new {
            flush(&mut current, &mut out);
        }
        after_blank = false;
        touch(&mut current.span, line);
        current.set_dates(range, single);

        if let Some((organization, role, location)) = heading {
            current.set_heading(&organization, &role);
            if current.location.is_empty() {
                current.location = location;
            }
        } else if !rest.is_empty() {
            if current.highlights.is_empty() && current.description.is_empty() {
                if current.role.is_empty() && (has_title_word(&rest) || !current.organization.is_empty()) {
                    current.role = rest;
                } else if current.organization.is_empty() {
                    current.organization = rest;
                } else if current.location.is_empty() && looks_like_location(&rest) {
                    current.location = rest;
                } else {
                    current.description.push(rest);
                }
            } else {
                current.description.push(rest);
            }
        }
    }
    flush(&mut current, &mut out);
    out
}

pub fn parse_experience(lines: &[Line<'_>]) -> Parsed<ExperienceEntry> {
    let roles = parse_roles(lines);
    Parsed {
        items: roles
            .items
            .into_iter()
            .map(|d| ExperienceEntry {
                id: Uuid::new_v4(),
                company: d.organization,
                position: d.role,
                location: d.location,
                start_date: d.start_date,
                end_date: d.end_date,
                current: d.current,
                description: d.description.join(" "),
                highlights: d.highlights,
            })
            .collect(),
        leftovers: roles.leftovers,
    }
}

pub fn parse_volunteer(lines: &[Line<'_>]) -> Parsed<VolunteerEntry> {
    let roles = parse_roles(lines);
    Parsed {
        items: roles
            .items
            .into_iter()
            .map(|d| VolunteerEntry {
                id: Uuid::new_v4(),
                organization: d.organization,
                role: d.role,
                location: d.location,
                start_date: d.start_date,
                end_date: d.end_date,
                current: d.current,
                description: d.description.join(" "),
                highlights: d.highlights,
            })
            .collect(),
        leftovers: roles.leftovers,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

static DEGREE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:(?i:bachelor(?:'s)?|master(?:'s)?|associate(?:'s)?\s+(?:degree|of)|doctor(?:ate)?|diploma|high\s+school)|B\.?A|B\.?S|B\.?Sc|M\.?S|M\.?A|M\.?Sc|B\.?Eng|M\.?Eng|B\.?Tech|M\.?Tech|B\.?Com|Ph\.?D|MBA|BBA)\b\.?",
    )
    .expect("valid regex")
});

static DEGREE_IN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+in\s+").expect("valid regex"));

static GPA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bGPA\s*[:\-]?\s*([0-9](?:\.[0-9]{1,2})?(?:\s*/\s*[0-9](?:\.[0-9]{1,2})?)?)")
        .expect("valid regex")
});

const INSTITUTION_WORDS: &[&str] = &[
    "university",
    "college",
    "institute",
    "school",
    "academy",
    "polytechnic",
    "conservatory",
];

pub(crate) fn has_degree(text: &str) -> bool {
    DEGREE.is_match(text)
}

pub(crate) fn starts_with_degree(text: &str) -> bool {
    DEGREE.find(text.trim_start()).is_some_and(|m| m.start() == 0)
}

pub(crate) fn has_institution_word(text: &str) -> bool {
    let lower = text.to_lowercase();
    INSTITUTION_WORDS.iter().any(|w| lower.contains(w))
}

/// "B.S. in Computer Science" -> ("B.S.", "Computer Science").
fn split_degree(segment: &str) -> (String, String) {
    if let Some(m) = DEGREE_IN.find(segment) {
        let degree = segment[..m.start()].trim();
        let field = segment[m.end()..].trim();
        if !degree.is_empty() && !field.is_empty() {
            return (degree.to_string(), field.to_string());
        }
    }
    if let Some(m) = DEGREE.find(segment) {
        let abbreviation = !m.as_str().contains(char::is_whitespace) && m.as_str().len() <= 6;
        let rest = tidy(&segment[m.end()..]);
        if m.start() == 0 && abbreviation && !rest.is_empty() {
            return (m.as_str().to_string(), rest);
        }
    }
    (segment.to_string(), String::new())
}

#[derive(Debug, Default)]
struct EducationDraft {
    entry: EducationEntry,
    description: Vec<String>,
    span: Option<Span>,
}

impl EducationDraft {
    fn is_valid(&self) -> bool {
        !self.entry.institution.is_empty() || !self.entry.degree.is_empty()
    }
}

pub fn parse_education(lines: &[Line<'_>]) -> Parsed<EducationEntry> {
    let mut out = Parsed::default();
    let mut current = EducationDraft::default();

    let flush = |draft: &mut EducationDraft, out: &mut Parsed<EducationEntry>| {
        let mut finished = std::mem::take(draft);
        let Some(span) = finished.span else {
            return;
        };
        if finished.is_valid() {
            finished.entry.id = Uuid::new_v4();
            finished.entry.description = finished.description.join(" ");
            out.items.push(finished.entry);
        } else {
            out.leftovers.push(span);
        }
    };

    for line in lines {
        if line.is_blank() {
            continue;
        }
        let raw = strip_bullet(line.text).unwrap_or(line.trimmed());
        let mut text = raw.to_string();
        if let Some(caps) = GPA.captures(raw) {
            if let (Some(whole), Some(value)) = (caps.get(0), caps.get(1)) {
                current.entry.gpa = value.as_str().to_string();
                text = remove_span(raw, whole.start(), whole.end());
            }
        }

        if strip_bullet(line.text).is_some() {
            touch(&mut current.span, line);
            if !text.is_empty() {
                current.entry.highlights.push(highlight_text(&text));
            }
            continue;
        }

        let (range, single, rest) = take_dates(&text);
        let segments = split_segments(&rest);
        let opens_entry = segments.iter().any(|s| {
            (has_institution_word(s) && !current.entry.institution.is_empty())
                || (has_degree(s) && !current.entry.degree.is_empty())
        });
        if opens_entry {
            flush(&mut current, &mut out);
        }
        touch(&mut current.span, line);

        if let Some(range) = range {
            current.entry.start_date = range.start;
            current.entry.end_date = range.end;
        } else if let Some(date) = single {
            // A lone date on an education line is the graduation date.
            current.entry.end_date = date;
        }

        for seg in segments {
            if has_degree(seg) && current.entry.degree.is_empty() {
                let (degree, field) = split_degree(seg);
                current.entry.degree = degree;
                current.entry.field = field;
            } else if has_institution_word(seg) && current.entry.institution.is_empty() {
                current.entry.institution = seg.to_string();
            } else if looks_like_location(seg) && current.entry.location.is_empty() {
                current.entry.location = seg.to_string();
            } else if current.entry.institution.is_empty() && current.description.is_empty() {
                current.entry.institution = seg.to_string();
            } else {
                current.description.push(seg.to_string());
            }
        }
    }
    flush(&mut current, &mut out);
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

static LEVEL_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?)\s*\((expert|advanced|proficient|intermediate|familiar|basic|beginner)\)$")
        .expect("valid regex")
});

const OVERFLOW_CATEGORY: &str = "Other";

fn skill_item(raw: &str) -> SkillItem {
    if let Some(caps) = LEVEL_SUFFIX.captures(raw) {
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or(raw);
        let level = caps.get(2).map(|m| m.as_str().to_lowercase()).unwrap_or_default();
        let proficiency = match level.as_str() {
            "expert" => 5,
            "advanced" | "proficient" => 4,
            "intermediate" => 3,
            "familiar" | "basic" => 2,
            _ => 1,
        };
        return SkillItem {
            name: name.trim().to_string(),
            proficiency,
        };
    }
    SkillItem {
        name: raw.to_string(),
        ..Default::default()
    }
}

pub fn parse_skills(lines: &[Line<'_>]) -> Parsed<SkillCategory> {
    let mut out = Parsed::default();
    let mut overflow: Vec<SkillItem> = Vec::new();

    for line in lines.iter().filter(|l| !l.is_blank()) {
        let text = strip_bullet(line.text).unwrap_or(line.trimmed());
        match text.split_once(':') {
            Some((category, items)) if !category.trim().is_empty() && category.len() <= 40 => {
                let items: Vec<SkillItem> = split_list(items).iter().map(|s| skill_item(s)).collect();
                if items.is_empty() {
                    out.leftovers.push((line.start, line.end));
                    continue;
                }
                out.items.push(SkillCategory {
                    id: Uuid::new_v4(),
                    category: category.trim().to_string(),
                    items,
                });
            }
            _ => overflow.extend(split_list(text).iter().map(|s| skill_item(s))),
        }
    }
    if !overflow.is_empty() {
        out.items.push(SkillCategory {
            id: Uuid::new_v4(),
            category: OVERFLOW_CATEGORY.to_string(),
            items: overflow,
        });
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Projects
// ────────────────────────────────────────────────────────────────────────────

static TECH_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:technologies|tech stack|tech|stack|built with|tools)\s*[:\-]\s*(.+)$")
        .expect("valid regex")
});

#[derive(Debug, Default)]
struct ProjectDraft {
    entry: ProjectEntry,
    description: Vec<String>,
    span: Option<Span>,
}

pub fn parse_projects(lines: &[Line<'_>]) -> Parsed<ProjectEntry> {
    let mut out = Parsed::default();
    let mut current = ProjectDraft::default();
    let mut after_blank = false;

    let flush = |draft: &mut ProjectDraft, out: &mut Parsed<ProjectEntry>| {
        let mut finished = std::mem::take(draft);
        let Some(span) = finished.span else {
            return;
        };
        if finished.entry.name.is_empty() {
            out.leftovers.push(span);
        } else {
            finished.entry.id = Uuid::new_v4();
            finished.entry.description = finished.description.join(" ");
            out.items.push(finished.entry);
        }
    };

    for line in lines {
        if line.is_blank() {
            after_blank = current.span.is_some();
            continue;
        }
        let bullet = strip_bullet(line.text);
        let text = bullet.unwrap_or(line.trimmed());

        if let Some(caps) = TECH_PREFIX.captures(text) {
            touch(&mut current.span, line);
            if let Some(list) = caps.get(1) {
                current.entry.technologies.extend(split_list(list.as_str()));
            }
            after_blank = false;
            continue;
        }
        if let Some(bullet) = bullet {
            touch(&mut current.span, line);
            current.entry.highlights.push(highlight_text(bullet));
            after_blank = false;
            continue;
        }

        let mut rest = text.to_string();
        let url = URL.find(&rest).map(|m| (m.as_str().to_string(), m.range()));
        if let Some((_, range)) = &url {
            rest = remove_span(&rest, range.start, range.end);
        }
        let (range, single, rest) = take_dates(&rest);

        let has_body = !current.entry.highlights.is_empty() || !current.description.is_empty();
        if !current.entry.name.is_empty() && !rest.is_empty() && (after_blank || has_body) {
            flush(&mut current, &mut out);
        }
        after_blank = false;
        touch(&mut current.span, line);

        if let Some((url, _)) = url {
            if current.entry.url.is_empty() {
                current.entry.url = url;
            }
        }
        if let Some(range) = range {
            current.entry.start_date = range.start;
            current.entry.end_date = range.end;
        } else if let Some(date) = single {
            current.entry.start_date = date;
        }
        if rest.is_empty() {
            continue;
        }
        if current.entry.name.is_empty() {
            let mut segments = split_segments(&rest).into_iter();
            if let Some(name) = segments.next() {
                current.entry.name = name.to_string();
            }
            for seg in segments {
                if seg.contains(',') {
                    current.entry.technologies.extend(split_list(seg));
                } else {
                    current.description.push(seg.to_string());
                }
            }
        } else {
            current.description.push(rest);
        }
    }
    flush(&mut current, &mut out);
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Line-per-entry sections
// ────────────────────────────────────────────────────────────────────────────

static CREDENTIAL_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:credential\s*id|license\s*(?:no\.?|number)|cert(?:ificate)?\s*id)\s*[:#]?\s*([A-Za-z0-9-]+)")
        .expect("valid regex")
});

static EXPIRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:expires?|expiration|expiry|valid\s+until)\s*:?\s*").expect("valid regex")
});

static ISSUED_BY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.+?)\s*(?:,\s*)?\b(?:issued\s+by|by)\s+(.+)$").expect("valid regex"));

static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s*\(([^)]+)\)\s*$").expect("valid regex"));

fn body_lines<'a, 'b>(lines: &'b [Line<'a>]) -> impl Iterator<Item = (&'b Line<'a>, &'a str)> {
    lines
        .iter()
        .filter(|l| !l.is_blank())
        .map(|l| (l, strip_bullet(l.text).unwrap_or(l.trimmed())))
}

pub fn parse_certifications(lines: &[Line<'_>]) -> Parsed<CertificationEntry> {
    let mut out: Parsed<CertificationEntry> = Parsed::default();

    for (line, text) in body_lines(lines) {
        let mut rest = text.to_string();
        let mut entry = CertificationEntry {
            id: Uuid::new_v4(),
            ..Default::default()
        };

        let credential = CREDENTIAL_ID
            .captures(&rest)
            .and_then(|caps| Some((caps.get(0)?.range(), caps.get(1)?.as_str().to_string())));
        if let Some((span, id)) = credential {
            entry.credential_id = id;
            rest = remove_span(&rest, span.start, span.end);
        }
        if let Some(m) = URL.find(&rest) {
            entry.url = m.as_str().to_string();
            rest = remove_span(&rest, m.start(), m.end());
        }
        if let Some(m) = EXPIRY.find(&rest) {
            if let Some((date, span)) = find_single_date(&rest[m.end()..]) {
                entry.expiry_date = date;
                rest = remove_span(&rest, m.start(), m.end() + span.end);
            }
        }
        if let Some((date, span)) = find_single_date(&rest) {
            entry.date = date;
            rest = remove_span(&rest, span.start, span.end);
        }

        if let Some(caps) = PARENTHETICAL.captures(&rest) {
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default().to_string();
            let issuer = caps.get(2).map(|m| tidy(m.as_str())).unwrap_or_default();
            entry.name = name;
            entry.issuer = issuer;
        } else if let Some(caps) = ISSUED_BY.captures(&rest) {
            entry.name = caps.get(1).map(|m| tidy(m.as_str())).unwrap_or_default();
            entry.issuer = caps.get(2).map(|m| tidy(m.as_str())).unwrap_or_default();
        } else {
            let segments = split_segments(&rest);
            match segments.as_slice() {
                [only] => match only.split_once(',') {
                    Some((name, issuer)) => {
                        entry.name = name.trim().to_string();
                        entry.issuer = issuer.trim().to_string();
                    }
                    None => entry.name = only.to_string(),
                },
                [name, issuer, ..] => {
                    entry.name = name.to_string();
                    entry.issuer = issuer.to_string();
                }
                [] => {}
            }
        }

        if entry.name.is_empty() {
            // A continuation line carrying only a date or id belongs to the previous entry.
            match out.items.last_mut() {
                Some(prev) if !entry.date.is_empty() || !entry.credential_id.is_empty() => {
                    if prev.date.is_empty() {
                        prev.date = entry.date;
                    }
                    if prev.credential_id.is_empty() {
                        prev.credential_id = entry.credential_id;
                    }
                    if prev.expiry_date.is_empty() {
                        prev.expiry_date = entry.expiry_date;
                    }
                }
                _ => out.leftovers.push((line.start, line.end)),
            }
            continue;
        }
        out.items.push(entry);
    }
    out
}

static LANGUAGE_LEVEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([\p{L} ]+?)\s*(?:\(([^)]+)\)|[:\-–—]\s*(.+))?$").expect("valid regex")
});

pub fn parse_languages(lines: &[Line<'_>]) -> Parsed<LanguageEntry> {
    let mut out = Parsed::default();
    for (line, text) in body_lines(lines) {
        let mut found = false;
        for item in split_list(text) {
            let Some(caps) = LANGUAGE_LEVEL.captures(&item) else {
                continue;
            };
            let language = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            if language.is_empty() || language.split_whitespace().count() > 3 {
                continue;
            }
            let proficiency = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            out.items.push(LanguageEntry {
                id: Uuid::new_v4(),
                language: language.to_string(),
                proficiency,
            });
            found = true;
        }
        if !found {
            out.leftovers.push((line.start, line.end));
        }
    }
    out
}

pub fn parse_awards(lines: &[Line<'_>]) -> Parsed<AwardEntry> {
    let mut out: Parsed<AwardEntry> = Parsed::default();
    for (line, text) in body_lines(lines) {
        let (range, single, rest) = take_dates(text);
        let date = range.map(|r| r.start).or(single).unwrap_or_default();
        if rest.is_empty() {
            match out.items.last_mut() {
                Some(prev) if prev.date.is_empty() && !date.is_empty() => prev.date = date,
                _ => out.leftovers.push((line.start, line.end)),
            }
            continue;
        }
        let (title, issuer, description) = match PARENTHETICAL.captures(&rest) {
            Some(caps) => (
                caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
                caps.get(2).map(|m| tidy(m.as_str())).unwrap_or_default(),
                String::new(),
            ),
            None => {
                let mut segments = split_segments(&rest).into_iter();
                let title = segments.next().unwrap_or_default().to_string();
                let issuer = segments.next().unwrap_or_default().to_string();
                let description = segments.collect::<Vec<_>>().join(" ");
                (title, issuer, description)
            }
        };
        out.items.push(AwardEntry {
            id: Uuid::new_v4(),
            title,
            issuer,
            date,
            description,
        });
    }
    out
}

static QUOTED_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["“]([^"”]+)["”]"#).expect("valid regex"));

pub fn parse_publications(lines: &[Line<'_>]) -> Parsed<PublicationEntry> {
    let mut out = Parsed::default();
    for (_, text) in body_lines(lines) {
        let mut rest = text.to_string();
        let mut entry = PublicationEntry {
            id: Uuid::new_v4(),
            ..Default::default()
        };
        if let Some(m) = URL.find(&rest) {
            entry.url = m.as_str().to_string();
            rest = remove_span(&rest, m.start(), m.end());
        }
        if let Some((date, span)) = find_single_date(&rest) {
            entry.date = date;
            rest = remove_span(&rest, span.start, span.end);
        }
        if let Some(caps) = QUOTED_TITLE.captures(&rest) {
            if let (Some(whole), Some(title)) = (caps.get(0), caps.get(1)) {
                entry.title = title.as_str().trim().to_string();
                let before = tidy(&rest[..whole.start()]);
                let after = tidy(&rest[whole.end()..]);
                entry.publisher = after;
                entry.description = before;
            }
        } else {
            let mut segments = split_segments(&rest).into_iter();
            entry.title = segments.next().unwrap_or_default().to_string();
            entry.publisher = segments.next().unwrap_or_default().to_string();
            entry.description = segments.collect::<Vec<_>>().join(" ");
        }
        if entry.title.is_empty() {
            entry.title = rest;
        }
        if !entry.title.is_empty() {
            out.items.push(entry);
        }
    }
    out
}

static UPON_REQUEST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:available\s+)?(?:up)?on\s+request\b").expect("valid regex"));

static RELATIONSHIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^relationship\s*:\s*(.+)$").expect("valid regex"));

pub fn parse_references(lines: &[Line<'_>]) -> Parsed<ReferenceEntry> {
    let mut out = Parsed::default();
    for block in lines.split(|l| l.is_blank()).filter(|b| !b.is_empty()) {
        let Some(span) = content_span(block) else {
            continue;
        };
        let block_text: Vec<&str> = block.iter().map(|l| l.trimmed()).collect();
        if block_text.iter().any(|t| UPON_REQUEST.is_match(t)) {
            continue;
        }
        let mut entry = ReferenceEntry {
            id: Uuid::new_v4(),
            ..Default::default()
        };
        for text in block_text {
            let text = strip_bullet(text).unwrap_or(text);
            let mut rest = text.to_string();
            if let Some(m) = EMAIL.find(&rest) {
                entry.email = m.as_str().to_string();
                rest = remove_span(&rest, m.start(), m.end());
            }
            if let Some(m) = PHONE.find(&rest) {
                entry.phone = m.as_str().trim().to_string();
                rest = remove_span(&rest, m.start(), m.end());
            }
            if rest.is_empty() {
                continue;
            }
            let relationship = RELATIONSHIP
                .captures(&rest)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string());
            let qualified = PARENTHETICAL.captures(&rest).and_then(|caps| {
                Some((
                    caps.get(1)?.as_str().trim().to_string(),
                    caps.get(2)?.as_str().trim().to_string(),
                ))
            });
            if let Some(relationship) = relationship {
                entry.relationship = relationship;
            } else if entry.name.is_empty() {
                match qualified {
                    Some((name, relationship)) => {
                        entry.name = name;
                        entry.relationship = relationship;
                    }
                    None => entry.name = rest,
                }
            } else if entry.title.is_empty() {
                match parse_role_heading(&rest) {
                    Some((company, title, _)) => {
                        entry.title = title;
                        entry.company = company;
                    }
                    None => match rest.split_once(',') {
                        Some((title, company)) => {
                            entry.title = title.trim().to_string();
                            entry.company = company.trim().to_string();
                        }
                        None => entry.title = rest,
                    },
                }
            } else if entry.company.is_empty() {
                entry.company = rest;
            }
        }
        if entry.name.is_empty() {
            out.leftovers.push(span);
        } else {
            out.items.push(entry);
        }
    }
    out
}

const AFFILIATION_ROLES: &[&str] = &[
    "member", "chair", "co-chair", "president", "vice president", "board member", "fellow",
    "treasurer", "secretary", "founder", "volunteer", "mentor", "organizer", "lead",
];

pub fn parse_affiliations(lines: &[Line<'_>]) -> Parsed<AffiliationEntry> {
    let mut out = Parsed::default();
    for (line, text) in body_lines(lines) {
        let (range, single, rest) = take_dates(text);
        if rest.is_empty() {
            out.leftovers.push((line.start, line.end));
            continue;
        }
        let mut entry = AffiliationEntry {
            id: Uuid::new_v4(),
            ..Default::default()
        };
        if let Some(range) = range {
            entry.start_date = range.start;
            entry.end_date = range.end;
        } else if let Some(date) = single {
            entry.start_date = date;
        }
        let role_first = rest.split_once(',').filter(|(role, _)| {
            AFFILIATION_ROLES.contains(&role.trim().to_lowercase().as_str())
        });
        if let Some((role, organization)) = role_first {
            entry.role = role.trim().to_string();
            entry.organization = organization.trim().to_string();
        } else if let Some((organization, role, _)) = parse_role_heading(&rest) {
            let role_is_first = AFFILIATION_ROLES.contains(&organization.to_lowercase().as_str());
            if role_is_first {
                entry.role = organization;
                entry.organization = role;
            } else {
                entry.organization = organization;
                entry.role = role;
            }
        } else {
            entry.organization = rest;
        }
        out.items.push(entry);
    }
    out
}

static COURSEWORK_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:relevant\s+)?(?:coursework|courses)\s*:\s*").expect("valid regex")
});

pub fn parse_courses(lines: &[Line<'_>]) -> Parsed<CourseEntry> {
    let mut out = Parsed::default();
    for (line, text) in body_lines(lines) {
        let text = match COURSEWORK_PREFIX.find(text) {
            Some(m) => &text[m.end()..],
            None => text,
        };
        let (range, single, rest) = take_dates(text);
        let date = range.map(|r| r.start).or(single).unwrap_or_default();
        if rest.is_empty() {
            out.leftovers.push((line.start, line.end));
            continue;
        }
        let segments = split_segments(&rest);
        // "Algorithms, Operating Systems, Databases" lists several courses on one line.
        if segments.len() == 1 && rest.matches(',').count() >= 2 {
            for name in split_list(&rest) {
                out.items.push(CourseEntry {
                    id: Uuid::new_v4(),
                    name,
                    date: date.clone(),
                    ..Default::default()
                });
            }
            continue;
        }
        let (name, institution) = match PARENTHETICAL.captures(&rest) {
            Some(caps) => (
                caps.get(1).map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
                caps.get(2).map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
            ),
            None => (
                segments.first().map(|s| s.to_string()).unwrap_or_default(),
                segments.get(1).map(|s| s.to_string()).unwrap_or_default(),
            ),
        };
        out.items.push(CourseEntry {
            id: Uuid::new_v4(),
            name,
            institution,
            date,
            description: segments.get(2..).map(|s| s.join(" ")).unwrap_or_default(),
        });
    }
    out
}

/// Hobby items split across separators and lines.
pub fn parse_hobbies(lines: &[Line<'_>]) -> Vec<String> {
    body_lines(lines)
        .flat_map(|(_, text)| split_list(text))
        .filter(|item| item.chars().count() <= 60)
        .collect()
}

/// Custom section from free text: first line is the title, the rest are items.
pub fn parse_custom_section(lines: &[Line<'_>]) -> Option<CustomSection> {
    let mut body = body_lines(lines);
    let (_, title) = body.next()?;
    Some(CustomSection {
        id: Uuid::new_v4(),
        title: title.trim_end_matches(':').trim().to_string(),
        items: body.map(|(_, text)| text.to_string()).collect(),
    })
}
