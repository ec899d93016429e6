//! Plain-text resume import: contact block, section segmentation, entry parsing.
//!
//! Anything that cannot be reconciled with a section is kept as an [`UnmatchedChunk`]
//! with byte offsets into the original text, so the review step can reassign it.

pub mod contact;
pub mod dates;
pub mod entries;
pub mod extract;
pub mod handlers;
pub mod lines;
pub mod sections;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ingest::contact::extract_contact;
use crate::ingest::entries::{Parsed, Span};
use crate::ingest::lines::{content_span, split_lines, Line};
use crate::ingest::sections::{classify_header, segment};
use crate::models::resume::{
    truncate_chars, ContactData, HobbiesData, PartialResumeData, SectionEntry, SectionKind,
    SummaryData, MAX_SUMMARY_CHARS,
};

/// A span of the source text that no section claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedChunk {
    pub text: String,
    /// Byte offset of the first character in the original text.
    pub start_offset: usize,
    /// Byte offset one past the last character.
    pub end_offset: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeParseResult {
    pub data: PartialResumeData,
    pub unmatched_chunks: Vec<UnmatchedChunk>,
}

fn chunk(text: &str, (start, end): Span) -> Option<UnmatchedChunk> {
    let slice = text.get(start..end)?;
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lead = slice.len() - slice.trim_start().len();
    Some(UnmatchedChunk {
        text: trimmed.to_string(),
        start_offset: start + lead,
        end_offset: start + lead + trimmed.len(),
    })
}

/// Groups consecutive non-blank lines into spans.
fn runs(lines: &[Line<'_>]) -> Vec<Span> {
    lines
        .split(|l| l.is_blank())
        .filter_map(content_span)
        .collect()
}

/// Content parsed out of one section body.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    Contact(ContactData),
    Summary(String),
    Hobbies(Vec<String>),
    Entries(Vec<SectionEntry>),
}

impl SectionContent {
    pub fn is_empty(&self) -> bool {
        match self {
            SectionContent::Contact(c) => c.is_empty(),
            SectionContent::Summary(s) => s.trim().is_empty(),
            SectionContent::Hobbies(items) => items.is_empty(),
            SectionContent::Entries(entries) => entries.is_empty(),
        }
    }
}

fn wrap<T>(parsed: Parsed<T>, f: impl Fn(T) -> SectionEntry) -> (SectionContent, Vec<Span>) {
    (
        SectionContent::Entries(parsed.items.into_iter().map(f).collect()),
        parsed.leftovers,
    )
}

/// Runs the parser for `kind` over section body lines.
fn parse_body(kind: SectionKind, body: &[Line<'_>], text: &str) -> (SectionContent, Vec<Span>) {
    match kind {
        SectionKind::Contact => {
            let found = extract_contact(body, text);
            let leftovers = body
                .iter()
                .enumerate()
                .filter(|(idx, line)| !line.is_blank() && !found.consumed.contains(idx))
                .map(|(_, line)| (line.start, line.end))
                .collect();
            (SectionContent::Contact(found.contact), leftovers)
        }
        SectionKind::Summary => {
            let summary = content_span(body)
                .and_then(|(start, end)| text.get(start..end))
                .map(|s| truncate_chars(s.trim(), MAX_SUMMARY_CHARS))
                .unwrap_or_default();
            (SectionContent::Summary(summary), Vec::new())
        }
        SectionKind::Hobbies => (SectionContent::Hobbies(entries::parse_hobbies(body)), Vec::new()),
        SectionKind::Experience => wrap(entries::parse_experience(body), SectionEntry::Experience),
        SectionKind::Education => wrap(entries::parse_education(body), SectionEntry::Education),
        SectionKind::Skills => wrap(entries::parse_skills(body), SectionEntry::Skills),
        SectionKind::Projects => wrap(entries::parse_projects(body), SectionEntry::Projects),
        SectionKind::Certifications => {
            wrap(entries::parse_certifications(body), SectionEntry::Certifications)
        }
        SectionKind::Languages => wrap(entries::parse_languages(body), SectionEntry::Languages),
        SectionKind::Volunteer => wrap(entries::parse_volunteer(body), SectionEntry::Volunteer),
        SectionKind::Awards => wrap(entries::parse_awards(body), SectionEntry::Awards),
        SectionKind::Publications => {
            wrap(entries::parse_publications(body), SectionEntry::Publications)
        }
        SectionKind::References => wrap(entries::parse_references(body), SectionEntry::References),
        SectionKind::Affiliations => {
            wrap(entries::parse_affiliations(body), SectionEntry::Affiliations)
        }
        SectionKind::Courses => wrap(entries::parse_courses(body), SectionEntry::Courses),
        SectionKind::CustomSections => {
            let section = entries::parse_custom_section(body);
            (
                SectionContent::Entries(section.into_iter().map(SectionEntry::CustomSections).collect()),
                Vec::new(),
            )
        }
    }
}

/// Parses free text as the body of a single section.
///
/// A leading header line naming the same section is skipped. Returns `None` when
/// nothing usable was found.
pub fn extract_section(kind: SectionKind, text: &str) -> Option<SectionContent> {
    let lines = split_lines(text);
    let body_start = lines
        .iter()
        .position(|l| !l.is_blank())
        .filter(|&idx| classify_header(lines[idx].text) == Some(kind))
        .map(|idx| idx + 1)
        .unwrap_or(0);
    let (content, _) = parse_body(kind, &lines[body_start..], text);
    (!content.is_empty()).then_some(content)
}

fn append_section(data: &mut PartialResumeData, content: SectionContent) {
    match content {
        SectionContent::Contact(contact) => match data.contact.as_mut() {
            Some(existing) => existing.fill_missing_from(&contact),
            None => data.contact = Some(contact),
        },
        SectionContent::Summary(text) => match data.summary.as_mut() {
            Some(existing) => {
                let joined = format!("{}\n{}", existing.text, text);
                existing.text = truncate_chars(&joined, MAX_SUMMARY_CHARS);
            }
            None => data.summary = Some(SummaryData { text }),
        },
        SectionContent::Hobbies(items) => data
            .hobbies
            .get_or_insert_with(HobbiesData::default)
            .items
            .extend(items),
        SectionContent::Entries(list) => {
            for entry in list {
                push_entry(data, entry);
            }
        }
    }
}

fn push_entry(data: &mut PartialResumeData, entry: SectionEntry) {
    match entry {
        SectionEntry::Experience(e) => data.experience.get_or_insert_with(Vec::new).push(e),
        SectionEntry::Education(e) => data.education.get_or_insert_with(Vec::new).push(e),
        SectionEntry::Skills(e) => data.skills.get_or_insert_with(Vec::new).push(e),
        SectionEntry::Projects(e) => data.projects.get_or_insert_with(Vec::new).push(e),
        SectionEntry::Certifications(e) => data.certifications.get_or_insert_with(Vec::new).push(e),
        SectionEntry::Languages(e) => data.languages.get_or_insert_with(Vec::new).push(e),
        SectionEntry::Volunteer(e) => data.volunteer.get_or_insert_with(Vec::new).push(e),
        SectionEntry::Awards(e) => data.awards.get_or_insert_with(Vec::new).push(e),
        SectionEntry::Publications(e) => data.publications.get_or_insert_with(Vec::new).push(e),
        SectionEntry::References(e) => data.references.get_or_insert_with(Vec::new).push(e),
        SectionEntry::Affiliations(e) => data.affiliations.get_or_insert_with(Vec::new).push(e),
        SectionEntry::Courses(e) => data.courses.get_or_insert_with(Vec::new).push(e),
        SectionEntry::CustomSections(e) => data.custom_sections.get_or_insert_with(Vec::new).push(e),
    }
}

/// Parses plain resume text into a partial resume plus unmatched chunks.
///
/// Total: any input, including the empty string, yields a result. Contact is always
/// present (possibly empty); other sections are present only when detected.
pub fn parse_resume_text(text: &str) -> ResumeParseResult {
    let lines = split_lines(text);
    let segmented = segment(&lines);

    let found = extract_contact(&segmented.preamble, text);
    let mut data = PartialResumeData {
        contact: Some(found.contact),
        ..Default::default()
    };
    let mut spans: Vec<Span> = Vec::new();

    let leftover_preamble: Vec<Line<'_>> = segmented
        .preamble
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            if found.consumed.contains(&idx) {
                Line { text: "", ..*line }
            } else {
                *line
            }
        })
        .collect();
    spans.extend(runs(&leftover_preamble));

    for block in &segmented.blocks {
        let Some(kind) = block.kind else {
            let end = content_span(&block.body).map_or(block.header.end, |(_, end)| end);
            spans.push((block.header.start, end));
            continue;
        };
        let (content, leftovers) = parse_body(kind, &block.body, text);
        if content.is_empty() {
            spans.extend(content_span(&block.body));
            continue;
        }
        spans.extend(leftovers);
        append_section(&mut data, content);
    }

    let mut unmatched_chunks: Vec<UnmatchedChunk> =
        spans.into_iter().filter_map(|span| chunk(text, span)).collect();
    unmatched_chunks.sort_by_key(|c| c.start_offset);

    debug!(
        sections = segmented.blocks.len(),
        unmatched = unmatched_chunks.len(),
        "Parsed resume text"
    );

    ResumeParseResult {
        data,
        unmatched_chunks,
    }
}
