//! ATS score: five weighted categories summing to 100.
//!
//! | category             | max |
//! |----------------------|-----|
//! | keyword match        | 40  |
//! | formatting           | 20  |
//! | content quality      | 20  |
//! | section completeness | 10  |
//! | readability          | 10  |
//!
//! Pure and deterministic; every input, including an empty resume, yields a full report.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::jd_parser::{parse_job_description, ParsedJobDescription};
use crate::matching::keywords::extract_keywords;
use crate::models::resume::ResumeData;
use crate::scoring::impact::{check_bullet, sample_action_verbs};

pub const KEYWORD_MATCH_MAX: u32 = 40;
pub const FORMATTING_MAX: u32 = 20;
pub const CONTENT_QUALITY_MAX: u32 = 20;
pub const SECTION_COMPLETENESS_MAX: u32 = 10;
pub const READABILITY_MAX: u32 = 10;

/// Keyword credit when no job description is supplied.
const NO_JOB_BASELINE: u32 = 20;

const EMAIL_POINTS: u32 = 7;
const PHONE_POINTS: u32 = 7;
const LOCATION_POINTS: u32 = 6;

/// Section checklist weights; they sum to `SECTION_COMPLETENESS_MAX`.
const SECTION_WEIGHTS: &[(&str, f64)] = &[
    ("contact", 2.0),
    ("summary", 1.5),
    ("experience", 2.5),
    ("education", 1.5),
    ("skills", 1.5),
    ("additional sections", 1.0),
];

const DENSE_BULLETS: usize = 6;
const MODERATE_BULLETS: usize = 3;
const IDEAL_BULLET_CHARS: (usize, usize) = (40, 200);
const ACCEPTABLE_BULLET_CHARS: (usize, usize) = (20, 300);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: u32,
    pub max_score: u32,
    pub suggestions: Vec<String>,
}

impl CategoryScore {
    fn new(score: u32, max_score: u32, suggestions: Vec<String>) -> Self {
        Self {
            score: score.min(max_score),
            max_score,
            suggestions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword_match: CategoryScore,
    pub formatting: CategoryScore,
    pub content_quality: CategoryScore,
    pub section_completeness: CategoryScore,
    pub readability: CategoryScore,
}

impl ScoreBreakdown {
    fn categories(&self) -> [&CategoryScore; 5] {
        [
            &self.keyword_match,
            &self.formatting,
            &self.content_quality,
            &self.section_completeness,
            &self.readability,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordReport {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtsScoreResult {
    pub score: u32,
    pub breakdown: ScoreBreakdown,
    pub keywords: KeywordReport,
}

/// Every highlight bullet the content and readability checks look at.
fn all_highlights(data: &ResumeData) -> Vec<&str> {
    data.experience
        .iter()
        .flat_map(|e| e.highlights.iter())
        .chain(data.education.iter().flat_map(|e| e.highlights.iter()))
        .chain(data.projects.iter().flat_map(|e| e.highlights.iter()))
        .chain(data.volunteer.iter().flat_map(|e| e.highlights.iter()))
        .map(|h| h.trim())
        .filter(|h| !h.is_empty())
        .collect()
}

/// Flattens the resume into one text blob for keyword matching.
pub fn resume_text(data: &ResumeData) -> String {
    let mut parts: Vec<&str> = vec![data.contact.title.as_str(), data.summary.text.as_str()];
    for e in &data.experience {
        parts.extend([e.position.as_str(), &e.company, &e.description]);
        parts.extend(e.highlights.iter().map(String::as_str));
    }
    for e in &data.education {
        parts.extend([e.degree.as_str(), &e.field, &e.institution, &e.description]);
        parts.extend(e.highlights.iter().map(String::as_str));
    }
    for s in &data.skills {
        parts.push(&s.category);
        parts.extend(s.items.iter().map(|i| i.name.as_str()));
    }
    for p in &data.projects {
        parts.extend([p.name.as_str(), &p.description]);
        parts.extend(p.technologies.iter().map(String::as_str));
        parts.extend(p.highlights.iter().map(String::as_str));
    }
    for c in &data.certifications {
        parts.extend([c.name.as_str(), &c.issuer]);
    }
    for v in &data.volunteer {
        parts.extend([v.role.as_str(), &v.organization, &v.description]);
        parts.extend(v.highlights.iter().map(String::as_str));
    }
    parts.extend(data.languages.iter().map(|l| l.language.as_str()));
    for a in &data.awards {
        parts.extend([a.title.as_str(), &a.description]);
    }
    for p in &data.publications {
        parts.extend([p.title.as_str(), &p.description]);
    }
    parts.extend(data.courses.iter().map(|c| c.name.as_str()));
    parts.extend(data.affiliations.iter().map(|a| a.organization.as_str()));
    for c in &data.custom_sections {
        parts.push(&c.title);
        parts.extend(c.items.iter().map(String::as_str));
    }
    parts.retain(|p| !p.trim().is_empty());
    parts.join("\n")
}

/// The text keywords are drawn from: the requirement-bearing sections and title when
/// headers were found, otherwise the whole posting.
fn job_keyword_text(parsed: &ParsedJobDescription) -> String {
    let sections = [
        parsed.sections.required.as_str(),
        &parsed.sections.preferred,
        &parsed.sections.responsibilities,
    ];
    if sections.iter().all(|s| s.trim().is_empty()) {
        return parsed.sections.full_text.clone();
    }
    std::iter::once(parsed.title.as_str())
        .chain(sections)
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn score_keywords(data: &ResumeData, job_description: Option<&str>) -> (CategoryScore, KeywordReport) {
    let Some(job_text) = job_description.filter(|t| !t.trim().is_empty()) else {
        return (
            CategoryScore::new(
                NO_JOB_BASELINE,
                KEYWORD_MATCH_MAX,
                vec!["Provide a job description to measure keyword alignment.".to_string()],
            ),
            KeywordReport::default(),
        );
    };

    let parsed = parse_job_description(job_text);
    let job_keywords = extract_keywords(&job_keyword_text(&parsed));
    let resume_keywords: HashSet<String> = extract_keywords(&resume_text(data)).into_iter().collect();

    let (matched, missing): (Vec<String>, Vec<String>) = job_keywords
        .into_iter()
        .partition(|kw| resume_keywords.contains(kw));
    let total = matched.len() + missing.len();
    let score = if total == 0 {
        0
    } else {
        ((matched.len() as f64 / total as f64) * KEYWORD_MATCH_MAX as f64).round() as u32
    };

    let mut suggestions = Vec::new();
    if total == 0 {
        suggestions.push("No recognizable keywords were found in the job description.".to_string());
    } else if !missing.is_empty() {
        let preview: Vec<&str> = missing.iter().take(8).map(String::as_str).collect();
        suggestions.push(format!(
            "Work these job keywords into your resume where accurate: {}.",
            preview.join(", ")
        ));
    }

    (
        CategoryScore::new(score, KEYWORD_MATCH_MAX, suggestions),
        KeywordReport { matched, missing },
    )
}

fn score_formatting(data: &ResumeData) -> CategoryScore {
    let contact = &data.contact;
    let checks = [
        (&contact.email, EMAIL_POINTS, "Add an email address."),
        (&contact.phone, PHONE_POINTS, "Add a phone number."),
        (&contact.location, LOCATION_POINTS, "Add your location (city, state)."),
    ];
    let mut score = 0;
    let mut suggestions = Vec::new();
    for (field, points, suggestion) in checks {
        if field.trim().is_empty() {
            suggestions.push(suggestion.to_string());
        } else {
            score += points;
        }
    }
    CategoryScore::new(score, FORMATTING_MAX, suggestions)
}

fn score_content_quality(highlights: &[&str]) -> CategoryScore {
    if highlights.is_empty() {
        return CategoryScore::new(
            0,
            CONTENT_QUALITY_MAX,
            vec!["Add achievement bullets to your experience and projects.".to_string()],
        );
    }

    let checks: Vec<_> = highlights.iter().map(|h| check_bullet(h)).collect();
    let total = checks.len() as f64;
    let quantified = checks.iter().filter(|c| c.quantified).count();
    let with_verbs = checks.iter().filter(|c| c.action_verb).count();

    let half = CONTENT_QUALITY_MAX as f64 / 2.0;
    let score = (quantified as f64 / total * half + with_verbs as f64 / total * half).round() as u32;

    let mut suggestions = Vec::new();
    if quantified < checks.len() {
        suggestions.push(format!(
            "{} of {} bullets lack a measurable result. Add numbers, percentages or amounts.",
            checks.len() - quantified,
            checks.len()
        ));
    }
    if let Some(phrase) = checks.iter().find_map(|c| c.vague_phrase.as_deref()) {
        suggestions.push(format!(
            "Replace duty phrasing like '{phrase}' with the outcome you delivered."
        ));
    }
    if with_verbs < checks.len() {
        suggestions.push(format!(
            "Start bullets with strong action verbs such as {}.",
            sample_action_verbs()
        ));
    }
    CategoryScore::new(score, CONTENT_QUALITY_MAX, suggestions)
}

fn has_additional_sections(data: &ResumeData) -> bool {
    !data.projects.is_empty()
        || !data.certifications.is_empty()
        || !data.languages.is_empty()
        || !data.volunteer.is_empty()
        || !data.awards.is_empty()
        || !data.publications.is_empty()
        || !data.references.is_empty()
        || !data.affiliations.is_empty()
        || !data.courses.is_empty()
        || !data.custom_sections.is_empty()
        || !data.hobbies.items.is_empty()
}

fn score_section_completeness(data: &ResumeData) -> CategoryScore {
    let contact = &data.contact;
    let has_contact = !contact.first_name.trim().is_empty()
        || !contact.last_name.trim().is_empty()
        || !contact.email.trim().is_empty();

    let mut earned = 0.0;
    let mut suggestions = Vec::new();
    for (section, weight) in SECTION_WEIGHTS {
        let present = match *section {
            "contact" => has_contact,
            "summary" => !data.summary.text.trim().is_empty(),
            "experience" => !data.experience.is_empty(),
            "education" => !data.education.is_empty(),
            "skills" => !data.skills.is_empty(),
            _ => has_additional_sections(data),
        };
        if present {
            earned += weight;
        } else {
            suggestions.push(format!("Add a {section} section."));
        }
    }
    CategoryScore::new(earned.round() as u32, SECTION_COMPLETENESS_MAX, suggestions)
}

fn score_readability(highlights: &[&str]) -> CategoryScore {
    if highlights.is_empty() {
        return CategoryScore::new(
            0,
            READABILITY_MAX,
            vec!["Use bullet points to describe your experience.".to_string()],
        );
    }

    let count = highlights.len();
    let density = match count {
        n if n >= DENSE_BULLETS => 5,
        n if n >= MODERATE_BULLETS => 3,
        _ => 1,
    };
    let average = highlights.iter().map(|h| h.chars().count()).sum::<usize>() / count;
    let length = if (IDEAL_BULLET_CHARS.0..=IDEAL_BULLET_CHARS.1).contains(&average) {
        5
    } else if (ACCEPTABLE_BULLET_CHARS.0..=ACCEPTABLE_BULLET_CHARS.1).contains(&average) {
        3
    } else {
        1
    };

    let mut suggestions = Vec::new();
    if count < DENSE_BULLETS {
        suggestions.push(format!(
            "Aim for at least {DENSE_BULLETS} bullets across your experience (currently {count})."
        ));
    }
    if average < IDEAL_BULLET_CHARS.0 {
        suggestions.push("Expand very short bullets with context and results.".to_string());
    } else if average > IDEAL_BULLET_CHARS.1 {
        suggestions.push("Tighten long bullets to one or two lines.".to_string());
    }
    CategoryScore::new(density + length, READABILITY_MAX, suggestions)
}

/// Scores a resume, optionally against a job description.
pub fn compute_ats_score(data: &ResumeData, job_description: Option<&str>) -> AtsScoreResult {
    let highlights = all_highlights(data);
    let (keyword_match, keywords) = score_keywords(data, job_description);
    let breakdown = ScoreBreakdown {
        keyword_match,
        formatting: score_formatting(data),
        content_quality: score_content_quality(&highlights),
        section_completeness: score_section_completeness(data),
        readability: score_readability(&highlights),
    };
    let score = breakdown
        .categories()
        .iter()
        .map(|c| c.score)
        .sum::<u32>()
        .min(100);

    debug!(
        score,
        bullets = highlights.len(),
        matched = keywords.matched.len(),
        missing = keywords.missing.len(),
        "Computed ATS score"
    );

    AtsScoreResult {
        score,
        breakdown,
        keywords,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{
        ContactData, EducationEntry, ExperienceEntry, SkillCategory, SkillItem, SummaryData,
    };

    fn with_highlights(highlights: &[&str]) -> ResumeData {
        ResumeData {
            experience: vec![ExperienceEntry {
                company: "Acme".to_string(),
                position: "Engineer".to_string(),
                highlights: highlights.iter().map(|h| h.to_string()).collect(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn full_resume() -> ResumeData {
        ResumeData {
            contact: ContactData {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "555-123-4567".to_string(),
                location: "Austin, TX".to_string(),
                ..Default::default()
            },
            summary: SummaryData {
                text: "Backend engineer.".to_string(),
            },
            education: vec![EducationEntry {
                institution: "UT Austin".to_string(),
                ..Default::default()
            }],
            skills: vec![SkillCategory {
                category: "Languages".to_string(),
                items: vec![
                    SkillItem {
                        name: "Rust".to_string(),
                        proficiency: 5,
                    },
                    SkillItem {
                        name: "Kubernetes".to_string(),
                        proficiency: 4,
                    },
                ],
                ..Default::default()
            }],
            ..with_highlights(&[
                "Increased engagement by 35% through a redesigned onboarding flow",
                "Led a team of 8 engineers across two time zones",
                "Reduced cloud spend by $40k per year with autoscaling",
                "Built a Rust ingestion service handling 2M events per day",
                "Designed the billing schema used by 300 enterprise customers",
                "Migrated 40 services to Kubernetes with zero downtime",
            ])
        }
    }

    #[test]
    fn test_quantified_bullets_score_higher_content_quality() {
        let strong = with_highlights(&["increased engagement by 35%", "Led a team of 8 engineers"]);
        let weak = with_highlights(&["Was responsible for things", "Worked with people"]);
        let strong_score = compute_ats_score(&strong, None).breakdown.content_quality.score;
        let weak_score = compute_ats_score(&weak, None).breakdown.content_quality.score;
        assert!(strong_score > weak_score, "{strong_score} <= {weak_score}");
        assert_eq!(strong_score, 20);
        assert_eq!(weak_score, 0);
    }

    #[test]
    fn test_empty_resume_is_total() {
        let result = compute_ats_score(&ResumeData::default(), None);
        assert_eq!(result.breakdown.section_completeness.score, 0);
        assert_eq!(result.breakdown.keyword_match.score, 20);
        assert_eq!(result.breakdown.formatting.score, 0);
        assert_eq!(result.breakdown.content_quality.score, 0);
        assert_eq!(result.breakdown.readability.score, 0);
        assert_eq!(result.score, 20);
        for category in result.breakdown.categories() {
            assert!(!category.suggestions.is_empty());
        }
    }

    #[test]
    fn test_blank_job_description_gets_baseline() {
        let result = compute_ats_score(&ResumeData::default(), Some("   "));
        assert_eq!(result.breakdown.keyword_match.score, 20);
        assert!(result.keywords.matched.is_empty());
    }

    #[test]
    fn test_max_scores_sum_to_100() {
        let result = compute_ats_score(&ResumeData::default(), None);
        let total: u32 = result.breakdown.categories().iter().map(|c| c.max_score).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_keyword_match_against_job_description() {
        let jd = "Backend Engineer\n\nRequirements:\n- Rust\n- Kubernetes\n- Terraform\n- PostgreSQL";
        let result = compute_ats_score(&full_resume(), Some(jd));
        assert!(result.keywords.matched.contains(&"rust".to_string()));
        assert!(result.keywords.matched.contains(&"kubernetes".to_string()));
        assert!(result.keywords.missing.contains(&"terraform".to_string()));
        assert!(result.keywords.missing.contains(&"postgresql".to_string()));
        let kw = &result.breakdown.keyword_match;
        assert!(kw.score > 0 && kw.score < KEYWORD_MATCH_MAX);
        assert!(!kw.suggestions.is_empty());
    }

    #[test]
    fn test_synonyms_count_as_matches() {
        let resume = ResumeData {
            summary: SummaryData {
                text: "Shipped JS and K8s tooling".to_string(),
            },
            ..Default::default()
        };
        let result = compute_ats_score(&resume, Some("Requirements: JavaScript, Kubernetes"));
        assert_eq!(result.keywords.missing, Vec::<String>::new());
        assert_eq!(result.breakdown.keyword_match.score, 40);
    }

    #[test]
    fn test_full_resume_scores_within_bounds() {
        let result = compute_ats_score(&full_resume(), None);
        assert_eq!(result.breakdown.formatting.score, 20);
        assert!(result.breakdown.formatting.suggestions.is_empty());
        assert_eq!(result.breakdown.section_completeness.score, 9);
        assert_eq!(result.breakdown.readability.score, 10);
        assert!(result.score <= 100);
        for category in result.breakdown.categories() {
            assert!(category.score <= category.max_score);
        }
    }

    #[test]
    fn test_formatting_is_monotonic_in_contact_fields() {
        let mut resume = ResumeData::default();
        let mut last = compute_ats_score(&resume, None).breakdown.formatting.score;
        for step in 0..3 {
            match step {
                0 => resume.contact.email = "a@b.co".to_string(),
                1 => resume.contact.phone = "555-000-1111".to_string(),
                _ => resume.contact.location = "Denver, CO".to_string(),
            }
            let next = compute_ats_score(&resume, None).breakdown.formatting.score;
            assert!(next > last);
            last = next;
        }
        assert_eq!(last, FORMATTING_MAX);
    }

    #[test]
    fn test_content_quality_is_monotonic_when_bullets_improve() {
        let mut bullets = vec!["Worked with people"; 4];
        let mut last = compute_ats_score(&with_highlights(&bullets), None)
            .breakdown
            .content_quality
            .score;
        for (i, improved) in ["Led 5 people", "Built 3 tools", "Cut costs 10%", "Saved $4k"]
            .into_iter()
            .enumerate()
        {
            bullets[i] = improved;
            let next = compute_ats_score(&with_highlights(&bullets), None)
                .breakdown
                .content_quality
                .score;
            assert!(next >= last);
            last = next;
        }
        assert_eq!(last, CONTENT_QUALITY_MAX);
    }

    #[test]
    fn test_readability_bands() {
        assert_eq!(score_readability(&[]).score, 0);
        assert_eq!(score_readability(&["short"]).score, 2);
        let mid = "Built a data pipeline that processes nightly batches";
        assert_eq!(score_readability(&[mid; 3]).score, 8);
        assert_eq!(score_readability(&[mid; 6]).score, 10);
    }
}
