//! Per-section confidence heuristics shown next to each section during review.

use serde::{Deserialize, Serialize};

use crate::ingest::entries::{has_degree, has_institution_word, starts_with_degree};
use crate::matching::keywords::is_stopword;
use crate::models::resume::{ResumeData, SectionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Complete,
    Incomplete,
    Empty,
}

/// Skill lists with at least this many items are checked for fragmentation.
const FRAGMENT_MIN_ITEMS: usize = 3;
/// Average skill name length below which a list looks like a split sentence.
const FRAGMENT_AVG_CHARS: f64 = 5.0;

const PLACEHOLDERS: &[&str] = &["n/a", "na", "tbd", "tba", "none", "-", "--", "xxx", "todo"];
const PLACEHOLDER_URL_MARKERS: &[&str] = &["example.com", "your-", "yourname", "your_"];

fn non_empty(present: bool) -> Confidence {
    if present {
        Confidence::Complete
    } else {
        Confidence::Empty
    }
}

fn contact(resume: &ResumeData) -> Confidence {
    let has_name = !resume.contact.first_name.trim().is_empty();
    let has_email = !resume.contact.email.trim().is_empty();
    match (has_name, has_email) {
        (true, true) => Confidence::Complete,
        (true, false) | (false, true) => Confidence::Incomplete,
        (false, false) => Confidence::Empty,
    }
}

fn experience(resume: &ResumeData) -> Confidence {
    if resume.experience.is_empty() {
        return Confidence::Empty;
    }
    let headless = resume
        .experience
        .iter()
        .any(|e| e.position.trim().is_empty() && e.company.trim().is_empty());
    if headless {
        Confidence::Incomplete
    } else {
        Confidence::Complete
    }
}

/// Institution text that reads like a degree, e.g. "B.S. Computer Science" or
/// "Bachelor of Science, University of Michigan".
fn garbled_institution(institution: &str) -> bool {
    let institution = institution.trim();
    institution.is_empty()
        || starts_with_degree(institution)
        || (has_degree(institution) && !has_institution_word(institution))
}

fn education(resume: &ResumeData) -> Confidence {
    if resume.education.is_empty() {
        return Confidence::Empty;
    }
    if resume
        .education
        .iter()
        .any(|e| garbled_institution(&e.institution))
    {
        Confidence::Incomplete
    } else {
        Confidence::Complete
    }
}

fn skills(resume: &ResumeData) -> Confidence {
    let names: Vec<&str> = resume
        .skills
        .iter()
        .flat_map(|c| c.items.iter())
        .map(|i| i.name.trim())
        .collect();
    if names.is_empty() {
        return Confidence::Empty;
    }

    let fragment = names
        .iter()
        .any(|n| n.chars().count() <= 1 || is_stopword(&n.to_lowercase()));
    let average = names.iter().map(|n| n.chars().count()).sum::<usize>() as f64 / names.len() as f64;
    if fragment || (names.len() >= FRAGMENT_MIN_ITEMS && average < FRAGMENT_AVG_CHARS) {
        Confidence::Incomplete
    } else {
        Confidence::Complete
    }
}

fn is_placeholder(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    PLACEHOLDERS.contains(&lower.as_str())
        || PLACEHOLDER_URL_MARKERS.iter().any(|m| lower.contains(m))
}

fn certifications(resume: &ResumeData) -> Confidence {
    if resume.certifications.is_empty() {
        return Confidence::Empty;
    }
    let suspicious = resume.certifications.iter().any(|c| {
        c.name.trim().is_empty()
            || [&c.name, &c.issuer, &c.credential_id, &c.url]
                .iter()
                .any(|v| is_placeholder(v))
    });
    if suspicious {
        Confidence::Incomplete
    } else {
        Confidence::Complete
    }
}

/// Classifies how trustworthy the imported content of one section looks.
pub fn section_confidence(resume: &ResumeData, kind: SectionKind) -> Confidence {
    match kind {
        SectionKind::Contact => contact(resume),
        SectionKind::Summary => non_empty(!resume.summary.text.trim().is_empty()),
        SectionKind::Experience => experience(resume),
        SectionKind::Education => education(resume),
        SectionKind::Skills => skills(resume),
        SectionKind::Certifications => certifications(resume),
        SectionKind::Projects => non_empty(!resume.projects.is_empty()),
        SectionKind::Languages => non_empty(!resume.languages.is_empty()),
        SectionKind::Volunteer => non_empty(!resume.volunteer.is_empty()),
        SectionKind::Awards => non_empty(!resume.awards.is_empty()),
        SectionKind::Publications => non_empty(!resume.publications.is_empty()),
        SectionKind::References => non_empty(!resume.references.is_empty()),
        SectionKind::Hobbies => non_empty(!resume.hobbies.items.is_empty()),
        SectionKind::Affiliations => non_empty(!resume.affiliations.is_empty()),
        SectionKind::Courses => non_empty(!resume.courses.is_empty()),
        SectionKind::CustomSections => non_empty(!resume.custom_sections.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{
        CertificationEntry, EducationEntry, ExperienceEntry, SkillCategory, SkillItem,
    };

    fn skills_of(names: &[&str]) -> ResumeData {
        ResumeData {
            skills: vec![SkillCategory {
                category: "Skills".to_string(),
                items: names
                    .iter()
                    .map(|n| SkillItem {
                        name: n.to_string(),
                        ..Default::default()
                    })
                    .collect(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_contact_levels() {
        let mut resume = ResumeData::default();
        assert_eq!(section_confidence(&resume, SectionKind::Contact), Confidence::Empty);
        resume.contact.first_name = "Jane".to_string();
        assert_eq!(
            section_confidence(&resume, SectionKind::Contact),
            Confidence::Incomplete
        );
        resume.contact.email = "jane@example.com".to_string();
        assert_eq!(
            section_confidence(&resume, SectionKind::Contact),
            Confidence::Complete
        );
    }

    #[test]
    fn test_experience_without_title_or_company() {
        let resume = ResumeData {
            experience: vec![ExperienceEntry {
                highlights: vec!["Did things".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(
            section_confidence(&resume, SectionKind::Experience),
            Confidence::Incomplete
        );
    }

    #[test]
    fn test_education_flags_degree_in_institution() {
        let mut resume = ResumeData {
            education: vec![EducationEntry {
                institution: "B.S. Computer Science".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(
            section_confidence(&resume, SectionKind::Education),
            Confidence::Incomplete
        );
        resume.education[0].institution =
            "Bachelor of Science, University of Michigan".to_string();
        assert_eq!(
            section_confidence(&resume, SectionKind::Education),
            Confidence::Incomplete
        );
        resume.education[0].institution = "University of Michigan".to_string();
        assert_eq!(
            section_confidence(&resume, SectionKind::Education),
            Confidence::Complete
        );
        resume.education[0].institution = "Lincoln High School".to_string();
        assert_eq!(
            section_confidence(&resume, SectionKind::Education),
            Confidence::Complete
        );
    }

    #[test]
    fn test_skills_fragmentation() {
        assert_eq!(
            section_confidence(&skills_of(&["Rust", "Kubernetes", "PostgreSQL"]), SectionKind::Skills),
            Confidence::Complete
        );
        assert_eq!(
            section_confidence(&skills_of(&["and", "Kubernetes"]), SectionKind::Skills),
            Confidence::Incomplete
        );
        assert_eq!(
            section_confidence(&skills_of(&["I", "built", "apps"]), SectionKind::Skills),
            Confidence::Incomplete
        );
        assert_eq!(
            section_confidence(&ResumeData::default(), SectionKind::Skills),
            Confidence::Empty
        );
    }

    #[test]
    fn test_certification_placeholders() {
        let mut resume = ResumeData {
            certifications: vec![CertificationEntry {
                name: "AWS Solutions Architect".to_string(),
                issuer: "Amazon".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(
            section_confidence(&resume, SectionKind::Certifications),
            Confidence::Complete
        );
        resume.certifications[0].url = "https://example.com/cert".to_string();
        assert_eq!(
            section_confidence(&resume, SectionKind::Certifications),
            Confidence::Incomplete
        );
        resume.certifications[0].url.clear();
        resume.certifications[0].issuer = "TBD".to_string();
        assert_eq!(
            section_confidence(&resume, SectionKind::Certifications),
            Confidence::Incomplete
        );
    }

    #[test]
    fn test_plain_sections_default_rule() {
        let mut resume = ResumeData::default();
        assert_eq!(section_confidence(&resume, SectionKind::Hobbies), Confidence::Empty);
        resume.hobbies.items.push("Chess".to_string());
        assert_eq!(section_confidence(&resume, SectionKind::Hobbies), Confidence::Complete);
    }
}
