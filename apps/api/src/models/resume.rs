//! Resume data model shared by the parser, the scorer and the review state machine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a single highlight bullet, in characters.
pub const MAX_HIGHLIGHT_CHARS: usize = 500;
/// Maximum length of the summary text, in characters.
pub const MAX_SUMMARY_CHARS: usize = 2000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub title: String,
}

impl ContactData {
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|f| f.trim().is_empty())
    }

    fn fields(&self) -> [&String; 10] {
        [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            &self.location,
            &self.website,
            &self.linkedin,
            &self.github,
            &self.portfolio,
            &self.title,
        ]
    }

    /// Copies every non-empty field of `other` into the fields of `self` that are still empty.
    pub fn fill_missing_from(&mut self, other: &ContactData) {
        let pairs = [
            (&mut self.first_name, &other.first_name),
            (&mut self.last_name, &other.last_name),
            (&mut self.email, &other.email),
            (&mut self.phone, &other.phone),
            (&mut self.location, &other.location),
            (&mut self.website, &other.website),
            (&mut self.linkedin, &other.linkedin),
            (&mut self.github, &other.github),
            (&mut self.portfolio, &other.portfolio),
            (&mut self.title, &other.title),
        ];
        for (mine, theirs) in pairs {
            if mine.trim().is_empty() && !theirs.trim().is_empty() {
                *mine = theirs.clone();
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryData {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HobbiesData {
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub gpa: String,
    pub description: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub url: String,
    pub start_date: String,
    pub end_date: String,
    pub technologies: Vec<String>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub expiry_date: String,
    pub credential_id: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub language: String,
    pub proficiency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolunteerEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub organization: String,
    pub role: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwardEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub issuer: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicationEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub publisher: String,
    pub date: String,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub relationship: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffiliationEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub organization: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub institution: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillItem {
    pub name: String,
    /// 1 (beginner) to 5 (expert).
    pub proficiency: u8,
}

impl Default for SkillItem {
    fn default() -> Self {
        Self {
            name: String::new(),
            proficiency: 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillCategory {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub category: String,
    pub items: Vec<SkillItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSection {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub items: Vec<String>,
}

/// Every entry type carries a stable id used as reorder/merge key.
pub trait SectionItem: Clone {
    fn id(&self) -> Uuid;
    fn set_id(&mut self, id: Uuid);
}

macro_rules! impl_section_item {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl SectionItem for $ty {
                fn id(&self) -> Uuid {
                    self.id
                }

                fn set_id(&mut self, id: Uuid) {
                    self.id = id;
                }
            }
        )+
    };
}

impl_section_item!(
    ExperienceEntry,
    EducationEntry,
    ProjectEntry,
    CertificationEntry,
    LanguageEntry,
    VolunteerEntry,
    AwardEntry,
    PublicationEntry,
    ReferenceEntry,
    AffiliationEntry,
    CourseEntry,
    SkillCategory,
    CustomSection,
);

/// The complete resume record handed to storage and rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeData {
    pub contact: ContactData,
    pub summary: SummaryData,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<SkillCategory>,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub languages: Vec<LanguageEntry>,
    pub volunteer: Vec<VolunteerEntry>,
    pub awards: Vec<AwardEntry>,
    pub publications: Vec<PublicationEntry>,
    pub references: Vec<ReferenceEntry>,
    pub hobbies: HobbiesData,
    pub affiliations: Vec<AffiliationEntry>,
    pub courses: Vec<CourseEntry>,
    pub custom_sections: Vec<CustomSection>,
}

/// A resume with only the sections that were actually found.
///
/// `None` means "not found"; `Some` of an empty value means "found empty".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialResumeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<ExperienceEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<SkillCategory>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<ProjectEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<CertificationEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<LanguageEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volunteer: Option<Vec<VolunteerEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awards: Option<Vec<AwardEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publications: Option<Vec<PublicationEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<ReferenceEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hobbies: Option<HobbiesData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliations: Option<Vec<AffiliationEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courses: Option<Vec<CourseEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_sections: Option<Vec<CustomSection>>,
}

/// Section names addressable by string from callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Languages,
    Volunteer,
    Awards,
    Publications,
    References,
    Hobbies,
    Affiliations,
    Courses,
    CustomSections,
}

impl SectionKind {
    pub const ALL: [SectionKind; 16] = [
        SectionKind::Contact,
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Projects,
        SectionKind::Certifications,
        SectionKind::Languages,
        SectionKind::Volunteer,
        SectionKind::Awards,
        SectionKind::Publications,
        SectionKind::References,
        SectionKind::Hobbies,
        SectionKind::Affiliations,
        SectionKind::Courses,
        SectionKind::CustomSections,
    ];

    /// Resolves a caller-supplied section name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        let kind = match key.as_str() {
            "contact" => SectionKind::Contact,
            "summary" => SectionKind::Summary,
            "experience" => SectionKind::Experience,
            "education" => SectionKind::Education,
            "skills" => SectionKind::Skills,
            "projects" => SectionKind::Projects,
            "certifications" => SectionKind::Certifications,
            "languages" => SectionKind::Languages,
            "volunteer" => SectionKind::Volunteer,
            "awards" => SectionKind::Awards,
            "publications" => SectionKind::Publications,
            "references" => SectionKind::References,
            "hobbies" => SectionKind::Hobbies,
            "affiliations" => SectionKind::Affiliations,
            "courses" => SectionKind::Courses,
            "customsections" => SectionKind::CustomSections,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Contact => "contact",
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
            SectionKind::Languages => "languages",
            SectionKind::Volunteer => "volunteer",
            SectionKind::Awards => "awards",
            SectionKind::Publications => "publications",
            SectionKind::References => "references",
            SectionKind::Hobbies => "hobbies",
            SectionKind::Affiliations => "affiliations",
            SectionKind::Courses => "courses",
            SectionKind::CustomSections => "custom_sections",
        }
    }

    /// True for sections stored as a list of entries with ids.
    pub fn is_entry_list(&self) -> bool {
        !matches!(
            self,
            SectionKind::Contact | SectionKind::Summary | SectionKind::Hobbies
        )
    }
}

/// One entry of any list section, tagged with the section it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionEntry {
    Experience(ExperienceEntry),
    Education(EducationEntry),
    Skills(SkillCategory),
    Projects(ProjectEntry),
    Certifications(CertificationEntry),
    Languages(LanguageEntry),
    Volunteer(VolunteerEntry),
    Awards(AwardEntry),
    Publications(PublicationEntry),
    References(ReferenceEntry),
    Affiliations(AffiliationEntry),
    Courses(CourseEntry),
    CustomSections(CustomSection),
}

impl SectionEntry {
    pub fn section(&self) -> SectionKind {
        match self {
            SectionEntry::Experience(_) => SectionKind::Experience,
            SectionEntry::Education(_) => SectionKind::Education,
            SectionEntry::Skills(_) => SectionKind::Skills,
            SectionEntry::Projects(_) => SectionKind::Projects,
            SectionEntry::Certifications(_) => SectionKind::Certifications,
            SectionEntry::Languages(_) => SectionKind::Languages,
            SectionEntry::Volunteer(_) => SectionKind::Volunteer,
            SectionEntry::Awards(_) => SectionKind::Awards,
            SectionEntry::Publications(_) => SectionKind::Publications,
            SectionEntry::References(_) => SectionKind::References,
            SectionEntry::Affiliations(_) => SectionKind::Affiliations,
            SectionEntry::Courses(_) => SectionKind::Courses,
            SectionEntry::CustomSections(_) => SectionKind::CustomSections,
        }
    }

    /// Decodes a JSON entry for the named section. Returns `None` when the section
    /// is unknown, is not a list section, or the value does not fit its shape.
    pub fn from_value(section: &str, value: serde_json::Value) -> Option<Self> {
        fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Option<T> {
            serde_json::from_value(value).ok()
        }

        let entry = match SectionKind::from_name(section)? {
            SectionKind::Experience => SectionEntry::Experience(decode(value)?),
            SectionKind::Education => SectionEntry::Education(decode(value)?),
            SectionKind::Skills => SectionEntry::Skills(decode(value)?),
            SectionKind::Projects => SectionEntry::Projects(decode(value)?),
            SectionKind::Certifications => SectionEntry::Certifications(decode(value)?),
            SectionKind::Languages => SectionEntry::Languages(decode(value)?),
            SectionKind::Volunteer => SectionEntry::Volunteer(decode(value)?),
            SectionKind::Awards => SectionEntry::Awards(decode(value)?),
            SectionKind::Publications => SectionEntry::Publications(decode(value)?),
            SectionKind::References => SectionEntry::References(decode(value)?),
            SectionKind::Affiliations => SectionEntry::Affiliations(decode(value)?),
            SectionKind::Courses => SectionEntry::Courses(decode(value)?),
            SectionKind::CustomSections => SectionEntry::CustomSections(decode(value)?),
            SectionKind::Contact | SectionKind::Summary | SectionKind::Hobbies => return None,
        };
        Some(entry)
    }
}

/// Truncates to at most `max` characters on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_kind_from_name_accepts_camel_and_snake_case() {
        assert_eq!(
            SectionKind::from_name("customSections"),
            Some(SectionKind::CustomSections)
        );
        assert_eq!(
            SectionKind::from_name("custom_sections"),
            Some(SectionKind::CustomSections)
        );
        assert_eq!(SectionKind::from_name("Experience"), Some(SectionKind::Experience));
        assert_eq!(SectionKind::from_name("experiance"), None);
    }

    #[test]
    fn test_section_kind_names_round_trip() {
        for kind in SectionKind::ALL {
            assert_eq!(SectionKind::from_name(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_entry_without_id_gets_fresh_id() {
        let a: ExperienceEntry = serde_json::from_value(json!({"company": "Acme"})).unwrap();
        let b: ExperienceEntry = serde_json::from_value(json!({"company": "Acme"})).unwrap();
        assert!(!a.id.is_nil());
        assert_ne!(a.id, b.id);
        assert_eq!(a.company, "Acme");
    }

    #[test]
    fn test_section_entry_from_value_rejects_scalar_sections() {
        assert!(SectionEntry::from_value("summary", json!({"text": "x"})).is_none());
        assert!(SectionEntry::from_value("nope", json!({})).is_none());
        let entry = SectionEntry::from_value("awards", json!({"title": "Best"})).unwrap();
        assert_eq!(entry.section(), SectionKind::Awards);
    }

    #[test]
    fn test_partial_resume_omits_absent_sections() {
        let partial = PartialResumeData {
            summary: Some(SummaryData {
                text: "Engineer".to_string(),
            }),
            ..Default::default()
        };
        let value = serde_json::to_value(&partial).unwrap();
        assert!(value.get("summary").is_some());
        assert!(value.get("experience").is_none());
        assert!(value.get("contact").is_none());
    }

    #[test]
    fn test_contact_fill_missing_keeps_existing_values() {
        let mut contact = ContactData {
            email: "a@b.com".to_string(),
            ..Default::default()
        };
        let other = ContactData {
            email: "other@b.com".to_string(),
            phone: "555".to_string(),
            ..Default::default()
        };
        contact.fill_missing_from(&other);
        assert_eq!(contact.email, "a@b.com");
        assert_eq!(contact.phone, "555");
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
