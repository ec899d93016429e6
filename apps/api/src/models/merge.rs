use uuid::Uuid;

use crate::models::resume::{
    PartialResumeData, ResumeData, SectionItem, MAX_HIGHLIGHT_CHARS, MAX_SUMMARY_CHARS,
};

fn append_with_fresh_ids<T: SectionItem>(target: &mut Vec<T>, incoming: Option<Vec<T>>) {
    for mut entry in incoming.unwrap_or_default() {
        entry.set_id(Uuid::new_v4());
        target.push(entry);
    }
}

/// Hydrates every absent section with its empty default. Entry ids are kept.
impl From<PartialResumeData> for ResumeData {
    fn from(partial: PartialResumeData) -> Self {
        ResumeData {
            contact: partial.contact.unwrap_or_default(),
            summary: partial.summary.unwrap_or_default(),
            experience: partial.experience.unwrap_or_default(),
            education: partial.education.unwrap_or_default(),
            skills: partial.skills.unwrap_or_default(),
            projects: partial.projects.unwrap_or_default(),
            certifications: partial.certifications.unwrap_or_default(),
            languages: partial.languages.unwrap_or_default(),
            volunteer: partial.volunteer.unwrap_or_default(),
            awards: partial.awards.unwrap_or_default(),
            publications: partial.publications.unwrap_or_default(),
            references: partial.references.unwrap_or_default(),
            hobbies: partial.hobbies.unwrap_or_default(),
            affiliations: partial.affiliations.unwrap_or_default(),
            courses: partial.courses.unwrap_or_default(),
            custom_sections: partial.custom_sections.unwrap_or_default(),
        }
    }
}

impl ResumeData {
    /// Folds an imported partial resume into this record.
    ///
    /// Present list sections are appended with regenerated ids, contact only fills
    /// empty fields, summary text is appended on a new line, hobbies are deduplicated.
    pub fn merge_partial(&mut self, partial: PartialResumeData) {
        if let Some(contact) = partial.contact {
            self.contact.fill_missing_from(&contact);
        }
        if let Some(summary) = partial.summary {
            let incoming = summary.text.trim();
            if !incoming.is_empty() {
                if self.summary.text.trim().is_empty() {
                    self.summary.text = incoming.to_string();
                } else {
                    self.summary.text = format!("{}\n{}", self.summary.text.trim_end(), incoming);
                }
            }
        }
        if let Some(hobbies) = partial.hobbies {
            for item in hobbies.items {
                if !self
                    .hobbies
                    .items
                    .iter()
                    .any(|h| h.eq_ignore_ascii_case(&item))
                {
                    self.hobbies.items.push(item);
                }
            }
        }
        append_with_fresh_ids(&mut self.experience, partial.experience);
        append_with_fresh_ids(&mut self.education, partial.education);
        append_with_fresh_ids(&mut self.skills, partial.skills);
        append_with_fresh_ids(&mut self.projects, partial.projects);
        append_with_fresh_ids(&mut self.certifications, partial.certifications);
        append_with_fresh_ids(&mut self.languages, partial.languages);
        append_with_fresh_ids(&mut self.volunteer, partial.volunteer);
        append_with_fresh_ids(&mut self.awards, partial.awards);
        append_with_fresh_ids(&mut self.publications, partial.publications);
        append_with_fresh_ids(&mut self.references, partial.references);
        append_with_fresh_ids(&mut self.affiliations, partial.affiliations);
        append_with_fresh_ids(&mut self.courses, partial.courses);
        append_with_fresh_ids(&mut self.custom_sections, partial.custom_sections);
    }

    /// Problems that keep this record from being a complete resume.
    pub fn validation_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.contact.first_name.trim().is_empty() {
            issues.push("contact.first_name is required".to_string());
        }
        if self.contact.last_name.trim().is_empty() {
            issues.push("contact.last_name is required".to_string());
        }
        if self.summary.text.chars().count() > MAX_SUMMARY_CHARS {
            issues.push(format!(
                "summary.text exceeds {MAX_SUMMARY_CHARS} characters"
            ));
        }

        let highlight_lists = self
            .experience
            .iter()
            .map(|e| ("experience", &e.highlights))
            .chain(self.education.iter().map(|e| ("education", &e.highlights)))
            .chain(self.projects.iter().map(|e| ("projects", &e.highlights)))
            .chain(self.volunteer.iter().map(|e| ("volunteer", &e.highlights)));
        for (section, highlights) in highlight_lists {
            let too_long = highlights
                .iter()
                .filter(|h| h.chars().count() > MAX_HIGHLIGHT_CHARS)
                .count();
            if too_long > 0 {
                issues.push(format!(
                    "{too_long} {section} highlight(s) exceed {MAX_HIGHLIGHT_CHARS} characters"
                ));
            }
        }
        issues
    }
}
