//! The editable import held during review.
//!
//! Every mutating operation works on a copy of the current snapshot. If the operation
//! resolves (known section, indexes in range, something actually changes) the copy becomes
//! current and the old snapshot is pushed to history. Otherwise nothing changes, including
//! the history stacks, and the operation returns `false`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::ingest::{extract_section, ResumeParseResult, SectionContent, UnmatchedChunk};
use crate::models::resume::{
    truncate_chars, ContactData, ExperienceEntry, HobbiesData, PartialResumeData, ResumeData,
    SectionEntry, SectionItem, SectionKind, SummaryData, MAX_HIGHLIGHT_CHARS, MAX_SUMMARY_CHARS,
};
use crate::review::confidence::{section_confidence, Confidence};
use crate::review::history::History;

/// Point-in-time copy of everything under review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSnapshot {
    pub resume: ResumeData,
    pub unmatched_chunks: Vec<UnmatchedChunk>,
}

/// Runs `$body` with `$list` bound to the entry list of `$kind`.
/// Non-list sections evaluate to `false`.
macro_rules! with_list {
    ($resume:expr, $kind:expr, |$list:ident| $body:expr) => {
        match $kind {
            SectionKind::Experience => {
                let $list = &mut $resume.experience;
                $body
            }
            SectionKind::Education => {
                let $list = &mut $resume.education;
                $body
            }
            SectionKind::Skills => {
                let $list = &mut $resume.skills;
                $body
            }
            SectionKind::Projects => {
                let $list = &mut $resume.projects;
                $body
            }
            SectionKind::Certifications => {
                let $list = &mut $resume.certifications;
                $body
            }
            SectionKind::Languages => {
                let $list = &mut $resume.languages;
                $body
            }
            SectionKind::Volunteer => {
                let $list = &mut $resume.volunteer;
                $body
            }
            SectionKind::Awards => {
                let $list = &mut $resume.awards;
                $body
            }
            SectionKind::Publications => {
                let $list = &mut $resume.publications;
                $body
            }
            SectionKind::References => {
                let $list = &mut $resume.references;
                $body
            }
            SectionKind::Affiliations => {
                let $list = &mut $resume.affiliations;
                $body
            }
            SectionKind::Courses => {
                let $list = &mut $resume.courses;
                $body
            }
            SectionKind::CustomSections => {
                let $list = &mut $resume.custom_sections;
                $body
            }
            SectionKind::Contact | SectionKind::Summary | SectionKind::Hobbies => false,
        }
    };
}

/// Runs `$body` with `$item` unwrapped from `$entry` and `$list` bound to its section.
macro_rules! with_entry {
    ($resume:expr, $entry:expr, |$list:ident, $item:ident| $body:expr) => {
        match $entry {
            SectionEntry::Experience($item) => {
                let $list = &mut $resume.experience;
                $body
            }
            SectionEntry::Education($item) => {
                let $list = &mut $resume.education;
                $body
            }
            SectionEntry::Skills($item) => {
                let $list = &mut $resume.skills;
                $body
            }
            SectionEntry::Projects($item) => {
                let $list = &mut $resume.projects;
                $body
            }
            SectionEntry::Certifications($item) => {
                let $list = &mut $resume.certifications;
                $body
            }
            SectionEntry::Languages($item) => {
                let $list = &mut $resume.languages;
                $body
            }
            SectionEntry::Volunteer($item) => {
                let $list = &mut $resume.volunteer;
                $body
            }
            SectionEntry::Awards($item) => {
                let $list = &mut $resume.awards;
                $body
            }
            SectionEntry::Publications($item) => {
                let $list = &mut $resume.publications;
                $body
            }
            SectionEntry::References($item) => {
                let $list = &mut $resume.references;
                $body
            }
            SectionEntry::Affiliations($item) => {
                let $list = &mut $resume.affiliations;
                $body
            }
            SectionEntry::Courses($item) => {
                let $list = &mut $resume.courses;
                $body
            }
            SectionEntry::CustomSections($item) => {
                let $list = &mut $resume.custom_sections;
                $body
            }
        }
    };
}

fn push_item<T: SectionItem>(list: &mut Vec<T>, mut item: T) -> bool {
    if item.id().is_nil() {
        item.set_id(Uuid::new_v4());
    }
    list.push(item);
    true
}

/// Replaces the entry at `index`, keeping its id.
fn replace_item<T: SectionItem + PartialEq>(list: &mut [T], index: usize, mut item: T) -> bool {
    let Some(slot) = list.get_mut(index) else {
        return false;
    };
    item.set_id(slot.id());
    if *slot == item {
        return false;
    }
    *slot = item;
    true
}

fn remove_item<T>(list: &mut Vec<T>, index: usize) -> bool {
    if index >= list.len() {
        return false;
    }
    list.remove(index);
    true
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &i in order {
        if i >= len || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}

/// Reorders so that position `i` holds the entry previously at `order[i]`.
fn reorder_items<T: Clone>(list: &mut Vec<T>, order: &[usize]) -> bool {
    if !is_permutation(order, list.len()) || order.iter().enumerate().all(|(i, &j)| i == j) {
        return false;
    }
    let reordered: Vec<T> = order.iter().map(|&i| list[i].clone()).collect();
    *list = reordered;
    true
}

fn bullet_text(text: &str) -> String {
    truncate_chars(text.trim(), MAX_HIGHLIGHT_CHARS)
}

fn present<T: Clone>(list: &[T]) -> Option<Vec<T>> {
    (!list.is_empty()).then(|| list.to_vec())
}

fn append_content(resume: &mut ResumeData, content: SectionContent) {
    match content {
        SectionContent::Contact(contact) => resume.contact.fill_missing_from(&contact),
        SectionContent::Summary(text) => {
            let joined = if resume.summary.text.trim().is_empty() {
                text
            } else {
                format!("{}\n{}", resume.summary.text, text)
            };
            resume.summary.text = truncate_chars(&joined, MAX_SUMMARY_CHARS);
        }
        SectionContent::Hobbies(items) => resume.hobbies.items.extend(items),
        SectionContent::Entries(entries) => {
            for entry in entries {
                with_entry!(resume, entry, |list, item| push_item(list, item));
            }
        }
    }
}

/// Review state machine over one imported resume.
#[derive(Debug, Clone, Default)]
pub struct ImportReview {
    current: ReviewSnapshot,
    history: History<ReviewSnapshot>,
}

impl ImportReview {
    /// Starts a review from parser output; absent sections are hydrated empty.
    pub fn from_parse_result(result: ResumeParseResult) -> Self {
        Self {
            current: ReviewSnapshot {
                resume: ResumeData::from(result.data),
                unmatched_chunks: result.unmatched_chunks,
            },
            history: History::default(),
        }
    }

    pub fn snapshot(&self) -> &ReviewSnapshot {
        &self.current
    }

    pub fn resume(&self) -> &ResumeData {
        &self.current.resume
    }

    pub fn unmatched_chunks(&self) -> &[UnmatchedChunk] {
        &self.current.unmatched_chunks
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        if !self.history.can_undo() {
            return false;
        }
        match self.history.undo(self.current.clone()) {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.can_redo() {
            return false;
        }
        match self.history.redo(self.current.clone()) {
            Some(next) => {
                self.current = next;
                true
            }
            None => false,
        }
    }

    /// Applies `f` to a working copy and commits it only when `f` reports a change.
    fn mutate(&mut self, f: impl FnOnce(&mut ReviewSnapshot) -> bool) -> bool {
        let mut next = self.current.clone();
        if !f(&mut next) {
            return false;
        }
        let previous = std::mem::replace(&mut self.current, next);
        self.history.push(previous);
        true
    }

    // ────────────────────────────────────────────────────────────────────────────
    // Generic entry operations
    // ────────────────────────────────────────────────────────────────────────────

    /// Appends an entry to its section. A nil id is replaced with a fresh one.
    pub fn add_entry(&mut self, entry: SectionEntry) -> bool {
        self.mutate(|s| with_entry!(s.resume, entry, |list, item| push_item(list, item)))
    }

    /// Replaces the entry at `index` in the entry's section. The stored id is kept.
    pub fn update_entry(&mut self, index: usize, entry: SectionEntry) -> bool {
        self.mutate(|s| with_entry!(s.resume, entry, |list, item| replace_item(list, index, item)))
    }

    pub fn remove_entry(&mut self, section: &str, index: usize) -> bool {
        let Some(kind) = SectionKind::from_name(section) else {
            return false;
        };
        self.mutate(|s| with_list!(s.resume, kind, |list| remove_item(list, index)))
    }

    /// `order[i]` names the current index of the entry that should end up at `i`.
    pub fn reorder_entries(&mut self, section: &str, order: &[usize]) -> bool {
        let Some(kind) = SectionKind::from_name(section) else {
            return false;
        };
        self.mutate(|s| with_list!(s.resume, kind, |list| reorder_items(list, order)))
    }

    /// For experience, B's highlights are appended to A. B is always removed.
    pub fn merge_entries(&mut self, section: &str, index_a: usize, index_b: usize) -> bool {
        let Some(kind) = SectionKind::from_name(section) else {
            return false;
        };
        self.mutate(|s| {
            if kind == SectionKind::Experience {
                let list = &mut s.resume.experience;
                if index_a == index_b || index_a >= list.len() || index_b >= list.len() {
                    return false;
                }
                let absorbed = list.remove(index_b);
                let target = if index_b < index_a { index_a - 1 } else { index_a };
                list[target].highlights.extend(absorbed.highlights);
                return true;
            }
            with_list!(s.resume, kind, |list| {
                if index_a == index_b || index_a >= list.len() {
                    false
                } else {
                    remove_item(list, index_b)
                }
            })
        })
    }

    // ────────────────────────────────────────────────────────────────────────────
    // Experience bullets
    // ────────────────────────────────────────────────────────────────────────────

    fn experience_entry(s: &mut ReviewSnapshot, index: usize) -> Option<&mut ExperienceEntry> {
        s.resume.experience.get_mut(index)
    }

    pub fn update_bullet(&mut self, entry_index: usize, bullet_index: usize, text: &str) -> bool {
        let text = bullet_text(text);
        self.mutate(|s| {
            match Self::experience_entry(s, entry_index).and_then(|e| e.highlights.get_mut(bullet_index)) {
                Some(bullet) if *bullet != text => {
                    *bullet = text;
                    true
                }
                _ => false,
            }
        })
    }

    pub fn remove_bullet(&mut self, entry_index: usize, bullet_index: usize) -> bool {
        self.mutate(|s| {
            Self::experience_entry(s, entry_index)
                .map(|e| remove_item(&mut e.highlights, bullet_index))
                .unwrap_or(false)
        })
    }

    /// Appends a bullet; blank text is ignored.
    pub fn add_bullet(&mut self, entry_index: usize, text: &str) -> bool {
        let text = bullet_text(text);
        if text.is_empty() {
            return false;
        }
        self.mutate(|s| match Self::experience_entry(s, entry_index) {
            Some(entry) => {
                entry.highlights.push(text);
                true
            }
            None => false,
        })
    }

    /// Moves the bullet at `from` so that it ends up at index `to` within the same entry.
    pub fn reorder_bullet(&mut self, entry_index: usize, from: usize, to: usize) -> bool {
        self.mutate(|s| {
            let Some(entry) = Self::experience_entry(s, entry_index) else {
                return false;
            };
            let len = entry.highlights.len();
            if from == to || from >= len || to >= len {
                return false;
            }
            let bullet = entry.highlights.remove(from);
            entry.highlights.insert(to, bullet);
            true
        })
    }

    /// Moves a bullet to the end of another experience entry.
    pub fn move_bullet(&mut self, from_entry: usize, bullet_index: usize, to_entry: usize) -> bool {
        self.mutate(|s| {
            let list = &mut s.resume.experience;
            if to_entry >= list.len() {
                return false;
            }
            let Some(source) = list.get_mut(from_entry) else {
                return false;
            };
            if bullet_index >= source.highlights.len() {
                return false;
            }
            let bullet = source.highlights.remove(bullet_index);
            list[to_entry].highlights.push(bullet);
            true
        })
    }

    /// Splits an experience entry at a bullet that is really the title of another role.
    ///
    /// Bullets before `bullet_index` stay. The bullet at `bullet_index` becomes the new
    /// entry's position and later bullets move with it. The new entry follows the original.
    pub fn split_entry(&mut self, entry_index: usize, bullet_index: usize) -> bool {
        self.mutate(|s| {
            let Some(entry) = Self::experience_entry(s, entry_index) else {
                return false;
            };
            if bullet_index >= entry.highlights.len() {
                return false;
            }
            let mut tail = entry.highlights.split_off(bullet_index);
            let position = tail.remove(0);
            let split = ExperienceEntry {
                id: Uuid::new_v4(),
                position,
                highlights: tail,
                ..Default::default()
            };
            s.resume.experience.insert(entry_index + 1, split);
            true
        })
    }

    pub fn swap_position_company(&mut self, entry_index: usize) -> bool {
        self.mutate(|s| match Self::experience_entry(s, entry_index) {
            Some(entry) if entry.position != entry.company => {
                std::mem::swap(&mut entry.position, &mut entry.company);
                true
            }
            _ => false,
        })
    }

    // ────────────────────────────────────────────────────────────────────────────
    // Unmatched chunks and whole-section edits
    // ────────────────────────────────────────────────────────────────────────────

    pub fn skip_unmatched_chunk(&mut self, index: usize) -> bool {
        self.mutate(|s| remove_item(&mut s.unmatched_chunks, index))
    }

    /// Re-parses one chunk as `section` and folds the result in.
    ///
    /// The chunk is consumed whether or not anything could be extracted from it.
    /// Unknown section names and out-of-range indexes change nothing.
    pub fn add_unmatched_as(&mut self, index: usize, section: &str) -> bool {
        let Some(kind) = SectionKind::from_name(section) else {
            return false;
        };
        self.mutate(|s| {
            if index >= s.unmatched_chunks.len() {
                return false;
            }
            let chunk = s.unmatched_chunks.remove(index);
            match extract_section(kind, &chunk.text) {
                Some(content) => append_content(&mut s.resume, content),
                None => debug!(
                    section = kind.as_str(),
                    chars = chunk.text.len(),
                    "Nothing extracted from unmatched chunk; discarding"
                ),
            }
            true
        })
    }

    pub fn set_contact(&mut self, contact: ContactData) -> bool {
        self.mutate(|s| {
            if s.resume.contact == contact {
                return false;
            }
            s.resume.contact = contact;
            true
        })
    }

    pub fn set_summary(&mut self, text: &str) -> bool {
        let summary = SummaryData {
            text: truncate_chars(text.trim(), MAX_SUMMARY_CHARS),
        };
        self.mutate(|s| {
            if s.resume.summary == summary {
                return false;
            }
            s.resume.summary = summary;
            true
        })
    }

    pub fn set_hobbies(&mut self, items: Vec<String>) -> bool {
        let hobbies = HobbiesData {
            items: items
                .into_iter()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
                .collect(),
        };
        self.mutate(|s| {
            if s.resume.hobbies == hobbies {
                return false;
            }
            s.resume.hobbies = hobbies;
            true
        })
    }

    // ────────────────────────────────────────────────────────────────────────────
    // Read side
    // ────────────────────────────────────────────────────────────────────────────

    /// Unknown section names are reported as empty.
    pub fn get_section_confidence(&self, section: &str) -> Confidence {
        SectionKind::from_name(section)
            .map(|kind| section_confidence(&self.current.resume, kind))
            .unwrap_or(Confidence::Empty)
    }

    pub fn confidence_report(&self) -> BTreeMap<&'static str, Confidence> {
        SectionKind::ALL
            .iter()
            .map(|kind| (kind.as_str(), section_confidence(&self.current.resume, *kind)))
            .collect()
    }

    /// Only non-empty sections are present in the result.
    pub fn build_partial_resume_data(&self) -> PartialResumeData {
        let r = &self.current.resume;
        PartialResumeData {
            contact: (!r.contact.is_empty()).then(|| r.contact.clone()),
            summary: (!r.summary.text.trim().is_empty()).then(|| r.summary.clone()),
            experience: present(&r.experience),
            education: present(&r.education),
            skills: present(&r.skills),
            projects: present(&r.projects),
            certifications: present(&r.certifications),
            languages: present(&r.languages),
            volunteer: present(&r.volunteer),
            awards: present(&r.awards),
            publications: present(&r.publications),
            references: present(&r.references),
            hobbies: (!r.hobbies.items.is_empty()).then(|| r.hobbies.clone()),
            affiliations: present(&r.affiliations),
            courses: present(&r.courses),
            custom_sections: present(&r.custom_sections),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parse_resume_text;
    use crate::models::resume::{AwardEntry, SkillCategory};

    fn experience(position: &str, company: &str, highlights: &[&str]) -> ExperienceEntry {
        ExperienceEntry {
            id: Uuid::new_v4(),
            position: position.to_string(),
            company: company.to_string(),
            highlights: highlights.iter().map(|h| h.to_string()).collect(),
            ..Default::default()
        }
    }

    fn review_with(entries: Vec<ExperienceEntry>, chunks: &[&str]) -> ImportReview {
        ImportReview::from_parse_result(ResumeParseResult {
            data: PartialResumeData {
                experience: Some(entries),
                ..Default::default()
            },
            unmatched_chunks: chunks
                .iter()
                .map(|t| UnmatchedChunk {
                    text: t.to_string(),
                    start_offset: 0,
                    end_offset: t.len(),
                })
                .collect(),
        })
    }

    fn award(title: &str) -> SectionEntry {
        SectionEntry::Awards(AwardEntry {
            id: Uuid::new_v4(),
            title: title.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_hydrates_parser_output() {
        let review = ImportReview::from_parse_result(parse_resume_text(""));
        assert!(review.resume().experience.is_empty());
        assert!(!review.can_undo());
        assert!(!review.can_redo());
    }

    #[test]
    fn test_undo_redo_restores_snapshots() {
        let mut review = review_with(vec![experience("Engineer", "Acme", &[])], &[]);
        let v1 = review.snapshot().clone();
        assert!(review.add_bullet(0, "Shipped v2"));
        let v2 = review.snapshot().clone();

        assert!(review.undo());
        assert_eq!(review.snapshot(), &v1);
        assert!(review.can_redo());

        assert!(review.redo());
        assert_eq!(review.snapshot(), &v2);
        assert!(!review.can_redo());

        assert!(!review.redo());
    }

    #[test]
    fn test_noops_leave_history_untouched() {
        let mut review = review_with(vec![experience("Engineer", "Acme", &["a"])], &[]);
        assert!(!review.remove_entry("nonsense", 0));
        assert!(!review.remove_entry("experience", 5));
        assert!(!review.update_bullet(3, 0, "x"));
        assert!(!review.reorder_entries("experience", &[0, 0]));
        assert!(!review.skip_unmatched_chunk(0));
        assert!(!review.add_unmatched_as(0, "skills"));
        assert!(!review.can_undo());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut review = review_with(vec![experience("Engineer", "Acme", &[])], &[]);
        for i in 0..60 {
            assert!(review.add_bullet(0, &format!("bullet {i}")));
        }
        let mut undone = 0;
        while review.undo() {
            undone += 1;
        }
        assert_eq!(undone, 50);
        assert_eq!(review.resume().experience[0].highlights.len(), 10);
    }

    #[test]
    fn test_generic_add_update_remove_reorder() {
        let mut review = ImportReview::default();
        assert!(review.add_entry(award("First")));
        assert!(review.add_entry(award("Second")));
        assert!(review.add_entry(award("Third")));

        let id = review.resume().awards[1].id;
        assert!(review.update_entry(1, award("Second (updated)")));
        assert_eq!(review.resume().awards[1].title, "Second (updated)");
        assert_eq!(review.resume().awards[1].id, id);

        assert!(review.reorder_entries("awards", &[2, 0, 1]));
        let titles: Vec<&str> = review.resume().awards.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Third", "First", "Second (updated)"]);

        assert!(review.remove_entry("awards", 0));
        assert_eq!(review.resume().awards.len(), 2);
        assert!(!review.update_entry(9, award("x")));
    }

    #[test]
    fn test_nil_id_gets_fresh_id_on_add() {
        let mut review = ImportReview::default();
        review.add_entry(SectionEntry::Skills(SkillCategory {
            id: Uuid::nil(),
            category: "Languages".to_string(),
            ..Default::default()
        }));
        assert!(!review.resume().skills[0].id.is_nil());
    }

    #[test]
    fn test_bullet_operations() {
        let mut review = review_with(
            vec![
                experience("Engineer", "Acme", &["a", "b", "c"]),
                experience("Intern", "Beta", &["x"]),
            ],
            &[],
        );
        assert!(review.update_bullet(0, 1, "  B  "));
        assert!(review.reorder_bullet(0, 0, 2));
        assert_eq!(review.resume().experience[0].highlights, vec!["B", "c", "a"]);

        assert!(review.move_bullet(0, 0, 1));
        assert_eq!(review.resume().experience[0].highlights, vec!["c", "a"]);
        assert_eq!(review.resume().experience[1].highlights, vec!["x", "B"]);

        assert!(review.remove_bullet(1, 0));
        assert_eq!(review.resume().experience[1].highlights, vec!["B"]);
        assert!(!review.add_bullet(0, "   "));

        let long = "y".repeat(MAX_HIGHLIGHT_CHARS + 20);
        assert!(review.add_bullet(0, &long));
        assert_eq!(
            review.resume().experience[0].highlights[2].chars().count(),
            MAX_HIGHLIGHT_CHARS
        );
    }

    #[test]
    fn test_split_entry() {
        let mut review = review_with(
            vec![
                experience("Engineer", "Acme", &["a", "Senior Engineer", "b", "c"]),
                experience("Intern", "Beta", &[]),
            ],
            &[],
        );
        let original_id = review.resume().experience[0].id;
        assert!(review.split_entry(0, 1));

        let list = &review.resume().experience;
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].id, original_id);
        assert_eq!(list[0].highlights, vec!["a"]);
        assert_eq!(list[1].position, "Senior Engineer");
        assert_eq!(list[1].highlights, vec!["b", "c"]);
        assert_ne!(list[1].id, original_id);
        assert_eq!(list[2].position, "Intern");

        assert!(!review.split_entry(0, 1));
    }

    #[test]
    fn test_swap_position_company() {
        let mut review = review_with(vec![experience("Acme", "Engineer", &[])], &[]);
        assert!(review.swap_position_company(0));
        assert_eq!(review.resume().experience[0].position, "Engineer");
        assert_eq!(review.resume().experience[0].company, "Acme");
    }

    #[test]
    fn test_merge_entries() {
        let mut review = review_with(
            vec![
                experience("Engineer", "Acme", &["a"]),
                experience("", "", &["b", "c"]),
            ],
            &[],
        );
        assert!(review.merge_entries("experience", 0, 1));
        assert_eq!(review.resume().experience.len(), 1);
        assert_eq!(review.resume().experience[0].highlights, vec!["a", "b", "c"]);

        review.add_entry(award("Keep"));
        review.add_entry(award("Drop"));
        assert!(review.merge_entries("awards", 0, 1));
        assert_eq!(review.resume().awards.len(), 1);
        assert_eq!(review.resume().awards[0].title, "Keep");
        assert!(!review.merge_entries("awards", 0, 0));
    }

    #[test]
    fn test_add_unmatched_as_sections() {
        let mut review = review_with(
            Vec::new(),
            &[
                "Built distributed systems for a decade.",
                "Chess, Hiking",
                "12345",
                "Python, Rust, Kubernetes",
            ],
        );
        review.set_summary("Backend engineer.");

        assert!(review.add_unmatched_as(0, "summary"));
        assert_eq!(
            review.resume().summary.text,
            "Backend engineer.\nBuilt distributed systems for a decade."
        );

        assert!(review.add_unmatched_as(0, "hobbies"));
        assert_eq!(review.resume().hobbies.items, vec!["Chess", "Hiking"]);

        assert!(review.add_unmatched_as(0, "languages"));
        assert_eq!(review.unmatched_chunks().len(), 1);
        assert!(review.resume().languages.is_empty());

        assert!(review.add_unmatched_as(0, "skills"));
        assert!(review.unmatched_chunks().is_empty());
        let skills: Vec<&str> = review.resume().skills[0]
            .items
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(skills, vec!["Python", "Rust", "Kubernetes"]);

        assert!(review.undo());
        assert_eq!(review.unmatched_chunks().len(), 1);
        assert!(review.resume().skills.is_empty());
    }

    #[test]
    fn test_add_unmatched_as_contact_fills_only_empty_fields() {
        let mut review = review_with(Vec::new(), &["jane@example.com | (415) 555-0100"]);
        review.set_contact(ContactData {
            first_name: "Jane".to_string(),
            email: "old@example.com".to_string(),
            ..Default::default()
        });
        assert!(review.add_unmatched_as(0, "contact"));
        assert_eq!(review.resume().contact.email, "old@example.com");
        assert_eq!(review.resume().contact.phone, "(415) 555-0100");
        assert_eq!(review.get_section_confidence("contact"), Confidence::Complete);
    }

    #[test]
    fn test_build_partial_skips_empty_sections() {
        let mut review = review_with(vec![experience("Engineer", "Acme", &[])], &[]);
        review.set_hobbies(vec!["  ".to_string()]);
        let partial = review.build_partial_resume_data();
        assert!(partial.experience.is_some());
        assert!(partial.education.is_none());
        assert!(partial.contact.is_none());
        assert!(partial.hobbies.is_none());
        assert!(partial.summary.is_none());
    }

    #[test]
    fn test_confidence_report_covers_every_section() {
        let review = ImportReview::default();
        let report = review.confidence_report();
        assert_eq!(report.len(), SectionKind::ALL.len());
        assert_eq!(review.get_section_confidence("unknown"), Confidence::Empty);
    }
}
