use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::resume::{ContactData, SectionEntry};
use crate::review::import::ImportReview;

/// One mutating review operation, as posted by a client.
///
/// Entries arrive as raw JSON and are decoded for the named section; a section name
/// or entry shape that does not resolve makes the action a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReviewAction {
    AddEntry {
        section: String,
        entry: Value,
    },
    UpdateEntry {
        section: String,
        index: usize,
        entry: Value,
    },
    RemoveEntry {
        section: String,
        index: usize,
    },
    ReorderEntries {
        section: String,
        order: Vec<usize>,
    },
    MergeEntries {
        section: String,
        index_a: usize,
        index_b: usize,
    },
    UpdateBullet {
        entry_index: usize,
        bullet_index: usize,
        text: String,
    },
    RemoveBullet {
        entry_index: usize,
        bullet_index: usize,
    },
    AddBullet {
        entry_index: usize,
        text: String,
    },
    ReorderBullet {
        entry_index: usize,
        from: usize,
        to: usize,
    },
    MoveBullet {
        from_entry: usize,
        bullet_index: usize,
        to_entry: usize,
    },
    SplitEntry {
        entry_index: usize,
        bullet_index: usize,
    },
    SwapPositionCompany {
        entry_index: usize,
    },
    SkipUnmatchedChunk {
        index: usize,
    },
    AddUnmatchedAs {
        index: usize,
        section: String,
    },
    SetContact {
        contact: ContactData,
    },
    SetSummary {
        text: String,
    },
    SetHobbies {
        items: Vec<String>,
    },
}

impl ReviewAction {
    pub fn name(&self) -> &'static str {
        match self {
            ReviewAction::AddEntry { .. } => "add_entry",
            ReviewAction::UpdateEntry { .. } => "update_entry",
            ReviewAction::RemoveEntry { .. } => "remove_entry",
            ReviewAction::ReorderEntries { .. } => "reorder_entries",
            ReviewAction::MergeEntries { .. } => "merge_entries",
            ReviewAction::UpdateBullet { .. } => "update_bullet",
            ReviewAction::RemoveBullet { .. } => "remove_bullet",
            ReviewAction::AddBullet { .. } => "add_bullet",
            ReviewAction::ReorderBullet { .. } => "reorder_bullet",
            ReviewAction::MoveBullet { .. } => "move_bullet",
            ReviewAction::SplitEntry { .. } => "split_entry",
            ReviewAction::SwapPositionCompany { .. } => "swap_position_company",
            ReviewAction::SkipUnmatchedChunk { .. } => "skip_unmatched_chunk",
            ReviewAction::AddUnmatchedAs { .. } => "add_unmatched_as",
            ReviewAction::SetContact { .. } => "set_contact",
            ReviewAction::SetSummary { .. } => "set_summary",
            ReviewAction::SetHobbies { .. } => "set_hobbies",
        }
    }

    /// Applies the action. Returns whether the review changed.
    pub fn apply(self, review: &mut ImportReview) -> bool {
        match self {
            ReviewAction::AddEntry { section, entry } => SectionEntry::from_value(&section, entry)
                .map(|entry| review.add_entry(entry))
                .unwrap_or(false),
            ReviewAction::UpdateEntry {
                section,
                index,
                entry,
            } => SectionEntry::from_value(&section, entry)
                .map(|entry| review.update_entry(index, entry))
                .unwrap_or(false),
            ReviewAction::RemoveEntry { section, index } => review.remove_entry(&section, index),
            ReviewAction::ReorderEntries { section, order } => {
                review.reorder_entries(&section, &order)
            }
            ReviewAction::MergeEntries {
                section,
                index_a,
                index_b,
            } => review.merge_entries(&section, index_a, index_b),
            ReviewAction::UpdateBullet {
                entry_index,
                bullet_index,
                text,
            } => review.update_bullet(entry_index, bullet_index, &text),
            ReviewAction::RemoveBullet {
                entry_index,
                bullet_index,
            } => review.remove_bullet(entry_index, bullet_index),
            ReviewAction::AddBullet { entry_index, text } => review.add_bullet(entry_index, &text),
            ReviewAction::ReorderBullet {
                entry_index,
                from,
                to,
            } => review.reorder_bullet(entry_index, from, to),
            ReviewAction::MoveBullet {
                from_entry,
                bullet_index,
                to_entry,
            } => review.move_bullet(from_entry, bullet_index, to_entry),
            ReviewAction::SplitEntry {
                entry_index,
                bullet_index,
            } => review.split_entry(entry_index, bullet_index),
            ReviewAction::SwapPositionCompany { entry_index } => {
                review.swap_position_company(entry_index)
            }
            ReviewAction::SkipUnmatchedChunk { index } => review.skip_unmatched_chunk(index),
            ReviewAction::AddUnmatchedAs { index, section } => {
                review.add_unmatched_as(index, &section)
            }
            ReviewAction::SetContact { contact } => review.set_contact(contact),
            ReviewAction::SetSummary { text } => review.set_summary(&text),
            ReviewAction::SetHobbies { items } => review.set_hobbies(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_actions_deserialize_from_tagged_json() {
        let action: ReviewAction = serde_json::from_value(json!({
            "action": "move_bullet",
            "from_entry": 0,
            "bullet_index": 2,
            "to_entry": 1
        }))
        .unwrap();
        assert_eq!(
            action,
            ReviewAction::MoveBullet {
                from_entry: 0,
                bullet_index: 2,
                to_entry: 1
            }
        );
        assert_eq!(action.name(), "move_bullet");
    }

    #[test]
    fn test_add_entry_with_bad_section_is_noop() {
        let mut review = ImportReview::default();
        let applied = ReviewAction::AddEntry {
            section: "experiance".to_string(),
            entry: json!({"company": "Acme"}),
        }
        .apply(&mut review);
        assert!(!applied);
        assert!(!review.can_undo());
    }

    #[test]
    fn test_add_and_update_entry_through_actions() {
        let mut review = ImportReview::default();
        assert!(ReviewAction::AddEntry {
            section: "customSections".to_string(),
            entry: json!({"title": "Talks", "items": ["RustConf 2024"]}),
        }
        .apply(&mut review));
        assert!(ReviewAction::UpdateEntry {
            section: "custom_sections".to_string(),
            index: 0,
            entry: json!({"title": "Talks", "items": ["RustConf 2024", "FOSDEM 2025"]}),
        }
        .apply(&mut review));
        assert_eq!(review.resume().custom_sections[0].items.len(), 2);
    }
}
