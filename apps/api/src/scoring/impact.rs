use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Verbs that make a strong opening word for an achievement bullet.
const ACTION_VERBS: &[&str] = &[
    "accelerated", "achieved", "automated", "analyzed", "architected", "boosted", "built",
    "championed", "coached", "collaborated", "consolidated", "created", "cut", "decreased",
    "delivered", "deployed", "designed", "developed", "directed", "drove", "eliminated",
    "engineered", "established", "executed", "expanded", "generated", "grew", "headed",
    "implemented", "improved", "increased", "initiated", "integrated", "introduced", "launched",
    "led", "managed", "mentored", "migrated", "modernized", "negotiated", "optimized",
    "orchestrated", "organized", "oversaw", "pioneered", "planned", "produced", "published",
    "raised", "rebuilt", "redesigned", "reduced", "refactored", "resolved", "restructured",
    "revamped", "saved", "scaled", "secured", "shipped", "simplified", "spearheaded",
    "streamlined", "strengthened", "supervised", "trained", "transformed", "tripled",
    "doubled", "won", "wrote",
];

/// Phrases that signal a duty rather than an outcome.
const VAGUE_PHRASES: &[&str] = &[
    "responsible for",
    "worked on",
    "worked with",
    "helped",
    "assisted",
    "participated",
    "involved in",
    "duties included",
    "tasked with",
];

/// Percentages, `Nx` multipliers, `N+`, `2M`-style magnitudes, amounts and `1,200`-style figures.
static MEASURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d+(?:\.\d+)?\s*(?:%|x\b|\+|[kmb]\b)|[$€£¥]\s*\d|\b\d{1,3}(?:,\d{3})+\b")
        .expect("valid regex")
});

/// A bare count followed by what was counted, with the word before it when there is one.
static COUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:([A-Za-z][\w.]*)\s+)?\b\d+\s+[a-z]").expect("valid regex")
});

/// "Windows 10 images" names a product version rather than a count.
fn follows_product_name(word: regex::Match<'_>) -> bool {
    word.start() > 0 && word.as_str().starts_with(char::is_uppercase)
}

/// What a single highlight bullet shows about its impact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletCheck {
    pub quantified: bool,
    pub action_verb: bool,
    /// First duty-style phrase found, if the bullet has no number.
    pub vague_phrase: Option<String>,
}

/// True when the bullet carries a measurable result.
pub fn is_quantified(text: &str) -> bool {
    let text = text.trim();
    MEASURE.is_match(text)
        || COUNT
            .captures_iter(text)
            .any(|caps| !caps.get(1).is_some_and(follows_product_name))
}

/// True when the first word is a known action verb (case-insensitive).
pub fn starts_with_action_verb(text: &str) -> bool {
    text.split_whitespace()
        .next()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphabetic())
                .to_lowercase()
        })
        .map(|w| ACTION_VERBS.contains(&w.as_str()))
        .unwrap_or(false)
}

pub fn check_bullet(text: &str) -> BulletCheck {
    let quantified = is_quantified(text);
    let lower = text.to_lowercase();
    let vague_phrase = if quantified {
        None
    } else {
        VAGUE_PHRASES
            .iter()
            .find(|p| lower.contains(*p))
            .map(|p| p.to_string())
    };
    BulletCheck {
        quantified,
        action_verb: starts_with_action_verb(text),
        vague_phrase,
    }
}

/// A few example verbs for suggestion text.
pub fn sample_action_verbs() -> String {
    ["Led", "Built", "Reduced", "Increased", "Designed"].join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantified_patterns() {
        assert!(is_quantified("Increased engagement by 35%"));
        assert!(is_quantified("Led a team of 8 engineers"));
        assert!(is_quantified("Migrated 40 services"));
        assert!(is_quantified("Handled 2M events per day"));
        assert!(is_quantified("Closed 1,200 tickets"));
        assert!(is_quantified("10+ years of on-call"));
        assert!(is_quantified("Saved $2M annually"));
        assert!(is_quantified("Made builds 3x faster"));
        assert!(is_quantified("Served ~40 clients"));
        assert!(!is_quantified("Was responsible for things"));
    }

    #[test]
    fn test_versions_and_labels_are_not_quantities() {
        assert!(!is_quantified("Maintained Windows 10 images"));
        assert!(!is_quantified("Owned Q3 planning"));
        assert!(!is_quantified("Ported scripts to Python 3"));
        assert!(!is_quantified("Led a team of 8"));
    }

    #[test]
    fn test_action_verb_at_start_only() {
        assert!(starts_with_action_verb("Led a team of 8"));
        assert!(starts_with_action_verb("  built the pipeline"));
        assert!(starts_with_action_verb("Reduced, then eliminated, toil"));
        assert!(!starts_with_action_verb("Was responsible for things"));
        assert!(!starts_with_action_verb("Team I led"));
        assert!(!starts_with_action_verb(""));
    }

    #[test]
    fn test_check_bullet_flags_vague_duty() {
        let check = check_bullet("Worked with people");
        assert!(!check.quantified);
        assert!(!check.action_verb);
        assert_eq!(check.vague_phrase.as_deref(), Some("worked with"));

        let check = check_bullet("Helped cut costs by 20%");
        assert!(check.quantified);
        assert!(check.vague_phrase.is_none());
    }
}
