//! Phrase-aware keyword tokenizer used for job/resume keyword matching.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::matching::synonyms::{get_canonical_form, is_known_term, phrase_variants};

const STOPWORDS: &[&str] = &[
    // English function words
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "either",
    "etc", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
    "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "may", "me", "might", "more", "most", "must", "my", "no", "nor", "not", "of", "off", "on",
    "once", "only", "or", "other", "our", "ours", "out", "over", "own", "per", "same", "shall",
    "she", "should", "so", "some", "such", "than", "that", "the", "their", "them", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "upon", "us", "very", "via", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "within", "without", "would", "you",
    "your", "yours", "and/or",
    // Job posting filler
    "ability", "able", "across", "applicants", "apply", "bonus", "candidate", "candidates",
    "company", "degree", "environment", "equivalent", "excellent", "experience",
    "experienced", "field", "good", "great", "help", "ideal", "including", "join", "job",
    "knowledge", "looking", "new", "nice", "opportunity", "plus", "position", "preferred",
    "proficiency", "proficient", "qualifications", "related", "required", "requirements",
    "responsibilities", "role", "skills", "strong", "team", "understanding", "use", "using",
    "well", "work", "working", "year", "years",
];

static STOPWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOPWORDS.iter().copied().collect());

pub fn is_stopword(word: &str) -> bool {
    STOPWORD_SET.contains(word)
}

fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '/' | '-')
}

fn is_word_char(c: Option<char>) -> bool {
    c.map(|c| c.is_alphanumeric()).unwrap_or(false)
}

/// Finds whole-word occurrences of `phrase` in `haystack`.
pub(crate) fn phrase_positions(haystack: &str, phrase: &str) -> Vec<usize> {
    haystack
        .match_indices(phrase)
        .filter(|(start, _)| {
            let before = haystack[..*start].chars().next_back();
            let after = haystack[start + phrase.len()..].chars().next();
            !is_word_char(before) && !is_word_char(after)
        })
        .map(|(start, _)| start)
        .collect()
}

fn clean_token(raw: &str) -> &str {
    raw.trim_matches(|c: char| matches!(c, '.' | '/' | '-'))
}

fn keep_token(token: &str) -> bool {
    if token.is_empty() || is_stopword(token) {
        return false;
    }
    if token.chars().all(|c| !c.is_alphabetic()) {
        return false;
    }
    token.chars().count() >= 2 || is_known_term(token)
}

/// Extracts canonical keywords from `text`, in order of first appearance, without duplicates.
///
/// Known multi-word phrases are matched as units first; the remaining text is split
/// into single words, lowercased, stopwords removed, and mapped to canonical forms.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut work: Vec<u8> = lower.as_bytes().to_vec();
    let mut found: Vec<(usize, String)> = Vec::new();

    for (variant, canonical) in phrase_variants() {
        let current = String::from_utf8_lossy(&work).into_owned();
        for start in phrase_positions(&current, variant) {
            found.push((start, canonical.clone()));
            for byte in &mut work[start..start + variant.len()] {
                *byte = b' ';
            }
        }
    }

    // Phrase variants are ASCII, so blanking them keeps `work` valid UTF-8.
    let remaining = String::from_utf8_lossy(&work).into_owned();
    let base = remaining.as_ptr() as usize;
    for raw in remaining.split(|c: char| !is_token_char(c)) {
        let start = raw.as_ptr() as usize - base;
        let token = clean_token(raw);
        if token.is_empty() {
            continue;
        }
        let parts: Vec<&str> = if token.contains('/') && !is_known_term(token) {
            token.split('/').map(clean_token).collect()
        } else {
            vec![token]
        };
        for part in parts {
            if keep_token(part) {
                found.push((start, get_canonical_form(part)));
            }
        }
    }

    found.sort_by_key(|(pos, _)| *pos);
    let mut seen = HashSet::new();
    found
        .into_iter()
        .filter_map(|(_, kw)| seen.insert(kw.clone()).then_some(kw))
        .collect()
}
