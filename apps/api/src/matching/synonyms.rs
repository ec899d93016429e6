//! Synonym resolver: canonicalizes skill and keyword spellings into equivalence groups.
//!
//! The first member of each group is its canonical form. Lookup is case-insensitive
//! and otherwise exact.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

/// Equivalence groups, canonical form first. A term may appear in at most one group.
const SYNONYM_GROUPS: &[&[&str]] = &[
    // Languages
    &["javascript", "js", "ecmascript", "es6"],
    &["typescript", "ts"],
    &["python", "py", "python3"],
    &["golang", "go lang"],
    &["c++", "cpp", "cplusplus"],
    &["c#", "csharp", "c sharp"],
    &["objective-c", "objc", "objective c"],
    &["ruby on rails", "rails", "ror"],
    // Frontend
    &["react", "reactjs", "react.js"],
    &["vue", "vuejs", "vue.js"],
    &["angular", "angularjs", "angular.js"],
    &["next.js", "nextjs"],
    &["node.js", "node", "nodejs"],
    &["express", "expressjs", "express.js"],
    &["html", "html5"],
    &["css", "css3"],
    &["front-end", "frontend", "front end"],
    &["back-end", "backend", "back end"],
    &["full-stack", "fullstack", "full stack"],
    // Data
    &["postgresql", "postgres", "psql"],
    &["mongodb", "mongo"],
    &["mysql", "my sql"],
    &["sql server", "mssql", "ms sql"],
    &["elasticsearch", "elastic search"],
    &["machine learning", "ml"],
    &["artificial intelligence", "ai"],
    &["deep learning", "dl"],
    &["natural language processing", "nlp"],
    &["computer vision", "cv"],
    &["data science", "data scientist"],
    &["data analysis", "data analytics"],
    &["business intelligence", "bi"],
    &["extract transform load", "etl"],
    &["scikit-learn", "sklearn", "scikit learn"],
    &["tensorflow", "tf"],
    &["pytorch", "torch"],
    // Cloud & ops
    &["amazon web services", "aws"],
    &["google cloud platform", "gcp", "google cloud"],
    &["microsoft azure", "azure"],
    &["kubernetes", "k8s"],
    &["continuous integration", "ci"],
    &["continuous delivery", "cd", "continuous deployment"],
    &["ci/cd", "cicd"],
    &["infrastructure as code", "iac"],
    &["site reliability engineering", "sre"],
    &["devops", "dev ops"],
    &["amazon ec2", "ec2"],
    &["amazon s3", "s3"],
    &["github actions", "gh actions"],
    // Practices
    &["object-oriented programming", "oop", "object oriented programming"],
    &["test-driven development", "tdd", "test driven development"],
    &["behavior-driven development", "bdd"],
    &["application programming interface", "api", "apis"],
    &["representational state transfer", "rest", "restful"],
    &["graphql", "gql"],
    &["user experience", "ux"],
    &["user interface", "ui"],
    &["search engine optimization", "seo"],
    &["customer relationship management", "crm"],
    &["enterprise resource planning", "erp"],
    &["quality assurance", "qa"],
    &["software development life cycle", "sdlc"],
    &["agile", "scrum", "agile methodologies"],
    &["project management", "pm"],
    &["key performance indicators", "kpi", "kpis"],
    &["return on investment", "roi"],
    &["software as a service", "saas"],
    &["microservices", "micro-services", "microservice architecture"],
];

struct SynonymTable {
    groups: Vec<Vec<String>>,
    index: HashMap<String, usize>,
}

static TABLE: Lazy<SynonymTable> = Lazy::new(|| {
    let mut groups: Vec<Vec<String>> = Vec::with_capacity(SYNONYM_GROUPS.len());
    let mut index = HashMap::new();
    for group in SYNONYM_GROUPS {
        let mut members: Vec<String> = Vec::with_capacity(group.len());
        for term in group.iter() {
            let term = term.to_lowercase();
            // First group wins; a duplicate would break symmetry.
            if index.contains_key(&term) || members.contains(&term) {
                continue;
            }
            members.push(term);
        }
        let group_id = groups.len();
        for term in &members {
            index.insert(term.clone(), group_id);
        }
        groups.push(members);
    }
    SynonymTable { groups, index }
});

static KNOWN_PHRASES: Lazy<HashSet<String>> = Lazy::new(|| {
    TABLE
        .groups
        .iter()
        .filter_map(|g| g.first())
        .filter(|canonical| canonical.contains(' ') || canonical.contains('-'))
        .cloned()
        .collect()
});

/// Every multi-word or hyphenated group member paired with its canonical form,
/// longest variant first so overlapping phrases resolve to the most specific one.
static PHRASE_VARIANTS: Lazy<Vec<(String, String)>> = Lazy::new(|| {
    let mut variants: Vec<(String, String)> = TABLE
        .groups
        .iter()
        .filter_map(|group| group.first().map(|canonical| (group, canonical.clone())))
        .flat_map(|(group, canonical)| {
            group
                .iter()
                .filter(|m| m.contains(' ') || m.contains('-'))
                .map(move |m| (m.clone(), canonical.clone()))
        })
        .collect();
    variants.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
    variants
});

pub(crate) fn phrase_variants() -> &'static [(String, String)] {
    &PHRASE_VARIANTS
}

/// True when `term` belongs to any synonym group.
pub fn is_known_term(term: &str) -> bool {
    group_of(term).is_some()
}

fn group_of(term: &str) -> Option<&'static [String]> {
    let key = term.trim().to_lowercase();
    TABLE
        .index
        .get(&key)
        .map(|&id| TABLE.groups[id].as_slice())
}

/// Returns the whole equivalence group containing `term`, or `[term]` if it is unknown.
pub fn resolve_synonyms(term: &str) -> Vec<String> {
    match group_of(term) {
        Some(group) => group.to_vec(),
        None => vec![term.to_string()],
    }
}

/// Returns the canonical member of the group containing `term`, or `term` itself.
pub fn get_canonical_form(term: &str) -> String {
    match group_of(term).and_then(|g| g.first()) {
        Some(canonical) => canonical.clone(),
        None => term.to_string(),
    }
}

/// Multi-word and hyphenated canonical forms, matched as units during tokenization.
pub fn get_known_phrases() -> &'static HashSet<String> {
    &KNOWN_PHRASES
}
