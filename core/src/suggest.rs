use crate::index::{searchable_text, Snapshot};
use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;
pub const MIN_PREFIX_CHARS: usize = 2;
pub const POPULAR_TERMS: usize = 10;

/// Completions for `partial`, taken from name words (lowercased), then tags,
/// then categories, in order of first discovery.
pub fn get_suggestions(snapshot: &Snapshot, partial: &str, max_suggestions: usize) -> Vec<String> {
    let prefix_len = partial.chars().count();
    if prefix_len < MIN_PREFIX_CHARS {
        return Vec::new();
    }
    let prefix = partial.to_lowercase();
    let extends = |candidate: &str| {
        candidate.to_lowercase().starts_with(&prefix) && candidate.chars().count() > prefix_len
    };

    let docs = snapshot.documents();
    let names = docs
        .iter()
        .flat_map(|d| d.name.split_whitespace())
        .map(str::to_lowercase);
    let tags = docs.iter().flat_map(|d| d.tags.iter().cloned());
    let categories = docs.iter().map(|d| d.category.clone());

    let mut seen = HashSet::new();
    names
        .chain(tags)
        .chain(categories)
        .filter(|candidate| extends(candidate.as_str()))
        .filter(|candidate| seen.insert(candidate.clone()))
        .take(max_suggestions)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// Most frequent index tokens across all documents, counting every occurrence.
pub fn popular_terms(snapshot: &Snapshot, limit: usize) -> Vec<TermCount> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for doc in snapshot.documents() {
        for term in tokenize(&searchable_text(doc)) {
            let count = counts.entry(term.clone()).or_insert(0);
            if *count == 0 {
                order.push(term);
            }
            *count += 1;
        }
    }
    let mut ranked: Vec<TermCount> = order
        .into_iter()
        .map(|term| {
            let count = counts[&term];
            TermCount { term, count }
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use time::macros::datetime;

    fn snapshot() -> Snapshot {
        Snapshot::build(vec![
            Document::new(1, "Quarterly Report", datetime!(2024-01-01 0:00 UTC))
                .with_tags(["finance"])
                .with_category("reports"),
            Document::new(2, "Employee Handbook", datetime!(2024-06-01 0:00 UTC))
                .with_tags(["hr", "Recruiting"])
                .with_category("policies"),
            Document::new(3, "Report archive", datetime!(2024-06-01 0:00 UTC)).with_category("reports"),
        ])
    }

    #[test]
    fn completes_from_names_tags_and_categories() {
        let s = get_suggestions(&snapshot(), "re", DEFAULT_MAX_SUGGESTIONS);
        assert_eq!(s, vec!["report", "Recruiting", "reports"]);
    }

    #[test]
    fn short_prefix_yields_nothing() {
        assert!(get_suggestions(&snapshot(), "r", 5).is_empty());
        assert!(get_suggestions(&snapshot(), "", 5).is_empty());
    }

    #[test]
    fn exact_word_is_not_a_completion() {
        let s = get_suggestions(&snapshot(), "Report", 5);
        assert_eq!(s, vec!["reports"]);
    }

    #[test]
    fn truncates_to_max() {
        let s = get_suggestions(&snapshot(), "re", 1);
        assert_eq!(s, vec!["report"]);
    }

    #[test]
    fn popular_terms_by_count() {
        let top = popular_terms(&snapshot(), 2);
        assert_eq!(top[0], TermCount { term: "report".into(), count: 2 });
        assert_eq!(top[1], TermCount { term: "reports".into(), count: 2 });
        assert_eq!(top.len(), 2);
    }
}
