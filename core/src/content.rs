use crate::document::{Document, ExternalId};
use crate::index::Snapshot;
use serde::{Deserialize, Serialize};

/// Characters of context kept on each side of a match.
pub const CONTEXT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMatch {
    /// Character offset of the match in the searched text.
    pub index: usize,
    pub context: String,
    pub before_match: String,
    #[serde(rename = "match")]
    pub matched: String,
    pub after_match: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSearchResult {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    pub query: String,
    pub matches: Vec<ContentMatch>,
    pub total_matches: usize,
}

impl ContentSearchResult {
    fn not_found(query: &str) -> Self {
        ContentSearchResult {
            found: false,
            message: Some("Document not found".to_string()),
            document: None,
            query: query.to_string(),
            matches: Vec::new(),
            total_matches: 0,
        }
    }
}

/// Search one document's extracted content (or its description) for `query`.
/// An unknown id is an ordinary `found: false` result.
pub fn search_within_document(snapshot: &Snapshot, id: &ExternalId, query: &str) -> ContentSearchResult {
    let Some(document) = snapshot.find(id) else {
        tracing::debug!(%id, "content search on unknown document");
        return ContentSearchResult::not_found(query);
    };
    let matches = find_matches(document.content_text(), query, CONTEXT_CHARS);
    ContentSearchResult {
        found: !matches.is_empty(),
        message: None,
        document: Some(document.clone()),
        query: query.to_string(),
        total_matches: matches.len(),
        matches,
    }
}

/// Every non-overlapping, case-insensitive occurrence of `query` in `text`,
/// scanning left to right.
pub fn find_matches(text: &str, query: &str, context_chars: usize) -> Vec<ContentMatch> {
    let chars: Vec<char> = text.chars().collect();
    let needle: Vec<char> = query.chars().collect();
    let mut matches = Vec::new();
    if needle.is_empty() || needle.len() > chars.len() {
        return matches;
    }

    let collect = |from: usize, to: usize| chars[from..to].iter().collect::<String>();
    let mut at = 0;
    while at + needle.len() <= chars.len() {
        if !chars_match(&chars[at..at + needle.len()], &needle) {
            at += 1;
            continue;
        }
        let end = at + needle.len();
        let ctx_start = at.saturating_sub(context_chars);
        let ctx_end = (end + context_chars).min(chars.len());
        matches.push(ContentMatch {
            index: at,
            context: collect(ctx_start, ctx_end),
            before_match: collect(ctx_start, at),
            matched: collect(at, end),
            after_match: collect(end, ctx_end),
        });
        at = end;
    }
    matches
}

fn chars_match(window: &[char], needle: &[char]) -> bool {
    window
        .iter()
        .zip(needle)
        .all(|(a, b)| a == b || a.to_lowercase().eq(b.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn snapshot() -> Snapshot {
        Snapshot::build(vec![
            Document::new(1, "Term Sheet", datetime!(2024-01-01 0:00 UTC))
                .with_description("ignored when content exists")
                .with_content("Valuation is set. The valuation cap applies. VALUATION!"),
            Document::new("memo", "Memo", datetime!(2024-01-01 0:00 UTC)).with_description("short"),
        ])
    }

    #[test]
    fn finds_every_occurrence_case_insensitively() {
        let res = search_within_document(&snapshot(), &ExternalId::Int(1), "valuation");
        assert!(res.found);
        assert_eq!(res.total_matches, 3);
        let offsets: Vec<usize> = res.matches.iter().map(|m| m.index).collect();
        assert_eq!(offsets, vec![0, 22, 45]);
        assert_eq!(res.matches[2].matched, "VALUATION");
        assert_eq!(res.matches[2].after_match, "!");
    }

    #[test]
    fn unknown_document_is_not_found() {
        let res = search_within_document(&snapshot(), &ExternalId::Int(9), "anything");
        assert!(!res.found);
        assert!(res.document.is_none());
        assert_eq!(res.message.as_deref(), Some("Document not found"));
    }

    #[test]
    fn query_longer_than_content() {
        let res = search_within_document(&snapshot(), &ExternalId::from("memo"), "much longer than short");
        assert!(!res.found);
        assert_eq!(res.total_matches, 0);
        assert!(res.document.is_some());
    }

    #[test]
    fn matches_do_not_overlap() {
        let found = find_matches("aaaa", "aa", 100);
        let offsets: Vec<usize> = found.iter().map(|m| m.index).collect();
        assert_eq!(offsets, vec![0, 2]);
    }

    #[test]
    fn context_is_clamped() {
        let text = format!("{}needle{}", "x".repeat(150), "y".repeat(20));
        let found = find_matches(&text, "NEEDLE", 100);
        assert_eq!(found.len(), 1);
        let m = &found[0];
        assert_eq!(m.index, 150);
        assert_eq!(m.before_match.len(), 100);
        assert_eq!(m.after_match, "y".repeat(20));
        assert_eq!(m.context, format!("{}needle{}", m.before_match, m.after_match));
    }

    #[test]
    fn offsets_count_characters() {
        let found = find_matches("café report", "report", 3);
        assert_eq!(found[0].index, 5);
        assert_eq!(found[0].before_match, "fé ");
    }

    #[test]
    fn empty_query_has_no_matches() {
        assert!(find_matches("anything", "", 100).is_empty());
    }
}
